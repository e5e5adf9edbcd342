use std::io;

use thiserror::Error;

use crate::corpus::Label;

/// Everything that can go wrong while loading, training or predicting.
#[derive(Error, Debug)]
pub enum BayesError {
    /// A record with the wrong shape or a label outside {"0", "1"}.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The model was never shown a document of this class.
    #[error("no training data for class {0}")]
    MissingClassData(Label),

    #[error("vocabulary is empty")]
    DegenerateVocabulary,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl BayesError {
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        BayesError::MalformedInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, BayesError>;
