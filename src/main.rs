mod bayes;
mod corpus;
mod error;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::{
    env,
    io::{self, Write},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "spam_bayes=info";

/// Train a binary multinomial Naive Bayes text classifier and score a test set.
#[derive(Parser, Debug)]
#[command(name = "spam_bayes", version)]
struct Cli {
    /// Training documents: `id<TAB>label<TAB>text` per line
    #[arg(long, default_value = "sampleTrain.txt")]
    train: PathBuf,

    /// Test documents, same format as the training file
    #[arg(long, default_value = "sampleTest.txt")]
    test: PathBuf,

    /// Vocabulary file, one word per line
    #[arg(long, default_value = "sampleTrain.vocab.txt")]
    vocab: PathBuf,

    /// Skip the per-word likelihood table in the report
    #[arg(long)]
    no_likelihoods: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    run(&cli, &mut stdout.lock())
}

/// Loads the three input files, trains, evaluates and writes the report.
fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let vocabulary = corpus::read_vocabulary(&cli.vocab)
        .with_context(|| format!("failed to read vocabulary '{}'", cli.vocab.display()))?;
    let training = corpus::read_documents(&cli.train)
        .with_context(|| format!("failed to read training set '{}'", cli.train.display()))?;
    let testing = corpus::read_documents(&cli.test)
        .with_context(|| format!("failed to read test set '{}'", cli.test.display()))?;

    let classifier = bayes::NaiveBayesClassifier::train(&training, vocabulary)
        .context("training failed")?;

    let likelihoods = if cli.no_likelihoods {
        None
    } else {
        Some(
            classifier
                .likelihood_table()
                .context("computing feature likelihoods failed")?,
        )
    };
    let evaluation = classifier
        .evaluate(&testing)
        .context("prediction on test data failed")?;

    report::write_report(
        out,
        classifier.priors(),
        likelihoods.as_deref(),
        &evaluation,
    )?;

    Ok(())
}

/// `RUST_LOG` directives when present and valid, otherwise `spam_bayes=info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
