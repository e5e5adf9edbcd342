use rayon::prelude::*;
use std::collections::{hash_map::Entry, HashMap};

use crate::{
    corpus::{Document, Label, Vocabulary},
    error::{BayesError, Result},
};

/// P(class) for every class seen during training.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorTable {
    priors: HashMap<Label, f64>,
}

impl PriorTable {
    /// Fails with `MissingClassData` if `label` never appeared in training.
    pub fn get(&self, label: Label) -> Result<f64> {
        self.priors
            .get(&label)
            .copied()
            .ok_or(BayesError::MissingClassData(label))
    }

    /// Observed classes in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, f64)> + '_ {
        Label::ALL
            .into_iter()
            .filter_map(move |label| self.priors.get(&label).map(|&p| (label, p)))
    }
}

/// Counts how many documents carry each label and divides by the total.
pub fn estimate_priors(documents: &[Document]) -> Result<PriorTable> {
    if documents.is_empty() {
        return Err(BayesError::malformed("cannot estimate priors from zero documents"));
    }

    // Count the documents of each class:
    let mut counts: HashMap<Label, usize> = HashMap::new();
    for document in documents {
        *counts.entry(document.label).or_insert(0) += 1;
    }

    // Divide by the total number of documents:
    let total = documents.len() as f64;
    let priors = counts
        .into_iter()
        .map(|(label, count)| (label, count as f64 / total))
        .collect();

    Ok(PriorTable { priors })
}

/// Token multiset for one class, stored as frequencies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassBag {
    frequencies: HashMap<String, usize>,
    token_count: usize,
}

impl ClassBag {
    fn add_text(&mut self, text: &str) {
        for token in text.split_whitespace() {
            *self.frequencies.entry(token.to_string()).or_insert(0) += 1;
            self.token_count += 1;
        }
    }

    pub fn frequency(&self, word: &str) -> usize {
        self.frequencies.get(word).copied().unwrap_or(0)
    }

    /// Total tokens, repetitions included.
    pub fn token_count(&self) -> usize {
        self.token_count
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BagOfWords {
    bags: HashMap<Label, ClassBag>,
}

impl BagOfWords {
    pub fn get(&self, label: Label) -> Result<&ClassBag> {
        self.bags
            .get(&label)
            .ok_or(BayesError::MissingClassData(label))
    }
}

/// Pools the tokens of every document into one bag per label.
pub fn build_bags(documents: &[Document]) -> BagOfWords {
    let mut bags = HashMap::new();
    for document in documents {
        match bags.entry(document.label) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(ClassBag::default()),
        }
        .add_text(&document.text);
    }

    BagOfWords { bags }
}

/// Laplace-smoothed P(word | class):
/// `(frequency + 1) / (class_token_count + vocabulary_size)`.
pub fn p_word_given_class(
    word: &str,
    label: Label,
    bags: &BagOfWords,
    vocabulary_size: usize,
) -> Result<f64> {
    if vocabulary_size == 0 {
        return Err(BayesError::DegenerateVocabulary);
    }

    let bag = bags.get(label)?;
    let frequency = bag.frequency(word) as f64;
    Ok((frequency + 1.0) / (bag.token_count() as f64 + vocabulary_size as f64))
}

/// Scores `document` against both classes and returns the winner.
///
/// Only tokens in `vocabulary` contribute; anything else is skipped. An exact
/// tie goes to `Label::Negative`.
pub fn predict(
    document: &Document,
    priors: &PriorTable,
    bags: &BagOfWords,
    vocabulary: &Vocabulary,
) -> Result<Label> {
    // Seed each class with its log prior:
    let mut scores = [0.0f64; 2];
    for (score, &label) in scores.iter_mut().zip(Label::ALL.iter()) {
        *score = priors.get(label)?.ln();
    }

    // Add the log likelihood of every vocabulary token:
    for token in document.tokens().filter(|t| vocabulary.contains(t)) {
        for (score, &label) in scores.iter_mut().zip(Label::ALL.iter()) {
            *score += p_word_given_class(token, label, bags, vocabulary.len())?.ln();
        }
    }

    let [negative, positive] = scores;
    Ok(if positive > negative {
        Label::Positive
    } else {
        Label::Negative
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordLikelihood {
    pub word: String,
    pub negative: f64,
    pub positive: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub id: String,
    pub predicted: Label,
    pub actual: Label,
}

impl Prediction {
    pub fn is_correct(&self) -> bool {
        self.predicted == self.actual
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub predictions: Vec<Prediction>,
    pub correct: usize,
}

impl Evaluation {
    pub fn total(&self) -> usize {
        self.predictions.len()
    }

    /// Fraction of correct predictions, or 0 when nothing was evaluated.
    pub fn accuracy(&self) -> f64 {
        if self.predictions.is_empty() {
            return 0.0;
        }
        self.correct as f64 / self.total() as f64
    }
}

/// A trained model: priors and bags derived once, plus the vocabulary that
/// gates which tokens are scored.
pub struct NaiveBayesClassifier {
    priors: PriorTable,
    bags: BagOfWords,
    vocabulary: Vocabulary,
}

impl NaiveBayesClassifier {
    pub fn train(documents: &[Document], vocabulary: Vocabulary) -> Result<Self> {
        if vocabulary.is_empty() {
            return Err(BayesError::DegenerateVocabulary);
        }

        // Derive the priors and per-class bags once:
        let priors = estimate_priors(documents)?;
        let bags = build_bags(documents);

        for label in Label::ALL {
            match bags.get(label) {
                Ok(bag) => tracing::debug!("class {}: {} tokens", label, bag.token_count()),
                Err(_) => tracing::warn!("training data contains no documents of class {}", label),
            }
        }
        tracing::info!(
            "trained on {} documents with a vocabulary of {} words",
            documents.len(),
            vocabulary.len()
        );

        Ok(NaiveBayesClassifier {
            priors,
            bags,
            vocabulary,
        })
    }

    pub fn priors(&self) -> &PriorTable {
        &self.priors
    }

    pub fn p_word_given_class(&self, word: &str, label: Label) -> Result<f64> {
        p_word_given_class(word, label, &self.bags, self.vocabulary.len())
    }

    /// P(word | class) for both classes, for every vocabulary word in order.
    pub fn likelihood_table(&self) -> Result<Vec<WordLikelihood>> {
        self.vocabulary
            .words()
            .iter()
            .map(|word| -> Result<WordLikelihood> {
                Ok(WordLikelihood {
                    word: word.clone(),
                    negative: self.p_word_given_class(word, Label::Negative)?,
                    positive: self.p_word_given_class(word, Label::Positive)?,
                })
            })
            .collect()
    }

    pub fn predict(&self, document: &Document) -> Result<Label> {
        predict(document, &self.priors, &self.bags, &self.vocabulary)
    }

    /// Predicts every document and tallies how many matched their label.
    /// Predictions keep the input order.
    pub fn evaluate(&self, documents: &[Document]) -> Result<Evaluation> {
        let predictions = documents
            .par_iter()
            .map(|document| -> Result<Prediction> {
                Ok(Prediction {
                    id: document.id.clone(),
                    predicted: self.predict(document)?,
                    actual: document.label,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Count the correct predictions:
        let correct = predictions.iter().filter(|p| p.is_correct()).count();
        let evaluation = Evaluation {
            predictions,
            correct,
        };

        tracing::info!(
            "{} of {} test documents classified correctly",
            evaluation.correct,
            evaluation.total()
        );
        Ok(evaluation)
    }
}
