use std::io::{self, Write};

use crate::{
    bayes::{Evaluation, PriorTable, WordLikelihood},
    corpus::Label,
};

const RULE: &str = "-------------------";

/// Writes the run summary: priors, the optional per-word likelihood table,
/// one line per prediction and the final accuracy.
pub fn write_report<W: Write>(
    out: &mut W,
    priors: &PriorTable,
    likelihoods: Option<&[WordLikelihood]>,
    evaluation: &Evaluation,
) -> io::Result<()> {
    writeln!(out, "Prior probabilities")?;
    writeln!(out)?;
    for (label, prior) in priors.iter() {
        writeln!(out, "Class {} = {}", label, prior)?;
    }

    if let Some(likelihoods) = likelihoods {
        writeln!(out, "{}", RULE)?;
        writeln!(out, "Feature likelihoods")?;
        for row in likelihoods {
            writeln!(out)?;
            writeln!(out, "Word: {}", row.word)?;
            writeln!(out, "Class {}: {}", Label::Negative, row.negative)?;
            writeln!(out, "Class {}: {}", Label::Positive, row.positive)?;
        }
    }

    writeln!(out, "{}", RULE)?;
    writeln!(out, "Predictions on test data")?;
    for prediction in &evaluation.predictions {
        writeln!(out, "{} = {}", prediction.id, prediction.predicted)?;
    }

    writeln!(out, "{}", RULE)?;
    writeln!(out, "Accuracy on test data = {}", evaluation.accuracy())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bayes::NaiveBayesClassifier,
        corpus::{Document, Vocabulary},
    };

    fn trained() -> NaiveBayesClassifier {
        let docs = vec![
            Document::new("d1", Label::Negative, "cheap bet"),
            Document::new("d2", Label::Positive, "hello friend"),
        ];
        NaiveBayesClassifier::train(&docs, Vocabulary::new(["cheap", "hello"])).unwrap()
    }

    fn render(model: &NaiveBayesClassifier, with_table: bool) -> String {
        let tests = vec![
            Document::new("t1", Label::Negative, "cheap"),
            Document::new("t2", Label::Negative, "hello"),
        ];
        let evaluation = model.evaluate(&tests).unwrap();
        let table = model.likelihood_table().unwrap();

        let mut out = Vec::new();
        let likelihoods = if with_table { Some(table.as_slice()) } else { None };
        write_report(&mut out, model.priors(), likelihoods, &evaluation).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn report_lists_every_section() {
        let text = render(&trained(), true);

        assert!(text.starts_with("Prior probabilities\n\nClass 0 = 0.5\nClass 1 = 0.5\n"));
        assert!(text.contains("Feature likelihoods\n\nWord: cheap\nClass 0: 0.5\nClass 1: 0.25\n"));
        assert!(text.contains("Predictions on test data\nt1 = 0\nt2 = 1\n"));
        assert!(text.ends_with("Accuracy on test data = 0.5\n"));
    }

    #[test]
    fn likelihood_section_is_optional() {
        let text = render(&trained(), false);
        assert!(!text.contains("Feature likelihoods"));
        assert!(text.contains("Predictions on test data"));
    }
}
