use csv::{ReaderBuilder, StringRecord, Trim};
use std::{collections::HashSet, fmt, fs, path::Path, str::FromStr};

use crate::error::{BayesError, Result};

/// The two classes a document can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    /// Canonical order. Ties are broken in favour of the first entry.
    pub const ALL: [Label; 2] = [Label::Negative, Label::Positive];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Negative => "0",
            Label::Positive => "1",
        }
    }
}

impl FromStr for Label {
    type Err = BayesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "0" => Ok(Label::Negative),
            "1" => Ok(Label::Positive),
            other => Err(BayesError::malformed(format!(
                "label '{}' is not one of \"0\" or \"1\"",
                other
            ))),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub label: Label,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, label: Label, text: impl Into<String>) -> Self {
        Document {
            id: id.into(),
            label,
            text: text.into(),
        }
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    fn from_record(record: &StringRecord) -> Result<Self> {
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != 3 {
            return Err(BayesError::malformed(format!(
                "line {}: expected 3 tab-separated fields, found {}",
                line,
                record.len()
            )));
        }

        // Only "0" and "1" are valid labels:
        let label = record[1]
            .parse::<Label>()
            .map_err(|e| BayesError::malformed(format!("line {}: {}", line, e)))?;

        Ok(Document::new(&record[0], label, &record[2]))
    }
}

/// Words that are allowed to contribute to a score.
///
/// The word list is kept exactly as supplied, duplicates included, since its
/// length is the smoothing term of every likelihood.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    members: HashSet<String>,
}

impl Vocabulary {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        let members = words.iter().cloned().collect();
        Vocabulary { words, members }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.members.contains(word)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// Reads `id<TAB>label<TAB>text` records, one per line, with no header row.
pub fn read_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    // Every non-blank line must be a full record:
    let mut documents = Vec::new();
    for record in reader.records() {
        documents.push(Document::from_record(&record?)?);
    }

    tracing::debug!("read {} documents from '{}'", documents.len(), path.display());
    Ok(documents)
}

/// Reads one vocabulary word per line. Blank lines are ignored.
pub fn read_vocabulary<P: AsRef<Path>>(path: P) -> Result<Vocabulary> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let vocabulary = Vocabulary::new(
        contents
            .lines()
            .map(str::trim)
            .filter(|word| !word.is_empty()),
    );

    tracing::debug!("read {} vocabulary words from '{}'", vocabulary.len(), path.display());
    Ok(vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn label_round_trips_through_strings() {
        for label in Label::ALL {
            assert_eq!(label.to_string().parse::<Label>().unwrap(), label);
        }
        assert!(matches!(
            "2".parse::<Label>(),
            Err(BayesError::MalformedInput(_))
        ));
    }

    #[test]
    fn reads_tab_separated_documents() {
        let file = temp_file("d1\t0\tcheap bet now\nd2\t1\t\"hello\" friend\n\n");
        let docs = read_documents(file.path()).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], Document::new("d1", Label::Negative, "cheap bet now"));
        assert_eq!(docs[1].label, Label::Positive);
        assert_eq!(docs[1].text, "\"hello\" friend");
        assert_eq!(docs[0].tokens().count(), 3);
    }

    #[test]
    fn rejects_records_with_missing_fields() {
        let file = temp_file("d1\t0\tcheap bet\nd2\t1\n");
        let err = read_documents(file.path()).unwrap_err();
        match err {
            BayesError::MalformedInput(msg) => assert!(msg.contains("line 2"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_labels() {
        let file = temp_file("d1\tspam\tcheap bet\n");
        assert!(matches!(
            read_documents(file.path()),
            Err(BayesError::MalformedInput(_))
        ));
    }

    #[test]
    fn vocabulary_keeps_duplicates_and_order() {
        let file = temp_file("cheap\nbet\r\ncheap\n\nhello\n");
        let vocab = read_vocabulary(file.path()).unwrap();

        assert_eq!(vocab.words(), &["cheap", "bet", "cheap", "hello"]);
        assert_eq!(vocab.len(), 4);
        assert!(vocab.contains("bet"));
        assert!(!vocab.contains("friend"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            read_vocabulary("/definitely/not/here.vocab"),
            Err(BayesError::Io(_))
        ));
    }
}
