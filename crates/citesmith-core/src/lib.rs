use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config_file;
pub mod matching;
pub mod text_utils;

// Re-export for convenience
pub use matching::{jaccard_similarity, titles_similar};
pub use text_utils::{current_year, first_valid_year, strip_extension, valid_year};

/// Bibliographic metadata for one source document.
///
/// Empty strings mean "absent". `year` only ever holds a validated 4-digit
/// year (see [`Metadata::set_year`]), and `author` is kept in sync with
/// `authors` through [`Metadata::set_authors`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub authors: Vec<String>,
    /// Legacy single-string form of `authors`.
    pub author: String,
    pub subject: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub doi: String,
    pub journal: String,
    pub year: String,
    pub volume: String,
    pub issue: String,
    pub pages: String,
    pub publisher: String,
    pub url: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
    pub modification_date: String,
    pub num_pages: usize,
    pub is_academic_paper: bool,
    pub confidence_score: f64,
}

impl Metadata {
    /// Replace the author list and rebuild the joined `author` field.
    pub fn set_authors(&mut self, authors: Vec<String>) {
        if !authors.is_empty() {
            self.author = authors.join(", ");
        }
        self.authors = authors;
    }

    /// Store `year` if it is a valid publication year, otherwise clear it.
    pub fn set_year(&mut self, year: &str) {
        self.year = valid_year(year).unwrap_or_default();
    }

    /// Rebuild `author` from `authors` when the list is non-empty.
    pub fn sync_author(&mut self) {
        if !self.authors.is_empty() {
            self.author = self.authors.join(", ");
        }
    }

    /// Journal name, falling back to the subject field.
    pub fn journal_or_subject(&self) -> &str {
        if self.journal.is_empty() {
            &self.subject
        } else {
            &self.journal
        }
    }
}

/// A single page of extracted text, numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub number: usize,
    pub text: String,
}

/// One ingested source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub filename: String,
    pub full_text: String,
    pub pages: Vec<Page>,
    pub metadata: Metadata,
}

/// A sentence-bounded slice of a page, the unit of similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentChunk {
    pub filename: String,
    pub page: usize,
    pub text: String,
    pub metadata: Metadata,
}

/// Kind of a parsed bibliography entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Journal,
    Book,
    #[default]
    Unknown,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Journal => "journal",
            EntryType::Book => "book",
            EntryType::Unknown => "unknown",
        }
    }
}

/// A parsed entry from a reference-manager plain-text export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BibliographyEntry {
    pub raw_text: String,
    pub title: String,
    pub authors: Vec<String>,
    pub year: String,
    pub journal: String,
    pub volume: String,
    pub issue: String,
    pub pages: String,
    pub doi: String,
    pub url: String,
    pub entry_type: EntryType,
}

impl BibliographyEntry {
    /// Convert to [`Metadata`] so the entry can stand in for document metadata.
    pub fn to_metadata(&self) -> Metadata {
        let mut metadata = Metadata {
            title: self.title.clone(),
            subject: self.journal.clone(),
            journal: self.journal.clone(),
            creation_date: self.year.clone(),
            volume: self.volume.clone(),
            issue: self.issue.clone(),
            pages: self.pages.clone(),
            doi: self.doi.clone(),
            url: self.url.clone(),
            ..Default::default()
        };
        metadata.set_year(&self.year);
        metadata.set_authors(self.authors.clone());
        metadata
    }

    /// Overlay the non-empty fields of this entry onto `metadata`.
    pub fn enrich(&self, metadata: &mut Metadata) {
        fn overlay(dst: &mut String, src: &str) {
            if !src.is_empty() {
                *dst = src.to_string();
            }
        }
        overlay(&mut metadata.title, &self.title);
        overlay(&mut metadata.journal, &self.journal);
        overlay(&mut metadata.volume, &self.volume);
        overlay(&mut metadata.issue, &self.issue);
        overlay(&mut metadata.pages, &self.pages);
        overlay(&mut metadata.doi, &self.doi);
        overlay(&mut metadata.url, &self.url);
        if let Some(year) = valid_year(&self.year) {
            metadata.year = year;
        }
        if !self.authors.is_empty() {
            metadata.set_authors(self.authors.clone());
        }
    }
}

/// Semantic category of a claim; governs which sources count as authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClaimType {
    #[default]
    Factual,
    Statistical,
    Theoretical,
    Methodological,
    OpinionInterpretation,
}

impl ClaimType {
    pub const ALL: [ClaimType; 5] = [
        ClaimType::Factual,
        ClaimType::Statistical,
        ClaimType::Theoretical,
        ClaimType::Methodological,
        ClaimType::OpinionInterpretation,
    ];

    /// Parse a claim-type label. Unrecognized labels map to `Factual`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "STATISTICAL" => ClaimType::Statistical,
            "THEORETICAL" => ClaimType::Theoretical,
            "METHODOLOGICAL" => ClaimType::Methodological,
            "OPINION_INTERPRETATION" => ClaimType::OpinionInterpretation,
            _ => ClaimType::Factual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Factual => "FACTUAL",
            ClaimType::Statistical => "STATISTICAL",
            ClaimType::Theoretical => "THEORETICAL",
            ClaimType::Methodological => "METHODOLOGICAL",
            ClaimType::OpinionInterpretation => "OPINION_INTERPRETATION",
        }
    }
}

impl From<String> for ClaimType {
    fn from(label: String) -> Self {
        ClaimType::from_label(&label)
    }
}

impl From<ClaimType> for String {
    fn from(t: ClaimType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for ClaimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statement in the draft paper that needs a supporting source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    #[serde(rename = "type", default)]
    pub claim_type: ClaimType,
    #[serde(default)]
    pub reasoning: String,
}

impl Claim {
    pub fn new(text: impl Into<String>, claim_type: ClaimType) -> Self {
        Self {
            text: text.into(),
            claim_type,
            reasoning: String::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    #[error("could not determine config directory")]
    NoConfigDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_authors_keeps_author_in_sync() {
        let mut m = Metadata::default();
        m.set_authors(vec!["Ada Lovelace".into(), "Charles Babbage".into()]);
        assert_eq!(m.author, "Ada Lovelace, Charles Babbage");
    }

    #[test]
    fn set_year_discards_out_of_range() {
        let mut m = Metadata::default();
        m.set_year("1850");
        assert!(m.year.is_empty());
        m.set_year("2019");
        assert_eq!(m.year, "2019");
        m.set_year("19");
        assert!(m.year.is_empty());
    }

    #[test]
    fn claim_type_unknown_label_is_factual() {
        assert_eq!(ClaimType::from_label("ANECDOTAL"), ClaimType::Factual);
        assert_eq!(
            ClaimType::from_label("opinion_interpretation"),
            ClaimType::OpinionInterpretation
        );
    }

    #[test]
    fn claim_deserializes_type_field() {
        let claim: Claim =
            serde_json::from_str(r#"{"text": "x", "type": "STATISTICAL"}"#).unwrap();
        assert_eq!(claim.claim_type, ClaimType::Statistical);
        assert!(claim.reasoning.is_empty());
    }

    #[test]
    fn entry_enrich_overrides_only_non_empty() {
        let mut m = Metadata {
            title: "PDF title".into(),
            doi: "10.1000/xyz".into(),
            ..Default::default()
        };
        let entry = BibliographyEntry {
            title: "Bib Title".into(),
            year: "2019".into(),
            authors: vec!["Jones, A.".into()],
            ..Default::default()
        };
        entry.enrich(&mut m);
        assert_eq!(m.title, "Bib Title");
        assert_eq!(m.doi, "10.1000/xyz");
        assert_eq!(m.year, "2019");
        assert_eq!(m.author, "Jones, A.");
    }
}
