use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use citesmith_core::text_utils::filename_as_title;
use citesmith_core::{BibliographyEntry, Metadata, titles_similar};

pub mod entry;

pub use entry::{parse_entry, split_authors};

/// Minimum word-set similarity between a normalized filename and an entry title.
pub const FILENAME_TITLE_THRESHOLD: f64 = 0.6;

#[derive(Error, Debug)]
pub enum BibError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no bibliography entries found")]
    NoEntries,
}

/// Summary counts over the parsed entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BibliographyStats {
    pub total_entries: usize,
    /// Entry count per type name (`journal`, `book`, `unknown`).
    pub types: BTreeMap<&'static str, usize>,
    pub entries_with_doi: usize,
    pub entries_with_year: usize,
}

/// Parsed bibliography: entries in file order plus a lower-cased title index.
#[derive(Debug, Clone, Default)]
pub struct BibliographyParser {
    entries: Vec<BibliographyEntry>,
    /// Lower-cased title -> index of the last entry with that title.
    by_title: HashMap<String, usize>,
    /// Distinct lower-cased titles in first-insertion order.
    title_order: Vec<String>,
}

impl BibliographyParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection with the entries parsed from `text`.
    ///
    /// Paragraphs are separated by blank lines. A paragraph without a
    /// recognizable title is dropped. Returns `true` when at least one entry
    /// was parsed.
    pub fn parse(&mut self, text: &str) -> bool {
        static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").unwrap());

        self.entries.clear();
        self.by_title.clear();
        self.title_order.clear();

        let mut dropped = 0usize;
        for paragraph in PARAGRAPH_RE.split(text.trim()) {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            match parse_entry(paragraph) {
                Some(entry) => self.insert(entry),
                None => {
                    dropped += 1;
                    tracing::debug!(paragraph = %truncate(paragraph, 60), "dropping entry without title");
                }
            }
        }

        tracing::debug!(entries = self.entries.len(), dropped, "parsed bibliography");
        !self.entries.is_empty()
    }

    /// Read and parse a bibliography file. Returns the number of entries.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, BibError> {
        let content = std::fs::read_to_string(path)?;
        if self.parse(&content) {
            Ok(self.entries.len())
        } else {
            Err(BibError::NoEntries)
        }
    }

    fn insert(&mut self, entry: BibliographyEntry) {
        let key = entry.title.to_lowercase();
        let index = self.entries.len();
        self.entries.push(entry);
        if self.by_title.insert(key.clone(), index).is_none() {
            self.title_order.push(key);
        }
    }

    /// Find the entry describing a library document.
    ///
    /// Stages, first hit wins:
    /// 1. exact (lower-cased) metadata title
    /// 2. normalized filename vs. every title, word-set similarity >= 0.6
    /// 3. metadata author contained in an entry author, or vice versa
    pub fn find_matching_entry(
        &self,
        filename: &str,
        metadata: &Metadata,
    ) -> Option<&BibliographyEntry> {
        let title = metadata.title.trim().to_lowercase();
        if !title.is_empty() {
            if let Some(entry) = self.entry_by_title(&title) {
                tracing::debug!(filename, stage = "title", "bibliography match");
                return Some(entry);
            }
        }

        let filename_title = filename_as_title(filename);
        if let Some(key) = self
            .title_order
            .iter()
            .find(|t| titles_similar(&filename_title, t, FILENAME_TITLE_THRESHOLD))
        {
            tracing::debug!(filename, stage = "filename", "bibliography match");
            return self.entry_by_title(key);
        }

        let author = if metadata.author.is_empty() {
            metadata.authors.join(", ")
        } else {
            metadata.author.clone()
        };
        let author = author.trim().to_lowercase();
        if !author.is_empty() {
            let found = self.entries.iter().find(|entry| {
                entry.authors.iter().any(|a| {
                    let a = a.to_lowercase();
                    !a.is_empty() && (author.contains(&a) || a.contains(&author))
                })
            });
            if found.is_some() {
                tracing::debug!(filename, stage = "author", "bibliography match");
            }
            return found;
        }

        None
    }

    /// Look up an entry by title, case-insensitively. The last entry with a
    /// given title wins.
    pub fn entry_by_title(&self, title: &str) -> Option<&BibliographyEntry> {
        self.by_title
            .get(&title.to_lowercase())
            .and_then(|&i| self.entries.get(i))
    }

    /// All entries in file order.
    pub fn entries(&self) -> &[BibliographyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn statistics(&self) -> BibliographyStats {
        let mut types = BTreeMap::new();
        for entry in &self.entries {
            *types.entry(entry.entry_type.as_str()).or_insert(0) += 1;
        }
        BibliographyStats {
            total_entries: self.entries.len(),
            types,
            entries_with_doi: self.entries.iter().filter(|e| !e.doi.is_empty()).count(),
            entries_with_year: self.entries.iter().filter(|e| !e.year.is_empty()).count(),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
