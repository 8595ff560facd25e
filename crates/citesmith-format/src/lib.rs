use std::collections::{HashMap, HashSet};

use thiserror::Error;

use citesmith_core::Metadata;

pub mod fields;
pub mod style;
pub mod validate;

pub use fields::{AuthorForm, extract_author, extract_title, extract_year};
pub use style::CitationStyle;

/// Returned in place of an in-text citation that could not be built.
pub const IN_TEXT_FALLBACK: &str = "(Unknown, n.d.)";
/// Returned in place of a full citation for a source with no filename.
pub const UNKNOWN_SOURCE: &str = "Unknown source";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("unknown citation style: {0}")]
    UnknownStyle(String),
    #[error("source has neither a filename nor a title")]
    EmptySource,
}

/// One cited source as it goes into the reference list.
#[derive(Debug, Clone, PartialEq)]
pub struct CitedSource {
    /// Library filename; the deduplication key.
    pub source: String,
    pub metadata: Metadata,
}

impl CitedSource {
    pub fn new(source: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            source: source.into(),
            metadata,
        }
    }
}

/// Order-of-first-citation numbering used by IEEE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IeeeNumbering {
    /// Next unassigned number minus one.
    counter: usize,
    source_to_number: HashMap<String, usize>,
}

impl IeeeNumbering {
    /// Number for `filename`, assigning the next one on first use.
    pub fn number_for(&mut self, filename: &str) -> usize {
        if let Some(&n) = self.source_to_number.get(filename) {
            return n;
        }
        self.counter += 1;
        self.source_to_number.insert(filename.to_string(), self.counter);
        self.counter
    }

    pub fn get(&self, filename: &str) -> Option<usize> {
        self.source_to_number.get(filename).copied()
    }

    pub fn len(&self) -> usize {
        self.source_to_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_to_number.is_empty()
    }

    pub fn clear(&mut self) {
        self.counter = 0;
        self.source_to_number.clear();
    }
}

/// Renders citations and reference lists in one style.
///
/// IEEE numbering lives on the formatter, so use one formatter per paper
/// (or call [`reset_state`](Self::reset_state) between papers). Switching
/// style clears the numbering.
#[derive(Debug, Clone, Default)]
pub struct CitationFormatter {
    style: CitationStyle,
    numbering: IeeeNumbering,
}

impl CitationFormatter {
    pub fn new(style: CitationStyle) -> Self {
        Self {
            style,
            numbering: IeeeNumbering::default(),
        }
    }

    pub fn style(&self) -> CitationStyle {
        self.style
    }

    pub fn current_style(&self) -> &'static str {
        self.style.name()
    }

    pub fn available_styles() -> Vec<&'static str> {
        CitationStyle::ALL.iter().map(|s| s.name()).collect()
    }

    /// Change style. Any change clears the IEEE numbering.
    pub fn set_style(&mut self, style: CitationStyle) {
        if style != self.style {
            self.numbering.clear();
        }
        self.style = style;
    }

    /// Forget every assigned IEEE number.
    pub fn reset_state(&mut self) {
        self.numbering.clear();
    }

    pub fn numbering(&self) -> &IeeeNumbering {
        &self.numbering
    }

    /// Full citation for a source. Degrades to the filename on failure.
    pub fn format_citation(&self, filename: &str, metadata: &Metadata) -> String {
        match self.try_format_citation(filename, metadata) {
            Ok(citation) => citation,
            Err(e) => {
                tracing::warn!(filename, error = %e, "citation formatting failed");
                fallback_citation(filename)
            }
        }
    }

    pub fn try_format_citation(&self, filename: &str, metadata: &Metadata) -> Result<String, FormatError> {
        check_source(filename, metadata)?;
        let author = extract_author(metadata, filename, AuthorForm::Full);
        let year = extract_year(metadata, filename);
        let title = extract_title(metadata, filename);
        let fields = style::Fields {
            author: &author,
            year: year.as_deref(),
            title: &title,
        };
        Ok(style::citation(self.style, &fields))
    }

    /// In-text citation. Under IEEE the filename is numbered on first use.
    pub fn format_in_text_citation(&mut self, filename: &str, metadata: &Metadata, page: Option<&str>) -> String {
        match self.try_format_in_text_citation(filename, metadata, page) {
            Ok(citation) => citation,
            Err(e) => {
                tracing::warn!(filename, error = %e, "in-text citation formatting failed");
                IN_TEXT_FALLBACK.to_string()
            }
        }
    }

    pub fn try_format_in_text_citation(
        &mut self,
        filename: &str,
        metadata: &Metadata,
        page: Option<&str>,
    ) -> Result<String, FormatError> {
        check_source(filename, metadata)?;
        let page = page.map(str::trim).filter(|p| !p.is_empty());
        if self.style == CitationStyle::Ieee {
            let number = self.numbering.number_for(filename);
            return Ok(style::ieee_in_text(number, page));
        }
        let author = extract_author(metadata, filename, AuthorForm::Surname);
        let year = extract_year(metadata, filename);
        Ok(style::in_text(self.style, &author, year.as_deref(), page))
    }

    /// Reference-list entry with venue details.
    pub fn format_full_reference(&self, cited: &CitedSource) -> Result<String, FormatError> {
        check_source(&cited.source, &cited.metadata)?;
        let author = extract_author(&cited.metadata, &cited.source, AuthorForm::Full);
        let year = extract_year(&cited.metadata, &cited.source);
        let title = extract_title(&cited.metadata, &cited.source);
        let fields = style::Fields {
            author: &author,
            year: year.as_deref(),
            title: &title,
        };
        Ok(style::full_reference(self.style, &fields, &cited.metadata))
    }

    /// The complete reference list, or an empty string when nothing was cited.
    ///
    /// Author-date styles list each source once, sorted. IEEE lists sources
    /// by their in-text number; sources cited without a number are appended
    /// in encounter order and numbered on from the last one.
    pub fn format_reference_list(&mut self, citations: &[CitedSource]) -> String {
        let mut seen = HashSet::new();
        let unique: Vec<&CitedSource> = citations
            .iter()
            .filter(|c| !c.source.is_empty() && seen.insert(c.source.as_str()))
            .collect();
        if unique.is_empty() {
            return String::new();
        }

        let references: Vec<String> = unique
            .iter()
            .map(|cited| {
                self.format_full_reference(cited).unwrap_or_else(|e| {
                    tracing::warn!(source = %cited.source, error = %e, "reference formatting failed");
                    fallback_citation(&cited.source)
                })
            })
            .collect();

        let lines: Vec<String> = if self.style == CitationStyle::Ieee {
            let mut numbered: Vec<(usize, String)> = Vec::new();
            let mut unnumbered: Vec<(&CitedSource, String)> = Vec::new();
            for (cited, reference) in unique.into_iter().zip(references) {
                match self.numbering.get(&cited.source) {
                    Some(n) => numbered.push((n, reference)),
                    None => unnumbered.push((cited, reference)),
                }
            }
            numbered.sort_by_key(|(n, _)| *n);
            for (cited, reference) in unnumbered {
                let n = self.numbering.number_for(&cited.source);
                numbered.push((n, reference));
            }
            numbered
                .into_iter()
                .map(|(n, reference)| format!("[{n}] {reference}"))
                .collect()
        } else {
            let mut references = references;
            references.sort();
            references
        };

        format!("{}\n\n{}", self.style.reference_header(), lines.join("\n\n"))
    }

    pub fn validate_citation_format(&self, citation: &str) -> bool {
        validate::validate(self.style, citation)
    }

    pub fn citation_suggestions(&self, text: &str) -> Vec<String> {
        validate::suggestions(self.style, text)
    }
}

/// Bare-filename citation used when formatting fails.
pub fn fallback_citation(filename: &str) -> String {
    if filename.trim().is_empty() {
        UNKNOWN_SOURCE.to_string()
    } else {
        filename.to_string()
    }
}

fn check_source(filename: &str, metadata: &Metadata) -> Result<(), FormatError> {
    if filename.trim().is_empty() && metadata.title.trim().is_empty() {
        Err(FormatError::EmptySource)
    } else {
        Ok(())
    }
}
