use once_cell::sync::Lazy;
use regex::Regex;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

impl ListOverride<String> {
    /// Resolve against static string defaults.
    pub fn resolve_strs(&self, defaults: &[&str]) -> Vec<String> {
        let defaults: Vec<String> = defaults.iter().map(|s| s.to_string()).collect();
        self.resolve(&defaults)
    }
}

/// Lines containing one of these are never taken as the title.
pub const DEFAULT_HEADER_KEYWORDS: &[&str] = &[
    "page",
    "volume",
    "journal",
    "doi",
    "abstract",
    "keywords",
    "introduction",
];

/// A title continuation line containing one of these ends the title.
pub const DEFAULT_AFFILIATION_KEYWORDS: &[&str] = &["author", "university", "department", "email"];

pub const DEFAULT_JOURNAL_INDICATORS: &[&str] = &[
    "journal",
    "proceedings",
    "conference",
    "international",
    "ieee",
    "acm",
    "springer",
    "elsevier",
];

pub const DEFAULT_PUBLISHERS: &[&str] = &[
    "springer",
    "elsevier",
    "ieee",
    "acm",
    "wiley",
    "taylor",
    "francis",
    "sage",
    "oxford",
    "cambridge",
];

/// A year on a line with one of these is accepted immediately.
pub const DEFAULT_PUBLICATION_KEYWORDS: &[&str] = &[
    "published",
    "copyright",
    "©",
    "journal",
    "conference",
    "proceedings",
];

/// Page-1 terms counted toward the academic-paper score.
pub const DEFAULT_ACADEMIC_KEYWORDS: &[&str] = &[
    "abstract",
    "introduction",
    "methodology",
    "references",
    "conclusion",
    "keywords",
    "doi",
];

/// DOI patterns tried in order; capture group 1 is the DOI.
pub const DEFAULT_DOI_PATTERNS: &[&str] = &[
    r"doi:\s*(10\.\d+/\S+)",
    r"DOI:\s*(10\.\d+/\S+)",
    r"https?://doi\.org/(10\.\d+/\S+)",
    r"https?://dx\.doi\.org/(10\.\d+/\S+)",
    r"doi\.org/(10\.\d+/\S+)",
    r"(10\.\d+/[^\s,;]+)",
];

static DEFAULT_DOI_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DEFAULT_DOI_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
        .collect()
});

/// Configuration for the metadata extraction heuristics.
///
/// Every keyword list is a [`ListOverride`] over the built-in defaults.
/// Use [`MetadataConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    // ── text pass ──
    /// Number of leading pages scanned by the text pass (default: 3).
    pub(crate) text_pages: usize,

    // ── identifiers.rs ──
    pub(crate) doi_patterns: ListOverride<Regex>,

    // ── title.rs ──
    pub(crate) header_keywords: ListOverride<String>,
    pub(crate) affiliation_keywords: ListOverride<String>,

    // ── authors.rs ──
    /// Maximum number of authors kept from the text pass (default: 10).
    pub(crate) max_authors: usize,

    // ── venue.rs ──
    pub(crate) journal_indicators: ListOverride<String>,
    pub(crate) publishers: ListOverride<String>,
    pub(crate) publication_keywords: ListOverride<String>,

    // ── assessment.rs ──
    pub(crate) academic_keywords: ListOverride<String>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            text_pages: 3,
            doi_patterns: ListOverride::Default,
            header_keywords: ListOverride::Default,
            affiliation_keywords: ListOverride::Default,
            max_authors: 10,
            journal_indicators: ListOverride::Default,
            publishers: ListOverride::Default,
            publication_keywords: ListOverride::Default,
            academic_keywords: ListOverride::Default,
        }
    }
}

impl MetadataConfig {
    pub fn text_pages(&self) -> usize {
        self.text_pages
    }

    pub fn max_authors(&self) -> usize {
        self.max_authors
    }

    pub(crate) fn doi_patterns(&self) -> Vec<Regex> {
        self.doi_patterns.resolve(&DEFAULT_DOI_REGEXES)
    }

    pub(crate) fn header_keywords(&self) -> Vec<String> {
        self.header_keywords.resolve_strs(DEFAULT_HEADER_KEYWORDS)
    }

    pub(crate) fn affiliation_keywords(&self) -> Vec<String> {
        self.affiliation_keywords
            .resolve_strs(DEFAULT_AFFILIATION_KEYWORDS)
    }

    pub(crate) fn journal_indicators(&self) -> Vec<String> {
        self.journal_indicators.resolve_strs(DEFAULT_JOURNAL_INDICATORS)
    }

    pub(crate) fn publishers(&self) -> Vec<String> {
        self.publishers.resolve_strs(DEFAULT_PUBLISHERS)
    }

    pub(crate) fn publication_keywords(&self) -> Vec<String> {
        self.publication_keywords
            .resolve_strs(DEFAULT_PUBLICATION_KEYWORDS)
    }

    pub(crate) fn academic_keywords(&self) -> Vec<String> {
        self.academic_keywords.resolve_strs(DEFAULT_ACADEMIC_KEYWORDS)
    }
}

/// Builder for [`MetadataConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct MetadataConfigBuilder {
    text_pages: Option<usize>,
    doi_patterns: ListOverride<String>,
    header_keywords: ListOverride<String>,
    affiliation_keywords: ListOverride<String>,
    max_authors: Option<usize>,
    journal_indicators: ListOverride<String>,
    publishers: ListOverride<String>,
    publication_keywords: ListOverride<String>,
    academic_keywords: ListOverride<String>,
}

/// Push onto an `Extend` override, switching to `Extend` from any other state.
fn extend(list: &mut ListOverride<String>, value: String) {
    match list {
        ListOverride::Extend(v) => v.push(value),
        _ => *list = ListOverride::Extend(vec![value]),
    }
}

impl MetadataConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Scalars ──

    pub fn text_pages(mut self, n: usize) -> Self {
        self.text_pages = Some(n);
        self
    }

    pub fn max_authors(mut self, n: usize) -> Self {
        self.max_authors = Some(n);
        self
    }

    // ── DOI patterns ──

    pub fn set_doi_patterns(mut self, patterns: Vec<String>) -> Self {
        self.doi_patterns = ListOverride::Replace(patterns);
        self
    }

    pub fn add_doi_pattern(mut self, pattern: String) -> Self {
        extend(&mut self.doi_patterns, pattern);
        self
    }

    // ── Keyword lists ──

    pub fn set_header_keywords(mut self, keywords: Vec<String>) -> Self {
        self.header_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_header_keyword(mut self, keyword: String) -> Self {
        extend(&mut self.header_keywords, keyword);
        self
    }

    pub fn set_affiliation_keywords(mut self, keywords: Vec<String>) -> Self {
        self.affiliation_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_affiliation_keyword(mut self, keyword: String) -> Self {
        extend(&mut self.affiliation_keywords, keyword);
        self
    }

    pub fn set_journal_indicators(mut self, indicators: Vec<String>) -> Self {
        self.journal_indicators = ListOverride::Replace(indicators);
        self
    }

    pub fn add_journal_indicator(mut self, indicator: String) -> Self {
        extend(&mut self.journal_indicators, indicator);
        self
    }

    pub fn set_publishers(mut self, publishers: Vec<String>) -> Self {
        self.publishers = ListOverride::Replace(publishers);
        self
    }

    pub fn add_publisher(mut self, publisher: String) -> Self {
        extend(&mut self.publishers, publisher);
        self
    }

    pub fn set_publication_keywords(mut self, keywords: Vec<String>) -> Self {
        self.publication_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_publication_keyword(mut self, keyword: String) -> Self {
        extend(&mut self.publication_keywords, keyword);
        self
    }

    pub fn set_academic_keywords(mut self, keywords: Vec<String>) -> Self {
        self.academic_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_academic_keyword(mut self, keyword: String) -> Self {
        extend(&mut self.academic_keywords, keyword);
        self
    }

    /// Compile all string patterns into regexes and produce a [`MetadataConfig`].
    ///
    /// Keyword lists are lower-cased since every match is done against
    /// lower-cased text.
    pub fn build(self) -> Result<MetadataConfig, regex::Error> {
        let compile = |patterns: &[String]| -> Result<Vec<Regex>, regex::Error> {
            patterns
                .iter()
                .map(|p| Regex::new(&format!("(?i){p}")))
                .collect()
        };

        let doi_patterns = match self.doi_patterns {
            ListOverride::Default => ListOverride::Default,
            ListOverride::Replace(v) => ListOverride::Replace(compile(&v)?),
            ListOverride::Extend(v) => ListOverride::Extend(compile(&v)?),
        };

        let lower = |list: ListOverride<String>| -> ListOverride<String> {
            let lower_all = |v: Vec<String>| v.into_iter().map(|s| s.to_lowercase()).collect();
            match list {
                ListOverride::Default => ListOverride::Default,
                ListOverride::Replace(v) => ListOverride::Replace(lower_all(v)),
                ListOverride::Extend(v) => ListOverride::Extend(lower_all(v)),
            }
        };

        Ok(MetadataConfig {
            text_pages: self.text_pages.unwrap_or(3),
            doi_patterns,
            header_keywords: lower(self.header_keywords),
            affiliation_keywords: lower(self.affiliation_keywords),
            max_authors: self.max_authors.unwrap_or(10),
            journal_indicators: lower(self.journal_indicators),
            publishers: lower(self.publishers),
            publication_keywords: lower(self.publication_keywords),
            academic_keywords: lower(self.academic_keywords),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetadataConfig::default();
        assert_eq!(config.text_pages(), 3);
        assert_eq!(config.max_authors(), 10);
        assert_eq!(config.doi_patterns().len(), 6);
        assert_eq!(config.publishers().len(), 10);
    }

    #[test]
    fn test_builder_scalars() {
        let config = MetadataConfigBuilder::new()
            .text_pages(5)
            .max_authors(4)
            .build()
            .unwrap();
        assert_eq!(config.text_pages(), 5);
        assert_eq!(config.max_authors(), 4);
    }

    #[test]
    fn test_builder_extend_and_replace() {
        let config = MetadataConfigBuilder::new()
            .add_publisher("MIT Press".to_string())
            .set_header_keywords(vec!["draft".to_string()])
            .build()
            .unwrap();
        let publishers = config.publishers();
        assert_eq!(publishers.len(), 11);
        assert_eq!(publishers.last().unwrap(), "mit press");
        assert_eq!(config.header_keywords(), vec!["draft".to_string()]);
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = MetadataConfigBuilder::new()
            .add_doi_pattern(r"(10\.[invalid".to_string())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
