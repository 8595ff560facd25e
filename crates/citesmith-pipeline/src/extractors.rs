use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use citesmith_core::{Claim, ContentChunk};
use citesmith_scoring::tfidf;

use crate::PipelineError;

/// Failure of an inference collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// The collaborator is not configured or cannot be reached.
    #[error("extractor unavailable: {0}")]
    Unavailable(String),
    #[error("extraction failed: {0}")]
    Failed(String),
}

/// A passage supporting a claim, with the page it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub text: String,
    pub page: usize,
}

/// Identifies the statements in a paper that need a citation.
pub trait ClaimExtractor {
    fn identify_claims(&self, text: &str) -> Result<Vec<Claim>, ExtractorError>;
}

/// Picks a supporting quote for a claim out of a chunk.
///
/// The quote is not checked against the chunk text.
pub trait QuoteExtractor {
    fn extract_quote(&self, claim: &str, chunk: &ContentChunk) -> Result<Option<Quote>, ExtractorError>;
}

/// Claim extractor that is never available.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredExtractor;

impl ClaimExtractor for UnconfiguredExtractor {
    fn identify_claims(&self, _text: &str) -> Result<Vec<Claim>, ExtractorError> {
        Err(ExtractorError::Unavailable(
            "no claim extractor configured".to_string(),
        ))
    }
}

/// Claims read from a JSON document: `{"claims": [{"text", "type", "reasoning"}]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonClaimFile {
    #[serde(default)]
    claims: Vec<Claim>,
}

impl JsonClaimFile {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }
}

impl ClaimExtractor for JsonClaimFile {
    fn identify_claims(&self, _text: &str) -> Result<Vec<Claim>, ExtractorError> {
        Ok(self.claims.clone())
    }
}

/// Offline quote extractor: the word window of the chunk most similar to
/// the claim.
#[derive(Debug, Clone)]
pub struct HeuristicQuoteExtractor {
    /// Words per window (default: 30).
    pub window_words: usize,
    /// Minimum similarity for a window to be quoted (default: 0.1).
    pub min_similarity: f64,
}

impl Default for HeuristicQuoteExtractor {
    fn default() -> Self {
        Self {
            window_words: 30,
            min_similarity: 0.1,
        }
    }
}

impl QuoteExtractor for HeuristicQuoteExtractor {
    fn extract_quote(&self, claim: &str, chunk: &ContentChunk) -> Result<Option<Quote>, ExtractorError> {
        let words: Vec<&str> = chunk.text.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }
        let size = self.window_words.max(1);
        let step = (size / 2).max(1);

        let mut windows = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + size).min(words.len());
            windows.push(words[start..end].join(" "));
            if end == words.len() {
                break;
            }
            start += step;
        }

        let texts: Vec<&str> = windows.iter().map(String::as_str).collect();
        let sims = tfidf::similarities(claim, &texts, tfidf::DEFAULT_MAX_FEATURES);
        let best = sims
            .iter()
            .enumerate()
            .fold(None::<(usize, f64)>, |best, (i, &s)| match best {
                Some((_, b)) if b >= s => best,
                _ => Some((i, s)),
            });

        Ok(best
            .filter(|(_, s)| *s > self.min_similarity)
            .map(|(i, _)| Quote {
                text: windows[i].clone(),
                page: chunk.page,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citesmith_core::{ClaimType, Metadata};

    fn chunk(text: &str) -> ContentChunk {
        ContentChunk {
            filename: "a.pdf".into(),
            page: 4,
            text: text.into(),
            metadata: Metadata::default(),
        }
    }

    #[test]
    fn test_json_claims() {
        let file = JsonClaimFile::from_json(
            r#"{"claims": [{"text": "Seas rose.", "type": "STATISTICAL", "reasoning": "number"},
                           {"text": "Coral bleaches.", "type": "ANECDOTE"}]}"#,
        )
        .unwrap();
        let claims = file.identify_claims("ignored").unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].claim_type, ClaimType::Statistical);
        assert_eq!(claims[1].claim_type, ClaimType::Factual);
    }

    #[test]
    fn test_json_claims_malformed() {
        assert!(matches!(
            JsonClaimFile::from_json("{not json"),
            Err(PipelineError::Json(_))
        ));
        assert!(JsonClaimFile::from_json("{}").unwrap().claims().is_empty());
    }

    #[test]
    fn test_unconfigured_extractor() {
        assert!(matches!(
            UnconfiguredExtractor.identify_claims("x"),
            Err(ExtractorError::Unavailable(_))
        ));
    }

    #[test]
    fn test_heuristic_quote_picks_relevant_window() {
        let text = "Forest soils hold carbon in cold regions and thaw slowly over decades \
                    while ocean heat content rose sharply in every basin after 1990 according \
                    to float measurements collected by several research programs worldwide";
        let extractor = HeuristicQuoteExtractor {
            window_words: 8,
            ..Default::default()
        };
        let quote = extractor
            .extract_quote("ocean heat content rose", &chunk(text))
            .unwrap()
            .unwrap();
        assert!(quote.text.contains("ocean heat content"));
        assert_eq!(quote.page, 4);
    }

    #[test]
    fn test_heuristic_quote_no_overlap() {
        let q = HeuristicQuoteExtractor::default()
            .extract_quote("medieval poetry", &chunk("ocean heat content rose"))
            .unwrap();
        assert!(q.is_none());
        assert!(HeuristicQuoteExtractor::default()
            .extract_quote("x", &chunk(""))
            .unwrap()
            .is_none());
    }
}
