//! Runs a draft paper through claim identification, source selection,
//! quoting, in-text insertion and reference-list generation.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use citesmith_bib::BibliographyParser;
use citesmith_core::config_file::ConfigFile;
use citesmith_core::text_utils::strip_extension;
use citesmith_core::{Claim, ClaimType, ContentChunk, Metadata};
use citesmith_format::{CitationFormatter, CitationStyle, CitedSource};
use citesmith_index::ContentIndex;
use citesmith_scoring::{ScoringOptions, SourceScorer, evaluate_claim_type_match};

pub mod extractors;
pub mod insert;

pub use extractors::{
    ClaimExtractor, ExtractorError, HeuristicQuoteExtractor, JsonClaimFile, Quote, QuoteExtractor,
    UnconfiguredExtractor,
};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid claims document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tuning for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub scoring: ScoringOptions,
    /// Similarity a paper sentence needs to stand in for a claim that is
    /// not found verbatim (default: 0.7).
    pub sentence_match_threshold: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            scoring: ScoringOptions::default(),
            sentence_match_threshold: 0.7,
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &ConfigFile) -> Self {
        Self {
            scoring: ScoringOptions::from_config(config.scoring.as_ref()),
            ..Self::default()
        }
    }
}

/// One claim that received a citation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationRecord {
    pub claim: String,
    pub claim_type: ClaimType,
    pub reasoning: String,
    /// Library filename of the cited source.
    pub source: String,
    pub quote: String,
    pub page: usize,
    /// Full citation in the run's style.
    pub citation: String,
    pub authority_score: f64,
    pub claim_type_match: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaperStats {
    pub claims_identified: usize,
    pub citations_added: usize,
    /// Distinct sources among the citations.
    pub sources_used: usize,
}

/// Outcome of processing one paper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperResult {
    pub original_text: String,
    pub cited_text: String,
    pub citations: Vec<CitationRecord>,
    /// Reference list, empty when nothing was cited.
    pub references: String,
    pub stats: PaperStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PaperResult {
    /// The paper unchanged, with zero citations.
    pub fn passthrough(paper: &str, error: Option<String>) -> Self {
        Self {
            original_text: paper.to_string(),
            cited_text: paper.to_string(),
            citations: Vec::new(),
            references: String::new(),
            stats: PaperStats::default(),
            error,
        }
    }
}

/// Progress events emitted while a paper is processed.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    ClaimsIdentified { count: usize },
    Cited {
        index: usize,
        total: usize,
        source: String,
        authority: f64,
    },
    Skipped {
        index: usize,
        total: usize,
        reason: SkipReason,
    },
}

/// Why a claim went uncited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoRelevantSource,
    NoQuote,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoRelevantSource => f.write_str("no relevant source"),
            SkipReason::NoQuote => f.write_str("no supporting quote"),
        }
    }
}

/// Cite every supportable claim in `paper` from the library.
pub fn process_paper(
    paper: &str,
    library: &ContentIndex,
    bibliography: Option<&BibliographyParser>,
    style: CitationStyle,
    claims: &dyn ClaimExtractor,
    quotes: &dyn QuoteExtractor,
    options: &PipelineOptions,
) -> PaperResult {
    process_paper_with_progress(
        paper,
        library,
        bibliography,
        style,
        claims,
        quotes,
        options,
        |_| {},
    )
}

/// [`process_paper`] with a progress callback.
#[allow(clippy::too_many_arguments)]
pub fn process_paper_with_progress(
    paper: &str,
    library: &ContentIndex,
    bibliography: Option<&BibliographyParser>,
    style: CitationStyle,
    claims: &dyn ClaimExtractor,
    quotes: &dyn QuoteExtractor,
    options: &PipelineOptions,
    progress: impl Fn(PipelineEvent),
) -> PaperResult {
    let claims = match claims.identify_claims(paper) {
        Ok(claims) => claims,
        Err(ExtractorError::Unavailable(msg)) => {
            tracing::warn!(error = %msg, "claim extraction unavailable");
            return PaperResult::passthrough(paper, Some(msg));
        }
        Err(e) => {
            tracing::warn!(error = %e, "claim extraction failed");
            Vec::new()
        }
    };
    progress(PipelineEvent::ClaimsIdentified {
        count: claims.len(),
    });
    if claims.is_empty() {
        return PaperResult::passthrough(paper, None);
    }

    let chunks = library.all_content();
    let run = Run {
        library,
        bibliography,
        scorer: SourceScorer::with_options(options.scoring.clone()),
        chunks: &chunks,
    };
    let mut formatter = CitationFormatter::new(style);
    let mut cited_text = paper.to_string();
    let mut citations = Vec::new();
    let total = claims.len();

    for (index, claim) in claims.iter().enumerate() {
        let support = match run.find_support(claim, quotes) {
            Ok(support) => support,
            Err(reason) => {
                tracing::debug!(claim = %claim.text, %reason, "claim skipped");
                progress(PipelineEvent::Skipped {
                    index,
                    total,
                    reason,
                });
                continue;
            }
        };

        let filename = support.chunk.filename.as_str();
        let metadata = run.citation_metadata(filename);
        let citation = match &metadata {
            Some(m) => formatter.format_citation(filename, m),
            None => fallback_citation(filename),
        };
        let metadata = metadata.unwrap_or_default();

        match insert::locate_claim(&cited_text, &claim.text, options.sentence_match_threshold) {
            Some((_, end)) => {
                let page = support.quote.page.to_string();
                let in_text = formatter.format_in_text_citation(filename, &metadata, Some(&page));
                cited_text.insert_str(end, &insert::citation_suffix(&in_text, &support.quote.text));
            }
            None => tracing::debug!(claim = %claim.text, "claim not found in paper text"),
        }

        progress(PipelineEvent::Cited {
            index,
            total,
            source: filename.to_string(),
            authority: support.authority,
        });
        citations.push(CitationRecord {
            claim: claim.text.clone(),
            claim_type: claim.claim_type,
            reasoning: claim.reasoning.clone(),
            source: filename.to_string(),
            quote: support.quote.text,
            page: support.quote.page,
            citation,
            authority_score: support.authority,
            claim_type_match: evaluate_claim_type_match(filename, claim.claim_type).to_string(),
        });
    }

    let sources: Vec<CitedSource> = citations
        .iter()
        .map(|c| CitedSource::new(c.source.clone(), run.reference_metadata(&c.source)))
        .collect();
    let references = formatter.format_reference_list(&sources);

    let sources_used = citations
        .iter()
        .map(|c| c.source.as_str())
        .collect::<HashSet<_>>()
        .len();
    tracing::info!(
        claims = total,
        citations = citations.len(),
        sources = sources_used,
        "paper processed"
    );

    PaperResult {
        original_text: paper.to_string(),
        cited_text,
        stats: PaperStats {
            claims_identified: total,
            citations_added: citations.len(),
            sources_used,
        },
        citations,
        references,
        error: None,
    }
}

/// Citation used when the source is not in the library.
pub fn fallback_citation(filename: &str) -> String {
    let title = strip_extension(filename).replace(['_', '-'], " ");
    format!("{title} (n.d.).")
}

struct Support<'a> {
    chunk: &'a ContentChunk,
    authority: f64,
    quote: Quote,
}

struct Run<'a> {
    library: &'a ContentIndex,
    bibliography: Option<&'a BibliographyParser>,
    scorer: SourceScorer,
    chunks: &'a [ContentChunk],
}

impl<'a> Run<'a> {
    fn find_support(&self, claim: &Claim, quotes: &dyn QuoteExtractor) -> Result<Support<'a>, SkipReason> {
        let mut chunk = self
            .scorer
            .semantic_search(&claim.text, self.chunks)
            .ok_or(SkipReason::NoRelevantSource)?;
        let mut authority = self
            .scorer
            .calculate_source_authority(chunk, claim.claim_type, self.bibliography);

        if !self.scorer.is_source_appropriate(claim.claim_type, authority) {
            let alternatives = self.scorer.alternative_matches(
                &claim.text,
                self.chunks,
                claim.claim_type,
                self.bibliography,
            );
            match alternatives.first() {
                Some(best) => {
                    tracing::debug!(
                        from = %chunk.filename,
                        to = %best.chunk.filename,
                        "replacing low-authority source"
                    );
                    chunk = best.chunk;
                    authority = best.authority;
                }
                None => tracing::debug!(
                    filename = %chunk.filename,
                    authority,
                    "keeping low-authority source"
                ),
            }
        }

        let quote = match quotes.extract_quote(&claim.text, chunk) {
            Ok(Some(quote)) => quote,
            Ok(None) => return Err(SkipReason::NoQuote),
            Err(e) => {
                tracing::warn!(filename = %chunk.filename, error = %e, "quote extraction failed");
                return Err(SkipReason::NoQuote);
            }
        };
        Ok(Support {
            chunk,
            authority,
            quote,
        })
    }

    fn matching_entry(&self, filename: &str, metadata: &Metadata) -> Option<&'a citesmith_core::BibliographyEntry> {
        self.bibliography
            .and_then(|b| b.find_matching_entry(filename, metadata))
    }

    /// Metadata for the citation: the bibliography entry if one matches,
    /// else the document's own. `None` when the document is not indexed.
    fn citation_metadata(&self, filename: &str) -> Option<Metadata> {
        let document = self.library.document(filename)?;
        Some(match self.matching_entry(filename, &document.metadata) {
            Some(entry) => entry.to_metadata(),
            None => document.metadata.clone(),
        })
    }

    /// Document metadata overlaid by the non-empty fields of the matching entry.
    fn reference_metadata(&self, filename: &str) -> Metadata {
        let mut metadata = self
            .library
            .document(filename)
            .map(|d| d.metadata.clone())
            .unwrap_or_default();
        if let Some(entry) = self.matching_entry(filename, &metadata) {
            entry.enrich(&mut metadata);
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_citation() {
        assert_eq!(fallback_citation("ocean_heat-2020.pdf"), "ocean heat 2020 (n.d.).");
    }

    #[test]
    fn test_options_from_config() {
        let config: ConfigFile = toml::from_str("[scoring]\nsimilarity_threshold = 0.2\n").unwrap();
        let options = PipelineOptions::from_config(&config);
        assert_eq!(options.scoring.similarity_threshold, 0.2);
        assert_eq!(options.sentence_match_threshold, 0.7);
    }

    #[test]
    fn test_passthrough_serializes_error() {
        let result = PaperResult::passthrough("text", Some("offline".into()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], "offline");
        assert_eq!(json["cited_text"], "text");
        assert_eq!(json["stats"]["claims_identified"], 0);
        let json = serde_json::to_value(PaperResult::passthrough("t", None)).unwrap();
        assert!(json.get("error").is_none());
    }
}
