use std::collections::HashSet;

use citesmith_bib::BibliographyParser;
use citesmith_core::config_file::ScoringConfig;
use citesmith_core::{ClaimType, ContentChunk, Metadata};

pub mod policy;
pub mod tfidf;

pub use policy::{AuthorityPolicy, evaluate_claim_type_match, policy};

/// Relevance thresholds and ranking weights.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringOptions {
    /// Best chunk must score strictly above this (default: 0.1).
    pub similarity_threshold: f64,
    /// Alternative candidates must score strictly above this (default: 0.05).
    pub alternative_threshold: f64,
    pub max_features: usize,
    pub similarity_weight: f64,
    pub authority_weight: f64,
    /// Number of alternative sources returned (default: 3).
    pub max_alternatives: usize,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.1,
            alternative_threshold: 0.05,
            max_features: tfidf::DEFAULT_MAX_FEATURES,
            similarity_weight: 0.4,
            authority_weight: 0.6,
            max_alternatives: 3,
        }
    }
}

impl ScoringOptions {
    /// Apply the `[scoring]` section of a config file over the defaults.
    pub fn from_config(config: Option<&ScoringConfig>) -> Self {
        let defaults = Self::default();
        let Some(config) = config else {
            return defaults;
        };
        Self {
            similarity_threshold: config
                .similarity_threshold
                .unwrap_or(defaults.similarity_threshold),
            alternative_threshold: config
                .alternative_threshold
                .unwrap_or(defaults.alternative_threshold),
            max_features: config.max_features.unwrap_or(defaults.max_features),
            similarity_weight: config.similarity_weight.unwrap_or(defaults.similarity_weight),
            authority_weight: config.authority_weight.unwrap_or(defaults.authority_weight),
            max_alternatives: defaults.max_alternatives,
        }
    }
}

/// A candidate source ranked for a claim.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSource<'a> {
    /// Best-scoring chunk of this source.
    pub chunk: &'a ContentChunk,
    pub similarity: f64,
    pub authority: f64,
    pub combined: f64,
}

/// Ranks library chunks against claims.
#[derive(Debug, Clone, Default)]
pub struct SourceScorer {
    options: ScoringOptions,
}

impl SourceScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ScoringOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    /// TF-IDF similarity of the claim against every chunk, in chunk order.
    pub fn similarities(&self, claim: &str, chunks: &[ContentChunk]) -> Vec<f64> {
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        tfidf::similarities(claim, &texts, self.options.max_features)
    }

    /// The chunk most similar to `claim`, if it clears the similarity threshold.
    ///
    /// Ties resolve to the earliest chunk.
    pub fn semantic_search<'a>(
        &self,
        claim: &str,
        chunks: &'a [ContentChunk],
    ) -> Option<&'a ContentChunk> {
        let sims = self.similarities(claim, chunks);
        let mut best: Option<(usize, f64)> = None;
        for (i, &s) in sims.iter().enumerate() {
            if best.is_none_or(|(_, b)| s > b) {
                best = Some((i, s));
            }
        }
        let (index, score) = best?;
        tracing::debug!(filename = %chunks[index].filename, score, "best chunk");
        (score > self.options.similarity_threshold).then(|| &chunks[index])
    }

    /// Authority of the chunk's source for a claim type, in `[0, 1]`.
    ///
    /// A matching bibliography entry fills the blank metadata fields first.
    pub fn calculate_source_authority(
        &self,
        source: &ContentChunk,
        claim_type: ClaimType,
        bibliography: Option<&BibliographyParser>,
    ) -> f64 {
        let metadata = enriched_metadata(&source.filename, &source.metadata, bibliography);
        let policy = policy(claim_type);
        let filename = source.filename.to_lowercase();
        let mut score = policy::BASE_AUTHORITY;

        if !metadata.journal.is_empty() {
            score += policy.journal;
        }
        if !metadata.doi.is_empty() {
            score += policy.doi;
        }
        if metadata.publisher.to_lowercase().contains("university") {
            score += policy.university_publisher;
        }
        if policy.filename_matches(&filename) {
            score += policy.filename_bonus;
        }
        if let Ok(year) = metadata.year.parse::<i32>() {
            score += policy.year_bonus(year);
        }

        if !metadata.author.trim().is_empty() || !metadata.authors.is_empty() {
            score += policy::AUTHOR_BONUS;
        }
        if !metadata.title.trim().is_empty() {
            score += policy::TITLE_BONUS;
        }
        score.min(1.0)
    }

    /// Whether an authority score meets the claim type's threshold.
    pub fn is_source_appropriate(&self, claim_type: ClaimType, score: f64) -> bool {
        score >= policy(claim_type).threshold
    }

    /// Up to `max_alternatives` distinct sources ranked by weighted
    /// similarity and authority.
    pub fn alternative_matches<'a>(
        &self,
        claim: &str,
        chunks: &'a [ContentChunk],
        claim_type: ClaimType,
        bibliography: Option<&BibliographyParser>,
    ) -> Vec<RankedSource<'a>> {
        let sims = self.similarities(claim, chunks);
        let mut candidates: Vec<RankedSource<'a>> = chunks
            .iter()
            .zip(sims)
            .filter(|(_, s)| *s > self.options.alternative_threshold)
            .map(|(chunk, similarity)| {
                let authority = self.calculate_source_authority(chunk, claim_type, bibliography);
                RankedSource {
                    chunk,
                    similarity,
                    authority,
                    combined: similarity * self.options.similarity_weight
                        + authority * self.options.authority_weight,
                }
            })
            .collect();

        // Stable sort keeps chunk order among equal scores.
        candidates.sort_by(|a, b| b.combined.total_cmp(&a.combined));

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|c| seen.insert(c.chunk.filename.clone()))
            .take(self.options.max_alternatives)
            .collect()
    }
}

/// Document metadata with blank fields filled from the matching
/// bibliography entry, if any.
pub fn enriched_metadata(
    filename: &str,
    metadata: &Metadata,
    bibliography: Option<&BibliographyParser>,
) -> Metadata {
    let mut enriched = metadata.clone();
    let Some(entry) = bibliography.and_then(|b| b.find_matching_entry(filename, metadata)) else {
        return enriched;
    };
    fn fill(dst: &mut String, src: &str) {
        if dst.trim().is_empty() && !src.is_empty() {
            *dst = src.to_string();
        }
    }
    fill(&mut enriched.title, &entry.title);
    fill(&mut enriched.journal, &entry.journal);
    fill(&mut enriched.volume, &entry.volume);
    fill(&mut enriched.issue, &entry.issue);
    fill(&mut enriched.pages, &entry.pages);
    fill(&mut enriched.doi, &entry.doi);
    fill(&mut enriched.url, &entry.url);
    if enriched.year.is_empty() {
        enriched.set_year(&entry.year);
    }
    if enriched.authors.is_empty() && enriched.author.trim().is_empty() {
        enriched.set_authors(entry.authors.clone());
    }
    enriched
}
