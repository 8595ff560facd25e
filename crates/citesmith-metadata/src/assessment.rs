use citesmith_core::Metadata;

use crate::config::MetadataConfig;

const MAX_SCORE: f64 = 10.0;
const ACADEMIC_CONFIDENCE: f64 = 0.4;

/// Advisory verdict on whether a document looks like an academic paper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcademicAssessment {
    pub is_academic: bool,
    /// Score normalized to `[0, 1]`.
    pub confidence: f64,
}

/// Score a document from its merged metadata and first-page text.
///
/// DOI +2, journal +1.5, abstract +1, several authors +1, plausible year
/// +0.5, +0.3 per academic keyword on page 1, and +0.5 when page 1 mentions
/// references or the document is longer than five pages.
pub fn assess(
    metadata: &Metadata,
    first_page_text: &str,
    num_pages: usize,
    config: &MetadataConfig,
) -> AcademicAssessment {
    let mut score = 0.0;

    if !metadata.doi.is_empty() {
        score += 2.0;
    }
    if !metadata.journal.is_empty() {
        score += 1.5;
    }
    if !metadata.abstract_text.is_empty() {
        score += 1.0;
    }
    if metadata.authors.len() > 1 {
        score += 1.0;
    }
    if metadata
        .year
        .parse::<i32>()
        .is_ok_and(|y| (1980..=2030).contains(&y))
    {
        score += 0.5;
    }

    let page = first_page_text.to_lowercase();
    let hits = config
        .academic_keywords()
        .iter()
        .filter(|k| page.contains(k.as_str()))
        .count();
    score += 0.3 * hits as f64;

    if page.contains("references") || num_pages > 5 {
        score += 0.5;
    }

    let confidence = (score / MAX_SCORE).min(1.0);
    AcademicAssessment {
        is_academic: confidence > ACADEMIC_CONFIDENCE,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_document_not_academic() {
        let a = assess(&Metadata::default(), "", 1, &MetadataConfig::default());
        assert!(!a.is_academic);
        assert_eq!(a.confidence, 0.0);
    }

    #[test]
    fn test_full_paper_is_academic() {
        let mut m = Metadata {
            doi: "10.1000/xyz123".into(),
            journal: "Journal of Tests".into(),
            abstract_text: "x".repeat(60),
            year: "2019".into(),
            ..Default::default()
        };
        m.set_authors(vec!["A Person".into(), "B Person".into()]);
        let page = "Abstract ... Introduction ... References";
        let a = assess(&m, page, 12, &MetadataConfig::default());
        // 2 + 1.5 + 1 + 1 + 0.5 + 0.9 + 0.5
        assert!((a.confidence - 0.74).abs() < 1e-9);
        assert!(a.is_academic);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // doi + journal + year = 4.0 -> 0.4
        let m = Metadata {
            doi: "10.1000/xyz123".into(),
            journal: "J".into(),
            year: "2001".into(),
            ..Default::default()
        };
        let a = assess(&m, "", 1, &MetadataConfig::default());
        assert!((a.confidence - 0.4).abs() < 1e-9);
        assert!(!a.is_academic);
    }
}
