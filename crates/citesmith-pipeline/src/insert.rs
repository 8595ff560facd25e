use once_cell::sync::Lazy;
use regex::Regex;

use citesmith_scoring::tfidf;

static SENTENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*").unwrap());

/// Sentences of `text` with their terminators, trimmed, each paired with
/// its byte offset in `text`.
pub fn sentences(text: &str) -> Vec<(usize, &str)> {
    SENTENCE_RE
        .find_iter(text)
        .filter_map(|m| {
            let raw = m.as_str();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            let lead = raw.len() - raw.trim_start().len();
            Some((m.start() + lead, trimmed))
        })
        .collect()
}

/// Byte range of the claim in `text`.
///
/// An exact occurrence wins. Otherwise the first sentence whose TF-IDF
/// similarity to the claim exceeds `threshold` stands in for it.
pub fn locate_claim(text: &str, claim: &str, threshold: f64) -> Option<(usize, usize)> {
    let claim = claim.trim();
    if claim.is_empty() {
        return None;
    }
    if let Some(start) = text.find(claim) {
        return Some((start, start + claim.len()));
    }

    for (start, sentence) in sentences(text) {
        let sim = tfidf::similarities(claim, &[sentence], tfidf::DEFAULT_MAX_FEATURES);
        if sim.first().is_some_and(|&s| s > threshold) {
            tracing::debug!(sentence, start, "claim located by similarity");
            return Some((start, start + sentence.len()));
        }
    }
    None
}

/// Text inserted right after a located claim: ` {in_text} "{quote}"`.
pub fn citation_suffix(in_text: &str, quote: &str) -> String {
    format!(" {in_text} \"{quote}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_keep_terminators() {
        assert_eq!(
            sentences("Seas rose. Ice melted!  Why?"),
            vec![(0, "Seas rose."), (11, "Ice melted!"), (24, "Why?")]
        );
    }

    fn cite(text: &str, claim: &str) -> Option<String> {
        let (_, end) = locate_claim(text, claim, 0.7)?;
        let mut out = text.to_string();
        out.insert_str(end, &citation_suffix("[1]", "q"));
        Some(out)
    }

    #[test]
    fn test_insert_after_exact_claim() {
        assert_eq!(
            cite("Intro. Ocean heat rose sharply. Outro.", "Ocean heat rose sharply.").as_deref(),
            Some("Intro. Ocean heat rose sharply. [1] \"q\" Outro.")
        );
    }

    #[test]
    fn test_insert_falls_back_to_similar_sentence() {
        let text = "Intro here. Ocean heat content rose sharply after 1990. Outro.";
        let cited = cite(text, "ocean heat content rose sharply").unwrap();
        assert!(cited.contains("after 1990. [1] \"q\" Outro."));
    }

    #[test]
    fn test_similar_sentence_uses_its_own_offset() {
        // The matching sentence also occurs inside the longer first sentence.
        let text = "Surveyors mapping valleys, moraines, lakes and meadows across Norway \
                    confirmed that Arctic glaciers retreat. Arctic glaciers retreat.";
        let second = text.rfind("Arctic glaciers retreat.").unwrap();
        assert_ne!(second, text.find("Arctic glaciers retreat.").unwrap());

        let (start, end) = locate_claim(text, "Arctic glaciers retreat quickly", 0.7).unwrap();
        assert_eq!(start, second);
        assert_eq!(end, text.len());
    }

    #[test]
    fn test_unlocated_claim() {
        assert_eq!(cite("Nothing related.", "Glaciers retreat"), None);
        assert_eq!(locate_claim("abc", "  ", 0.7), None);
    }
}
