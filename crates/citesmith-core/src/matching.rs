use std::collections::HashSet;

/// Jaccard similarity of the whitespace-separated, lower-cased word sets.
///
/// Returns 0.0 when either side has no words.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let words_a: HashSet<&str> = a_lower.split_whitespace().collect();
    let words_b: HashSet<&str> = b_lower.split_whitespace().collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}

/// Whether two titles share enough words to be considered the same work.
pub fn titles_similar(a: &str, b: &str, threshold: f64) -> bool {
    jaccard_similarity(a, b) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert!((jaccard_similarity("deep learning basics", "Deep Learning Basics") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_overlap() {
        // {deep, learning, basics} vs {deep, learning} → 2/3
        let s = jaccard_similarity("deep learning basics", "deep learning");
        assert!((s - 2.0 / 3.0).abs() < 1e-9);
        assert!(titles_similar("deep learning basics", "deep learning", 0.6));
    }

    #[test]
    fn test_below_threshold() {
        assert!(!titles_similar("climate data 2020", "deep learning basics", 0.6));
    }

    #[test]
    fn test_empty() {
        assert_eq!(jaccard_similarity("", "anything"), 0.0);
    }
}
