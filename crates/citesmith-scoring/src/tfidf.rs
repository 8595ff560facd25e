use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

/// Default cap on the vocabulary size.
pub const DEFAULT_MAX_FEATURES: usize = 1000;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
        "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
        "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
        "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
        "but", "by", "call", "can", "cannot", "cant", "co", "con", "computer", "could",
        "couldnt", "cry", "de", "describe", "detail", "do", "done", "down", "due", "during",
        "each", "eg", "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc",
        "even", "ever", "every", "everyone", "everything", "everywhere", "except", "few",
        "fifteen", "fifty", "fill", "find", "fire", "first", "five", "for", "former",
        "formerly", "forty", "found", "four", "from", "front", "full", "further", "get", "give",
        "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby",
        "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how", "however",
        "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its",
        "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many",
        "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
        "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
        "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
        "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
        "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
        "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
        "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
        "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
        "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
        "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
        "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
        "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
        "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
        "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
        "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
        "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
        "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
        "would", "yet", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Sparse L2-normalized term vector: term index -> weight.
pub type TermVector = HashMap<usize, f64>;

/// Lower-cased word tokens of two or more characters, stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Fit a TF-IDF model on `texts` and return one vector per text.
///
/// The vocabulary keeps the `max_features` most frequent terms over the
/// whole corpus (ties by term order). Weights are raw counts times the
/// smoothed idf `ln((1 + n) / (1 + df)) + 1`, then L2-normalized. The
/// vocabulary is rebuilt on every call.
pub fn fit_transform(texts: &[&str], max_features: usize) -> Vec<TermVector> {
    let tokenized: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t)).collect();

    let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    for tokens in &tokenized {
        let mut seen = HashSet::new();
        for token in tokens {
            *corpus_counts.entry(token.as_str()).or_insert(0) += 1;
            if seen.insert(token.as_str()) {
                *doc_freq.entry(token.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut terms: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    terms.truncate(max_features);

    let n = texts.len() as f64;
    let vocabulary: HashMap<&str, (usize, f64)> = terms
        .iter()
        .enumerate()
        .map(|(i, (term, _))| {
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            (*term, (i, ((1.0 + n) / (1.0 + df)).ln() + 1.0))
        })
        .collect();

    tokenized
        .iter()
        .map(|tokens| {
            let mut vector = TermVector::new();
            for token in tokens {
                if let Some(&(index, idf)) = vocabulary.get(token.as_str()) {
                    *vector.entry(index).or_insert(0.0) += idf;
                }
            }
            let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                vector.values_mut().for_each(|w| *w /= norm);
            }
            vector
        })
        .collect()
}

/// Cosine similarity of two L2-normalized vectors.
pub fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(k, w)| large.get(k).map(|v| w * v))
        .sum()
}

/// Similarity of `query` against each of `documents`, in document order.
pub fn similarities(query: &str, documents: &[&str], max_features: usize) -> Vec<f64> {
    if documents.is_empty() {
        return Vec::new();
    }
    let mut texts = Vec::with_capacity(documents.len() + 1);
    texts.push(query);
    texts.extend_from_slice(documents);

    let vectors = fit_transform(&texts, max_features);
    let Some((query_vec, doc_vecs)) = vectors.split_first() else {
        return vec![0.0; documents.len()];
    };
    doc_vecs.iter().map(|d| cosine(query_vec, d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        assert_eq!(
            tokenize("The rise of a 2 degree anomaly"),
            vec!["rise", "degree", "anomaly"]
        );
    }

    #[test]
    fn test_numbers_and_generic_verbs_are_stop_words() {
        assert!(tokenize("system two show").is_empty());
        assert_eq!(tokenize("two systems show"), vec!["systems"]);
        let sims = similarities("two systems show", &["two system found", "unrelated content here"], 1000);
        assert_eq!(sims, vec![0.0, 0.0]);
    }

    #[test]
    fn test_identical_text_similarity_one() {
        let sims = similarities("ocean heat content", &["ocean heat content", "forest fires"], 1000);
        assert!((sims[0] - 1.0).abs() < 1e-9);
        assert_eq!(sims[1], 0.0);
    }

    #[test]
    fn test_vectors_are_normalized() {
        let vectors = fit_transform(&["alpha beta beta", "beta gamma"], 1000);
        for v in vectors {
            let norm: f64 = v.values().map(|w| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_max_features_caps_vocabulary() {
        let vectors = fit_transform(&["alpha alpha beta", "alpha gamma"], 1);
        assert!(vectors.iter().all(|v| v.len() <= 1));
        assert!(vectors[0].contains_key(&0));
    }

    #[test]
    fn test_stop_word_only_query() {
        let sims = similarities("the and of", &["ocean heat"], 1000);
        assert_eq!(sims, vec![0.0]);
        assert!(similarities("ocean", &[], 1000).is_empty());
    }
}
