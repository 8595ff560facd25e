use once_cell::sync::Lazy;
use regex::Regex;

/// Default target chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Split text into sentence-bounded chunks of roughly `chunk_size` characters.
///
/// Sentences end at runs of `.`, `!` or `?` (the terminators are dropped).
/// Sentences are joined with a single space until adding the next one would
/// exceed `chunk_size`; that sentence then starts a new chunk. A single
/// sentence longer than `chunk_size` becomes its own chunk.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in SENTENCE_END_RE.split(text) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let sentence_len = sentence.chars().count();

        if !current.is_empty() && current_len + sentence_len > chunk_size {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(sentence);
        current_len += sentence_len;
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Context window around the first case-insensitive occurrence of `query`.
///
/// Takes up to `context_chars` characters on each side; `...` marks each
/// truncated end. Returns `None` when `query` does not occur.
pub fn extract_context(text: &str, query: &str, context_chars: usize) -> Option<String> {
    let fold = |c: char| c.to_lowercase().next().unwrap_or(c);
    let haystack: Vec<char> = text.chars().collect();
    let needle: Vec<char> = query.chars().map(fold).collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    let pos = haystack
        .windows(needle.len())
        .position(|w| w.iter().zip(&needle).all(|(&a, &b)| fold(a) == b))?;

    let start = pos.saturating_sub(context_chars);
    let end = (pos + needle.len() + context_chars).min(haystack.len());

    let mut context = String::new();
    if start > 0 {
        context.push_str("...");
    }
    context.extend(&haystack[start..end]);
    if end < haystack.len() {
        context.push_str("...");
    }
    Some(context)
}
