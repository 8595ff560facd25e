use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MetadataConfig;

/// Number of leading non-empty lines scanned for author names.
const AUTHOR_SCAN_LINES: usize = 20;

/// Split `text` on the first delimiter from `delimiters` that occurs in it.
fn split_on_first_delimiter<'a>(text: &'a str, delimiters: &[&str]) -> Vec<&'a str> {
    let parts: Vec<&str> = delimiters
        .iter()
        .find(|d| text.contains(*d))
        .map(|d| {
            text.split(*d)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if parts.is_empty() {
        vec![text.trim()]
    } else {
        parts
    }
}

/// Split an author string into individual names.
///
/// The first delimiter found among `;`, `,`, ` and `, ` & ` and newline is
/// used. Parenthesized affiliations and `<email>` addresses are stripped and
/// fragments of two characters or fewer are dropped.
pub fn parse_authors(author_string: &str) -> Vec<String> {
    static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());
    static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

    if author_string.trim().is_empty() {
        return Vec::new();
    }

    split_on_first_delimiter(author_string, &[";", ",", " and ", " & ", "\n"])
        .into_iter()
        .filter_map(|part| {
            let part = PAREN_RE.replace_all(part, "");
            let part = EMAIL_RE.replace_all(&part, "");
            let part = part.trim();
            (part.chars().count() > 2).then(|| part.to_string())
        })
        .collect()
}

/// Split a subject field into keywords, keeping those longer than two characters.
pub fn parse_keywords(subject: &str) -> Vec<String> {
    if subject.trim().is_empty() {
        return Vec::new();
    }
    split_on_first_delimiter(subject, &[";", ",", "|", "\n"])
        .into_iter()
        .filter(|k| k.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Find author names in the first lines of document text.
pub fn extract_authors_from_text(text: &str) -> Vec<String> {
    extract_authors_with_config(text, &MetadataConfig::default())
}

/// Config-aware version of [`extract_authors_from_text`].
pub(crate) fn extract_authors_with_config(text: &str, config: &MetadataConfig) -> Vec<String> {
    static MARKER_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^.*?(authors?|by)\s*:?\s*").unwrap());
    static NAME_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"[A-Z][a-z]+ [A-Z][a-z]+(?:,\s*[A-Z][a-z]+ [A-Z][a-z]+)*").unwrap()
    });

    let mut found: Vec<String> = Vec::new();
    let lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(AUTHOR_SCAN_LINES);

    for line in lines {
        if line.chars().count() < 3 {
            continue;
        }

        let lower = line.to_lowercase();
        if lower.contains("author") || lower.contains("by ") {
            let author_text = MARKER_RE.replace(line, "");
            if !author_text.is_empty() {
                found.extend(parse_authors(&author_text));
            }
        }

        for m in NAME_RE.find_iter(line) {
            let len = m.as_str().chars().count();
            if len > 5 && len < 100 {
                found.extend(parse_authors(m.as_str()));
            }
        }
    }

    let mut unique: Vec<String> = Vec::new();
    for author in found {
        if author.chars().count() > 2 && !unique.contains(&author) {
            unique.push(author);
        }
    }
    unique.truncate(config.max_authors());
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_authors_semicolon_first() {
        assert_eq!(
            parse_authors("Smith, John; Doe, Jane"),
            vec!["Smith, John", "Doe, Jane"]
        );
    }

    #[test]
    fn test_parse_authors_strips_affiliation_and_email() {
        assert_eq!(
            parse_authors("Ada Lovelace (Analytical Society) and Charles Babbage <cb@example.org>"),
            vec!["Ada Lovelace", "Charles Babbage"]
        );
    }

    #[test]
    fn test_parse_authors_drops_short_fragments() {
        assert_eq!(parse_authors("Jo, Al, Bea Smith"), vec!["Bea Smith"]);
        assert!(parse_authors("   ").is_empty());
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(
            parse_keywords("climate | ML | remote sensing"),
            vec!["climate", "remote sensing"]
        );
        assert_eq!(parse_keywords("ecology"), vec!["ecology"]);
    }

    #[test]
    fn test_authors_from_marker_line() {
        let text = "on citation graphs\nAuthors: Alice Walker; Bob Stone\n";
        let authors = extract_authors_from_text(text);
        assert_eq!(authors, vec!["Alice Walker", "Bob Stone"]);
    }

    #[test]
    fn test_authors_from_name_pattern_deduplicated() {
        let text = "Grace Hopper, Alan Turing\nthanks to Grace Hopper\n";
        let authors = extract_authors_from_text(text);
        assert_eq!(authors, vec!["Grace Hopper", "Alan Turing"]);
    }

    #[test]
    fn test_authors_capped() {
        let config = crate::MetadataConfigBuilder::new()
            .max_authors(1)
            .build()
            .unwrap();
        let authors = extract_authors_with_config("Grace Hopper, Alan Turing", &config);
        assert_eq!(authors, vec!["Grace Hopper"]);
    }
}
