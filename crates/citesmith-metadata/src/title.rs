use once_cell::sync::Lazy;
use regex::Regex;

use citesmith_core::text_utils::collapse_whitespace;

use crate::config::MetadataConfig;

/// Number of leading non-empty lines considered for the title.
const TITLE_SCAN_LINES: usize = 10;
/// Continuation lines appended after the first title line, at most.
const MAX_CONTINUATION_LINES: usize = 2;
const MAX_SPECIAL_CHAR_RATIO: f64 = 0.3;

/// Clean a container title: drop converter prefixes and document extensions,
/// collapse whitespace.
pub fn clean_title(title: &str) -> String {
    static PREFIX_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^(Microsoft Word - |Adobe PDF - )").unwrap());
    static EXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.(pdf|doc|docx)$").unwrap());

    let title = title.trim();
    let title = PREFIX_RE.replace(title, "");
    let title = EXT_RE.replace(&title, "");
    collapse_whitespace(&title)
}

/// Fraction of characters that are neither word characters nor whitespace.
fn special_char_ratio(line: &str) -> f64 {
    let total = line.chars().count();
    if total == 0 {
        return 0.0;
    }
    let special = line
        .chars()
        .filter(|c| !c.is_alphanumeric() && *c != '_' && !c.is_whitespace())
        .count();
    special as f64 / total as f64
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|n| lower.contains(n.as_str()))
}

/// Guess the title from the first lines of the document text.
pub fn extract_title_from_text(text: &str) -> Option<String> {
    extract_title_with_config(text, &MetadataConfig::default())
}

/// Config-aware version of [`extract_title_from_text`].
pub(crate) fn extract_title_with_config(text: &str, config: &MetadataConfig) -> Option<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let header_keywords = config.header_keywords();
    let affiliation_keywords = config.affiliation_keywords();

    for (i, line) in lines.iter().take(TITLE_SCAN_LINES).enumerate() {
        let len = line.chars().count();
        if len < 10 || special_char_ratio(line) > MAX_SPECIAL_CHAR_RATIO {
            continue;
        }
        if contains_any(line, &header_keywords) {
            continue;
        }
        if !(21..200).contains(&len) {
            continue;
        }

        let mut title = line.to_string();
        for next in lines.iter().skip(i + 1).take(MAX_CONTINUATION_LINES) {
            let next_len = next.chars().count();
            if next_len > 10 && next_len < 100 && !contains_any(next, &affiliation_keywords) {
                title.push(' ');
                title.push_str(next);
            } else {
                break;
            }
        }
        return Some(title.trim().to_string());
    }
    None
}

/// Extract the abstract: text after an `abstract` marker up to the next
/// keywords/introduction/numbered-section/references line.
///
/// Kept only when its collapsed length is between 50 and 2000 characters.
pub fn extract_abstract(text: &str) -> Option<String> {
    static START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)abstract\s*[:\-]?\s*").unwrap());
    static END_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)\n\s*(?:keywords|introduction|1\.|\d+\.|references)").unwrap()
    });

    // The first marker that has an end line decides the outcome.
    let body = START_RE.find_iter(text).find_map(|start| {
        let rest = &text[start.end()..];
        END_RE.find(rest).map(|end| &rest[..end.start()])
    })?;

    let abstract_text = collapse_whitespace(body);
    let len = abstract_text.chars().count();
    (len > 50 && len < 2000).then_some(abstract_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title_prefix_and_extension() {
        assert_eq!(
            clean_title("Microsoft Word -  Climate   Models.docx"),
            "Climate Models"
        );
        assert_eq!(clean_title("adobe pdf - Report.PDF"), "Report");
    }

    #[test]
    fn test_title_skips_header_lines() {
        let text = "Journal of Testing, Volume 4\n\
                    Neural Approaches to Citation Recommendation\n\
                    Jane Doe, University of Somewhere\n";
        assert_eq!(
            extract_title_from_text(text),
            Some("Neural Approaches to Citation Recommendation".into())
        );
    }

    #[test]
    fn test_title_appends_continuation() {
        let text = "A Study of Long Titles That Wrap Across\n\
                    Two Physical Lines\n\
                    Department of Examples\n";
        assert_eq!(
            extract_title_from_text(text),
            Some("A Study of Long Titles That Wrap Across Two Physical Lines".into())
        );
    }

    #[test]
    fn test_title_rejects_symbol_heavy_lines() {
        let text = "#### ---- **** ==== ////\nshort\n";
        assert_eq!(extract_title_from_text(text), None);
    }

    #[test]
    fn test_abstract_until_introduction() {
        let text = "Title\nAbstract: We present a method for matching claims to sources \
                    using lexical similarity and source authority.\n1. Introduction\nBody";
        let abs = extract_abstract(text).unwrap();
        assert!(abs.starts_with("We present a method"));
        assert!(abs.ends_with("source authority."));
    }

    #[test]
    fn test_abstract_without_end_marker() {
        assert_eq!(extract_abstract("Abstract: a long abstract that never ends"), None);
    }

    #[test]
    fn test_abstract_too_short() {
        assert_eq!(extract_abstract("Abstract\nToo short.\nKeywords: x"), None);
    }
}
