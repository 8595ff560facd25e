use once_cell::sync::Lazy;
use regex::Regex;

use citesmith_core::{BibliographyEntry, EntryType};

/// Parse one bibliography paragraph. Returns `None` when no title is found.
///
/// Entries follow the author-date export grammar:
/// `Author, A. A. (Year). Title. Journal, Volume(Issue), pages.`
pub fn parse_entry(text: &str) -> Option<BibliographyEntry> {
    static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d{4})\)").unwrap());
    static DOI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)doi:\s*(\S+)").unwrap());
    static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

    let text = text.trim();
    let mut entry = BibliographyEntry {
        raw_text: text.to_string(),
        ..Default::default()
    };

    if let Some(caps) = YEAR_RE.captures(text) {
        entry.year = caps[1].to_string();
    }
    if let Some(caps) = DOI_RE.captures(text) {
        entry.doi = caps[1].trim_end_matches(['.', ',', ';']).to_string();
    }
    if let Some(m) = URL_RE.find(text) {
        entry.url = m.as_str().to_string();
    }

    let lower = text.to_lowercase();
    if lower.contains("journal") {
        parse_journal(text, &mut entry);
    } else if lower.contains("book") {
        parse_book(text, &mut entry);
    } else {
        parse_generic(text, &mut entry);
    }

    if entry.title.is_empty() {
        None
    } else {
        Some(entry)
    }
}

fn parse_journal(text: &str, entry: &mut BibliographyEntry) {
    static TITLE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\(\d{4}\)\.\s*([^.]+)\.\s*[A-Z]").unwrap());
    static JOURNAL_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"([A-Z][^,.]+),\s*(\d+)(?:\((\d+)\))?,\s*([^.]+)\.").unwrap()
    });

    entry.entry_type = EntryType::Journal;
    if let Some(caps) = TITLE_RE.captures(text) {
        entry.title = caps[1].trim().to_string();
    }
    entry.authors = leading_authors(text);

    if let Some(caps) = JOURNAL_RE.captures(text) {
        entry.journal = caps[1].trim().to_string();
        entry.volume = caps[2].to_string();
        entry.issue = caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default();
        entry.pages = caps[4].trim().to_string();
    }
}

fn parse_book(text: &str, entry: &mut BibliographyEntry) {
    static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\d{4}\)\.\s*([^.]+)\.").unwrap());

    entry.entry_type = EntryType::Book;
    if let Some(caps) = TITLE_RE.captures(text) {
        entry.title = caps[1].trim().to_string();
    }
    entry.authors = leading_authors(text);
}

fn parse_generic(text: &str, entry: &mut BibliographyEntry) {
    static TITLE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\(\d{4}\)[^.]*?\.\s*([^.,]+)").unwrap());

    if let Some(caps) = TITLE_RE.captures(text) {
        entry.title = caps[1].trim().to_string();
    }

    // Title-first entries: everything before the first period.
    if entry.title.is_empty() {
        if let Some(first_period) = text.find('.').filter(|&i| i > 0) {
            let candidate = text[..first_period].trim();
            if candidate.chars().count() > 10 && !candidate.contains('(') {
                entry.title = candidate.to_string();
            }
        }
    }
    entry.authors = leading_authors(text);
}

/// Authors from the text before the first `(`.
fn leading_authors(text: &str) -> Vec<String> {
    static AUTHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^(]+)\s*\(").unwrap());
    AUTHOR_RE
        .captures(text)
        .map(|caps| split_authors(caps[1].trim()))
        .unwrap_or_default()
}

/// Split an author list on commas.
///
/// A fragment made only of initials (`A.`, `A. B.`, `J.-P.`) belongs to the
/// surname before it, so `Jones, A., & Smith, B.` yields
/// `["Jones, A.", "Smith, B."]`.
pub fn split_authors(text: &str) -> Vec<String> {
    static INITIALS_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?:\p{Lu}\.(?:\s*|-))+$").unwrap());
    static CONJUNCTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:&|and\s)\s*").unwrap());

    let mut authors: Vec<String> = Vec::new();
    for fragment in text.split(',') {
        let fragment = CONJUNCTION_RE.replace(fragment.trim(), "");
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        match authors.last_mut() {
            Some(prev) if INITIALS_RE.is_match(fragment) && !INITIALS_RE.is_match(prev) && !prev.contains(',') => {
                prev.push_str(", ");
                prev.push_str(fragment);
            }
            _ => authors.push(fragment.to_string()),
        }
    }
    authors
}
