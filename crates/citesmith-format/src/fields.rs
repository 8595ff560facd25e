use once_cell::sync::Lazy;
use regex::Regex;

use citesmith_core::Metadata;
use citesmith_core::text_utils::{collapse_whitespace, strip_extension, year_from_date};
use citesmith_core::{first_valid_year, valid_year};

/// Title used when neither metadata nor filename yields one.
pub const UNTITLED: &str = "Untitled Document";

/// Leading author segment of a filename: `Author (2020)`, `Author - `, `Author_`.
static FILENAME_AUTHOR_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^([A-Za-z\s]+)\s*\(\d{4}\)",
        r"^([A-Za-z\s]+)\s*-",
        r"^([A-Za-z\s]+)\s*_",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Which author rendering a style asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorForm {
    /// Reference-list form: `A`, `A and B`, `A et al.`
    Full,
    /// In-text form: surname of the first author.
    Surname,
}

/// Surname of a single name: text before a comma (`Jones, A.`), else the
/// last word (`Ada Lovelace`).
pub fn surname(name: &str) -> &str {
    let name = name.trim();
    match name.split_once(',') {
        Some((last, _)) if !last.trim().is_empty() => last.trim(),
        _ => name.split_whitespace().last().unwrap_or(name),
    }
}

/// Author text from the author list, the single author field, or the
/// filename, in that order. Empty when none applies.
pub fn extract_author(metadata: &Metadata, filename: &str, form: AuthorForm) -> String {
    let authors: Vec<&str> = metadata
        .authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if let Some(first) = authors.first() {
        return match form {
            AuthorForm::Surname => surname(first).to_string(),
            AuthorForm::Full => match authors.as_slice() {
                [one] => one.to_string(),
                [a, b] => format!("{a} and {b}"),
                _ => format!("{first} et al."),
            },
        };
    }

    let author = metadata.author.trim();
    if !author.is_empty() {
        return match form {
            AuthorForm::Surname => author
                .split_whitespace()
                .last()
                .unwrap_or(author)
                .to_string(),
            _ => author.to_string(),
        };
    }

    let stem = strip_extension(filename);
    for re in FILENAME_AUTHOR_RES.iter() {
        if let Some(caps) = re.captures(stem) {
            let author = caps[1].trim();
            if author.is_empty() {
                continue;
            }
            return match form {
                AuthorForm::Surname => author
                    .split_whitespace()
                    .last()
                    .unwrap_or(author)
                    .to_string(),
                _ => author.to_string(),
            };
        }
    }
    String::new()
}

/// Publication year from the metadata year, the creation date, or the
/// filename, each validated against `1900..=current year`.
pub fn extract_year(metadata: &Metadata, filename: &str) -> Option<String> {
    valid_year(&metadata.year)
        .or_else(|| year_from_date(&metadata.creation_date))
        .or_else(|| first_valid_year(filename))
}

/// Title from metadata, else derived from the filename.
pub fn extract_title(metadata: &Metadata, filename: &str) -> String {
    static YEAR_PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\d{4}\)").unwrap());
    static AUTHOR_DASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s]+-").unwrap());
    static AUTHOR_UNDERSCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s]+_").unwrap());
    static LEADING_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d{4}[\s_-]+").unwrap());

    let title = metadata.title.trim();
    if !title.is_empty() {
        return title.to_string();
    }

    let title = YEAR_PAREN_RE.replace_all(strip_extension(filename), "");
    let title = AUTHOR_DASH_RE.replace(&title, "");
    let title = AUTHOR_UNDERSCORE_RE.replace(&title, "");
    let title = LEADING_YEAR_RE.replace(&title, "");
    let title = collapse_whitespace(&title.replace(['_', '-'], " "));
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

/// Wrap in double quotes unless already quoted.
pub fn quoted(title: &str) -> String {
    if title.starts_with('"') {
        title.to_string()
    } else {
        format!("\"{title}\"")
    }
}
