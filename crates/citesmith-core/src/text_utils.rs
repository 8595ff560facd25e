use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

/// Earliest year accepted as a publication year.
pub const MIN_YEAR: i32 = 1900;

/// The current calendar year, used as the upper bound for publication years.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Validate a 4-digit year string against `MIN_YEAR..=current_year()`.
pub fn valid_year(year: &str) -> Option<String> {
    let year = year.trim();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i32 = year.parse().ok()?;
    (MIN_YEAR..=current_year())
        .contains(&value)
        .then(|| year.to_string())
}

/// First 4-digit token in `text` that is a valid publication year.
pub fn first_valid_year(text: &str) -> Option<String> {
    static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());
    YEAR_RE
        .find_iter(text)
        .find_map(|m| valid_year(m.as_str()))
}

/// Year from the first 4-digit token of a date string, if that token is valid.
///
/// Unlike [`first_valid_year`], only the first token is considered:
/// `"D:18991231"` yields `None` even though later digits could form a year.
pub fn year_from_date(date: &str) -> Option<String> {
    static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());
    YEAR_RE.find(date).and_then(|m| valid_year(m.as_str()))
}

/// Remove a trailing document extension (`paper.pdf` → `paper`).
///
/// Only known document types count, so `report_v1.2` is left intact.
pub fn strip_extension(filename: &str) -> &str {
    static EXT_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)\.(pdf|txt|text|md|docx?|odt|rtf|html?|epub|tex)$").unwrap()
    });
    match EXT_RE.find(filename) {
        Some(m) if m.start() > 0 => &filename[..m.start()],
        _ => filename,
    }
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn a filename into comparable title text: extension dropped,
/// `_`/`-` as spaces, lower-cased.
pub fn filename_as_title(filename: &str) -> String {
    strip_extension(filename)
        .replace(['_', '-'], " ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_year_bounds() {
        assert_eq!(valid_year("1900"), Some("1900".into()));
        assert_eq!(valid_year("1899"), None);
        let now = current_year();
        assert_eq!(valid_year(&now.to_string()), Some(now.to_string()));
        assert_eq!(valid_year(&(now + 1).to_string()), None);
        assert_eq!(valid_year("20a0"), None);
    }

    #[test]
    fn test_first_valid_year_skips_invalid() {
        assert_eq!(first_valid_year("report_1066_2015.pdf"), Some("2015".into()));
        assert_eq!(first_valid_year("no digits"), None);
    }

    #[test]
    fn test_year_from_date_pdf_style() {
        assert_eq!(year_from_date("D:20190412101010Z"), Some("2019".into()));
        assert_eq!(year_from_date("D:18991231"), None);
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("Smith_2020_ClimateData.pdf"), "Smith_2020_ClimateData");
        assert_eq!(strip_extension("notes"), "notes");
        assert_eq!(strip_extension(".pdf"), ".pdf");
        assert_eq!(strip_extension("Notes.TXT"), "Notes");
    }

    #[test]
    fn test_strip_extension_keeps_version_suffix() {
        assert_eq!(strip_extension("report_v1.2"), "report_v1.2");
        assert_eq!(strip_extension("report_v1.2.pdf"), "report_v1.2");
        assert_eq!(filename_as_title("report_v1.2"), "report v1.2");
    }

    #[test]
    fn test_filename_as_title() {
        assert_eq!(filename_as_title("Deep_Learning-Basics.pdf"), "deep learning basics");
    }
}
