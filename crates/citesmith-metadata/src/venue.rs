use once_cell::sync::Lazy;
use regex::Regex;

use citesmith_core::text_utils::{current_year, valid_year};

use crate::config::MetadataConfig;

const VENUE_SCAN_LINES: usize = 30;
const YEAR_SCAN_LINES: usize = 50;
/// Lower bound for a year found without a publication keyword nearby.
const RECENT_YEAR_MIN: i32 = 1980;
const RECENT_YEAR_MAX: i32 = 2030;

/// Venue details found in the first lines of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueInfo {
    pub journal: String,
    pub volume: String,
    pub issue: String,
    pub pages: String,
    pub publisher: String,
}

/// Extract journal, volume, issue, pages and publisher from document text.
pub fn extract_venue(text: &str) -> VenueInfo {
    extract_venue_with_config(text, &MetadataConfig::default())
}

/// Config-aware version of [`extract_venue`].
pub(crate) fn extract_venue_with_config(text: &str, config: &MetadataConfig) -> VenueInfo {
    static VOLUME_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)vol(?:ume)?\s*\.?\s*(\d+)").unwrap());
    static ISSUE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)(?:issue|no|number)\s*\.?\s*(\d+)").unwrap());
    static PAGES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)pp?\.\s*(\d+(?:-\d+)?)").unwrap());

    let indicators = config.journal_indicators();
    let publishers = config.publishers();
    let mut info = VenueInfo::default();

    for line in text.lines().take(VENUE_SCAN_LINES) {
        let line = line.trim();
        if line.chars().count() < 5 {
            continue;
        }
        let lower = line.to_lowercase();

        if info.journal.is_empty()
            && line.chars().count() < 150
            && indicators.iter().any(|i| lower.contains(i.as_str()))
        {
            if let Some(journal) = clean_journal_line(line) {
                info.journal = journal;
            }
        }

        fill_from_capture(&mut info.volume, &VOLUME_RE, line);
        fill_from_capture(&mut info.issue, &ISSUE_RE, line);
        fill_from_capture(&mut info.pages, &PAGES_RE, line);

        if info.publisher.is_empty() {
            if let Some(p) = publishers.iter().find(|p| lower.contains(p.as_str())) {
                info.publisher = title_case(p);
            }
        }
    }

    info
}

/// Strip the volume/issue/page suffix and everything from the year onwards.
fn clean_journal_line(line: &str) -> Option<String> {
    static SUFFIX_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\b(?:volume|vol|issue|no|pp?)\.?\s*\d+.*$").unwrap());
    static YEAR_TAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}.*$").unwrap());

    let journal = SUFFIX_RE.replace(line, "");
    let journal = YEAR_TAIL_RE.replace(&journal, "");
    let journal = journal.trim().trim_end_matches([',', ';', ':', '-']).trim_end();
    (journal.chars().count() > 5).then(|| journal.to_string())
}

fn fill_from_capture(slot: &mut String, re: &Regex, line: &str) {
    if slot.is_empty() {
        if let Some(caps) = re.captures(line) {
            *slot = caps[1].to_string();
        }
    }
}

fn title_case(word: &str) -> String {
    word.split(' ')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the publication year from document text.
///
/// A valid year on a line with a publication keyword wins immediately;
/// otherwise the first year in `1980..=min(2030, current year)` is used.
pub fn extract_year_from_text(text: &str) -> Option<String> {
    extract_year_with_config(text, &MetadataConfig::default())
}

/// Config-aware version of [`extract_year_from_text`].
pub(crate) fn extract_year_with_config(text: &str, config: &MetadataConfig) -> Option<String> {
    static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

    let keywords = config.publication_keywords();
    let recent = RECENT_YEAR_MIN..=RECENT_YEAR_MAX.min(current_year());

    for line in text.lines().take(YEAR_SCAN_LINES) {
        let lower = line.to_lowercase();
        let near_keyword = keywords.iter().any(|k| lower.contains(k.as_str()));
        for m in YEAR_RE.find_iter(line) {
            let Some(year) = valid_year(m.as_str()) else {
                continue;
            };
            if near_keyword {
                return Some(year);
            }
            if year.parse::<i32>().is_ok_and(|y| recent.contains(&y)) {
                return Some(year);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_from_header_line() {
        let text = "Journal of Machine Learning Research, Vol. 12, No. 3, pp. 45-67, 2011\n";
        let info = extract_venue(text);
        assert_eq!(info.journal, "Journal of Machine Learning Research");
        assert_eq!(info.volume, "12");
        assert_eq!(info.issue, "3");
        assert_eq!(info.pages, "45-67");
    }

    #[test]
    fn test_publisher_title_cased() {
        let info = extract_venue("Published by Elsevier B.V.\n");
        assert_eq!(info.publisher, "Elsevier");
        let info = extract_venue("Copyright 2020 IEEE\n");
        assert_eq!(info.publisher, "Ieee");
    }

    #[test]
    fn test_first_value_kept() {
        let text = "Volume 7\nVolume 9\n";
        assert_eq!(extract_venue(text).volume, "7");
    }

    #[test]
    fn test_year_keyword_line_wins() {
        let text = "Received 1950 revised\nCopyright 1975 Example Press\n";
        assert_eq!(extract_year_from_text(text), Some("1975".into()));
    }

    #[test]
    fn test_year_recent_fallback() {
        assert_eq!(
            extract_year_from_text("Report number 1234, issued 1999\n"),
            Some("1999".into())
        );
        assert_eq!(extract_year_from_text("Founded 1950\n"), None);
    }

    #[test]
    fn test_year_beyond_current_ignored() {
        let future = (current_year() + 1).to_string();
        let text = format!("Copyright {future}\n");
        assert_eq!(extract_year_from_text(&text), None);
    }
}
