use crate::config::MetadataConfig;

/// Shortest DOI accepted after trailing punctuation is trimmed.
const MIN_DOI_LEN: usize = 8;

/// Extract a DOI from document text.
///
/// Handles formats like:
/// - `doi: 10.1234/example`
/// - `https://doi.org/10.1234/example`
/// - `http://dx.doi.org/10.1234/example`
/// - a bare `10.1234/example`
///
/// Patterns are tried in order and the first one that yields a DOI of
/// reasonable length wins.
pub fn extract_doi(text: &str) -> Option<String> {
    extract_doi_with_config(text, &MetadataConfig::default())
}

/// Config-aware version of [`extract_doi`].
pub(crate) fn extract_doi_with_config(text: &str, config: &MetadataConfig) -> Option<String> {
    config.doi_patterns().iter().find_map(|re| {
        let caps = re.captures(text)?;
        let raw = caps.get(1).or_else(|| caps.get(0))?.as_str();
        let doi = clean_doi(raw);
        (doi.chars().count() >= MIN_DOI_LEN).then(|| doi.to_string())
    })
}

/// Trim trailing punctuation picked up from the surrounding sentence.
fn clean_doi(doi: &str) -> &str {
    doi.trim_end_matches(['.', ',', ';', ')'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doi_prefix() {
        assert_eq!(
            extract_doi("Available doi: 10.1145/3292500.3330701."),
            Some("10.1145/3292500.3330701".into())
        );
    }

    #[test]
    fn test_doi_url() {
        assert_eq!(
            extract_doi("see https://doi.org/10.1038/nature14539)"),
            Some("10.1038/nature14539".into())
        );
    }

    #[test]
    fn test_bare_doi_stops_at_comma() {
        assert_eq!(
            extract_doi("Nature 521, 10.1038/nature14539, 2015"),
            Some("10.1038/nature14539".into())
        );
    }

    #[test]
    fn test_prefix_pattern_wins_over_bare() {
        let text = "cites 10.1000/first.item but DOI: 10.1000/second.item";
        assert_eq!(extract_doi(text), Some("10.1000/second.item".into()));
    }

    #[test]
    fn test_too_short_rejected() {
        assert_eq!(extract_doi("10.1/a"), None);
        assert_eq!(extract_doi("no identifier here"), None);
    }
}
