use once_cell::sync::Lazy;
use regex::Regex;

use crate::style::CitationStyle;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static APA_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"^.+\s*\(\d{4}\)\..*",
        r"^.+\s*\(n\.d\.\)\..*",
        r"^\(.+,\s*(?:\d{4}|n\.d\.)(?:,\s*p\.\s*.+)?\)$",
    ])
});

static MLA_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#"^(?:.+\.\s+)?".+"(?:\s+\d{4}\.)?.*$"#,
        r"^\([^()]+\)$",
    ])
});

static CHICAGO_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#"^.+\.\s*(?:\d{4}\.|n\.d\.)\s*".+"\.?.*"#,
        r#"^".+"\.\s*(?:\d{4}\.|n\.d\.)$"#,
        r"^\(.+\s+(?:\d{4}|n\.d\.)(?:,\s*.+)?\)$",
    ])
});

static IEEE_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"^\[\d+(?:,\s*p\.\s*.+)?\]",
        r#"^(?:.+,\s*)?".+".*"#,
    ])
});

/// Whether `citation` has one of the shapes `style` produces, either a
/// full citation or an in-text citation.
pub fn validate(style: CitationStyle, citation: &str) -> bool {
    let rules = match style {
        CitationStyle::Apa => &APA_RULES,
        CitationStyle::Mla => &MLA_RULES,
        CitationStyle::Chicago => &CHICAGO_RULES,
        CitationStyle::Ieee => &IEEE_RULES,
    };
    let citation = citation.trim();
    !citation.is_empty() && rules.iter().any(|re| re.is_match(citation))
}

/// Style hints for citation text written by hand.
pub fn suggestions(style: CitationStyle, text: &str) -> Vec<String> {
    static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());
    static PAREN_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\d{4}\)").unwrap());
    static PAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)pp?\.\s*\d+").unwrap());
    static COMMA_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\w+,\s*\d{4}\)").unwrap());
    static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]").unwrap());

    let mut out = Vec::new();
    match style {
        CitationStyle::Apa => {
            if YEAR_RE.is_match(text) && !PAREN_YEAR_RE.is_match(text) {
                out.push("Consider formatting years in parentheses: (2023)");
            }
            if text.contains('&') {
                out.push("Use 'and' instead of '&' in narrative citations");
            }
            if PAGE_RE.is_match(text) {
                out.push("Page references should use 'p.' for single pages, 'pp.' for ranges");
            }
        }
        CitationStyle::Mla => {
            if text.contains('(') && text.contains(',') {
                out.push("MLA in-text citations use (Author Page) format, no comma");
            }
            if !text.contains('"') && text.to_lowercase().contains("title") {
                out.push("Titles should be in quotation marks for MLA style");
            }
        }
        CitationStyle::Chicago => {
            if COMMA_YEAR_RE.is_match(text) {
                out.push("Chicago Author-Date uses (Author Year) format, no comma");
            }
        }
        CitationStyle::Ieee => {
            if text.contains('(') && text.contains(')') && !NUMBER_RE.is_match(text) {
                out.push("IEEE citations use numbered format: [1]");
            }
        }
    }
    out.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_other_style_shapes() {
        assert!(!validate(CitationStyle::Ieee, "(Smith, 2020)"));
        assert!(!validate(CitationStyle::Apa, "[1]"));
        assert!(!validate(CitationStyle::Chicago, "Smith (2020). Title."));
        assert!(!validate(CitationStyle::Mla, ""));
    }

    #[test]
    fn test_apa_suggestions() {
        let s = suggestions(CitationStyle::Apa, "Smith & Roe 2020, pp. 4");
        assert_eq!(s.len(), 3);
        assert!(suggestions(CitationStyle::Apa, "Smith (2020)").is_empty());
    }

    #[test]
    fn test_ieee_suggestions() {
        assert_eq!(
            suggestions(CitationStyle::Ieee, "(Smith, 2020)"),
            vec!["IEEE citations use numbered format: [1]"]
        );
        assert!(suggestions(CitationStyle::Ieee, "[1]").is_empty());
    }

    #[test]
    fn test_chicago_suggestions() {
        assert_eq!(suggestions(CitationStyle::Chicago, "(Smith, 2020)").len(), 1);
        assert!(suggestions(CitationStyle::Chicago, "(Smith 2020)").is_empty());
    }
}
