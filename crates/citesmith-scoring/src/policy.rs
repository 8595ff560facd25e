use citesmith_core::ClaimType;

/// A year-based adjustment. The first rule that applies wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YearRule {
    AtLeast(i32, f64),
    AtMost(i32, f64),
}

impl YearRule {
    fn bonus(&self, year: i32) -> Option<f64> {
        match *self {
            YearRule::AtLeast(bound, bonus) if year >= bound => Some(bonus),
            YearRule::AtMost(bound, bonus) if year <= bound => Some(bonus),
            _ => None,
        }
    }
}

/// How sources are judged for one claim type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuthorityPolicy {
    pub journal: f64,
    pub doi: f64,
    /// Bonus when the publisher name contains "university".
    pub university_publisher: f64,
    pub filename_terms: &'static [&'static str],
    pub filename_bonus: f64,
    pub year_rules: &'static [YearRule],
    /// Minimum authority score for a source to be appropriate.
    pub threshold: f64,
    /// Match evaluation labels: (filename terms, label), first hit wins.
    pub match_labels: &'static [(&'static [&'static str], &'static str)],
    pub default_label: &'static str,
}

impl AuthorityPolicy {
    /// Year bonus for a parsed publication year.
    pub fn year_bonus(&self, year: i32) -> f64 {
        self.year_rules
            .iter()
            .find_map(|r| r.bonus(year))
            .unwrap_or(0.0)
    }

    /// Whether the lower-cased filename contains one of the policy terms.
    pub fn filename_matches(&self, filename_lower: &str) -> bool {
        self.filename_terms.iter().any(|t| filename_lower.contains(t))
    }
}

/// Bonus for a source that names its author.
pub const AUTHOR_BONUS: f64 = 0.05;
/// Bonus for a source that carries a title.
pub const TITLE_BONUS: f64 = 0.05;
/// Starting authority for every source.
pub const BASE_AUTHORITY: f64 = 0.5;

const FACTUAL: AuthorityPolicy = AuthorityPolicy {
    journal: 0.2,
    doi: 0.1,
    university_publisher: 0.1,
    filename_terms: &[],
    filename_bonus: 0.0,
    year_rules: &[],
    threshold: 0.6,
    match_labels: &[(
        &["report", "study", "research", "data"],
        "Strong match - authoritative source",
    )],
    default_label: "Moderate match - general source",
};

const STATISTICAL: AuthorityPolicy = AuthorityPolicy {
    journal: 0.3,
    doi: 0.0,
    university_publisher: 0.0,
    filename_terms: &["data", "study", "survey", "analysis"],
    filename_bonus: 0.2,
    year_rules: &[YearRule::AtLeast(2015, 0.1)],
    threshold: 0.65,
    match_labels: &[
        (
            &["data", "statistics", "survey", "analysis"],
            "Strong match - data source",
        ),
        (&["study", "research"], "Good match - research source"),
    ],
    default_label: "Weak match - limited data evidence",
};

const THEORETICAL: AuthorityPolicy = AuthorityPolicy {
    journal: 0.2,
    doi: 0.0,
    university_publisher: 0.0,
    filename_terms: &["theory", "framework", "model", "concept"],
    filename_bonus: 0.15,
    year_rules: &[YearRule::AtMost(2000, 0.1), YearRule::AtLeast(2010, 0.05)],
    threshold: 0.55,
    match_labels: &[
        (
            &["theory", "framework", "model"],
            "Strong match - theoretical source",
        ),
        (&["concept", "principle"], "Good match - conceptual source"),
    ],
    default_label: "Moderate match - general academic source",
};

const METHODOLOGICAL: AuthorityPolicy = AuthorityPolicy {
    journal: 0.3,
    doi: 0.1,
    university_publisher: 0.0,
    filename_terms: &["method", "procedure", "protocol", "technique"],
    filename_bonus: 0.2,
    year_rules: &[],
    threshold: 0.7,
    match_labels: &[
        (
            &["method", "protocol", "procedure"],
            "Strong match - methodological source",
        ),
        (&["technique", "approach"], "Good match - procedural source"),
    ],
    default_label: "Weak match - limited methodological detail",
};

const OPINION_INTERPRETATION: AuthorityPolicy = AuthorityPolicy {
    journal: 0.1,
    doi: 0.0,
    university_publisher: 0.0,
    filename_terms: &["analysis", "perspective", "discussion", "review"],
    filename_bonus: 0.1,
    year_rules: &[YearRule::AtLeast(2018, 0.15)],
    threshold: 0.4,
    match_labels: &[
        (
            &["analysis", "perspective", "review"],
            "Strong match - analytical source",
        ),
        (&["discussion", "commentary"], "Good match - interpretive source"),
    ],
    default_label: "Moderate match - general source",
};

/// Policy table lookup.
pub fn policy(claim_type: ClaimType) -> &'static AuthorityPolicy {
    match claim_type {
        ClaimType::Factual => &FACTUAL,
        ClaimType::Statistical => &STATISTICAL,
        ClaimType::Theoretical => &THEORETICAL,
        ClaimType::Methodological => &METHODOLOGICAL,
        ClaimType::OpinionInterpretation => &OPINION_INTERPRETATION,
    }
}

/// How well a source's filename fits what the claim type asks for.
pub fn evaluate_claim_type_match(filename: &str, claim_type: ClaimType) -> &'static str {
    let filename = filename.to_lowercase();
    let policy = policy(claim_type);
    policy
        .match_labels
        .iter()
        .find(|(terms, _)| terms.iter().any(|t| filename.contains(t)))
        .map(|(_, label)| *label)
        .unwrap_or(policy.default_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        let t: Vec<f64> = ClaimType::ALL.iter().map(|c| policy(*c).threshold).collect();
        assert_eq!(t, vec![0.6, 0.65, 0.55, 0.7, 0.4]);
    }

    #[test]
    fn test_theoretical_year_bands() {
        let p = policy(ClaimType::Theoretical);
        assert_eq!(p.year_bonus(1995), 0.1);
        assert_eq!(p.year_bonus(2005), 0.0);
        assert_eq!(p.year_bonus(2012), 0.05);
    }

    #[test]
    fn test_match_labels() {
        assert_eq!(
            evaluate_claim_type_match("Survey_2020.pdf", ClaimType::Statistical),
            "Strong match - data source"
        );
        assert_eq!(
            evaluate_claim_type_match("field_study.pdf", ClaimType::Statistical),
            "Good match - research source"
        );
        assert_eq!(
            evaluate_claim_type_match("notes.pdf", ClaimType::Methodological),
            "Weak match - limited methodological detail"
        );
    }
}
