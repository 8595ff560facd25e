use std::fmt;
use std::str::FromStr;

use citesmith_core::Metadata;

use crate::FormatError;
use crate::fields::quoted;

/// Supported citation styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CitationStyle {
    #[default]
    Apa,
    Mla,
    Chicago,
    Ieee,
}

impl CitationStyle {
    pub const ALL: [CitationStyle; 4] = [
        CitationStyle::Apa,
        CitationStyle::Mla,
        CitationStyle::Chicago,
        CitationStyle::Ieee,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "APA",
            CitationStyle::Mla => "MLA",
            CitationStyle::Chicago => "Chicago",
            CitationStyle::Ieee => "IEEE",
        }
    }

    /// Header line of the reference list.
    pub fn reference_header(&self) -> &'static str {
        match self {
            CitationStyle::Mla => "Works Cited",
            CitationStyle::Chicago => "Bibliography",
            CitationStyle::Apa | CitationStyle::Ieee => "References",
        }
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CitationStyle {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apa" => Ok(CitationStyle::Apa),
            "mla" => Ok(CitationStyle::Mla),
            "chicago" => Ok(CitationStyle::Chicago),
            "ieee" => Ok(CitationStyle::Ieee),
            _ => Err(FormatError::UnknownStyle(s.to_string())),
        }
    }
}

/// Author, year and title resolved for one source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Fields<'a> {
    pub author: &'a str,
    pub year: Option<&'a str>,
    pub title: &'a str,
}

/// Short full citation (no venue details).
pub(crate) fn citation(style: CitationStyle, f: &Fields<'_>) -> String {
    let (a, t) = (f.author, f.title);
    let a_end = with_period(a);
    match (style, !a.is_empty(), f.year) {
        (CitationStyle::Apa, true, Some(y)) => format!("{a} ({y}). {t}."),
        (CitationStyle::Apa, true, None) => format!("{a} (n.d.). {t}."),
        (CitationStyle::Apa, false, Some(y)) => format!("{t} ({y})."),
        (CitationStyle::Apa, false, None) => format!("{t} (n.d.)."),

        (CitationStyle::Mla, true, Some(y)) => format!("{a_end} {} {y}.", quoted(t)),
        (CitationStyle::Mla, true, None) => format!("{a_end} {}", quoted(t)),
        (CitationStyle::Mla, false, Some(y)) => format!("{} {y}.", quoted(t)),
        (CitationStyle::Mla, false, None) => quoted(t),

        (CitationStyle::Chicago, true, Some(y)) => format!("{a_end} {y}. {}.", quoted(t)),
        (CitationStyle::Chicago, true, None) => format!("{a_end} n.d. {}.", quoted(t)),
        (CitationStyle::Chicago, false, Some(y)) => format!("{}. {y}.", quoted(t)),
        (CitationStyle::Chicago, false, None) => format!("{}. n.d.", quoted(t)),

        (CitationStyle::Ieee, true, Some(y)) => format!("{a}, {} {y}.", quoted(t)),
        (CitationStyle::Ieee, true, None) => format!("{a}, {}", quoted(t)),
        (CitationStyle::Ieee, false, Some(y)) => format!("{} {y}.", quoted(t)),
        (CitationStyle::Ieee, false, None) => quoted(t),
    }
}

/// `text` closed with exactly one period, so `Jones, A.` stays `Jones, A.`.
fn with_period(text: &str) -> String {
    format!("{}.", text.trim_end_matches('.'))
}

/// Author-date in-text citation. IEEE is numbered and handled by the formatter.
pub(crate) fn in_text(style: CitationStyle, author: &str, year: Option<&str>, page: Option<&str>) -> String {
    let author = if author.is_empty() { "Unknown" } else { author };
    let year = year.unwrap_or("n.d.");
    match (style, page) {
        (CitationStyle::Mla, Some(p)) => format!("({author} {p})"),
        (CitationStyle::Mla, None) => format!("({author})"),
        (CitationStyle::Chicago, Some(p)) => format!("({author} {year}, {p})"),
        (CitationStyle::Chicago, None) => format!("({author} {year})"),
        (_, Some(p)) => format!("({author}, {year}, p. {p})"),
        (_, None) => format!("({author}, {year})"),
    }
}

/// IEEE numbered in-text citation.
pub(crate) fn ieee_in_text(number: usize, page: Option<&str>) -> String {
    match page {
        Some(p) => format!("[{number}, p. {p}]"),
        None => format!("[{number}]"),
    }
}

/// Venue details shared by the reference-list grammars.
struct Venue<'a> {
    journal: &'a str,
    volume: &'a str,
    issue: &'a str,
    pages: &'a str,
    publisher: &'a str,
    doi: &'a str,
    url: &'a str,
}

impl<'a> Venue<'a> {
    fn from_metadata(m: &'a Metadata) -> Self {
        Self {
            journal: m.journal_or_subject().trim(),
            volume: m.volume.trim(),
            issue: m.issue.trim(),
            pages: m.pages.trim(),
            publisher: m.publisher.trim(),
            doi: m.doi.trim(),
            url: m.url.trim(),
        }
    }
}

/// Reference-list entry with venue, publisher and DOI/URL details.
pub(crate) fn full_reference(style: CitationStyle, f: &Fields<'_>, metadata: &Metadata) -> String {
    let venue = Venue::from_metadata(metadata);
    match style {
        CitationStyle::Apa => apa_reference(f, &venue),
        CitationStyle::Mla => mla_reference(f, &venue),
        CitationStyle::Chicago => chicago_reference(f, &venue),
        CitationStyle::Ieee => ieee_reference(f, &venue),
    }
}

fn apa_reference(f: &Fields<'_>, v: &Venue<'_>) -> String {
    let mut parts = Vec::new();
    let has_author = !f.author.is_empty();
    match (has_author, f.year) {
        (true, Some(y)) => parts.push(format!("{} ({y}).", f.author)),
        (true, None) => parts.push(format!("{} (n.d.).", f.author)),
        (false, Some(y)) => parts.push(format!("{} ({y}).", f.title)),
        (false, None) => return format!("{} (n.d.).", f.title),
    }
    if has_author {
        parts.push(format!("{}.", f.title));
    }

    if !v.journal.is_empty() {
        let mut journal = format!("*{}*", v.journal);
        match (v.volume.is_empty(), v.issue.is_empty()) {
            (false, false) => journal.push_str(&format!(", {}({})", v.volume, v.issue)),
            (false, true) => journal.push_str(&format!(", {}", v.volume)),
            _ => {}
        }
        if !v.pages.is_empty() {
            journal.push_str(&format!(", {}", v.pages));
        }
        parts.push(format!("{journal}."));
    } else if !v.publisher.is_empty() {
        parts.push(format!("{}.", v.publisher));
    }

    if !v.doi.is_empty() {
        parts.push(format!("https://doi.org/{}", v.doi));
    } else if !v.url.is_empty() {
        parts.push(v.url.to_string());
    }
    parts.join(" ")
}

fn mla_reference(f: &Fields<'_>, v: &Venue<'_>) -> String {
    let mut parts = Vec::new();
    if !f.author.is_empty() {
        parts.push(with_period(f.author));
    }
    parts.push(quoted(f.title));

    let has_journal = !v.journal.is_empty();
    if has_journal {
        parts.push(format!("*{}*,", v.journal));
        match (v.volume.is_empty(), v.issue.is_empty()) {
            (false, false) => parts.push(format!("vol. {}, no. {},", v.volume, v.issue)),
            (false, true) => parts.push(format!("vol. {},", v.volume)),
            _ => {}
        }
    } else if !v.publisher.is_empty() {
        parts.push(format!("{},", v.publisher));
    }
    if let Some(y) = f.year {
        parts.push(format!("{y},"));
    }

    if !v.pages.is_empty() {
        if has_journal {
            parts.push(format!("pp. {}.", v.pages));
        } else {
            parts.push(format!("{}.", v.pages));
        }
    } else if let Some(last) = parts.last_mut()
        && last.ends_with(',')
    {
        last.pop();
        last.push('.');
    }

    if !v.doi.is_empty() {
        parts.push(format!("DOI: {}.", v.doi));
    } else if !v.url.is_empty() {
        parts.push(format!("Web. {}.", v.url));
    }
    parts.join(" ")
}

fn chicago_reference(f: &Fields<'_>, v: &Venue<'_>) -> String {
    let title = quoted(f.title);
    if f.author.is_empty() {
        return match f.year {
            Some(y) => format!("{title}. {y}."),
            None => format!("{title}. n.d."),
        };
    }

    let mut parts = vec![match f.year {
        Some(y) => format!("{} {y}.", with_period(f.author)),
        None => format!("{} n.d.", with_period(f.author)),
    }];

    if !v.journal.is_empty() {
        parts.push(title);
        let mut journal = format!("*{}*", v.journal);
        match (v.volume.is_empty(), v.issue.is_empty()) {
            (false, false) => journal.push_str(&format!(" {}, no. {}", v.volume, v.issue)),
            (false, true) => journal.push_str(&format!(" {}", v.volume)),
            _ => {}
        }
        match (f.year, v.pages.is_empty()) {
            (Some(y), false) => journal.push_str(&format!(" ({y}): {}.", v.pages)),
            (None, false) => journal.push_str(&format!(": {}.", v.pages)),
            (Some(y), true) => journal.push_str(&format!(" ({y}).")),
            (None, true) => journal.push('.'),
        }
        parts.push(journal);
    } else if !v.publisher.is_empty() {
        parts.push(format!("{title}."));
        parts.push(format!("{}.", v.publisher));
    } else {
        parts.push(format!("{title}."));
    }

    if !v.doi.is_empty() {
        parts.push(format!("doi:{}.", v.doi));
    } else if !v.url.is_empty() {
        parts.push(format!("Accessed via {}.", v.url));
    }
    parts.join(" ")
}

fn ieee_reference(f: &Fields<'_>, v: &Venue<'_>) -> String {
    let mut parts = Vec::new();
    if !f.author.is_empty() {
        parts.push(format!("{},", f.author));
    }
    parts.push(quoted(f.title));

    if !v.journal.is_empty() {
        let mut journal = format!("*{}*", v.journal);
        match (v.volume.is_empty(), v.issue.is_empty()) {
            (false, false) => journal.push_str(&format!(", vol. {}, no. {}", v.volume, v.issue)),
            (false, true) => journal.push_str(&format!(", vol. {}", v.volume)),
            _ => {}
        }
        if !v.pages.is_empty() {
            journal.push_str(&format!(", pp. {}", v.pages));
        }
        match f.year {
            Some(y) => journal.push_str(&format!(", {y}.")),
            None => journal.push('.'),
        }
        parts.push(journal);
    } else {
        match (v.publisher.is_empty(), f.year) {
            (false, Some(y)) => parts.push(format!("{}, {y}.", v.publisher)),
            (true, Some(y)) => parts.push(format!("{y}.")),
            (false, None) => parts.push(format!("{}.", v.publisher)),
            (true, None) => {}
        }
    }

    if !v.doi.is_empty() {
        parts.push(format!("DOI: {}", v.doi));
    } else if !v.url.is_empty() {
        parts.push(format!("[Online]. Available: {}", v.url));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'a>(author: &'a str, year: Option<&'a str>, title: &'a str) -> Fields<'a> {
        Fields { author, year, title }
    }

    fn journal_metadata() -> Metadata {
        Metadata {
            journal: "Journal of AI".into(),
            volume: "5".into(),
            issue: "2".into(),
            pages: "100-110".into(),
            doi: "10.1000/ai.5".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("IEEE".parse::<CitationStyle>().unwrap(), CitationStyle::Ieee);
        assert_eq!(" chicago ".parse::<CitationStyle>().unwrap(), CitationStyle::Chicago);
        assert!(matches!(
            "harvard".parse::<CitationStyle>(),
            Err(FormatError::UnknownStyle(_))
        ));
    }

    #[test]
    fn test_short_citation_grammar() {
        let f = fields("Smith", Some("2020"), "ClimateData");
        assert_eq!(citation(CitationStyle::Apa, &f), "Smith (2020). ClimateData.");
        assert_eq!(citation(CitationStyle::Mla, &f), "Smith. \"ClimateData\" 2020.");
        assert_eq!(citation(CitationStyle::Chicago, &f), "Smith. 2020. \"ClimateData\".");
        assert_eq!(citation(CitationStyle::Ieee, &f), "Smith, \"ClimateData\" 2020.");

        let f = fields("", None, "T");
        assert_eq!(citation(CitationStyle::Apa, &f), "T (n.d.).");
        assert_eq!(citation(CitationStyle::Mla, &f), "\"T\"");
        assert_eq!(citation(CitationStyle::Chicago, &f), "\"T\". n.d.");
        assert_eq!(citation(CitationStyle::Ieee, &f), "\"T\"");
    }

    #[test]
    fn test_in_text_grammar() {
        assert_eq!(in_text(CitationStyle::Apa, "Smith", Some("2020"), Some("4")), "(Smith, 2020, p. 4)");
        assert_eq!(in_text(CitationStyle::Apa, "", None, None), "(Unknown, n.d.)");
        assert_eq!(in_text(CitationStyle::Mla, "Smith", None, Some("4")), "(Smith 4)");
        assert_eq!(in_text(CitationStyle::Mla, "", None, None), "(Unknown)");
        assert_eq!(in_text(CitationStyle::Chicago, "Smith", None, Some("4")), "(Smith n.d., 4)");
        assert_eq!(ieee_in_text(3, Some("7")), "[3, p. 7]");
    }

    #[test]
    fn test_apa_journal_reference() {
        let f = fields("Jones, A.", Some("2019"), "Deep Learning Basics");
        assert_eq!(
            full_reference(CitationStyle::Apa, &f, &journal_metadata()),
            "Jones, A. (2019). Deep Learning Basics. *Journal of AI*, 5(2), 100-110. https://doi.org/10.1000/ai.5"
        );
    }

    #[test]
    fn test_mla_journal_reference() {
        let f = fields("Jones, A.", Some("2019"), "Deep Learning Basics");
        assert_eq!(
            full_reference(CitationStyle::Mla, &f, &journal_metadata()),
            "Jones, A. \"Deep Learning Basics\" *Journal of AI*, vol. 5, no. 2, 2019, pp. 100-110. DOI: 10.1000/ai.5."
        );
    }

    #[test]
    fn test_mla_trailing_comma_becomes_period() {
        let f = fields("Roe", Some("2001"), "Notes");
        assert_eq!(
            full_reference(CitationStyle::Mla, &f, &Metadata::default()),
            "Roe. \"Notes\" 2001."
        );
    }

    #[test]
    fn test_author_initial_not_doubled() {
        let f = fields("Jones, A.", Some("2019"), "Deep Learning Basics");
        let m = Metadata::default();
        for style in [CitationStyle::Mla, CitationStyle::Chicago] {
            assert!(!full_reference(style, &f, &m).contains(".."), "{style}");
            assert!(!citation(style, &f).contains(".."), "{style}");
        }
        assert_eq!(citation(CitationStyle::Mla, &f), "Jones, A. \"Deep Learning Basics\" 2019.");
        assert_eq!(
            full_reference(CitationStyle::Chicago, &f, &m),
            "Jones, A. 2019. \"Deep Learning Basics\"."
        );
        let f = fields("Jones, A. et al.", None, "T");
        assert_eq!(citation(CitationStyle::Chicago, &f), "Jones, A. et al. n.d. \"T\".");
    }

    #[test]
    fn test_chicago_journal_reference() {
        let f = fields("Jones, A.", Some("2019"), "Deep Learning Basics");
        assert_eq!(
            full_reference(CitationStyle::Chicago, &f, &journal_metadata()),
            "Jones, A. 2019. \"Deep Learning Basics\" *Journal of AI* 5, no. 2 (2019): 100-110. doi:10.1000/ai.5."
        );
    }

    #[test]
    fn test_ieee_book_reference() {
        let f = fields("M. Roe", Some("2010"), "Statistical Thinking");
        let m = Metadata {
            publisher: "Book Press".into(),
            url: "https://example.org/st".into(),
            ..Default::default()
        };
        assert_eq!(
            full_reference(CitationStyle::Ieee, &f, &m),
            "M. Roe, \"Statistical Thinking\" Book Press, 2010. [Online]. Available: https://example.org/st"
        );
    }
}
