//! Every formatter output validates under its own style, and reference
//! lists keep their ordering guarantees.

use citesmith_core::Metadata;
use citesmith_format::{CitationFormatter, CitationStyle, CitedSource};

/// Filename and metadata for each author/year presence combination.
fn source(with_author: bool, with_year: bool) -> (String, Metadata) {
    let metadata = Metadata {
        title: "Ocean Heat Content".into(),
        author: if with_author { "Jane Roe".into() } else { String::new() },
        year: if with_year { "2019".into() } else { String::new() },
        ..Default::default()
    };
    ("source.pdf".to_string(), metadata)
}

#[test]
fn formatted_citations_validate_in_every_style() {
    for style in CitationStyle::ALL {
        for with_author in [true, false] {
            for with_year in [true, false] {
                for page in [Some("12"), None] {
                    let mut f = CitationFormatter::new(style);
                    let (filename, metadata) = source(with_author, with_year);

                    let full = f.format_citation(&filename, &metadata);
                    assert!(
                        f.validate_citation_format(&full),
                        "{style} full citation rejected: {full}"
                    );

                    let in_text = f.format_in_text_citation(&filename, &metadata, page);
                    assert!(
                        f.validate_citation_format(&in_text),
                        "{style} in-text citation rejected: {in_text}"
                    );
                }
            }
        }
    }
}

#[test]
fn author_date_lists_are_sorted_and_deduplicated() {
    let cited = vec![
        CitedSource::new("Smith_2020_ClimateData.pdf", Metadata::default()),
        CitedSource::new("Adams_2018_Glaciers.pdf", Metadata::default()),
        CitedSource::new("Smith_2020_ClimateData.pdf", Metadata::default()),
    ];
    for (style, header) in [
        (CitationStyle::Apa, "References"),
        (CitationStyle::Mla, "Works Cited"),
        (CitationStyle::Chicago, "Bibliography"),
    ] {
        let mut f = CitationFormatter::new(style);
        let list = f.format_reference_list(&cited);
        let mut blocks = list.split("\n\n");
        assert_eq!(blocks.next(), Some(header));
        let entries: Vec<&str> = blocks.collect();
        assert_eq!(entries.len(), 2, "{style}: {list}");
        let mut sorted = entries.clone();
        sorted.sort();
        assert_eq!(entries, sorted);
        assert!(entries[0].starts_with("Adams"));
    }
}

#[test]
fn ieee_list_follows_citation_order() {
    let mut f = CitationFormatter::new(CitationStyle::Ieee);
    let b = CitedSource::new("Baker_2015_Reefs.pdf", Metadata::default());
    let a = CitedSource::new("Adams_2018_Glaciers.pdf", Metadata::default());
    let late = CitedSource::new("Cole_2012_Tides.pdf", Metadata::default());

    assert_eq!(f.format_in_text_citation(&b.source, &b.metadata, Some("3")), "[1, p. 3]");
    assert_eq!(f.format_in_text_citation(&a.source, &a.metadata, None), "[2]");

    let list = f.format_reference_list(&[a.clone(), late.clone(), b.clone(), a.clone()]);
    let lines: Vec<&str> = list.split("\n\n").collect();
    assert_eq!(lines[0], "References");
    assert_eq!(lines[1], "[1] Baker, \"Reefs\" 2015.");
    assert_eq!(lines[2], "[2] Adams, \"Glaciers\" 2018.");
    assert_eq!(lines[3], "[3] Cole, \"Tides\" 2012.");
    assert_eq!(f.numbering().get("Cole_2012_Tides.pdf"), Some(3));
}

#[test]
fn reference_list_uses_venue_details() {
    let mut metadata = Metadata {
        title: "Deep Learning Basics".into(),
        journal: "Journal of AI".into(),
        volume: "5".into(),
        issue: "2".into(),
        pages: "100-110".into(),
        year: "2019".into(),
        ..Default::default()
    };
    metadata.set_authors(vec!["Jones, A.".into()]);
    let mut f = CitationFormatter::new(CitationStyle::Apa);
    let list = f.format_reference_list(&[CitedSource::new("jones.pdf", metadata)]);
    assert_eq!(
        list,
        "References\n\nJones, A. (2019). Deep Learning Basics. *Journal of AI*, 5(2), 100-110."
    );
}
