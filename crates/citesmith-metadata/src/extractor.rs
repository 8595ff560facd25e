use citesmith_core::Metadata;
use citesmith_core::text_utils::year_from_date;

use crate::assessment::{self, AcademicAssessment};
use crate::backend::{ContainerProperties, DocumentReader};
use crate::config::MetadataConfig;
use crate::{authors, identifiers, title, venue};

/// A configurable metadata extraction pipeline.
///
/// Holds a [`MetadataConfig`] and exposes each pass as a method. The default
/// constructor uses built-in defaults; use [`MetadataExtractor::with_config`]
/// to supply custom keyword lists and patterns.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    config: MetadataConfig,
}

impl MetadataExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: MetadataConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: MetadataConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// Run both passes over `reader`, merge them and assess the result.
    pub fn extract_metadata(&self, reader: &dyn DocumentReader) -> Metadata {
        let mut metadata = reader
            .properties()
            .map(|p| self.container_metadata(&p))
            .unwrap_or_default();
        metadata.num_pages = reader.page_count();

        let leading_text = self.leading_text(reader);
        let text_metadata = self.text_metadata(&leading_text);
        let mut metadata = merge(metadata, text_metadata);

        let first_page = reader.page_text(0).unwrap_or_default();
        let AcademicAssessment {
            is_academic,
            confidence,
        } = assessment::assess(&metadata, &first_page, metadata.num_pages, &self.config);
        metadata.is_academic_paper = is_academic;
        metadata.confidence_score = confidence;

        tracing::debug!(
            title = %metadata.title,
            authors = metadata.authors.len(),
            year = %metadata.year,
            confidence,
            "extracted metadata"
        );
        metadata
    }

    /// Pass 1: metadata from container properties.
    pub fn container_metadata(&self, props: &ContainerProperties) -> Metadata {
        let mut metadata = Metadata {
            title: title::clean_title(&props.title),
            author: props.author.trim().to_string(),
            subject: props.subject.trim().to_string(),
            keywords: authors::parse_keywords(&props.subject),
            creator: props.creator.trim().to_string(),
            producer: props.producer.trim().to_string(),
            creation_date: props.creation_date.clone(),
            modification_date: props.modification_date.clone(),
            ..Default::default()
        };
        metadata.set_authors(authors::parse_authors(&props.author));
        metadata.year = year_from_date(&props.creation_date).unwrap_or_default();
        metadata
    }

    /// Pass 2: metadata from the leading pages' text.
    pub fn text_metadata(&self, text: &str) -> Metadata {
        let mut metadata = Metadata::default();
        if text.trim().is_empty() {
            return metadata;
        }

        metadata.doi = identifiers::extract_doi_with_config(text, &self.config).unwrap_or_default();
        metadata.title = title::extract_title_with_config(text, &self.config).unwrap_or_default();
        metadata.authors = authors::extract_authors_with_config(text, &self.config);

        let venue = venue::extract_venue_with_config(text, &self.config);
        metadata.journal = venue.journal;
        metadata.volume = venue.volume;
        metadata.issue = venue.issue;
        metadata.pages = venue.pages;
        metadata.publisher = venue.publisher;

        metadata.year = venue::extract_year_with_config(text, &self.config).unwrap_or_default();
        metadata.abstract_text = title::extract_abstract(text).unwrap_or_default();
        metadata
    }

    /// Text of the first `text_pages` pages, each followed by a newline.
    /// Unreadable pages are skipped.
    fn leading_text(&self, reader: &dyn DocumentReader) -> String {
        let mut text = String::new();
        for index in 0..reader.page_count().min(self.config.text_pages()) {
            match reader.page_text(index) {
                Ok(page) if !page.is_empty() => {
                    text.push_str(&page);
                    text.push('\n');
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(page = index + 1, error = %e, "skipping unreadable page"),
            }
        }
        text
    }
}

/// Merge container metadata with text metadata.
///
/// For title, authors, DOI, journal, year and abstract the text value wins
/// when the container value is empty or shorter. Volume, issue, pages,
/// publisher and keywords from the text only fill empty container values.
pub fn merge(container: Metadata, text: Metadata) -> Metadata {
    fn prefer_longer(dst: &mut String, src: String) {
        if !src.is_empty() && src.chars().count() > dst.chars().count() {
            *dst = src;
        }
    }
    fn fill_empty(dst: &mut String, src: String) {
        if dst.is_empty() {
            *dst = src;
        }
    }

    let mut merged = container;
    prefer_longer(&mut merged.title, text.title);
    prefer_longer(&mut merged.doi, text.doi);
    prefer_longer(&mut merged.journal, text.journal);
    prefer_longer(&mut merged.year, text.year);
    prefer_longer(&mut merged.abstract_text, text.abstract_text);

    let container_authors = merged.authors.join(", ").chars().count();
    if !text.authors.is_empty() && text.authors.join(", ").chars().count() > container_authors {
        merged.authors = text.authors;
    }

    fill_empty(&mut merged.volume, text.volume);
    fill_empty(&mut merged.issue, text.issue);
    fill_empty(&mut merged.pages, text.pages);
    fill_empty(&mut merged.publisher, text.publisher);
    if merged.keywords.is_empty() {
        merged.keywords = text.keywords;
    }

    merged.sync_author();
    merged
}
