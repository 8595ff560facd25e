use thiserror::Error;

pub mod assessment;
pub mod authors;
pub mod backend;
pub mod config;
pub mod extractor;
pub mod identifiers;
pub mod title;
pub mod venue;

pub use backend::{ContainerProperties, DocumentReader, TextDocument};
pub use config::{ListOverride, MetadataConfig, MetadataConfigBuilder};
pub use extractor::MetadataExtractor;
// Re-export domain types from core (canonical definitions live there)
pub use citesmith_core::Metadata;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("page {0} is out of range")]
    PageOutOfRange(usize),
    #[error("failed to read page {page}: {reason}")]
    PageRead { page: usize, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract metadata from a document using the default heuristics.
///
/// Two passes:
/// 1. Container properties (title, author, subject, dates)
/// 2. Text heuristics over the first pages (DOI, title, authors, venue, year, abstract)
///
/// The passes are merged, then the result is scored for how much it looks
/// like an academic paper.
pub fn extract_metadata(reader: &dyn DocumentReader) -> Metadata {
    MetadataExtractor::new().extract_metadata(reader)
}
