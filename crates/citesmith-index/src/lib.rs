use thiserror::Error;

use citesmith_core::config_file::IndexConfig;
use citesmith_core::{ContentChunk, DocumentRecord, Metadata, Page};
use citesmith_metadata::{DocumentReader, MetadataExtractor};

pub mod chunking;

pub use chunking::{extract_context, split_into_chunks};

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("no readable text found in {0}")]
    NoReadableText(String),
}

/// Chunking and search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOptions {
    /// Target chunk size in characters (default: 500).
    pub chunk_size: usize,
    /// Chunks shorter than this are not searchable (default: 50).
    pub min_chunk_chars: usize,
    /// Characters of context on each side of a search hit (default: 200).
    pub context_chars: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            chunk_size: chunking::DEFAULT_CHUNK_SIZE,
            min_chunk_chars: 50,
            context_chars: 200,
        }
    }
}

impl IndexOptions {
    /// Apply the `[index]` section of a config file over the defaults.
    pub fn from_config(config: Option<&IndexConfig>) -> Self {
        let defaults = Self::default();
        let Some(config) = config else {
            return defaults;
        };
        Self {
            chunk_size: config.chunk_size.unwrap_or(defaults.chunk_size),
            min_chunk_chars: config.min_chunk_chars.unwrap_or(defaults.min_chunk_chars),
            context_chars: config.context_chars.unwrap_or(defaults.context_chars),
        }
    }
}

/// Library statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexStats {
    pub total_files: usize,
    pub total_pages: usize,
    pub total_characters: usize,
    pub avg_pages_per_file: f64,
}

/// The source-document library, keyed by filename and kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    documents: Vec<DocumentRecord>,
    options: IndexOptions,
}

impl ContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: IndexOptions) -> Self {
        Self {
            documents: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Add (or replace) a document from its page texts.
    ///
    /// Blank pages are skipped but the remaining pages keep their physical
    /// 1-based numbers. Returns `false`, leaving the index untouched, when
    /// no page has text.
    pub fn add_document(&mut self, filename: &str, page_texts: &[String], metadata: Metadata) -> bool {
        let mut pages = Vec::new();
        let mut full_text = String::new();
        for (i, text) in page_texts.iter().enumerate() {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }
            pages.push(Page {
                number: i + 1,
                text: trimmed.to_string(),
            });
            full_text.push_str(text);
            full_text.push('\n');
        }

        if pages.is_empty() {
            tracing::warn!(filename, "no readable text found");
            return false;
        }

        let record = DocumentRecord {
            filename: filename.to_string(),
            full_text,
            pages,
            metadata,
        };
        match self.documents.iter_mut().find(|d| d.filename == filename) {
            Some(existing) => {
                tracing::debug!(filename, "replacing document");
                *existing = record;
            }
            None => {
                tracing::debug!(filename, pages = record.pages.len(), "added document");
                self.documents.push(record);
            }
        }
        true
    }

    /// Read every page through `reader`, extract metadata and add the document.
    ///
    /// Unreadable pages are treated as blank.
    pub fn ingest(
        &mut self,
        filename: &str,
        reader: &dyn DocumentReader,
        extractor: &MetadataExtractor,
    ) -> Result<(), IndexError> {
        let page_texts: Vec<String> = (0..reader.page_count())
            .map(|i| {
                reader.page_text(i).unwrap_or_else(|e| {
                    tracing::warn!(filename, page = i + 1, error = %e, "skipping unreadable page");
                    String::new()
                })
            })
            .collect();
        let metadata = extractor.extract_metadata(reader);
        if self.add_document(filename, &page_texts, metadata) {
            Ok(())
        } else {
            Err(IndexError::NoReadableText(filename.to_string()))
        }
    }

    /// Remove a document. Returns `false` if it was not present.
    pub fn remove_document(&mut self, filename: &str) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.filename != filename);
        before != self.documents.len()
    }

    /// Filenames in insertion order.
    pub fn filenames(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.filename.as_str()).collect()
    }

    pub fn document(&self, filename: &str) -> Option<&DocumentRecord> {
        self.documents.iter().find(|d| d.filename == filename)
    }

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Every searchable chunk, documents in insertion order, pages in order.
    pub fn all_content(&self) -> Vec<ContentChunk> {
        let mut chunks = Vec::new();
        for doc in &self.documents {
            for page in &doc.pages {
                for text in split_into_chunks(&page.text, self.options.chunk_size) {
                    if text.trim().chars().count() < self.options.min_chunk_chars {
                        continue;
                    }
                    chunks.push(ContentChunk {
                        filename: doc.filename.clone(),
                        page: page.number,
                        text,
                        metadata: doc.metadata.clone(),
                    });
                }
            }
        }
        chunks
    }

    /// Case-insensitive substring search over pages.
    ///
    /// Each hit carries the text around the first occurrence on that page.
    /// At most `max_results` hits are returned.
    pub fn search_content(&self, query: &str, max_results: usize) -> Vec<ContentChunk> {
        let mut results = Vec::new();
        if query.trim().is_empty() || max_results == 0 {
            return results;
        }
        for doc in &self.documents {
            for page in &doc.pages {
                let Some(context) = extract_context(&page.text, query, self.options.context_chars)
                else {
                    continue;
                };
                results.push(ContentChunk {
                    filename: doc.filename.clone(),
                    page: page.number,
                    text: context,
                    metadata: doc.metadata.clone(),
                });
                if results.len() >= max_results {
                    return results;
                }
            }
        }
        results
    }

    pub fn statistics(&self) -> IndexStats {
        let total_files = self.documents.len();
        let total_pages: usize = self.documents.iter().map(|d| d.pages.len()).sum();
        let total_characters = self
            .documents
            .iter()
            .map(|d| d.full_text.chars().count())
            .sum();
        IndexStats {
            total_files,
            total_pages,
            total_characters,
            avg_pages_per_file: if total_files > 0 {
                total_pages as f64 / total_files as f64
            } else {
                0.0
            },
        }
    }
}
