use crate::MetadataError;

/// Document-level properties stored by the container format
/// (the PDF info dictionary, DOCX core properties, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerProperties {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
    pub modification_date: String,
}

/// Trait for document readers.
///
/// Implementors decode the container format; the heuristics that turn page
/// text into bibliographic metadata live in [`crate::extractor::MetadataExtractor`].
pub trait DocumentReader {
    /// Container properties, or `None` when the format carries none.
    fn properties(&self) -> Option<ContainerProperties>;

    /// Number of physical pages.
    fn page_count(&self) -> usize;

    /// Text of the page at zero-based `index`.
    fn page_text(&self, index: usize) -> Result<String, MetadataError>;
}

/// An in-memory document made of already-extracted page texts.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    properties: Option<ContainerProperties>,
    pages: Vec<String>,
}

impl TextDocument {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            properties: None,
            pages,
        }
    }

    /// Split plain text into pages on form-feed characters.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.split('\u{000C}').map(str::to_string).collect())
    }

    pub fn with_properties(mut self, properties: ContainerProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }
}

impl DocumentReader for TextDocument {
    fn properties(&self) -> Option<ContainerProperties> {
        self.properties.clone()
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, MetadataError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(MetadataError::PageOutOfRange(index))
    }
}
