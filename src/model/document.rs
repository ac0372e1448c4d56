//! In-memory document representation.
//!
//! [`Document`] holds already-extracted page text and annotations. It backs
//! the text and annotation source traits so the assemblers can run without a
//! PDF file, which is how the pipeline is exercised in tests and benchmarks.

use super::RawAnnotation;

/// Summary information about a source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    /// File name of the source document
    pub source: Option<String>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: Option<String>,

    /// Total number of pages
    pub page_count: u32,
}

/// An annotation entry as stored on a page: either readable or corrupt.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationSlot {
    Parsed(RawAnnotation),
    Corrupt(String),
}

/// A single page: text lines in reading order plus annotation entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Extracted text lines; empty for a scanned page
    pub lines: Vec<String>,

    /// Annotation entries in document order
    pub annotations: Vec<AnnotationSlot>,
}

impl Page {
    /// Create an empty page. With no lines it reads as a scanned page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Create a page from text lines.
    pub fn with_lines<S: Into<String>>(number: u32, lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            number,
            lines: lines.into_iter().map(Into::into).collect(),
            annotations: Vec::new(),
        }
    }

    /// Create a page from a block of text, one line per `\n`.
    pub fn from_text(number: u32, text: &str) -> Self {
        Self::with_lines(number, text.lines())
    }

    /// Add a readable annotation.
    pub fn add_annotation(&mut self, annotation: RawAnnotation) {
        self.annotations.push(AnnotationSlot::Parsed(annotation));
    }

    /// Add an annotation entry that fails to parse.
    pub fn add_corrupt_annotation(&mut self, reason: impl Into<String>) {
        self.annotations.push(AnnotationSlot::Corrupt(reason.into()));
    }

    /// Check whether the page has no extractable text.
    pub fn is_scanned(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

/// An ordered sequence of pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub info: DocumentInfo,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page. Pages are kept in ascending page-number order.
    pub fn add_page(&mut self, page: Page) {
        let pos = self
            .pages
            .partition_point(|existing| existing.number < page.number);
        self.pages.insert(pos, page);
        self.info.page_count = self.pages.len() as u32;
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, number: u32) -> Option<&Page> {
        self.pages
            .binary_search_by_key(&number, |p| p.number)
            .ok()
            .map(|idx| &self.pages[idx])
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }
}
