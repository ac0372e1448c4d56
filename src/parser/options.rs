//! Parsing options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Options for extracting requirements and comments from a document.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Page selection (which pages to process)
    pub pages: PageSelection,

    /// OCR fallback for pages without extractable text
    pub ocr: OcrOptions,

    /// Whether to read native PDF annotations
    pub extract_annotations: bool,

    /// Whether to lift `Commented [..]:` lines out of the text into comments
    pub inline_comments: bool,

    /// Keep annotations that have neither text nor subject (links, popups)
    pub keep_empty_annotations: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set OCR options.
    pub fn with_ocr(mut self, ocr: OcrOptions) -> Self {
        self.ocr = ocr;
        self
    }

    /// Disable the OCR fallback; scanned pages yield no blocks.
    pub fn without_ocr(mut self) -> Self {
        self.ocr.enabled = false;
        self
    }

    /// Set the rasterization resolution used before OCR.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.ocr.dpi = dpi;
        self
    }

    /// Set the OCR language code (e.g. "eng", "deu").
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.ocr.language = language.into();
        self
    }

    /// Enable or disable native annotation extraction.
    pub fn with_annotations(mut self, extract: bool) -> Self {
        self.extract_annotations = extract;
        self
    }

    /// Enable or disable inline comment recovery.
    pub fn with_inline_comments(mut self, enabled: bool) -> Self {
        self.inline_comments = enabled;
        self
    }

    /// Keep annotations without any text or subject.
    pub fn keep_empty_annotations(mut self, keep: bool) -> Self {
        self.keep_empty_annotations = keep;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            pages: PageSelection::All,
            ocr: OcrOptions::default(),
            extract_annotations: true,
            inline_comments: true,
            keep_empty_annotations: false,
        }
    }
}

/// OCR fallback configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrOptions {
    /// Whether to try OCR on pages without text
    pub enabled: bool,

    /// Rasterization resolution
    pub dpi: u32,

    /// Tesseract language code
    pub language: String,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            dpi: 300,
            language: "eng".to_string(),
        }
    }
}

/// Page selection for processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Process all pages
    #[default]
    All,
    /// Process a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Process specific pages (1-indexed, sorted)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.binary_search(&page).is_ok(),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let start = parse_page_number(start)?;
                let end = parse_page_number(end)?;
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_page_number(start)?;
                let end = parse_page_number(end)?;
                if start > end {
                    return Err(Error::InvalidPageRange(part.to_string()));
                }
                pages.extend(start..=end);
            } else {
                pages.push(parse_page_number(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page_number(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(s.trim().to_string())),
        Ok(n) => Ok(n),
    }
}
