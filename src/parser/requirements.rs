//! Per-page requirement extraction.
//!
//! For each page in ascending order the assembler asks the text source for
//! lines, falls back to OCR when the page has no extractable text, lifts out
//! inline review comments, and classifies the rest into content blocks. Page
//! failures never abort the document: the page is recorded with no blocks and
//! processing moves on.

use crate::model::{ContentBlock, PageMap};
use crate::ocr::OcrFallback;

use super::backend::PageTextSource;
use super::classifier::ContentClassifier;
use super::ids::IdCounter;
use super::inline_comments::{split_inline_comments, InlineComment};

/// Where a page's lines came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrigin {
    /// Embedded text
    Text,
    /// OCR of the rasterized page
    Ocr,
}

/// Result of assembling requirement blocks.
#[derive(Debug, Clone, Default)]
pub struct RequirementsOutcome {
    /// Blocks per page; every processed page has an entry
    pub blocks: PageMap<ContentBlock>,
    /// Inline comments lifted out of the page text
    pub inline_comments: PageMap<InlineComment>,
    /// Pages whose lines came from OCR
    pub ocr_pages: Vec<u32>,
    /// Pages that yielded no lines at all
    pub skipped_pages: Vec<u32>,
}

/// Builds [`ContentBlock`]s page by page with a document-wide id sequence.
pub struct RequirementsAssembler<'a> {
    classifier: ContentClassifier,
    ocr: Option<&'a OcrFallback>,
    inline_comments: bool,
    ids: IdCounter,
}

impl<'a> RequirementsAssembler<'a> {
    /// Create an assembler without OCR; scanned pages yield no blocks.
    pub fn new() -> Self {
        Self {
            classifier: ContentClassifier::new(),
            ocr: None,
            inline_comments: true,
            ids: IdCounter::new(),
        }
    }

    /// Use an OCR fallback for pages without text.
    pub fn with_ocr(mut self, ocr: &'a OcrFallback) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Use a custom classifier.
    pub fn with_classifier(mut self, classifier: ContentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Enable or disable inline comment recovery.
    pub fn with_inline_comments(mut self, enabled: bool) -> Self {
        self.inline_comments = enabled;
        self
    }

    /// Assemble every page of the source.
    pub fn assemble<S: PageTextSource + ?Sized>(&mut self, source: &S) -> RequirementsOutcome {
        let pages = source.page_numbers();
        self.assemble_pages(source, &pages)
    }

    /// Assemble the given pages, processed in ascending order.
    pub fn assemble_pages<S: PageTextSource + ?Sized>(
        &mut self,
        source: &S,
        pages: &[u32],
    ) -> RequirementsOutcome {
        let mut pages = pages.to_vec();
        pages.sort_unstable();
        pages.dedup();

        let mut outcome = RequirementsOutcome::default();
        for page in pages {
            let Some((lines, origin)) = self.page_lines(source, page) else {
                outcome.blocks.ensure_page(page);
                outcome.skipped_pages.push(page);
                continue;
            };
            if origin == LineOrigin::Ocr {
                outcome.ocr_pages.push(page);
            }

            let lines = if self.inline_comments {
                let split = split_inline_comments(&lines);
                if !split.comments.is_empty() {
                    log::info!(
                        "Found {} inline comment(s) on page {}",
                        split.comments.len(),
                        page
                    );
                }
                outcome.inline_comments.extend_page(page, split.comments);
                split.lines
            } else {
                lines
            };

            let blocks = self.build_blocks(page, &lines);
            log::info!("Page {}: {} block(s) ({:?})", page, blocks.len(), origin);
            outcome.blocks.extend_page(page, blocks);
        }
        outcome
    }

    /// Classify lines and assign the next ids.
    pub fn build_blocks<S: AsRef<str>>(&mut self, page: u32, lines: &[S]) -> Vec<ContentBlock> {
        self.classifier
            .group(lines)
            .into_iter()
            .map(|group| {
                ContentBlock::from_lines(self.ids.next_id(), page, group.block_type, &group.lines)
            })
            .collect()
    }

    /// Number of block ids issued so far.
    pub fn issued_ids(&self) -> u32 {
        self.ids.issued()
    }

    fn page_lines<S: PageTextSource + ?Sized>(
        &self,
        source: &S,
        page: u32,
    ) -> Option<(Vec<String>, LineOrigin)> {
        match source.page_lines(page) {
            Ok(Some(lines)) if has_text(&lines) => return Some((lines, LineOrigin::Text)),
            Ok(_) => log::debug!("Page {} has no extractable text", page),
            Err(e) => log::warn!("Failed to extract text from page {}: {}", page, e),
        }

        let Some(ocr) = self.ocr else {
            log::warn!("Scanned page {} skipped: OCR not configured", page);
            return None;
        };

        match ocr.recognize_page(page) {
            Ok(lines) if has_text(&lines) => Some((lines, LineOrigin::Ocr)),
            Ok(_) => {
                log::warn!("No content found on page {}", page);
                None
            }
            Err(e) => {
                log::warn!("Scanned page {} skipped: {}", page, e);
                None
            }
        }
    }
}

impl Default for RequirementsAssembler<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn has_text(lines: &[String]) -> bool {
    lines.iter().any(|l| !l.trim().is_empty())
}
