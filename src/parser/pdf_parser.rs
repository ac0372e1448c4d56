//! Requirements and comments extraction for PDF documents.

use std::path::{Path, PathBuf};

use crate::detect::{sniff_bytes, sniff_path};
use crate::error::Result;
use crate::model::{AnnotationRecord, ContentBlock, Document, DocumentInfo, PageMap};
use crate::ocr::OcrFallback;

use super::annotations::AnnotationAssembler;
use super::backend::{AnnotationSource, LopdfBackend, PageTextSource};
use super::options::ParseOptions;
use super::requirements::RequirementsAssembler;

/// Counts describing one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Pages processed
    pub pages: usize,
    /// Content blocks emitted
    pub blocks: usize,
    /// Annotation records emitted
    pub annotations: usize,
    /// Pages read through OCR
    pub ocr_pages: Vec<u32>,
    /// Pages that produced no text at all
    pub skipped_pages: Vec<u32>,
}

/// Everything extracted from one document.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub info: DocumentInfo,
    /// Requirement blocks per page
    pub requirements: PageMap<ContentBlock>,
    /// Reviewer comments per page
    pub comments: PageMap<AnnotationRecord>,
    pub summary: ExtractionSummary,
}

/// Run both assemblers over a source.
///
/// The page list comes from the source, filtered by `options.pages`. Every
/// processed page appears in both mappings, possibly with no records.
pub fn extract<S>(
    source: &S,
    info: DocumentInfo,
    ocr: Option<&OcrFallback>,
    options: &ParseOptions,
) -> ParseResult
where
    S: PageTextSource + AnnotationSource + ?Sized,
{
    let pages: Vec<u32> = source
        .page_numbers()
        .into_iter()
        .filter(|p| options.pages.includes(*p))
        .collect();

    let mut requirements =
        RequirementsAssembler::new().with_inline_comments(options.inline_comments);
    if let Some(ocr) = ocr {
        requirements = requirements.with_ocr(ocr);
    }
    let outcome = requirements.assemble_pages(source, &pages);

    let mut annotations = AnnotationAssembler::new()
        .with_native(options.extract_annotations)
        .keep_empty(options.keep_empty_annotations);
    let comments = annotations.assemble_pages(source, &pages, &outcome.inline_comments);

    let summary = ExtractionSummary {
        pages: pages.len(),
        blocks: outcome.blocks.total_items(),
        annotations: comments.total_items(),
        ocr_pages: outcome.ocr_pages,
        skipped_pages: outcome.skipped_pages,
    };

    ParseResult {
        info,
        requirements: outcome.blocks,
        comments,
        summary,
    }
}

/// Extract from an in-memory document. OCR is never attempted.
pub fn extract_document(doc: &Document, options: &ParseOptions) -> ParseResult {
    extract(doc, doc.info.clone(), None, options)
}

enum Origin {
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// PDF requirements parser.
pub struct PdfRequirementsParser {
    backend: LopdfBackend,
    origin: Origin,
    options: ParseOptions,
}

impl PdfRequirementsParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    ///
    /// Fails with [`crate::Error::InputNotFound`] before anything is parsed
    /// if the file does not exist.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let header = sniff_path(path)?;
        log::info!("Processing {} ({})", path.display(), header);

        let backend = LopdfBackend::load_file(path)?;
        Ok(Self {
            backend,
            origin: Origin::File(path.to_path_buf()),
            options,
        })
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let header = sniff_bytes(data)?;
        log::info!("Processing in-memory document ({})", header);

        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self {
            backend,
            origin: Origin::Bytes(data.to_vec()),
            options,
        })
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.backend.page_count()
    }

    /// Document information.
    pub fn info(&self) -> DocumentInfo {
        let source = match &self.origin {
            Origin::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            Origin::Bytes(_) => None,
        };
        DocumentInfo {
            source,
            pdf_version: Some(self.backend.version()),
            page_count: self.page_count(),
        }
    }

    /// Extract requirements and comments.
    pub fn parse(&self) -> Result<ParseResult> {
        let ocr = self.build_ocr()?;
        Ok(extract(&self.backend, self.info(), ocr.as_ref(), &self.options))
    }

    fn build_ocr(&self) -> Result<Option<OcrFallback>> {
        if !self.options.ocr.enabled {
            return Ok(None);
        }
        let ocr = match &self.origin {
            Origin::File(path) => OcrFallback::for_pdf_file(path.clone(), &self.options.ocr),
            Origin::Bytes(data) => OcrFallback::for_pdf_bytes(data, &self.options.ocr)?,
        };
        Ok(Some(ocr))
    }
}
