//! # pdfreq
//!
//! Split PDF requirement documents into classified content blocks and
//! reviewer comments.
//!
//! Each page's text is read in order (falling back to OCR for scanned pages),
//! classified line by line into headings, paragraphs, list items and table
//! rows, and grouped by page. Annotations are collected per page in parallel
//! with the text, normalized into flat records. Both groupings are written as
//! JSON keyed by `"page_<n>"`, plus an optional Markdown report.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use pdfreq::{parse_file, render::OutputWriter};
//!
//! fn main() -> pdfreq::Result<()> {
//!     let result = parse_file("requirements.pdf")?;
//!     println!("{} blocks, {} comments", result.summary.blocks, result.summary.annotations);
//!
//!     OutputWriter::new().write_result(&result, Path::new("out"))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Rule-based classification**: ordered rule table, paragraph merging
//! - **OCR fallback**: `pdftoppm` + `tesseract` for pages without text
//! - **Reviewer comments**: native PDF annotations and inline Word comments
//! - **Stable output**: sequential ids, numerically ordered page keys, atomic writes

pub mod detect;
pub mod error;
pub mod model;
pub mod ocr;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{sniff_bytes, sniff_path, PdfHeader};
pub use error::{Error, Result};
pub use model::{
    AnnotationRecord, BlockType, ContentBlock, Document, DocumentInfo, Page, PageMap,
    RawAnnotation,
};
pub use parser::{
    classify, ExtractionSummary, OcrOptions, PageSelection, ParseOptions, ParseResult,
    PdfRequirementsParser,
};
pub use render::{JsonFormat, OutputWriter};

use std::path::Path;

/// Parse a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdfreq::parse_file;
///
/// let result = parse_file("requirements.pdf").unwrap();
/// println!("Pages: {}", result.summary.pages);
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParseResult> {
    let parser = PdfRequirementsParser::open(path)?;
    parser.parse()
}

/// Parse a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfreq::{parse_file_with_options, PageSelection, ParseOptions};
///
/// let options = ParseOptions::new()
///     .without_ocr()
///     .with_pages(PageSelection::Range(1..=5));
/// let result = parse_file_with_options("requirements.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<ParseResult> {
    let parser = PdfRequirementsParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse a PDF from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<ParseResult> {
    let parser = PdfRequirementsParser::from_bytes(data)?;
    parser.parse()
}

/// Parse a PDF from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<ParseResult> {
    let parser = PdfRequirementsParser::from_bytes_with_options(data, options)?;
    parser.parse()
}

/// Run the extraction over an already-loaded [`Document`].
///
/// OCR is never attempted; pages without lines are recorded as empty.
pub fn parse_document(doc: &Document, options: &ParseOptions) -> ParseResult {
    parser::extract_document(doc, options)
}

/// Parse a PDF file and write all outputs into `output_dir`.
///
/// The directory must exist.
pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
    options: ParseOptions,
) -> Result<render::WrittenFiles> {
    let result = parse_file_with_options(input, options)?;
    OutputWriter::new().write_result(&result, output_dir.as_ref())
}
