//! Error types for pdfreq library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfreq operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during PDF processing.
///
/// Only [`Error::InputNotFound`] and [`Error::OutputWrite`] (plus load-time
/// failures such as [`Error::Encrypted`]) terminate a run. The OCR and
/// annotation variants are produced per page or per record and are absorbed
/// by the assemblers, which log them and continue.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file does not exist.
    #[error("PDF file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// OCR engine or rasterizer missing, or recognition failed on a page.
    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    /// A single annotation object could not be read.
    #[error("Corrupt annotation: {0}")]
    AnnotationCorrupt(String),

    /// An output file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
