//! Data model for extracted requirements and reviewer comments.
//!
//! The types here sit between the PDF collaborators (text, OCR, annotation
//! sources) and the output writers. [`ContentBlock`] and [`AnnotationRecord`]
//! are the persisted records; [`PageMap`] groups them by page number.

mod annotation;
mod block;
mod document;
mod page_map;

pub use annotation::{AnnotationRecord, RawAnnotation, INLINE_COMMENT_TYPE, UNKNOWN_AUTHOR};
pub use block::{BlockType, ContentBlock};
pub use document::{AnnotationSlot, Document, DocumentInfo, Page};
pub use page_map::{PageMap, Paged};
