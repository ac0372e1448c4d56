//! PDF parsing module.

mod annotations;
mod backend;
mod classifier;
mod ids;
mod inline_comments;
mod layout;
mod options;
mod pdf_parser;
mod requirements;

pub use annotations::{color_to_hex, normalize, AnnotationAssembler};
pub use backend::{decode_pdf_string, AnnotationSource, LopdfBackend, PageSource, PageTextSource};
pub use classifier::{
    classify, is_heading, is_list_item, is_table_row, ClassifierRule, ContentClassifier, LineGroup,
    DEFAULT_RULES, HEADING_MAX_CHARS,
};
pub use ids::IdCounter;
pub use inline_comments::{split_inline_comments, InlineComment, SplitLines};
pub use layout::{group_spans_into_lines, TextLine, TextSpan};
pub use options::{OcrOptions, PageSelection, ParseOptions};
pub use pdf_parser::{extract, extract_document, ExtractionSummary, ParseResult, PdfRequirementsParser};
pub use requirements::{LineOrigin, RequirementsAssembler, RequirementsOutcome};
