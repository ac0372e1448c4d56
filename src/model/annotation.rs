//! Reviewer annotation types.

use serde::{Deserialize, Serialize};

use super::Paged;

/// Author assigned when an annotation carries no `/T` entry.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Type tag for comments recovered from `Commented [..]:` text.
pub const INLINE_COMMENT_TYPE: &str = "InlineComment";

/// An annotation as read from the document, before normalization.
///
/// Every field is optional; defaults are applied once when the record is
/// normalized into an [`AnnotationRecord`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAnnotation {
    /// Annotation subtype (e.g. "Highlight", "Text")
    pub subtype: Option<String>,
    /// Author (`/T`)
    pub author: Option<String>,
    /// Comment body (`/Contents`)
    pub content: Option<String>,
    /// Subject line (`/Subj`)
    pub subject: Option<String>,
    /// Color components in 0..=1 (`/C`)
    pub color: Option<Vec<f32>>,
    /// Bounding rectangle [x1, y1, x2, y2]
    pub rect: Option<[f32; 4]>,
}

impl RawAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_color(mut self, components: Vec<f32>) -> Self {
        self.color = Some(components);
        self
    }

    /// Whether the annotation carries any reviewer-visible content.
    pub fn has_content(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.content) || filled(&self.subject)
    }
}

/// A normalized reviewer comment, as written to `comments.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Document-wide sequential id (independent of block ids)
    pub id: u32,

    /// Page number (1-indexed)
    pub page: u32,

    /// Source annotation subtype
    #[serde(rename = "type")]
    pub kind: String,

    /// Author, or [`UNKNOWN_AUTHOR`]
    pub author: String,

    /// Comment text, possibly empty
    pub text: String,

    /// Subject line
    pub subject: Option<String>,

    /// `#rrggbb` color
    pub color: Option<String>,
}

impl Paged for AnnotationRecord {
    fn page(&self) -> u32 {
        self.page
    }

    fn set_page(&mut self, page: u32) {
        self.page = page;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_builder() {
        let raw = RawAnnotation::new()
            .with_subtype("Highlight")
            .with_author("Ana")
            .with_color(vec![1.0, 1.0, 0.0]);
        assert_eq!(raw.subtype.as_deref(), Some("Highlight"));
        assert_eq!(raw.author.as_deref(), Some("Ana"));
        assert!(raw.content.is_none());
    }

    #[test]
    fn test_has_content() {
        let link = RawAnnotation::new().with_subtype("Link").with_content("");
        assert!(!link.has_content());
        assert!(link.with_subject("Approved").has_content());
    }

    #[test]
    fn test_serialized_shape() {
        let record = AnnotationRecord {
            id: 7,
            page: 2,
            kind: "Text".to_string(),
            author: "QA".to_string(),
            text: "Check this".to_string(),
            subject: None,
            color: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 7, "page": 2, "type": "Text", "author": "QA",
                "text": "Check this", "subject": null, "color": null
            })
        );
    }
}
