//! Per-page annotation extraction and normalization.

use crate::model::{AnnotationRecord, PageMap, RawAnnotation, INLINE_COMMENT_TYPE, UNKNOWN_AUTHOR};

use super::backend::AnnotationSource;
use super::ids::IdCounter;
use super::inline_comments::InlineComment;

const UNKNOWN_TYPE: &str = "Unknown";
const INLINE_COMMENT_SUBJECT: &str = "Word Comment";

/// Builds [`AnnotationRecord`]s page by page with its own id sequence.
///
/// A record that cannot be read is skipped on its own; the rest of the page
/// is still processed. A page whose annotation list is unreadable is recorded
/// with no annotations.
pub struct AnnotationAssembler {
    native: bool,
    keep_empty: bool,
    ids: IdCounter,
}

impl AnnotationAssembler {
    pub fn new() -> Self {
        Self {
            native: true,
            keep_empty: false,
            ids: IdCounter::new(),
        }
    }

    /// Read native PDF annotations (on by default).
    pub fn with_native(mut self, native: bool) -> Self {
        self.native = native;
        self
    }

    /// Keep annotations with neither text nor subject.
    pub fn keep_empty(mut self, keep: bool) -> Self {
        self.keep_empty = keep;
        self
    }

    /// Assemble native annotations for every page of the source.
    pub fn assemble<S: AnnotationSource + ?Sized>(&mut self, source: &S) -> PageMap<AnnotationRecord> {
        let pages = source.page_numbers();
        self.assemble_pages(source, &pages, &PageMap::new())
    }

    /// Assemble the given pages in ascending order, appending each page's
    /// inline comments after its native annotations.
    pub fn assemble_pages<S: AnnotationSource + ?Sized>(
        &mut self,
        source: &S,
        pages: &[u32],
        inline: &PageMap<InlineComment>,
    ) -> PageMap<AnnotationRecord> {
        let mut pages = pages.to_vec();
        pages.sort_unstable();
        pages.dedup();

        let mut records = PageMap::new();
        for page in pages {
            records.ensure_page(page);

            if self.native {
                for raw in self.read_page(source, page) {
                    if !self.keep_empty && !raw.has_content() {
                        continue;
                    }
                    records.push(page, normalize(raw, self.ids.next_id(), page));
                }
            }

            for comment in inline.get(page).unwrap_or_default() {
                records.push(page, self.inline_record(page, comment));
            }

            let count = records.get(page).map_or(0, <[_]>::len);
            if count > 0 {
                log::info!("Extracted {} annotation(s) from page {}", count, page);
            }
        }
        records
    }

    /// Number of annotation ids issued so far.
    pub fn issued_ids(&self) -> u32 {
        self.ids.issued()
    }

    fn read_page<S: AnnotationSource + ?Sized>(&self, source: &S, page: u32) -> Vec<RawAnnotation> {
        let entries = match source.page_annotations(page) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Could not access annotations on page {}: {}", page, e);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| match entry {
                Ok(raw) => Some(raw),
                Err(e) => {
                    log::warn!(
                        "Skipping annotation {} on page {}: {}",
                        idx + 1,
                        page,
                        e
                    );
                    None
                }
            })
            .collect()
    }

    fn inline_record(&mut self, page: u32, comment: &InlineComment) -> AnnotationRecord {
        AnnotationRecord {
            id: self.ids.next_id(),
            page,
            kind: INLINE_COMMENT_TYPE.to_string(),
            author: comment.author.clone(),
            text: comment.text.clone(),
            subject: Some(INLINE_COMMENT_SUBJECT.to_string()),
            color: None,
        }
    }
}

impl Default for AnnotationAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply field defaults to a raw annotation.
pub fn normalize(raw: RawAnnotation, id: u32, page: u32) -> AnnotationRecord {
    AnnotationRecord {
        id,
        page,
        kind: non_blank(raw.subtype).unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        author: non_blank(raw.author).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        text: raw.content.unwrap_or_default(),
        subject: raw.subject,
        color: raw.color.as_deref().and_then(color_to_hex),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Convert RGB components in 0..=1 to `#rrggbb`. Other arities have no hex form.
pub fn color_to_hex(components: &[f32]) -> Option<String> {
    let [r, g, b] = components else {
        return None;
    };
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    Some(format!(
        "#{:02x}{:02x}{:02x}",
        channel(*r),
        channel(*g),
        channel(*b)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Document, Page};

    fn note(text: &str) -> RawAnnotation {
        RawAnnotation::new().with_subtype("Text").with_content(text)
    }

    #[test]
    fn test_normalize_defaults() {
        let record = normalize(RawAnnotation::new().with_content("hi"), 4, 2);
        assert_eq!(record.id, 4);
        assert_eq!(record.page, 2);
        assert_eq!(record.kind, "Unknown");
        assert_eq!(record.author, UNKNOWN_AUTHOR);
        assert_eq!(record.text, "hi");
        assert_eq!(record.subject, None);
        assert_eq!(record.color, None);
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(color_to_hex(&[1.0, 1.0, 0.0]).as_deref(), Some("#ffff00"));
        assert_eq!(color_to_hex(&[0.5, 0.0, 2.0]).as_deref(), Some("#7f00ff"));
        assert_eq!(color_to_hex(&[0.2]), None);
        assert_eq!(color_to_hex(&[0.0, 0.0, 0.0, 1.0]), None);
    }

    #[test]
    fn test_corrupt_record_skipped_without_consuming_id() {
        let mut page = Page::new(1);
        page.add_annotation(note("first"));
        page.add_corrupt_annotation("bad dictionary");
        page.add_annotation(note("third"));
        let mut doc = Document::new();
        doc.add_page(page);

        let records = AnnotationAssembler::new().assemble(&doc);
        let texts: Vec<(u32, &str)> = records
            .records()
            .map(|r| (r.id, r.text.as_str()))
            .collect();
        assert_eq!(texts, vec![(1, "first"), (2, "third")]);
    }

    #[test]
    fn test_empty_annotations_filtered_unless_kept() {
        let mut page = Page::new(1);
        page.add_annotation(RawAnnotation::new().with_subtype("Link"));
        page.add_annotation(note("keep me"));
        let mut doc = Document::new();
        doc.add_page(page);

        let records = AnnotationAssembler::new().assemble(&doc);
        assert_eq!(records.total_items(), 1);

        let records = AnnotationAssembler::new().keep_empty(true).assemble(&doc);
        assert_eq!(records.total_items(), 2);
        assert_eq!(records.get(1).unwrap()[0].kind, "Link");
    }

    #[test]
    fn test_inline_comments_follow_native_per_page() {
        let mut doc = Document::new();
        let mut p1 = Page::new(1);
        p1.add_annotation(note("native one"));
        doc.add_page(p1);
        let mut p2 = Page::new(2);
        p2.add_annotation(note("native two"));
        doc.add_page(p2);

        let mut inline = PageMap::new();
        inline.push(
            1,
            InlineComment {
                author: "AK1".to_string(),
                text: "inline on page one".to_string(),
            },
        );

        let records = AnnotationAssembler::new().assemble_pages(&doc, &[1, 2], &inline);
        let summary: Vec<(u32, u32, &str)> = records
            .records()
            .map(|r| (r.id, r.page, r.kind.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![(1, 1, "Text"), (2, 1, "InlineComment"), (3, 2, "Text")]
        );
        assert_eq!(
            records.get(1).unwrap()[1].subject.as_deref(),
            Some("Word Comment")
        );
    }
}
