//! PDF backend abstraction layer.
//!
//! The assemblers only see the [`PageTextSource`] and [`AnnotationSource`]
//! traits. [`LopdfBackend`] implements them over `lopdf`; the in-memory
//! [`Document`] implements them for tests and pre-extracted content.

use std::path::Path;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{AnnotationSlot, Document, RawAnnotation};

use super::layout;

/// A document that can enumerate its pages.
pub trait PageSource {
    /// Page numbers (1-indexed) in ascending order.
    fn page_numbers(&self) -> Vec<u32>;
}

/// Extracted text of a page.
pub trait PageTextSource: PageSource {
    /// Text lines of a page in reading order.
    ///
    /// `Ok(None)` (or an all-blank result) means the page has no extractable
    /// text and should be treated as scanned.
    fn page_lines(&self, page: u32) -> Result<Option<Vec<String>>>;
}

/// Raw annotations of a page.
pub trait AnnotationSource: PageSource {
    /// Annotation entries of a page in document order.
    ///
    /// The outer error means the page's annotation list itself is unreadable.
    /// Inner errors are individual records that could not be read.
    fn page_annotations(&self, page: u32) -> Result<Vec<Result<RawAnnotation>>>;
}

// ---------------------------------------------------------------------------
// In-memory documents
// ---------------------------------------------------------------------------

impl PageSource for Document {
    fn page_numbers(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p.number).collect()
    }
}

impl PageTextSource for Document {
    fn page_lines(&self, page: u32) -> Result<Option<Vec<String>>> {
        let page = self
            .get_page(page)
            .ok_or_else(|| Error::TextExtract(format!("Page {} does not exist", page)))?;
        if page.is_scanned() {
            return Ok(None);
        }
        Ok(Some(page.lines.clone()))
    }
}

impl AnnotationSource for Document {
    fn page_annotations(&self, page: u32) -> Result<Vec<Result<RawAnnotation>>> {
        let page = self
            .get_page(page)
            .ok_or_else(|| Error::AnnotationCorrupt(format!("Page {} does not exist", page)))?;
        Ok(page
            .annotations
            .iter()
            .map(|slot| match slot {
                AnnotationSlot::Parsed(raw) => Ok(raw.clone()),
                AnnotationSlot::Corrupt(reason) => Err(Error::AnnotationCorrupt(reason.clone())),
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// lopdf-backed implementation
// ---------------------------------------------------------------------------

/// Concrete backend over `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Self::checked(doc)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::checked(doc)
    }

    fn checked(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.doc
            .get_pages()
            .get(&page)
            .copied()
            .ok_or_else(|| Error::PdfParse(format!("Page {} does not exist", page)))
    }

    fn page_dict(&self, page: u32) -> Result<&Dictionary> {
        self.doc
            .get_dictionary(self.page_id(page)?)
            .map_err(|e| Error::PdfParse(e.to_string()))
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => self
                .doc
                .get_object(*id)
                .map_err(|e| Error::AnnotationCorrupt(format!("dangling reference {:?}: {}", id, e))),
            other => Ok(other),
        }
    }

    fn read_annotation(&self, obj: &Object) -> Result<RawAnnotation> {
        let dict = self
            .resolve(obj)?
            .as_dict()
            .map_err(|_| Error::AnnotationCorrupt("annotation is not a dictionary".to_string()))?;

        Ok(RawAnnotation {
            subtype: dict
                .get(b"Subtype")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string()),
            author: self.text_entry(dict, b"T"),
            content: self.text_entry(dict, b"Contents"),
            subject: self.text_entry(dict, b"Subj"),
            color: self.number_array(dict, b"C"),
            rect: self
                .number_array(dict, b"Rect")
                .and_then(|r| <[f32; 4]>::try_from(r).ok()),
        })
    }

    fn text_entry(&self, dict: &Dictionary, key: &[u8]) -> Option<String> {
        let obj = self.resolve(dict.get(key).ok()?).ok()?;
        match obj {
            Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
            Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
            _ => None,
        }
    }

    fn number_array(&self, dict: &Dictionary, key: &[u8]) -> Option<Vec<f32>> {
        let array = self.resolve(dict.get(key).ok()?).ok()?.as_array().ok()?;
        array.iter().map(|o| o.as_float().ok()).collect()
    }
}

impl PageSource for LopdfBackend {
    fn page_numbers(&self) -> Vec<u32> {
        self.doc.get_pages().keys().copied().collect()
    }
}

impl PageTextSource for LopdfBackend {
    fn page_lines(&self, page: u32) -> Result<Option<Vec<String>>> {
        let page_id = self.page_id(page)?;
        let extract_err = |e: lopdf::Error| Error::TextExtract(format!("Page {}: {}", page, e));

        let data = self.doc.get_page_content(page_id).map_err(extract_err)?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let content = Content::decode(&data).map_err(extract_err)?;
        let fonts = self.doc.get_page_fonts(page_id).unwrap_or_default();

        let spans = layout::collect_spans(&content.operations, |font, bytes| {
            fonts
                .get(font)
                .filter(|dict| dict.type_is(b"Font"))
                .and_then(|dict| dict.get_font_encoding(&self.doc).ok())
                .and_then(|encoding| LopdfDocument::decode_text(&encoding, bytes).ok())
                .unwrap_or_else(|| decode_pdf_string(bytes))
        });
        let lines = layout::lines_to_text(&layout::group_spans_into_lines(spans));

        if lines.iter().all(|l| l.trim().is_empty()) {
            return Ok(None);
        }
        Ok(Some(lines))
    }
}

impl AnnotationSource for LopdfBackend {
    fn page_annotations(&self, page: u32) -> Result<Vec<Result<RawAnnotation>>> {
        let page_dict = self.page_dict(page)?;
        let Ok(annots) = page_dict.get(b"Annots") else {
            return Ok(Vec::new());
        };

        let annots = self
            .resolve(annots)?
            .as_array()
            .map_err(|_| Error::PdfParse(format!("Page {}: /Annots is not an array", page)))?;

        Ok(annots.iter().map(|a| self.read_annotation(a)).collect())
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, then UTF-8, then Latin-1.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Page;
    use lopdf::{dictionary, Stream, StringFormat};

    #[test]
    fn test_decode_pdf_string_utf8() {
        assert_eq!(decode_pdf_string(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_pdf_string_latin1() {
        // 0xE9 = 'é' in Latin-1
        assert_eq!(decode_pdf_string(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
    }

    #[test]
    fn test_decode_pdf_string_utf16be() {
        assert_eq!(decode_pdf_string(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_document_scanned_page_reads_as_none() {
        let mut doc = Document::new();
        doc.add_page(Page::new(1));
        doc.add_page(Page::from_text(2, "SCOPE"));

        assert_eq!(doc.page_numbers(), vec![1, 2]);
        assert!(doc.page_lines(1).unwrap().is_none());
        assert_eq!(doc.page_lines(2).unwrap(), Some(vec!["SCOPE".to_string()]));
    }

    #[test]
    fn test_document_corrupt_slot_is_error() {
        let mut page = Page::new(1);
        page.add_annotation(RawAnnotation::new().with_subtype("Text"));
        page.add_corrupt_annotation("broken");
        let mut doc = Document::new();
        doc.add_page(page);

        let entries = doc.page_annotations(1).unwrap();
        assert!(entries[0].is_ok());
        assert!(matches!(entries[1], Err(Error::AnnotationCorrupt(_))));
    }

    fn backend_with_page(annots: Object) -> LopdfBackend {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Annots" => annots,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        LopdfBackend { doc }
    }

    #[test]
    fn test_lopdf_annotation_fields() {
        let annot = dictionary! {
            "Subtype" => "Highlight",
            "T" => Object::String(b"Reviewer".to_vec(), StringFormat::Literal),
            "Contents" => Object::String(b"Clarify".to_vec(), StringFormat::Literal),
            "C" => vec![Object::Integer(1), Object::Real(0.5), Object::Integer(0)],
        };
        let backend = backend_with_page(Object::Array(vec![Object::Dictionary(annot)]));

        let entries = backend.page_annotations(1).unwrap();
        let raw = entries[0].as_ref().unwrap();
        assert_eq!(raw.subtype.as_deref(), Some("Highlight"));
        assert_eq!(raw.author.as_deref(), Some("Reviewer"));
        assert_eq!(raw.content.as_deref(), Some("Clarify"));
        assert_eq!(raw.subject, None);
        assert_eq!(raw.color, Some(vec![1.0, 0.5, 0.0]));
    }

    #[test]
    fn test_lopdf_dangling_annotation_is_corrupt() {
        let backend = backend_with_page(Object::Array(vec![
            Object::Reference((999, 0)),
            Object::Integer(7),
        ]));
        let entries = backend.page_annotations(1).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| matches!(e, Err(Error::AnnotationCorrupt(_)))));
    }

    fn backend_with_content(content: &str) -> LopdfBackend {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        LopdfBackend { doc }
    }

    #[test]
    fn test_lopdf_page_lines_follow_baselines() {
        let backend = backend_with_content(
            "BT /F1 12 Tf 72 700 Td (SCOPE) Tj 0 -16 Td (The portal shall export) Tj \
             0 -16 Td (reports as CSV.) Tj 0 -40 Td (- nightly) Tj ET",
        );
        assert_eq!(
            backend.page_lines(1).unwrap(),
            Some(vec![
                "SCOPE".to_string(),
                "The portal shall export".to_string(),
                "reports as CSV.".to_string(),
                String::new(),
                "- nightly".to_string(),
            ])
        );
    }

    #[test]
    fn test_lopdf_page_without_text_reads_as_none() {
        let backend = backend_with_content("0 0 m 100 100 l S");
        assert_eq!(backend.page_lines(1).unwrap(), None);
    }
}
