//! Integration tests for writing extraction results.

use std::fs;

use pdfreq::model::{AnnotationRecord, ContentBlock, Document, Page, PageMap, RawAnnotation};
use pdfreq::render::{OutputWriter, COMMENTS_FILE, REPORT_FILE, REQUIREMENTS_FILE};
use pdfreq::{parse_document, Error, JsonFormat, ParseOptions};

fn sample_document() -> Document {
    let mut doc = Document::new();
    doc.info.source = Some("portal-requirements.pdf".to_string());

    let mut p1 = Page::from_text(
        1,
        "FUNCTIONAL REQUIREMENTS\nThe portal shall export\nreports as CSV.\n• nightly\nID | Name | Owner | Status",
    );
    p1.add_annotation(
        RawAnnotation::new()
            .with_subtype("Text")
            .with_author("Dana")
            .with_content("Which delimiter?")
            .with_color(vec![1.0, 1.0, 0.0]),
    );
    doc.add_page(p1);
    doc.add_page(Page::new(2));
    for n in 3..=10 {
        doc.add_page(Page::from_text(n, &format!("Section {} text.", n)));
    }
    doc
}

#[test]
fn test_requirements_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let result = parse_document(&sample_document(), &ParseOptions::default());

    let (req_path, _) = OutputWriter::new()
        .write(&result.requirements, &result.comments, dir.path())
        .unwrap();

    let json = fs::read_to_string(req_path).unwrap();
    let restored: PageMap<ContentBlock> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, result.requirements);

    let comments = fs::read_to_string(dir.path().join(COMMENTS_FILE)).unwrap();
    let restored: PageMap<AnnotationRecord> = serde_json::from_str(&comments).unwrap();
    assert_eq!(restored, result.comments);
}

#[test]
fn test_page_keys_sorted_numerically() {
    let dir = tempfile::tempdir().unwrap();
    let result = parse_document(&sample_document(), &ParseOptions::default());
    let (req_path, _) = OutputWriter::new()
        .with_format(JsonFormat::Compact)
        .write(&result.requirements, &result.comments, dir.path())
        .unwrap();

    let json = fs::read_to_string(req_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["page_2"], serde_json::json!([]));
    assert!(json.find("\"page_9\"").unwrap() < json.find("\"page_10\"").unwrap());

    let first = &value["page_1"][0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["type"], "heading");
    assert_eq!(first["line_count"], 1);
    assert!(first.get("page").is_none());
}

#[test]
fn test_comment_record_shape() {
    let dir = tempfile::tempdir().unwrap();
    let result = parse_document(&sample_document(), &ParseOptions::default());
    let (_, com_path) = OutputWriter::new()
        .write(&result.requirements, &result.comments, dir.path())
        .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(com_path).unwrap()).unwrap();
    let record = &value["page_1"][0];
    assert_eq!(record["id"], 1);
    assert_eq!(record["page"], 1);
    assert_eq!(record["type"], "Text");
    assert_eq!(record["author"], "Dana");
    assert_eq!(record["text"], "Which delimiter?");
    assert_eq!(record["subject"], serde_json::Value::Null);
    assert_eq!(record["color"], "#ffff00");
}

#[test]
fn test_missing_output_dir_is_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("missing").join("out");
    let result = parse_document(&sample_document(), &ParseOptions::default());

    let err = OutputWriter::new()
        .write_result(&result, &target)
        .unwrap_err();
    assert!(matches!(err, Error::OutputWrite { .. }));
    assert!(!dir.path().join("missing").exists());
}

#[test]
fn test_write_result_with_report() {
    let dir = tempfile::tempdir().unwrap();
    let result = parse_document(&sample_document(), &ParseOptions::default());

    let written = OutputWriter::new().write_result(&result, dir.path()).unwrap();
    assert_eq!(written.requirements, dir.path().join(REQUIREMENTS_FILE));
    assert_eq!(written.report, Some(dir.path().join(REPORT_FILE)));

    let report = fs::read_to_string(dir.path().join(REPORT_FILE)).unwrap();
    assert!(report.contains("**Source:** portal-requirements.pdf"));
    assert!(report.contains("**Total Pages:** 10"));
    assert!(report.contains("**[Heading 1]**\n\n**FUNCTIONAL REQUIREMENTS**"));
    assert!(report.contains("The portal shall export\nreports as CSV."));
    assert!(report.contains("```text\nID | Name | Owner | Status\n```"));
    assert!(report.contains("**[Dana]** (Text)\n\n> Which delimiter?"));
    assert!(!report.contains("### Page 2\n"));

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 3);
}

#[test]
fn test_write_result_without_report() {
    let dir = tempfile::tempdir().unwrap();
    let result = parse_document(&sample_document(), &ParseOptions::default());

    let written = OutputWriter::new()
        .with_markdown(false)
        .write_result(&result, dir.path())
        .unwrap();
    assert_eq!(written.report, None);
    assert!(!dir.path().join(REPORT_FILE).exists());
}
