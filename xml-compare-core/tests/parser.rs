use std::io::Write;
use std::path::PathBuf;

use xml_compare_core::{parse, parse_file, ParseError};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parses_fixture_with_lines_and_text() {
    let node = parse_file(&fixture("fixtures/catalog_a.xml")).expect("parse should succeed");
    assert_eq!(node.tag, "catalog");
    assert_eq!(node.attr("version"), Some("1"));
    assert_eq!(node.line, Some(2));

    let items = node.get_children("item");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].attr("label"), Some("First  item"));
    assert_eq!(items[0].line, Some(3));

    let note = node.get_child("note").expect("note should exist");
    assert_eq!(note.text.as_deref(), Some("Shipping is\n    free"));
    assert_eq!(note.line, Some(6));
    assert_eq!(node.get_child("legacy").and_then(|n| n.line), Some(8));
}

#[test]
fn whitespace_between_elements_is_not_text() {
    let node = parse(b"<r>\n  <a/>\n  <b>  x  </b>\n</r>").expect("parse");
    assert_eq!(node.text, None);
    assert_eq!(node.children[1].text.as_deref(), Some("  x  "));
}

#[test]
fn unclosed_document_is_malformed() {
    let err = parse(b"<r><a></a>").expect_err("should fail");
    assert!(matches!(err, ParseError::Malformed(_)));
}

#[test]
fn parse_file_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, "<r><![CDATA[raw <text>]]></r>").expect("write");
    let node = parse_file(file.path()).expect("parse");
    assert_eq!(node.text.as_deref(), Some("raw <text>"));
}

#[test]
fn missing_file_is_io_error() {
    let err = parse_file(&fixture("fixtures/does_not_exist.xml")).expect_err("should fail");
    assert!(matches!(err, ParseError::Io(_)));
}
