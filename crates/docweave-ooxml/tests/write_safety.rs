//! Write Safety Tests
//!
//! Determinism of generated packages and atomicity of file output.

use std::fs;
use std::io::Cursor;

use docweave_model::{
    Document, ErrorKind, NumberingRegistry, Paragraph, Run, Section, StyleDefinition,
    StyleRegistry, TableOfContents,
};
use docweave_ooxml::archive::OoxmlArchive;
use docweave_ooxml::{Compression, DocxWriter, OoxmlError, PackageOptions};
use tempfile::TempDir;

fn sample() -> Document {
    let section = Section::builder()
        .table_of_contents(TableOfContents::new(1, 2).unwrap())
        .paragraph(Paragraph::heading(1, "Introduction").unwrap())
        .paragraph(Paragraph::text("Body text"))
        .paragraph(Paragraph::heading(2, "Details").unwrap())
        .build()
        .unwrap();
    Document::builder(StyleRegistry::default(), NumberingRegistry::new())
        .section(section)
        .build()
        .unwrap()
}

fn dir_entries(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_generate_is_byte_identical() {
    let writer = DocxWriter::default();
    let first = writer.generate(&sample()).unwrap();
    let second = writer.generate(&sample()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_stored_packages_are_deterministic_too() {
    let writer = DocxWriter::new(PackageOptions {
        compression: Compression::Stored,
        ..Default::default()
    });
    let doc = sample();
    let first = writer.generate(&doc).unwrap();
    assert_eq!(first, writer.generate(&doc).unwrap());
    assert_ne!(first, DocxWriter::default().generate(&doc).unwrap());

    let archive = OoxmlArchive::from_reader(Cursor::new(first)).unwrap();
    assert!(archive.contains("word/document.xml"));
}

#[test]
fn test_written_file_matches_generated_bytes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.docx");
    let writer = DocxWriter::default();

    writer.write_to_path(&sample(), &path).unwrap();

    assert_eq!(fs::read(&path).unwrap(), writer.generate(&sample()).unwrap());
    assert_eq!(dir_entries(&dir), vec!["out.docx"]);
}

// =============================================================================
// Failure leaves nothing behind
// =============================================================================

#[test]
fn test_undefined_style_fails_before_any_write() {
    let dir = TempDir::new().unwrap();
    let section = Section::builder()
        .paragraph(
            Paragraph::builder()
                .style("Missing")
                .text("orphan")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let err = Document::builder(StyleRegistry::default(), NumberingRegistry::new())
        .section(section)
        .build()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Reference);
    assert!(dir_entries(&dir).is_empty());
}

#[test]
fn test_undefined_character_style_fails() {
    let section = Section::builder()
        .paragraph(
            Paragraph::builder()
                .run(Run::builder().text("x").style("Emphasis").build().unwrap())
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let err = Document::builder(StyleRegistry::default(), NumberingRegistry::new())
        .section(section)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Reference);
}

#[test]
fn test_wrong_kind_heading_style_fails_at_assembly() {
    let mut styles = StyleRegistry::default();
    styles
        .define(StyleDefinition::character("Heading1", "Heading 1"))
        .unwrap();
    let section = Section::builder()
        .paragraph(Paragraph::heading(1, "Title").unwrap())
        .build()
        .unwrap();

    let err = Document::builder(styles, NumberingRegistry::new())
        .section(section)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_failed_persist_leaves_no_staged_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("report.docx");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("keep.txt"), b"previous").unwrap();

    let err = DocxWriter::default()
        .write_to_path(&sample(), &target)
        .unwrap_err();
    assert!(matches!(err, OoxmlError::Persist(_)));
    assert_eq!(err.kind(), ErrorKind::Io);
    drop(err);

    assert_eq!(dir_entries(&dir), vec!["report.docx"]);
    assert!(target.is_dir());
    assert_eq!(fs::read(target.join("keep.txt")).unwrap(), b"previous");
}

#[test]
fn test_overwrite_replaces_whole_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.docx");
    fs::write(&path, vec![0u8; 1 << 20]).unwrap();

    DocxWriter::default().write_to_path(&sample(), &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"));
    let archive = OoxmlArchive::from_reader(Cursor::new(bytes)).unwrap();
    assert!(archive.contains("[Content_Types].xml"));
}

#[test]
fn test_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent").join("report.docx");

    let err = DocxWriter::default()
        .write_to_path(&sample(), &path)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(dir_entries(&dir).is_empty());
}
