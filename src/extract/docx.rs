//! DOCX text extraction.
//!
//! A .docx file is a ZIP archive whose body text lives in
//! `word/document.xml`. Paragraphs (`<w:p>`) are read in document order and
//! joined with a single space; text runs (`<w:t>`) concatenate within a
//! paragraph, and explicit tabs/breaks become spaces so adjacent words don't
//! fuse.

use super::TextExtractor;
use crate::error::ExtractError;
use crate::media::MediaKind;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Office Open XML (.docx) extractor.
pub struct DocxExtractor;

impl DocxExtractor {
    fn malformed(detail: impl Into<String>) -> ExtractError {
        ExtractError::MalformedDocument {
            kind: MediaKind::Docx,
            detail: detail.into(),
        }
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| Self::malformed(format!("not a ZIP archive: {e}")))?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| Self::malformed(format!("word/document.xml missing: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| Self::malformed(format!("word/document.xml unreadable: {e}")))?;

        let paragraphs = parse_paragraphs(&xml)?;
        debug!("DOCX has {} paragraphs", paragraphs.len());
        Ok(paragraphs.join(" "))
    }
}

/// Pull the text of each `<w:p>` out of a `word/document.xml` body, in
/// document order. Empty paragraphs are kept — joining them mirrors how word
/// processors report paragraph text, and order is what matters downstream.
fn parse_paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            // Self-closing tabs and breaks separate words within a run.
            Ok(Event::Empty(ref e))
                if matches!(e.name().as_ref(), b"w:tab" | b"w:br" | b"w:cr") =>
            {
                current.push(' ');
            }
            Ok(Event::Text(t)) if in_text_run => {
                let piece = t
                    .unescape()
                    .map_err(|e| DocxExtractor::malformed(format!("bad XML escape: {e}")))?;
                current.push_str(&piece);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocxExtractor::malformed(format!("XML parse error: {e}"))),
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn document_xml(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut writer = ZipWriter::new(std::io::Cursor::new(&mut buf));
            writer
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            writer
                .write_all(document_xml(paragraphs).as_bytes())
                .unwrap();
            writer.finish().unwrap();
        }
        buf
    }

    fn extract_bytes(bytes: &[u8]) -> Result<String, ExtractError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.docx");
        std::fs::write(&path, bytes).unwrap();
        DocxExtractor.extract(&path)
    }

    #[test]
    fn paragraphs_concatenate_in_document_order() {
        let text = extract_bytes(&build_docx(&["Alpha", "Beta"])).unwrap();
        assert_eq!(text, "Alpha Beta");
    }

    #[test]
    fn split_runs_concatenate_within_a_paragraph() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>Hel</w:t></w:r><w:r><w:t>lo</w:t></w:r></w:p></w:body></w:document>"#;
        let paragraphs = parse_paragraphs(xml).unwrap();
        assert_eq!(paragraphs, vec!["Hello"]);
    }

    #[test]
    fn tabs_and_breaks_become_spaces() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>left</w:t><w:tab/><w:t>right</w:t></w:r></w:p></w:body></w:document>"#;
        let paragraphs = parse_paragraphs(xml).unwrap();
        assert_eq!(paragraphs, vec!["left right"]);
    }

    #[test]
    fn xml_entities_are_unescaped() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>a &amp; b</w:t></w:r></w:p></w:body></w:document>"#;
        let paragraphs = parse_paragraphs(xml).unwrap();
        assert_eq!(paragraphs, vec!["a & b"]);
    }

    #[test]
    fn not_a_zip_is_malformed() {
        let err = extract_bytes(b"plain text pretending").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MalformedDocument {
                kind: MediaKind::Docx,
                ..
            }
        ));
    }

    #[test]
    fn zip_without_document_xml_is_malformed() {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut writer = ZipWriter::new(std::io::Cursor::new(&mut buf));
            writer
                .start_file("unrelated.txt", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"nope").unwrap();
            writer.finish().unwrap();
        }
        let err = extract_bytes(&buf).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }
}
