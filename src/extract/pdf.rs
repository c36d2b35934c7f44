//! PDF text extraction via the document's text layer.
//!
//! Reads pages in document order and joins each page's text with a single
//! space. A page that yields no extractable text — typically a scanned page
//! with no text layer — contributes an empty string rather than failing the
//! whole document, so a half-scanned coursepack still produces the readable
//! half.

use super::TextExtractor;
use crate::error::ExtractError;
use crate::media::MediaKind;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// Text-layer PDF extractor.
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let doc = Document::load(path).map_err(|e| ExtractError::MalformedDocument {
            kind: MediaKind::Pdf,
            detail: e.to_string(),
        })?;

        // get_pages() is keyed by 1-based page number, iterated in order.
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        debug!("PDF has {} pages", page_numbers.len());

        let pages: Vec<String> = page_numbers
            .iter()
            .map(|&n| doc.extract_text(&[n]).unwrap_or_default())
            .collect();

        Ok(pages.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a minimal text-layer PDF with one page per entry in `pages`.
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content stream"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("serialise PDF");
        buf
    }

    fn extract_bytes(bytes: &[u8]) -> Result<String, ExtractError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.pdf");
        std::fs::write(&path, bytes).unwrap();
        PdfExtractor.extract(&path)
    }

    #[test]
    fn pages_concatenate_in_document_order() {
        let bytes = build_pdf(&["Alpha", "Beta"]);
        let text = extract_bytes(&bytes).unwrap();
        let a = text.find("Alpha").expect("first page text present");
        let b = text.find("Beta").expect("second page text present");
        assert!(a < b, "page order lost: {text:?}");
    }

    #[test]
    fn single_page_text_survives() {
        let bytes = build_pdf(&["Thermodynamics"]);
        let text = extract_bytes(&bytes).unwrap();
        assert!(text.contains("Thermodynamics"));
    }

    #[test]
    fn garbage_bytes_are_a_malformed_document() {
        let err = extract_bytes(b"this is not a pdf").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MalformedDocument {
                kind: MediaKind::Pdf,
                ..
            }
        ));
    }
}
