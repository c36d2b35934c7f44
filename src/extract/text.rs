//! Plain-text extraction: decode the byte stream as UTF-8, verbatim.
//!
//! Strict decoding on purpose — a "text" file that isn't valid UTF-8 is a
//! typed failure, not a lossy success with replacement characters that would
//! silently corrupt the lecture source.

use super::TextExtractor;
use crate::error::ExtractError;
use std::path::Path;

/// UTF-8 .txt extractor.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = std::fs::read(path)?;
        String::from_utf8(bytes).map_err(|e| ExtractError::UndecodableText {
            detail: e.to_string(),
        })
    }
}
