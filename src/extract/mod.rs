//! Format-dispatching text extraction.
//!
//! One capability trait ([`TextExtractor`]), four stateless implementations,
//! and a dispatch map from [`MediaKind`] to implementation. Adding a format
//! means adding a module and one match arm — the caller never changes.
//!
//! ## Data Flow
//!
//! ```text
//! (filename, bytes)
//!   │
//!   ├─ 1. Detect    MediaKind from the extension (no disk I/O yet)
//!   ├─ 2. Persist   bytes into a scoped TempDir
//!   ├─ 3. Extract   format-specific extractor reads the temp path
//!   └─ 4. Check     whitespace-only output fails as EmptyExtraction
//! ```
//!
//! ## Why a temp file?
//!
//! Extractors open the document through the filesystem exactly as the upload
//! endpoint hands it over, and the `TempDir` scope guarantees the bytes are
//! reclaimed on every exit path — success, extractor failure, or caller
//! cancellation — without a manual create/delete pair.
//!
//! Extraction is blocking, CPU-and-disk work, so it runs under
//! `spawn_blocking` rather than stalling the async executor.

use crate::error::ExtractError;
use crate::media::{self, MediaKind};
use serde::Serialize;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, info};

pub mod docx;
pub mod image;
pub mod pdf;
pub mod text;

pub use docx::DocxExtractor;
pub use image::ImageExtractor;
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;

/// Plain text recovered from one uploaded document.
///
/// Never constructed with whitespace-only `content` — that case surfaces as
/// [`ExtractError::EmptyExtraction`] instead.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedText {
    /// The extracted text, verbatim from the extractor.
    pub content: String,
    /// The media kind the text came from.
    pub source_kind: MediaKind,
}

/// The capability every format extractor implements: given a readable
/// document on disk, produce its text or a typed failure.
///
/// Implementations are stateless and synchronous; dispatch wraps them in
/// `spawn_blocking`.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Select the extractor for a media kind.
fn extractor_for(kind: MediaKind) -> Box<dyn TextExtractor> {
    match kind {
        MediaKind::Pdf => Box::new(PdfExtractor),
        MediaKind::Docx => Box::new(DocxExtractor),
        MediaKind::PlainText => Box::new(PlainTextExtractor),
        MediaKind::Image => Box::new(ImageExtractor),
    }
}

/// Extract the text of one uploaded document.
///
/// This is the extraction entry point for the library.
///
/// # Arguments
/// * `filename` — the client-supplied name; only its extension matters
/// * `bytes`    — the raw upload payload
///
/// # Errors
/// * [`ExtractError::UnsupportedFormat`] — extension outside
///   {pdf, docx, txt, jpg, jpeg, png}; no extractor is invoked and nothing is
///   written to disk
/// * [`ExtractError::EmptyExtraction`] — the extractor succeeded but found
///   only whitespace
/// * any format-specific [`ExtractError`] from the selected extractor
pub async fn extract_document(
    filename: &str,
    bytes: Vec<u8>,
) -> Result<ExtractedText, ExtractError> {
    let kind = MediaKind::from_filename(filename).ok_or_else(|| {
        ExtractError::UnsupportedFormat {
            extension: media::extension_of(filename),
        }
    })?;
    info!("Extracting {} upload: {} ({} bytes)", kind, filename, bytes.len());

    // Only the final path component lands in the temp dir; a client-supplied
    // "../" must not escape the scope.
    let stored_name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    let content = tokio::task::spawn_blocking(move || -> Result<String, ExtractError> {
        let scope = TempDir::new()?;
        let doc_path = scope.path().join(&stored_name);
        std::fs::write(&doc_path, &bytes)?;
        debug!("Upload persisted to {}", doc_path.display());

        extractor_for(kind).extract(&doc_path)
        // `scope` drops here on success and failure alike, reclaiming the file.
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("extraction task failed: {e}")))??;

    if content.trim().is_empty() {
        return Err(ExtractError::EmptyExtraction { kind });
    }

    debug!("Extracted {} characters from {}", content.len(), filename);
    Ok(ExtractedText {
        content,
        source_kind: kind,
    })
}
