//! Error types for the studycast library.
//!
//! Three enums mirror the three places a request can die:
//!
//! * [`ExtractError`] — anything that goes wrong between receiving raw upload
//!   bytes and producing plain text. Splits client-caused conditions (wrong
//!   file type, nothing readable inside) from genuine extractor failures via
//!   [`ExtractError::is_client_error`] so the HTTP boundary can map them to
//!   400 vs 500 without matching on variants.
//!
//! * [`GenerationError`] — the external generative-text call itself failed.
//!   Returned by [`crate::generate::TextGenerator`] implementations and folded
//!   into [`PreprocessError`] by the pipeline.
//!
//! * [`PreprocessError`] — the text-to-segments pipeline failed: empty input,
//!   generation failure, or output that could not be validated into a
//!   [`crate::segment::SegmentBatch`].
//!
//! None of these are process-fatal. Every failure path releases its scoped
//! temporary storage (RAII), and only the `Display` strings ever cross the
//! HTTP boundary — never a backtrace.

use crate::media::MediaKind;
use thiserror::Error;

/// All errors produced by document text extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The filename extension is not one of pdf, docx, txt, jpg, jpeg, png.
    ///
    /// Raised before any extractor is constructed and before any bytes touch
    /// the filesystem.
    #[error("Unsupported file type '{extension}' — supported: pdf, docx, txt, jpg, jpeg, png")]
    UnsupportedFormat { extension: String },

    /// The extractor ran successfully but produced only whitespace.
    ///
    /// Treated as a failure rather than a success with an empty payload: a
    /// scanned PDF with no text layer, or a blank page photo, has nothing to
    /// build a lecture from.
    #[error("No readable text found in the {kind} document")]
    EmptyExtraction { kind: MediaKind },

    /// The document could not be parsed as its claimed format.
    #[error("Malformed {kind} document: {detail}")]
    MalformedDocument { kind: MediaKind, detail: String },

    /// A .txt upload whose bytes are not valid UTF-8.
    #[error("Text file is not valid UTF-8: {detail}")]
    UndecodableText { detail: String },

    /// Image upload received but the crate was built without the `ocr` feature.
    #[error("OCR engine unavailable — rebuild with the 'ocr' feature to extract text from images")]
    OcrUnavailable,

    /// The OCR engine initialised but failed on this image.
    #[error("OCR failed: {detail}")]
    OcrFailed { detail: String },

    /// Filesystem error while persisting or reading the scoped temp file.
    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected internal error (e.g. a blocking task panicked).
    #[error("Internal extraction error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// Whether the client caused this failure (bad, empty, or unsupported
    /// input) as opposed to the extractor crashing on plausible input.
    ///
    /// The HTTP layer maps `true` to 400 and `false` to 500.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExtractError::UnsupportedFormat { .. }
                | ExtractError::EmptyExtraction { .. }
                | ExtractError::UndecodableText { .. }
        )
    }
}

/// Failure of a single call to the external generative-text capability.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network, authentication, or quota failure — the service could not be
    /// reached or refused the request.
    #[error("Generative-text service unavailable: {detail}")]
    Unavailable { detail: String },

    /// The call exceeded the configured timeout.
    #[error("Generative-text call timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// All errors produced by the text-to-segments pipeline.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// The input text was empty or whitespace-only. The generator is never
    /// invoked in this case.
    #[error("Input text is empty — nothing to preprocess")]
    EmptyInput,

    /// The generative-text service failed (network/auth/quota).
    #[error("Generative-text service unavailable: {detail}")]
    GenerationUnavailable { detail: String },

    /// The generative-text call timed out.
    #[error("Generative-text call timed out after {secs}s")]
    GenerationTimeout { secs: u64 },

    /// The model's response was not a valid, schema-conforming segment array.
    ///
    /// No partial recovery is attempted: one bad element rejects the whole
    /// batch so callers never receive a misleadingly short lecture. The
    /// caller may re-request.
    #[error("Model output was not a valid segment array: {detail}")]
    MalformedGenerationOutput { detail: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<GenerationError> for PreprocessError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Unavailable { detail } => {
                PreprocessError::GenerationUnavailable { detail }
            }
            GenerationError::Timeout { secs } => PreprocessError::GenerationTimeout { secs },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_is_client_error() {
        let e = ExtractError::UnsupportedFormat {
            extension: "exe".into(),
        };
        assert!(e.is_client_error());
        assert!(e.to_string().contains("exe"));
    }

    #[test]
    fn malformed_document_is_server_error() {
        let e = ExtractError::MalformedDocument {
            kind: MediaKind::Pdf,
            detail: "bad xref".into(),
        };
        assert!(!e.is_client_error());
        assert!(e.to_string().contains("bad xref"));
    }

    #[test]
    fn empty_extraction_names_the_kind() {
        let e = ExtractError::EmptyExtraction {
            kind: MediaKind::Image,
        };
        assert!(e.is_client_error());
        assert!(e.to_string().contains("image"));
    }

    #[test]
    fn generation_timeout_folds_into_preprocess_error() {
        let e: PreprocessError = GenerationError::Timeout { secs: 120 }.into();
        assert!(matches!(
            e,
            PreprocessError::GenerationTimeout { secs: 120 }
        ));
    }

    #[test]
    fn generation_unavailable_keeps_detail() {
        let e: PreprocessError = GenerationError::Unavailable {
            detail: "HTTP 429".into(),
        }
        .into();
        assert!(e.to_string().contains("HTTP 429"));
    }
}
