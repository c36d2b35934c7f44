//! # studycast
//!
//! Turn one uploaded course document into an exam-focused podcast script.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload (name + bytes)
//!  │
//!  ├─ 1. Dispatch   media kind from the extension, scoped temp file
//!  ├─ 2. Extract    PDF / DOCX / TXT / image-OCR → plain text
//!  │
//!  │   (separate request — the caller feeds text forward)
//!  │
//!  ├─ 3. Generate   fixed lecture prompt + source text → one structured call
//!  └─ 4. Validate   strict JSON array → ordered LectureSegment batch
//! ```
//!
//! Extraction and preprocessing are independent operations on purpose: the
//! text sits with the caller in between, so a user can trim or correct it
//! before spending a generation call.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use studycast::{extract_document, preprocess, GeminiGenerator, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default();
//!
//!     let bytes = std::fs::read("lecture.pdf")?;
//!     let extracted = extract_document("lecture.pdf", bytes).await?;
//!
//!     // Credential from GEMINI_API_KEY
//!     let generator = GeminiGenerator::from_env(&config)?;
//!     let batch = preprocess(&extracted.content, &generator, &config).await?;
//!
//!     for segment in batch.iter() {
//!         println!("{} ({}s): {}", segment.title, segment.duration_secs, segment.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | axum HTTP server (`studycast-server` binary) with CORS |
//! | `ocr`    | off     | Image extraction via Tesseract (needs native libtesseract) |
//!
//! Without `ocr`, image uploads fail with a descriptive "OCR engine
//! unavailable" error rather than a build-time requirement on native
//! libraries.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod generate;
pub mod media;
pub mod preprocess;
pub mod prompts;
pub mod segment;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{ExtractError, GenerationError, PreprocessError};
pub use extract::{extract_document, ExtractedText, TextExtractor};
pub use generate::{GeminiGenerator, TextGenerator, API_KEY_ENV};
pub use media::MediaKind;
pub use preprocess::preprocess;
pub use segment::{Importance, LectureSegment, SegmentBatch};
