//! Media kind detection from filenames.
//!
//! The upload contract identifies documents purely by filename extension —
//! the same rule the rest of the pipeline depends on. Detection is
//! case-insensitive and happens before anything is written to disk, so an
//! unsupported upload never costs a temp file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The document format of an upload, derived from its filename extension.
///
/// `None` from [`MediaKind::from_filename`] is the "unsupported" case;
/// dispatch converts it into
/// [`crate::error::ExtractError::UnsupportedFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// `.pdf`
    Pdf,
    /// `.docx`
    Docx,
    /// `.txt`
    #[serde(rename = "text")]
    PlainText,
    /// `.jpg`, `.jpeg`, `.png`
    Image,
}

impl MediaKind {
    /// Detect the media kind from a filename, case-insensitively.
    ///
    /// Returns `None` when the extension is missing or not one of
    /// {pdf, docx, txt, jpg, jpeg, png}.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())?
            .to_ascii_lowercase();
        Self::from_extension(&ext)
    }

    /// Detect the media kind from a bare, already-lowercased extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(MediaKind::Pdf),
            "docx" => Some(MediaKind::Docx),
            "txt" => Some(MediaKind::PlainText),
            "jpg" | "jpeg" | "png" => Some(MediaKind::Image),
            _ => None,
        }
    }

    /// Lowercase label used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Pdf => "pdf",
            MediaKind::Docx => "docx",
            MediaKind::PlainText => "text",
            MediaKind::Image => "image",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the (lowercased) extension of a filename for error reporting.
///
/// Unlike [`MediaKind::from_filename`] this never fails — a filename with no
/// extension reports an empty string.
pub(crate) fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}
