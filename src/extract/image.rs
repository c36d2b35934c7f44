//! Image-to-text extraction via the Tesseract OCR engine.
//!
//! Recognized text is returned as-is, with no post-correction.
//!
//! The engine binding is feature-gated: `tesseract` links against the native
//! libtesseract/libleptonica libraries, which not every deployment carries.
//! Without the `ocr` feature the extractor still exists and dispatch still
//! routes to it, but every call reports the engine as unavailable — the same
//! failure an installed-but-broken engine would produce, and one the HTTP
//! boundary already knows how to present.

use super::TextExtractor;
use crate::error::ExtractError;
use std::path::Path;

/// OCR extractor for .jpg/.jpeg/.png uploads.
pub struct ImageExtractor;

#[cfg(feature = "ocr")]
impl TextExtractor for ImageExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let path_str = path.to_str().ok_or_else(|| ExtractError::OcrFailed {
            detail: "temp path is not valid UTF-8".into(),
        })?;

        // None = let tesseract find its own tessdata (TESSDATA_PREFIX or the
        // system default install location).
        let mut engine = tesseract::Tesseract::new(None, Some("eng"))
            .map_err(|e| ExtractError::OcrFailed {
                detail: format!("engine init: {e:?}"),
            })?
            .set_image(path_str)
            .map_err(|e| ExtractError::OcrFailed {
                detail: format!("image load: {e:?}"),
            })?;

        engine.get_text().map_err(|e| ExtractError::OcrFailed {
            detail: format!("recognition: {e:?}"),
        })
    }
}

#[cfg(not(feature = "ocr"))]
impl TextExtractor for ImageExtractor {
    fn extract(&self, _path: &Path) -> Result<String, ExtractError> {
        Err(ExtractError::OcrUnavailable)
    }
}

#[cfg(all(test, not(feature = "ocr")))]
mod tests {
    use super::*;

    #[test]
    fn without_the_feature_the_engine_is_unavailable() {
        let err = ImageExtractor.extract(Path::new("whatever.png")).unwrap_err();
        assert!(matches!(err, ExtractError::OcrUnavailable));
        assert!(err.to_string().contains("OCR engine unavailable"));
    }
}
