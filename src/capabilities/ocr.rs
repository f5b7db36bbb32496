use std::path::Path;

use crate::errors::CollectorError;

/// Text recognition over a local image file.
pub trait OcrEngine {
    fn recognize(&self, path: &Path) -> Result<String, CollectorError>;
}

/// Availability of the optional OCR capability, resolved once at startup.
pub enum OcrCapability {
    Available(Box<dyn OcrEngine>),
    Unavailable(String),
}

/// Resolve the OCR capability for this build.
///
/// The engine is compiled in only with the `ocr` feature; without it the
/// collector records a capability-missing failure instead of attempting
/// recognition.
pub fn resolve_ocr() -> OcrCapability {
    #[cfg(feature = "ocr")]
    {
        match tesseract::TesseractEngine::new() {
            Ok(engine) => OcrCapability::Available(Box::new(engine)),
            Err(reason) => OcrCapability::Unavailable(reason),
        }
    }
    #[cfg(not(feature = "ocr"))]
    {
        OcrCapability::Unavailable(
            "text recognition engine not compiled in (build with --features ocr)".to_string(),
        )
    }
}

#[cfg(feature = "ocr")]
mod tesseract {
    use super::*;

    pub struct TesseractEngine;

    impl TesseractEngine {
        pub fn new() -> Result<Self, String> {
            Ok(TesseractEngine)
        }
    }

    impl OcrEngine for TesseractEngine {
        fn recognize(&self, path: &Path) -> Result<String, CollectorError> {
            let mut lt = leptess::LepTess::new(None, "eng").map_err(|e| {
                CollectorError::CapabilityMissing(format!("tesseract init failed: {}", e))
            })?;
            lt.set_image(path).map_err(|e| {
                CollectorError::Parse(format!("could not decode image {}: {}", path.display(), e))
            })?;
            lt.get_utf8_text()
                .map_err(|e| CollectorError::Parse(format!("text recognition failed: {}", e)))
        }
    }
}
