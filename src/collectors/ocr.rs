use std::path::Path;

use log::{info, warn};
use serde_json::json;

use crate::capabilities::OcrCapability;
use crate::errors::CollectorError;
use crate::models::{CollectorOutcome, OutcomeKind};

/// Run text recognition over a local image.
///
/// Requires the OCR capability to be available; otherwise the outcome is
/// a capability-missing failure.
pub fn collect(path: &Path, ocr: &OcrCapability) -> CollectorOutcome {
    let target = path.display().to_string();

    let engine = match ocr {
        OcrCapability::Available(engine) => engine,
        OcrCapability::Unavailable(reason) => {
            warn!("ocr unavailable for {}: {}", target, reason);
            return CollectorOutcome::failure(
                OutcomeKind::Ocr,
                target,
                CollectorError::CapabilityMissing(reason.clone()),
            );
        }
    };

    if !path.is_file() {
        return CollectorOutcome::failure(
            OutcomeKind::Ocr,
            target,
            CollectorError::Validation(format!("{} is not a readable file", path.display())),
        );
    }

    match engine.recognize(path) {
        Ok(text) => {
            info!("ocr: recognized {} chars from {}", text.chars().count(), target);
            CollectorOutcome::success(
                OutcomeKind::Ocr,
                target,
                json!({ "path": path.display().to_string(), "text": text }),
            )
        }
        Err(err) => {
            warn!("ocr failed for {}: {}", target, err);
            CollectorOutcome::failure(OutcomeKind::Ocr, target, err)
        }
    }
}
