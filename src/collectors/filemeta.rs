use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{info, warn};
use lopdf::{Document, Object};
use serde_json::{json, Value};

use crate::errors::CollectorError;
use crate::models::{CollectorOutcome, OutcomeKind};

/// Extract metadata from a local file.
///
/// The `.pdf` extension selects the PDF Info-dictionary path; everything
/// else is treated as an image and read for EXIF tags. The two paths are
/// mutually exclusive.
pub fn collect(path: &Path) -> CollectorOutcome {
    let target = path.display().to_string();
    match extract(path) {
        Ok(payload) => {
            info!("file-metadata: extracted from {}", target);
            CollectorOutcome::success(OutcomeKind::FileMetadata, target, payload)
        }
        Err(err) => {
            warn!("file-metadata failed for {}: {}", target, err);
            CollectorOutcome::failure(OutcomeKind::FileMetadata, target, err)
        }
    }
}

fn extract(path: &Path) -> Result<Value, CollectorError> {
    if !path.is_file() {
        return Err(CollectorError::Validation(format!(
            "{} is not a readable file",
            path.display()
        )));
    }

    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        let metadata = pdf_info(path)?;
        Ok(json!({ "path": path.display().to_string(), "pdf_metadata": metadata }))
    } else {
        let tags = exif_tags(path)?;
        Ok(json!({ "path": path.display().to_string(), "exif": tags }))
    }
}

/// Read the trailer Info dictionary of a PDF.
fn pdf_info(path: &Path) -> Result<BTreeMap<String, String>, CollectorError> {
    let doc = Document::load(path)
        .map_err(|e| CollectorError::Parse(format!("could not load PDF: {}", e)))?;

    let mut metadata = BTreeMap::new();
    let info = match doc.trailer.get(b"Info") {
        Ok(object) => object,
        Err(_) => return Ok(metadata), // no Info dictionary at all
    };

    let dict = match info {
        Object::Reference(id) => doc
            .get_object(*id)
            .and_then(Object::as_dict)
            .map_err(|e| CollectorError::Parse(format!("bad Info reference: {}", e)))?,
        Object::Dictionary(dict) => dict,
        other => {
            return Err(CollectorError::Parse(format!(
                "unexpected Info object: {:?}",
                other.type_name()
            )))
        }
    };

    for (key, value) in dict.iter() {
        let key = String::from_utf8_lossy(key).to_string();
        let value = match value {
            Object::String(bytes, _) => String::from_utf8_lossy(bytes).to_string(),
            Object::Name(bytes) => String::from_utf8_lossy(bytes).to_string(),
            other => format!("{:?}", other),
        };
        metadata.insert(key, value);
    }

    Ok(metadata)
}

/// Read EXIF tags from an image file.
fn exif_tags(path: &Path) -> Result<BTreeMap<String, String>, CollectorError> {
    let file = File::open(path)
        .map_err(|e| CollectorError::Validation(format!("cannot open {}: {}", path.display(), e)))?;
    let mut reader = BufReader::new(file);

    let exif = exif::Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| CollectorError::Parse(format!("no EXIF data: {}", e)))?;

    let mut tags = BTreeMap::new();
    for field in exif.fields() {
        tags.insert(
            field.tag.to_string(),
            field.display_value().with_unit(&exif).to_string(),
        );
    }
    Ok(tags)
}
