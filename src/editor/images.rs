//! Image intake
//!
//! Files are processed one at a time in the order they were given: each
//! one is fully resolved (upload attempt and fallback included) before the
//! next starts, so the session's image list matches the drop order. A failed
//! upload degrades to the inline preview and never aborts the batch.

use tracing::{info, warn};

use crate::{
    content::{AssetOrigin, ImageAsset, ImageFile},
    status::StatusReporter,
    storage::{self, ObjectStore},
    warning::{self, AssetWarnings},
};

use super::EditingSession;

/// Per-asset outcome of a batch, in input order.
#[derive(Debug, Default)]
pub struct IntakeReport {
    pub processed: usize,
    pub fallbacks: usize,
    pub warnings: Vec<AssetWarnings>,
}

async fn resolve<S: ObjectStore>(store: &S, file: ImageFile) -> ImageAsset {
    let preview = file.data_url();
    let key = storage::object_key(&file, chrono::Utc::now());
    let (url, origin) = match store
        .put(&key, file.content_type.essence_str(), &file.body)
        .await
    {
        Ok(()) => (store.public_url(&key), AssetOrigin::Remote { key }),
        Err(e) => {
            let error = crate::Error::Upload(e.to_string());
            warn!(name = file.name, %error, "upload failed, using inline preview");
            crate::warn_asset!("{error}; using inline preview for {}", file.name);
            (preview.clone(), AssetOrigin::Fallback)
        }
    };
    ImageAsset {
        url,
        preview,
        name: file.name.clone(),
        caption: None,
        origin,
        file,
    }
}

pub async fn process_images<S, R>(
    session: &mut EditingSession,
    store: &S,
    files: Vec<ImageFile>,
    reporter: &R,
) -> IntakeReport
where
    S: ObjectStore,
    R: StatusReporter + ?Sized,
{
    let mut report = IntakeReport::default();
    for file in files {
        reporter.info(&format!("Processing {}...", file.name));
        let (asset, warnings) = warning::scope(file.name.clone(), resolve(store, file)).await;
        if asset.is_fallback() {
            report.fallbacks += 1;
            reporter.warn(&format!(
                "Using {} as base64 (storage unavailable)",
                asset.name
            ));
        } else {
            reporter.success(&format!("Uploaded {}", asset.name));
        }
        info!(name = asset.name, origin = ?asset.origin, "image processed");
        report.processed += 1;
        report.warnings.push(warnings);
        session.push_image(asset);
    }
    reporter.success(&format!("{} image(s) processed", report.processed));
    report
}
