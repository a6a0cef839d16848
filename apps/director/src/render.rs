use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::references::ReferenceStore;

pub const VIEWER_TEMPLATE: &str = "templates/output.html";
pub const VIEWER_FILE: &str = "output.html";
pub const PLACEHOLDER: &str = r#"{"_placeholder": true}"#;

/// Injects `data` into the static viewer page and writes `output.html`
/// into `out_dir`. Returns `None` when the template is missing.
pub fn render_viewer(
    store: &ReferenceStore,
    data: &Value,
    out_dir: &Path,
) -> Result<Option<PathBuf>, AppError> {
    let Some(template) = store.read(VIEWER_TEMPLATE) else {
        warn!("Viewer template missing; skipping HTML output");
        return Ok(None);
    };
    if !template.contains(PLACEHOLDER) {
        warn!("Viewer template has no data placeholder");
    }

    let payload = serde_json::to_string_pretty(data)
        .map_err(|e| AppError::Internal(e.into()))?
        .replace("</", "<\\/");
    let html = template.replacen(PLACEHOLDER, &payload, 1);

    let path = out_dir.join(VIEWER_FILE);
    std::fs::write(&path, html)?;
    info!("Viewer written to {}", path.display());
    Ok(Some(path))
}
