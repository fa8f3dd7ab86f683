//! User-mode stage: the upgrade section comes from a prepared sidecar file.

use crate::config::UPGRADE_SIDECAR_FILE;
use crate::error::{DiffSbomError, Result};
use crate::model::UpgradeSection;
use std::path::{Path, PathBuf};

/// Location of the sidecar: next to `new`.
///
/// A trailing slash does not change the answer: `app-1.1/` names the same
/// entry as `app-1.1`, so the sidecar is looked up beside it, not inside it.
#[must_use]
pub fn sidecar_path(new: &Path) -> PathBuf {
    let parent = match new.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.join(UPGRADE_SIDECAR_FILE)
}

/// Read and normalize the user-supplied upgrade section for `new`.
pub fn load_user_upgrade(new: &Path) -> Result<UpgradeSection> {
    let path = sidecar_path(new);
    tracing::info!("Loading upgrade record from {}", path.display());

    let content = std::fs::read_to_string(&path).map_err(|e| DiffSbomError::io(&path, e))?;
    let value = serde_json::from_str(&content).map_err(|e| {
        DiffSbomError::invalid_json(format!("upgrade sidecar {}", path.display()), &e, &content)
    })?;
    Ok(UpgradeSection::from_user_value(value))
}
