//! Input path checks, run before any external tool.

use crate::error::{DiffSbomError, Result};
use std::path::Path;

/// What the old/new pair refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    Files,
    Directories,
}

/// Both paths must be regular files or both must be directories.
pub fn validate_input_shape(old: &Path, new: &Path) -> Result<InputShape> {
    if old.is_file() && new.is_file() {
        Ok(InputShape::Files)
    } else if old.is_dir() && new.is_dir() {
        Ok(InputShape::Directories)
    } else {
        Err(DiffSbomError::InputShape {
            old: old.to_path_buf(),
            new: new.to_path_buf(),
        })
    }
}

/// The scan target must exist.
pub fn validate_target(new: &Path) -> Result<()> {
    if new.exists() {
        Ok(())
    } else {
        Err(DiffSbomError::validation(format!(
            "new path {} does not exist",
            new.display()
        )))
    }
}
