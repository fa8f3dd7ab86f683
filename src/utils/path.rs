//! Path resolution utilities.

use std::path::{Path, PathBuf};

/// Resolve `path` to an absolute path.
///
/// Symlinks are resolved when the path exists; otherwise the path is made
/// absolute against the current directory without touching the filesystem.
#[must_use]
pub fn absolute_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// [`absolute_path`] rendered as a string, the form used in upgrade records.
#[must_use]
pub fn absolute_path_string(path: &Path) -> String {
    absolute_path(path).to_string_lossy().into_owned()
}
