//! Uniform access to external programs.
//!
//! Every subprocess in diffsbom (structural diff, tree-diff delegate, SBOM
//! scanner) is started through [`ToolCommand::run`] and reported as an
//! [`ExternalToolResult`]. Whether a non-zero exit or a timeout is fatal is
//! decided by the caller.

mod runner;

pub use runner::{ExternalToolResult, ToolCommand};

use std::path::{Path, PathBuf};

/// Locate `program` the way a shell would.
///
/// A name containing a path separator is checked directly; a bare name is
/// searched on `PATH`. Only executable regular files are returned.
#[must_use]
pub fn find_executable(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 || program.is_absolute() {
        return is_executable(program).then(|| program.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

/// True when `path` is a regular file the current user may execute.
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
