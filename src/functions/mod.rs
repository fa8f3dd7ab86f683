//! Function-level change classification.
//!
//! Hunk headers carry the name of the enclosing definition as trailing
//! context (`@@ -1,2 +1,2 @@ def f():`). A [`MarkerTable`] recognizes that
//! context and [`FunctionClassifier`] groups the changed lines under it.

mod classify;
mod markers;

pub use classify::FunctionClassifier;
pub use markers::MarkerTable;

use crate::config::{ADDED_FUNCTIONS_FILE, MODIFIED_FUNCTIONS_FILE, REMOVED_FUNCTIONS_FILE};
use crate::error::{DiffSbomError, Result};
use crate::model::FunctionChangeSet;
use std::collections::BTreeSet;
use std::path::Path;

/// Write the three function lists into `dir`, one identifier per line.
pub fn write_function_lists(dir: &Path, set: &FunctionChangeSet) -> Result<()> {
    write_list(&dir.join(ADDED_FUNCTIONS_FILE), &set.added)?;
    write_list(&dir.join(REMOVED_FUNCTIONS_FILE), &set.removed)?;
    write_list(&dir.join(MODIFIED_FUNCTIONS_FILE), &set.modified)
}

fn write_list(path: &Path, names: &BTreeSet<String>) -> Result<()> {
    let content: String = names.iter().map(|n| format!("{n}\n")).collect();
    std::fs::write(path, content).map_err(|e| DiffSbomError::io(path, e))
}
