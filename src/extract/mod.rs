//! Diff extraction.
//!
//! Reduces structural diff output to the lines the function classifier
//! needs: file headers, hunk headers and the changed lines of each hunk.
//! diffoscope wraps nested content in box-drawing decoration; one level of it
//! is stripped so hunk headers come out as bare `@@ ... @@` lines.
//!
//! Three dialects are understood, see [`Dialect`]. The machine itself lives in
//! [`DiffExtractor`]; [`extract_diff`] is the batch entry point.

mod line;
mod machine;

pub use line::{LineClass, IDENTICAL_SENTINEL};
pub use machine::{Dialect, DiffExtractor, ExtractState};

use crate::error::{DiffSbomError, Result};
use std::path::Path;

/// Run the extractor over `lines` and return the emitted lines in order.
pub fn extract_diff<I, S>(lines: I, dialect: Dialect) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extractor = DiffExtractor::new(dialect);
    for line in lines {
        extractor.feed(line.as_ref());
    }
    extractor.finish()
}

/// Write extracted lines to `path`, one per line.
pub fn write_filtered(path: &Path, lines: &[String]) -> Result<()> {
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(path, content).map_err(|e| DiffSbomError::io(path, e))?;
    tracing::debug!("Wrote {} filtered diff lines to {}", lines.len(), path.display());
    Ok(())
}
