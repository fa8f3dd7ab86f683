//! Append-only log of raw structural diff output.

use crate::error::{DiffSbomError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Log sink opened once per pipeline run.
///
/// Each entry is followed by a newline if it does not already end with one.
/// Entries are flushed as they are written and again when the log is dropped.
#[derive(Debug)]
pub struct DiffLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl DiffLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| DiffSbomError::io(&path, e))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Append one tool output.
    pub fn append(&mut self, output: &str) -> std::io::Result<()> {
        self.writer.write_all(output.as_bytes())?;
        if !output.ends_with('\n') {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the log.
    pub fn close(mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for DiffLog {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!("Failed to flush diff log {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_guarantees_trailing_newline() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("diff_output.txt");

        let mut log = DiffLog::open(&path).expect("open log");
        log.append("first").expect("append");
        log.append("second\n").expect("append");
        log.close().expect("close");

        let content = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("diff_output.txt");

        {
            let mut log = DiffLog::open(&path).expect("open log");
            log.append("run one").expect("append");
        }
        {
            let mut log = DiffLog::open(&path).expect("open log");
            log.append("run two").expect("append");
        }

        let content = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(content, "run one\nrun two\n");
    }

    #[test]
    fn test_open_in_missing_dir_fails() {
        let result = DiffLog::open("/nonexistent/diffsbom/diff_output.txt");
        assert!(matches!(result, Err(DiffSbomError::Io { .. })));
    }
}
