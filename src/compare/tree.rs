//! Directory and file pair comparison.

use super::delegate::TreeDiffDelegate;
use super::filter::SourceFilter;
use crate::error::{DiffSbomError, Result};
use crate::model::{DiffRecord, FileSetDelta, UpgradeRecord};
use crate::structural::StructuralDiffInvoker;
use crate::utils::absolute_path_string;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Compares two versions of an artifact and builds the upgrade record.
#[derive(Debug)]
pub struct TreeComparator {
    filter: SourceFilter,
    invoker: StructuralDiffInvoker,
    delegate: Option<TreeDiffDelegate>,
}

impl TreeComparator {
    #[must_use]
    pub fn new(filter: SourceFilter, invoker: StructuralDiffInvoker) -> Self {
        Self {
            filter,
            invoker,
            delegate: None,
        }
    }

    /// Use an external script to partition directory trees.
    #[must_use]
    pub fn with_delegate(mut self, delegate: Option<TreeDiffDelegate>) -> Self {
        self.delegate = delegate;
        self
    }

    /// Compare two directory trees.
    ///
    /// Files are matched by their path relative to each root; only files the
    /// filter accepts are considered. Each modified file is diffed with the
    /// structural diff tool.
    pub fn compare_directories(&mut self, old_root: &Path, new_root: &Path) -> Result<UpgradeRecord> {
        let delta = self.file_delta(old_root, new_root)?;
        tracing::info!(
            "{} added, {} removed, {} modified source files",
            delta.added.len(),
            delta.removed.len(),
            delta.modified.len()
        );

        let diffs = delta
            .modified
            .iter()
            .map(|rel| self.diff_pair(&old_root.join(rel), &new_root.join(rel)))
            .collect();

        Ok(UpgradeRecord::from_delta(old_root, new_root, &delta, diffs))
    }

    /// Compare two single files.
    ///
    /// A pair where either side is not a source file yields an empty record.
    pub fn compare_files(&mut self, old_file: &Path, new_file: &Path) -> Result<UpgradeRecord> {
        let mut record = UpgradeRecord::empty(old_file);

        if !self.filter.accepts(old_file) || !self.filter.accepts(new_file) {
            tracing::info!(
                "Skipping {} / {}: not a recognized source file",
                old_file.display(),
                new_file.display()
            );
            return Ok(record);
        }

        if read_lossy(old_file)? != read_lossy(new_file)? {
            let diff = self.diff_pair(old_file, new_file);
            record.file_changes.modified_files.push(diff);
        }
        Ok(record)
    }

    /// Partition the filtered files of two trees.
    pub fn file_delta(&self, old_root: &Path, new_root: &Path) -> Result<FileSetDelta> {
        match &self.delegate {
            Some(delegate) => {
                tracing::debug!("Delegating tree diff to {}", delegate.script().display());
                let mut delta = delegate.run(old_root, new_root)?;
                delta.added.retain(|p| self.filter.accepts(p));
                delta.removed.retain(|p| self.filter.accepts(p));
                delta.modified.retain(|p| self.filter.accepts(p));
                Ok(delta)
            }
            None => self.walk_delta(old_root, new_root),
        }
    }

    fn walk_delta(&self, old_root: &Path, new_root: &Path) -> Result<FileSetDelta> {
        let old_files = scan_tree(old_root, &self.filter);
        let new_files = scan_tree(new_root, &self.filter);

        let mut delta = FileSetDelta {
            added: new_files.difference(&old_files).cloned().collect(),
            removed: old_files.difference(&new_files).cloned().collect(),
            modified: BTreeSet::new(),
        };

        for rel in old_files.intersection(&new_files) {
            if read_lossy(&old_root.join(rel))? != read_lossy(&new_root.join(rel))? {
                delta.modified.insert(rel.clone());
            }
        }
        Ok(delta)
    }

    fn diff_pair(&mut self, old: &Path, new: &Path) -> DiffRecord {
        let change = self.invoker.run_structural_diff(old, new);
        DiffRecord::new(absolute_path_string(new), change)
    }

    /// Hand back the invoker so its log can be closed.
    #[must_use]
    pub fn into_invoker(self) -> StructuralDiffInvoker {
        self.invoker
    }
}

/// Collect accepted files below `root`, relative to it.
fn scan_tree(root: &Path, filter: &SourceFilter) -> BTreeSet<PathBuf> {
    let mut out = BTreeSet::new();
    scan_dir(root, root, filter, &mut out);
    out
}

/// Recursively scan `dir`. Unreadable directories are skipped with a warning
/// and symlinked directories are not followed.
fn scan_dir(root: &Path, dir: &Path, filter: &SourceFilter, out: &mut BTreeSet<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!("Cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            scan_dir(root, &path, filter, out);
        } else if (file_type.is_file() || (file_type.is_symlink() && path.is_file()))
            && filter.accepts(&path)
        {
            if let Ok(rel) = path.strip_prefix(root) {
                out.insert(rel.to_path_buf());
            }
        }
    }
}

/// Read a file as text, replacing invalid UTF-8.
fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| DiffSbomError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StructuralDiffConfig;

    fn comparator() -> TreeComparator {
        let invoker = StructuralDiffInvoker::new(
            &StructuralDiffConfig {
                program: "diffsbom-no-such-diff".to_string(),
                timeout_secs: 5,
            },
            None,
        );
        TreeComparator::new(SourceFilter::default(), invoker)
    }

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create dirs");
        }
        std::fs::write(path, content).expect("write file");
    }

    #[test]
    fn test_scan_tree_filters_and_recurses() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "a.c", b"x");
        write(dir.path(), "docs/readme.md", b"x");
        write(dir.path(), "src/deep/util.H", b"x");

        let files = scan_tree(dir.path(), &SourceFilter::default());
        assert_eq!(
            files,
            BTreeSet::from([PathBuf::from("a.c"), PathBuf::from("src/deep/util.H")])
        );
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let files = scan_tree(Path::new("/nonexistent/diffsbom/root"), &SourceFilter::default());
        assert!(files.is_empty());
    }

    #[test]
    fn test_walk_delta_partitions() {
        let old = tempfile::tempdir().expect("create temp dir");
        let new = tempfile::tempdir().expect("create temp dir");
        write(old.path(), "same.c", b"int x;");
        write(new.path(), "same.c", b"int x;");
        write(old.path(), "changed.py", b"a = 1");
        write(new.path(), "changed.py", b"a = 2");
        write(old.path(), "gone.h", b"");
        write(new.path(), "sub/new.cpp", b"");
        write(new.path(), "notes.txt", b"ignored");

        let delta = comparator()
            .file_delta(old.path(), new.path())
            .expect("delta");
        assert_eq!(delta.added, BTreeSet::from([PathBuf::from("sub/new.cpp")]));
        assert_eq!(delta.removed, BTreeSet::from([PathBuf::from("gone.h")]));
        assert_eq!(delta.modified, BTreeSet::from([PathBuf::from("changed.py")]));
    }

    #[test]
    fn test_invalid_utf8_is_compared_not_fatal() {
        let old = tempfile::tempdir().expect("create temp dir");
        let new = tempfile::tempdir().expect("create temp dir");
        write(old.path(), "bin.c", &[0xff, 0xfe, b'a']);
        write(new.path(), "bin.c", &[0xff, 0xfe, b'b']);

        let record = comparator()
            .compare_directories(old.path(), new.path())
            .expect("compare");
        assert_eq!(record.file_changes.modified_files.len(), 1);
        assert!(record.file_changes.modified_files[0].file.ends_with("bin.c"));
    }

    #[test]
    fn test_compare_files_non_source_is_noop() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "a.txt", b"1");
        write(dir.path(), "b.txt", b"2");

        let record = comparator()
            .compare_files(&dir.path().join("a.txt"), &dir.path().join("b.txt"))
            .expect("compare");
        assert!(record.is_unchanged());
        assert!(record.file_changes.old_version.ends_with("a.txt"));
    }

    #[test]
    fn test_compare_files_identical() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "a.c", b"same");
        write(dir.path(), "b.c", b"same");

        let record = comparator()
            .compare_files(&dir.path().join("a.c"), &dir.path().join("b.c"))
            .expect("compare");
        assert!(record.is_unchanged());
    }

    #[test]
    fn test_compare_files_modified_with_placeholder() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "a.py", b"x = 1");
        write(dir.path(), "b.py", b"x = 2");

        let record = comparator()
            .compare_files(&dir.path().join("a.py"), &dir.path().join("b.py"))
            .expect("compare");
        let modified = &record.file_changes.modified_files;
        assert_eq!(modified.len(), 1);
        assert!(modified[0].file.ends_with("b.py"));
        assert_eq!(modified[0].change.len(), 1);
        assert!(modified[0].change[0].starts_with("[WARN]"));
    }

    #[test]
    fn test_compare_files_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "a.c", b"x");
        let result = comparator().compare_files(&dir.path().join("a.c"), &dir.path().join("b.c"));
        assert!(matches!(result, Err(DiffSbomError::Io { .. })));
    }
}
