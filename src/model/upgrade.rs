//! File-level change records.

use crate::utils::absolute_path_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Key under which the upgrade record lives, both in user sidecars and SBOMs.
pub const UPGRADE_KEY: &str = "upgrade";

/// Partition of the filtered files of two trees, by path relative to each root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSetDelta {
    /// Only in the new tree
    pub added: BTreeSet<PathBuf>,
    /// Only in the old tree
    pub removed: BTreeSet<PathBuf>,
    /// In both trees with different content
    pub modified: BTreeSet<PathBuf>,
}

impl FileSetDelta {
    /// True when no file was added, removed or modified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Total number of changed files.
    #[must_use]
    pub fn total(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

/// Structural diff of one modified file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// Absolute path of the file in the new tree
    pub file: String,
    /// Diff tool output lines, verbatim, or a single placeholder line
    pub change: Vec<String>,
}

impl DiffRecord {
    /// Create a record for `file` with the given diff lines.
    pub fn new(file: impl Into<String>, change: Vec<String>) -> Self {
        Self {
            file: file.into(),
            change,
        }
    }
}

/// The `file_changes` body of an upgrade record.
///
/// Field order and key names are part of the output format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChanges {
    /// Absolute path of the old version
    pub old_version: String,
    #[serde(rename = "New file")]
    pub new_files: Vec<String>,
    #[serde(rename = "Deleted file")]
    pub deleted_files: Vec<String>,
    #[serde(rename = "Modified file")]
    pub modified_files: Vec<DiffRecord>,
}

/// Canonical upgrade record, the value stored under the `upgrade` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeRecord {
    pub file_changes: FileChanges,
}

impl UpgradeRecord {
    /// A record with no changes for the given old version.
    #[must_use]
    pub fn empty(old_version: &Path) -> Self {
        Self {
            file_changes: FileChanges {
                old_version: absolute_path_string(old_version),
                ..FileChanges::default()
            },
        }
    }

    /// Build a record from a relative delta and the diffs of its modified files.
    ///
    /// Added paths are resolved against `new_root`, removed paths against
    /// `old_root`. All lists are sorted by path string.
    #[must_use]
    pub fn from_delta(
        old_root: &Path,
        new_root: &Path,
        delta: &FileSetDelta,
        diffs: Vec<DiffRecord>,
    ) -> Self {
        let new_files = delta
            .added
            .iter()
            .map(|rel| absolute_path_string(&new_root.join(rel)))
            .collect();
        let deleted_files = delta
            .removed
            .iter()
            .map(|rel| absolute_path_string(&old_root.join(rel)))
            .collect();

        let mut record = Self {
            file_changes: FileChanges {
                old_version: absolute_path_string(old_root),
                new_files,
                deleted_files,
                modified_files: diffs,
            },
        };
        record.sort();
        record
    }

    /// Sort every change list lexicographically by path string.
    pub fn sort(&mut self) {
        let changes = &mut self.file_changes;
        changes.new_files.sort();
        changes.deleted_files.sort();
        changes.modified_files.sort_by(|a, b| a.file.cmp(&b.file));
    }

    /// True when all three change lists are empty.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        let changes = &self.file_changes;
        changes.new_files.is_empty()
            && changes.deleted_files.is_empty()
            && changes.modified_files.is_empty()
    }
}

/// Upgrade data ready to be spliced into an SBOM.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpgradeSection {
    /// Computed by comparing two artifact versions
    Computed(UpgradeRecord),
    /// Supplied by the user, opaque
    Supplied(Value),
}

impl UpgradeSection {
    /// Normalize a user-supplied document.
    ///
    /// An object whose only key is `upgrade` is unwrapped; anything else is
    /// taken as the bare upgrade body.
    #[must_use]
    pub fn from_user_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) if map.len() == 1 && map.contains_key(UPGRADE_KEY) => {
                Self::Supplied(map.remove(UPGRADE_KEY).unwrap_or(Value::Null))
            }
            other => Self::Supplied(other),
        }
    }

    /// Convert into the JSON value stored under `upgrade`.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl From<UpgradeRecord> for UpgradeSection {
    fn from(record: UpgradeRecord) -> Self {
        Self::Computed(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_key_names_and_order() {
        let record = UpgradeRecord {
            file_changes: FileChanges {
                old_version: "/old".to_string(),
                new_files: vec!["/new/a.c".to_string()],
                deleted_files: vec![],
                modified_files: vec![DiffRecord::new("/new/b.c", vec!["--- x".into()])],
            },
        };

        let text = serde_json::to_string(&record).expect("serialize");
        assert_eq!(
            text,
            r#"{"file_changes":{"old_version":"/old","New file":["/new/a.c"],"Deleted file":[],"Modified file":[{"file":"/new/b.c","change":["--- x"]}]}}"#
        );
    }

    #[test]
    fn test_from_delta_resolves_against_own_root() {
        let old = tempfile::tempdir().expect("old dir");
        let new = tempfile::tempdir().expect("new dir");
        let mut delta = FileSetDelta::default();
        delta.added.insert(PathBuf::from("z.c"));
        delta.added.insert(PathBuf::from("a.c"));
        delta.removed.insert(PathBuf::from("gone.h"));

        let record = UpgradeRecord::from_delta(old.path(), new.path(), &delta, vec![]);
        let changes = &record.file_changes;

        assert_eq!(changes.new_files.len(), 2);
        assert!(changes.new_files[0].ends_with("a.c"));
        assert!(changes.new_files[1].ends_with("z.c"));
        assert!(changes.new_files[0].starts_with(&absolute_path_string(new.path())));
        assert!(changes.deleted_files[0].starts_with(&absolute_path_string(old.path())));
        assert_eq!(changes.old_version, absolute_path_string(old.path()));
    }

    #[test]
    fn test_modified_sorted_by_file() {
        let dir = tempfile::tempdir().expect("dir");
        let diffs = vec![
            DiffRecord::new("/b/x.c", vec![]),
            DiffRecord::new("/a/y.c", vec![]),
        ];
        let record =
            UpgradeRecord::from_delta(dir.path(), dir.path(), &FileSetDelta::default(), diffs);
        let files: Vec<&str> = record
            .file_changes
            .modified_files
            .iter()
            .map(|d| d.file.as_str())
            .collect();
        assert_eq!(files, vec!["/a/y.c", "/b/x.c"]);
    }

    #[test]
    fn test_user_value_wrapped_is_unwrapped() {
        let section = UpgradeSection::from_user_value(json!({"upgrade": {"note": "v2"}}));
        assert_eq!(section, UpgradeSection::Supplied(json!({"note": "v2"})));
    }

    #[test]
    fn test_user_value_bare_is_kept() {
        let bare = json!({"file_changes": {}, "upgrade": 1});
        let section = UpgradeSection::from_user_value(bare.clone());
        assert_eq!(section, UpgradeSection::Supplied(bare));
    }

    #[test]
    fn test_section_value_of_computed_record() {
        let section = UpgradeSection::from(UpgradeRecord::default());
        let value = section.to_value().expect("to value");
        assert!(value.get("file_changes").is_some());
    }
}
