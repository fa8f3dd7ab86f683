//! Diff-mode stage.
//!
//! Compares the two versions, writes the raw and filtered diffs and the
//! function lists, and returns the upgrade record for the SBOM.

use super::input::InputShape;
use crate::compare::{SourceFilter, TreeComparator, TreeDiffDelegate};
use crate::config::{AppConfig, DIFF_LOG_FILE, FILTERED_DIFF_FILE};
use crate::error::{ErrorContext, Result};
use crate::extract::{extract_diff, write_filtered};
use crate::functions::{write_function_lists, FunctionClassifier};
use crate::model::{FunctionChangeSet, UpgradeRecord};
use crate::structural::{is_placeholder, DiffLog, StructuralDiffInvoker};
use std::path::Path;

/// Everything diff mode produced.
#[derive(Debug, Clone)]
pub struct DiffOutcome {
    pub record: UpgradeRecord,
    pub functions: FunctionChangeSet,
    /// Number of lines written to the filtered diff
    pub filtered_lines: usize,
}

/// Compare `old` against `new` and write the diff-mode artifacts.
///
/// Configuration problems (bad marker regex, unusable delegate script) are
/// reported before anything is written.
pub fn compute_upgrade(
    old: &Path,
    new: &Path,
    shape: InputShape,
    config: &AppConfig,
) -> Result<DiffOutcome> {
    let classifier = FunctionClassifier::from_config(&config.functions)?;
    let delegate = TreeDiffDelegate::from_config(&config.tree_diff);
    if let (InputShape::Directories, Some(delegate)) = (shape, &delegate) {
        delegate.check()?;
    }

    let out_dir = &config.output.dir;
    let log = DiffLog::open(out_dir.join(DIFF_LOG_FILE))?;
    let invoker = StructuralDiffInvoker::new(&config.structural_diff, Some(log));
    let mut comparator =
        TreeComparator::new(SourceFilter::from_config(&config.filter), invoker)
            .with_delegate(delegate);

    tracing::info!("Comparing {} -> {}", old.display(), new.display());
    let record = match shape {
        InputShape::Files => comparator.compare_files(old, new),
        InputShape::Directories => comparator.compare_directories(old, new),
    }
    .with_context(|| format!("comparing {} with {}", old.display(), new.display()))?;
    if let Err(e) = comparator.into_invoker().finish() {
        tracing::warn!("Failed to flush {}: {}", DIFF_LOG_FILE, e);
    }

    let raw = record
        .file_changes
        .modified_files
        .iter()
        .filter(|diff| !is_placeholder(&diff.change))
        .flat_map(|diff| diff.change.iter());
    let filtered = extract_diff(raw, config.extract.dialect());
    write_filtered(&out_dir.join(FILTERED_DIFF_FILE), &filtered)?;

    let functions = classifier.classify_functions(&filtered);
    write_function_lists(out_dir, &functions)?;

    if record.is_unchanged() {
        tracing::info!("No source changes between the two versions");
    }

    Ok(DiffOutcome {
        record,
        functions,
        filtered_lines: filtered.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MarkerConfig, ADDED_FUNCTIONS_FILE};
    use crate::error::DiffSbomError;

    fn config(out: &Path) -> AppConfig {
        AppConfig::builder()
            .diff_program("diffsbom-no-such-diff")
            .output_dir(out)
            .build()
    }

    #[test]
    fn test_unchanged_files_write_empty_artifacts() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let old = dir.path().join("old.py");
        let new = dir.path().join("new.py");
        std::fs::write(&old, "x = 1\n").expect("write");
        std::fs::write(&new, "x = 1\n").expect("write");

        let outcome =
            compute_upgrade(&old, &new, InputShape::Files, &config(dir.path())).expect("diff");
        assert!(outcome.record.is_unchanged());
        assert!(outcome.functions.is_empty());
        assert_eq!(outcome.filtered_lines, 0);
        assert_eq!(
            std::fs::read_to_string(dir.path().join(FILTERED_DIFF_FILE)).expect("read"),
            ""
        );
        assert!(dir.path().join(ADDED_FUNCTIONS_FILE).exists());
        assert!(dir.path().join(DIFF_LOG_FILE).exists());
    }

    #[test]
    fn test_placeholders_are_not_extracted() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let old = dir.path().join("old.py");
        let new = dir.path().join("new.py");
        std::fs::write(&old, "x = 1\n").expect("write");
        std::fs::write(&new, "x = 2\n").expect("write");

        let outcome =
            compute_upgrade(&old, &new, InputShape::Files, &config(dir.path())).expect("diff");
        assert_eq!(outcome.record.file_changes.modified_files.len(), 1);
        assert_eq!(outcome.filtered_lines, 0);
    }

    #[test]
    fn test_compare_failure_names_both_paths() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let old = dir.path().join("old.py");
        let new = dir.path().join("vanished.py");
        std::fs::write(&old, "x = 1\n").expect("write");

        match compute_upgrade(&old, &new, InputShape::Files, &config(dir.path())) {
            Err(DiffSbomError::Io { message, .. }) => {
                assert!(message.starts_with("comparing "), "{message}");
                assert!(message.contains("vanished.py"), "{message}");
            }
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_marker_fails_before_writing() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let out = dir.path().join("out");
        std::fs::create_dir(&out).expect("mkdir");
        let mut config = config(&out);
        config.functions.markers = vec![MarkerConfig::new("broken", "(")];

        let result = compute_upgrade(dir.path(), dir.path(), InputShape::Directories, &config);
        assert!(matches!(result, Err(DiffSbomError::Config(_))));
        assert!(!out.join(DIFF_LOG_FILE).exists());
    }
}
