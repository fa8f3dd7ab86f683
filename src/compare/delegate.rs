//! External tree-diff script.
//!
//! The script is called as `script <old_dir> <new_dir>` and reports relative
//! paths in up to three sections:
//!
//! ```text
//! === added
//! src/new.c
//! === removed
//! src/gone.h
//! === modified
//! src/main.c
//! ```

use crate::config::TreeDiffConfig;
use crate::error::{preview, DiffSbomError, ParseErrorKind, Result, ToolErrorKind};
use crate::model::FileSetDelta;
use crate::tools::{is_executable, ToolCommand};
use crate::utils::absolute_path;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

const SECTION_PREFIX: &str = "===";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Added,
    Removed,
    Modified,
}

impl Section {
    fn from_marker(name: &str) -> Option<Self> {
        match name {
            "added" => Some(Self::Added),
            "removed" => Some(Self::Removed),
            "modified" => Some(Self::Modified),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
        }
    }
}

/// A configured tree-diff script.
#[derive(Debug, Clone)]
pub struct TreeDiffDelegate {
    script: PathBuf,
    timeout: Duration,
}

impl TreeDiffDelegate {
    /// Delegate from config, if a script is configured.
    #[must_use]
    pub fn from_config(config: &TreeDiffConfig) -> Option<Self> {
        config.script.as_ref().map(|script| Self {
            script: script.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    #[must_use]
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Ensure the script exists and is executable, returning its absolute path.
    pub fn check(&self) -> Result<PathBuf> {
        if !self.script.exists() {
            return Err(DiffSbomError::config(format!(
                "tree-diff script {} does not exist",
                self.script.display()
            )));
        }
        if !is_executable(&self.script) {
            return Err(DiffSbomError::config(format!(
                "tree-diff script {} is not executable (try chmod +x)",
                self.script.display()
            )));
        }
        Ok(absolute_path(&self.script))
    }

    /// Run the script on two directories and parse its report.
    pub fn run(&self, old_root: &Path, new_root: &Path) -> Result<FileSetDelta> {
        let program = self.check()?;
        let name = self.script.display().to_string();
        let context = format!("tree-diff script {name}");

        let result = ToolCommand::new(program, self.timeout)
            .arg(old_root.to_string_lossy())
            .arg(new_root.to_string_lossy())
            .run()
            .map_err(|e| {
                DiffSbomError::tool(
                    &context,
                    ToolErrorKind::Spawn {
                        program: name.clone(),
                        message: e.to_string(),
                    },
                )
            })?;

        if result.timed_out {
            return Err(DiffSbomError::tool(
                &context,
                ToolErrorKind::TimedOut {
                    program: name,
                    secs: self.timeout.as_secs(),
                },
            ));
        }
        if !result.success() {
            return Err(DiffSbomError::tool(
                &context,
                ToolErrorKind::NonZeroExit {
                    program: name,
                    code: result.exit_code_display(),
                    stderr: preview(&result.stderr),
                },
            ));
        }

        parse_delegate_output(&result.stdout)
    }
}

/// Parse the sectioned report of a tree-diff script.
///
/// Blank lines are ignored. A path before the first section marker, an
/// unknown marker, a path leaving the tree (absolute or through `..`) and a
/// path listed in two sections are malformed. Repeats within one section
/// collapse.
pub fn parse_delegate_output(output: &str) -> Result<FileSetDelta> {
    let mut delta = FileSetDelta::default();
    let mut section = None;

    for (index, raw) in output.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(marker) = line.strip_prefix(SECTION_PREFIX) {
            let marker = marker.trim();
            section = Some(Section::from_marker(marker).ok_or_else(|| {
                malformed(format!("line {}: unknown section '{marker}'", index + 1))
            })?);
            continue;
        }

        let Some(current) = section else {
            return Err(malformed(format!(
                "line {}: path '{line}' appears before any section marker",
                index + 1
            )));
        };

        let path = PathBuf::from(line);
        if path.is_absolute() || path.components().any(|c| c == Component::ParentDir) {
            return Err(malformed(format!(
                "line {}: expected a relative path inside the tree, got '{line}'",
                index + 1
            )));
        }
        if let Some(other) = section_of(&delta, &path).filter(|s| *s != current) {
            return Err(malformed(format!(
                "line {}: '{line}' is listed as both {} and {}",
                index + 1,
                other.name(),
                current.name()
            )));
        }

        target(&mut delta, current).insert(path);
    }

    Ok(delta)
}

fn section_of(delta: &FileSetDelta, path: &Path) -> Option<Section> {
    if delta.added.contains(path) {
        Some(Section::Added)
    } else if delta.removed.contains(path) {
        Some(Section::Removed)
    } else if delta.modified.contains(path) {
        Some(Section::Modified)
    } else {
        None
    }
}

fn target(delta: &mut FileSetDelta, section: Section) -> &mut BTreeSet<PathBuf> {
    match section {
        Section::Added => &mut delta.added,
        Section::Removed => &mut delta.removed,
        Section::Modified => &mut delta.modified,
    }
}

fn malformed(message: String) -> DiffSbomError {
    DiffSbomError::parse(
        "tree-diff script output",
        ParseErrorKind::MalformedDelegateOutput(message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections() {
        let output = "=== added\nsrc/new.c\n\n=== removed\nsrc/gone.h\n=== modified\nsrc/main.c\nsrc/util.c\n";
        let delta = parse_delegate_output(output).expect("parse");
        assert_eq!(delta.added, BTreeSet::from([PathBuf::from("src/new.c")]));
        assert_eq!(delta.removed, BTreeSet::from([PathBuf::from("src/gone.h")]));
        assert_eq!(delta.modified.len(), 2);
    }

    #[test]
    fn test_parse_empty_and_missing_sections() {
        assert!(parse_delegate_output("").expect("parse").is_empty());
        let delta = parse_delegate_output("=== modified\na.py\n").expect("parse");
        assert!(delta.added.is_empty());
        assert_eq!(delta.total(), 1);
    }

    #[test]
    fn test_parse_rejects_preamble() {
        let err = parse_delegate_output("hello\n=== added\na.c\n").unwrap_err();
        assert!(matches!(
            err,
            DiffSbomError::Parse {
                source: ParseErrorKind::MalformedDelegateOutput(_),
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_section_and_absolute_path() {
        assert!(parse_delegate_output("=== renamed\na.c\n").is_err());
        assert!(parse_delegate_output("=== added\n/abs/a.c\n").is_err());
    }

    #[test]
    fn test_parse_rejects_path_in_two_sections() {
        let err = parse_delegate_output("=== added\na.c\n=== modified\na.c\n").unwrap_err();
        match err {
            DiffSbomError::Parse {
                source: ParseErrorKind::MalformedDelegateOutput(msg),
                ..
            } => assert!(msg.contains("both added and modified"), "{msg}"),
            other => panic!("Expected MalformedDelegateOutput, got {other:?}"),
        }

        let delta = parse_delegate_output("=== removed\nb.h\nb.h\n").expect("parse");
        assert_eq!(delta.removed.len(), 1);
    }

    #[test]
    fn test_parse_rejects_parent_components() {
        assert!(parse_delegate_output("=== added\n../outside.c\n").is_err());
        assert!(parse_delegate_output("=== modified\nsrc/../../x.py\n").is_err());
        assert!(parse_delegate_output("=== modified\nsrc/./x.py\n").is_ok());
    }

    #[test]
    fn test_missing_script_is_config_error() {
        let delegate = TreeDiffDelegate::from_config(&TreeDiffConfig {
            script: Some(PathBuf::from("/nonexistent/tree-diff.sh")),
            timeout_secs: 5,
        })
        .expect("script configured");
        assert!(matches!(delegate.check(), Err(DiffSbomError::Config(_))));
    }

    #[test]
    fn test_unset_script() {
        assert!(TreeDiffDelegate::from_config(&TreeDiffConfig::default()).is_none());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str, mode: u32) -> TreeDiffDelegate {
            let path = dir.join("tree-diff.sh");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))
                .expect("chmod");
            TreeDiffDelegate::from_config(&TreeDiffConfig {
                script: Some(path),
                timeout_secs: 5,
            })
            .expect("script configured")
        }

        #[test]
        fn test_run_parses_report() {
            let dir = tempfile::tempdir().expect("create temp dir");
            let delegate = script(
                dir.path(),
                "printf '%s\\n' '=== added' 'x.c' '=== modified' 'y.py'",
                0o755,
            );
            let delta = delegate
                .run(Path::new("/old"), Path::new("/new"))
                .expect("run delegate");
            assert!(delta.added.contains(Path::new("x.c")));
            assert!(delta.modified.contains(Path::new("y.py")));
        }

        #[test]
        fn test_non_executable_is_config_error() {
            let dir = tempfile::tempdir().expect("create temp dir");
            let delegate = script(dir.path(), "exit 0", 0o644);
            assert!(matches!(
                delegate.run(Path::new("/old"), Path::new("/new")),
                Err(DiffSbomError::Config(_))
            ));
        }

        #[test]
        fn test_failure_is_fatal() {
            let dir = tempfile::tempdir().expect("create temp dir");
            let delegate = script(dir.path(), "echo broken >&2\nexit 3", 0o755);
            match delegate.run(Path::new("/old"), Path::new("/new")) {
                Err(DiffSbomError::Tool {
                    source: ToolErrorKind::NonZeroExit { stderr, code, .. },
                    ..
                }) => {
                    assert_eq!(stderr, "broken");
                    assert_eq!(code, "3");
                }
                other => panic!("Expected NonZeroExit, got {other:?}"),
            }
        }
    }
}
