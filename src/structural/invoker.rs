//! Runs the external structural diff tool on one file pair.

use super::log::DiffLog;
use crate::config::StructuralDiffConfig;
use crate::error::preview;
use crate::tools::{find_executable, ToolCommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of the placeholder emitted when the tool is not installed.
pub const WARN_TAG: &str = "[WARN]";

/// Prefix of the placeholder emitted when the tool failed for a file pair.
pub const ERROR_TAG: &str = "[ERROR]";

/// Exit codes meaning "ran fine": 0 for identical, 1 for differences found.
const DIFF_OK_CODES: [i32; 2] = [0, 1];

/// Structural diff invoker with its run-scoped log sink.
#[derive(Debug)]
pub struct StructuralDiffInvoker {
    program: PathBuf,
    timeout: Duration,
    log: Option<DiffLog>,
}

impl StructuralDiffInvoker {
    /// Create an invoker writing successful outputs to `log`.
    #[must_use]
    pub fn new(config: &StructuralDiffConfig, log: Option<DiffLog>) -> Self {
        Self {
            program: PathBuf::from(&config.program),
            timeout: Duration::from_secs(config.timeout_secs),
            log,
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    /// Diff `old` against `new`, returning the tool's stdout as lines.
    ///
    /// Never fails: a missing tool, spawn error, timeout or unexpected exit
    /// status yields exactly one tagged placeholder line.
    pub fn run_structural_diff(&mut self, old: &Path, new: &Path) -> Vec<String> {
        let name = self.program_name();
        let Some(program) = find_executable(&self.program) else {
            tracing::warn!("{name} not found; recording placeholder for {}", new.display());
            return vec![format!(
                "{WARN_TAG} {name} not found; detailed diff unavailable"
            )];
        };

        let command = ToolCommand::new(program, self.timeout).args([
            old.to_string_lossy().into_owned(),
            new.to_string_lossy().into_owned(),
        ]);

        let result = match command.run() {
            Ok(result) => result,
            Err(e) => return self.failure(new, &e.to_string()),
        };

        if result.timed_out {
            return self.failure(
                new,
                &format!("timed out after {}s", self.timeout.as_secs()),
            );
        }
        if !result.exit_code.is_some_and(|c| DIFF_OK_CODES.contains(&c)) {
            return self.failure(
                new,
                &format!(
                    "exited with status {}: {}",
                    result.exit_code_display(),
                    preview(&result.stderr)
                ),
            );
        }

        if let Some(log) = self.log.as_mut() {
            if let Err(e) = log.append(&result.stdout) {
                tracing::warn!("Failed to append to diff log {}: {}", log.path().display(), e);
            }
        }

        result.stdout.lines().map(str::to_string).collect()
    }

    fn failure(&self, file: &Path, reason: &str) -> Vec<String> {
        let name = self.program_name();
        tracing::warn!("{name} failed for {}: {}", file.display(), reason);
        vec![format!("{ERROR_TAG} Failed to run {name}: {reason}")]
    }

    /// Release the log sink, flushing it.
    pub fn finish(self) -> std::io::Result<()> {
        match self.log {
            Some(log) => log.close(),
            None => Ok(()),
        }
    }
}

/// True when `change` is a single placeholder line rather than tool output.
#[must_use]
pub fn is_placeholder(change: &[String]) -> bool {
    matches!(change, [only] if only.starts_with(WARN_TAG) || only.starts_with(ERROR_TAG))
}
