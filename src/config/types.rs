//! Configuration types for diffsbom runs.
//!
//! `AppConfig` holds everything that may come from a config file; `RunConfig`
//! adds the per-invocation arguments taken from the command line.

use crate::extract::Dialect;
use crate::sbom::{SbomFormat, ScannerTool};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_DIFF_PROGRAM, DEFAULT_DIFF_TIMEOUT_SECS, DEFAULT_SCAN_TIMEOUT_SECS,
    DEFAULT_SOURCE_EXTENSIONS, DEFAULT_TREE_DIFF_TIMEOUT_SECS,
};

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Source-file allow-list used by the tree comparator
    pub filter: FilterConfig,
    /// External structural diff tool
    pub structural_diff: StructuralDiffConfig,
    /// Optional external tree-diff delegate
    pub tree_diff: TreeDiffConfig,
    /// Diff extraction dialect
    pub extract: ExtractConfig,
    /// Function definition markers
    pub functions: FunctionsConfig,
    /// SBOM generator settings
    pub sbom: SbomConfig,
    /// Where artifacts are written
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Replace the source extension allow-list.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.filter.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the structural diff program.
    pub fn diff_program(mut self, program: impl Into<String>) -> Self {
        self.config.structural_diff.program = program.into();
        self
    }

    /// Set the structural diff timeout.
    pub const fn diff_timeout_secs(mut self, secs: u64) -> Self {
        self.config.structural_diff.timeout_secs = secs;
        self
    }

    /// Delegate directory comparison to an external script.
    pub fn tree_diff_script(mut self, script: Option<PathBuf>) -> Self {
        self.config.tree_diff.script = script;
        self
    }

    /// Parse structural diff output as the compressed/archive dialect.
    pub const fn compressed(mut self, compressed: bool) -> Self {
        self.config.extract.compressed = compressed;
        self
    }

    /// Replace the function marker table.
    pub fn markers(mut self, markers: Vec<MarkerConfig>) -> Self {
        self.config.functions.markers = markers;
        self
    }

    /// Override the scanner executable.
    pub fn sbom_program(mut self, program: Option<PathBuf>) -> Self {
        self.config.sbom.program = program;
        self
    }

    /// Set the SBOM generator timeout.
    pub const fn scan_timeout_secs(mut self, secs: u64) -> Self {
        self.config.sbom.timeout_secs = secs;
        self
    }

    /// Set the artifact output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.dir = dir.into();
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Command-specific Configuration Types
// ============================================================================

/// Which source the upgrade record comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Compute the record by comparing the old and new paths
    Diff,
    /// Load a prepared record from `version_upgrade.txt` next to the new path
    User,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Diff => write!(f, "diff"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// diff or user
    pub mode: RunMode,
    /// SBOM output format
    pub format: SbomFormat,
    /// Scanner producing the base SBOM
    pub scanner: ScannerTool,
    /// Old version of the artifact
    pub old: PathBuf,
    /// New version of the artifact (also the scan target)
    pub new: PathBuf,
    /// Settings shared with config files
    pub app: AppConfig,
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Source-file filter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// File extensions (without the dot) that are compared
    pub extensions: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
        }
    }
}

/// Structural diff tool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralDiffConfig {
    /// Program name or path
    pub program: String,
    /// Per file pair timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StructuralDiffConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_DIFF_PROGRAM.to_string(),
            timeout_secs: DEFAULT_DIFF_TIMEOUT_SECS,
        }
    }
}

/// Tree-diff delegate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeDiffConfig {
    /// Script taking `(old_dir, new_dir)`; the built-in walk is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
    /// Timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TreeDiffConfig {
    fn default() -> Self {
        Self {
            script: None,
            timeout_secs: DEFAULT_TREE_DIFF_TIMEOUT_SECS,
        }
    }
}

/// Diff extraction configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Structural diff output comes from compressed archives
    pub compressed: bool,
    /// Explicit dialect, for diff programs that print bare unified diffs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
}

impl ExtractConfig {
    /// Dialect to extract with; an explicit `dialect` wins over `compressed`.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
            .unwrap_or_else(|| Dialect::from_compressed(self.compressed))
    }
}

/// One function-definition marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Label, usually the language
    pub name: String,
    /// Regex matched against hunk-header context; the whole match is the identifier
    pub pattern: String,
}

impl MarkerConfig {
    /// Create a marker entry.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// Function classifier configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionsConfig {
    /// Markers tried in order
    pub markers: Vec<MarkerConfig>,
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            markers: vec![MarkerConfig::new("python", r"def\s+[a-zA-Z0-9_]+")],
        }
    }
}

/// SBOM generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SbomConfig {
    /// Use this executable instead of the scanner's default program name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<PathBuf>,
    /// Timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SbomConfig {
    fn default() -> Self {
        Self {
            program: None,
            timeout_secs: DEFAULT_SCAN_TIMEOUT_SECS,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving every artifact
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}
