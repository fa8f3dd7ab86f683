//! Configuration module for diffsbom.
//!
//! This module provides:
//! - Type-safe configuration structures with defaults
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//!
//! # Configuration File
//!
//! Place a `.diffsbom.yaml` file in the working directory or
//! `~/.config/diffsbom/`:
//!
//! ```yaml
//! filter:
//!   extensions: [c, h, py]
//! structural_diff:
//!   timeout_secs: 60
//! functions:
//!   markers:
//!     - name: python
//!       pattern: 'def\s+[a-zA-Z0-9_]+'
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    ADDED_FUNCTIONS_FILE, DEFAULT_DIFF_PROGRAM, DEFAULT_DIFF_TIMEOUT_SECS,
    DEFAULT_SCAN_TIMEOUT_SECS, DEFAULT_SOURCE_EXTENSIONS, DEFAULT_TREE_DIFF_TIMEOUT_SECS,
    DIFF_LOG_FILE, FILTERED_DIFF_FILE, MODIFIED_FUNCTIONS_FILE, REMOVED_FUNCTIONS_FILE,
    UPGRADE_SIDECAR_FILE,
};
pub use file::{discover_config_file, load_config_file, load_or_default, ConfigFileError};
pub use types::{
    AppConfig, AppConfigBuilder, ExtractConfig, FilterConfig, FunctionsConfig, MarkerConfig,
    OutputConfig, RunConfig, RunMode, SbomConfig, StructuralDiffConfig, TreeDiffConfig,
};
pub use validation::{ConfigError, Validatable};
