//! Default values for diffsbom configuration.

/// Source extensions compared by default (without the leading dot).
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "h", "hpp", "py"];

/// Structural diff program looked up on `PATH`.
pub const DEFAULT_DIFF_PROGRAM: &str = "diffoscope";

/// Per file pair structural diff timeout.
pub const DEFAULT_DIFF_TIMEOUT_SECS: u64 = 30;

/// Tree-diff delegate timeout.
pub const DEFAULT_TREE_DIFF_TIMEOUT_SECS: u64 = 120;

/// SBOM generation timeout. Full dependency scans are slow.
pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 600;

/// Sidecar read in user mode, located next to the new path.
pub const UPGRADE_SIDECAR_FILE: &str = "version_upgrade.txt";

/// Append-mode log of raw structural diff output.
pub const DIFF_LOG_FILE: &str = "diff_output.txt";

/// Normalized diff consumed by the function classifier.
pub const FILTERED_DIFF_FILE: &str = "filtered_diff.txt";

/// Function classification artifacts.
pub const ADDED_FUNCTIONS_FILE: &str = "added_functions.txt";
pub const REMOVED_FUNCTIONS_FILE: &str = "removed_functions.txt";
pub const MODIFIED_FUNCTIONS_FILE: &str = "modified_functions.txt";
