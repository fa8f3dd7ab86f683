//! **Augment SBOMs with what changed between two versions of an artifact.**
//!
//! `diffsbom` compares an old and a new version of a source tree (or a single
//! source file), records which files were added, deleted and modified, keeps
//! a structural diff for each modified file, and works out which functions
//! those diffs touch. The resulting upgrade record is spliced into an SBOM
//! generated for the new version by an external scanner (syft or trivy), under
//! a single `upgrade` key.
//!
//! ## Modules
//!
//! - **[`compare`]**: [`TreeComparator`] partitions the source files of two
//!   trees and attaches structural diffs to the modified ones.
//! - **[`structural`]**: runs the external structural diff tool (diffoscope by
//!   default), degrading failures to placeholder lines.
//! - **[`extract`]**: state machine reducing diff tool output to headers and
//!   changed lines.
//! - **[`functions`]**: classifies changed functions as added, removed or
//!   modified from hunk-header context.
//! - **[`sbom`]**: scanner invocation and the `upgrade` merge.
//! - **[`pipeline`]**: the stages of a run; [`cli`] sequences them.
//!
//! ## Comparing two trees
//!
//! ```no_run
//! use std::path::Path;
//! use diffsbom::compare::{SourceFilter, TreeComparator};
//! use diffsbom::config::StructuralDiffConfig;
//! use diffsbom::structural::StructuralDiffInvoker;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let invoker = StructuralDiffInvoker::new(&StructuralDiffConfig::default(), None);
//!     let mut comparator = TreeComparator::new(SourceFilter::default(), invoker);
//!
//!     let record = comparator.compare_directories(Path::new("app-1.0"), Path::new("app-1.1"))?;
//!     for diff in &record.file_changes.modified_files {
//!         println!("{}: {} diff lines", diff.file, diff.change.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Classifying function changes
//!
//! ```
//! use diffsbom::config::FunctionsConfig;
//! use diffsbom::extract::{extract_diff, Dialect};
//! use diffsbom::functions::FunctionClassifier;
//!
//! let raw = ["--- a/m.py", "+++ b/m.py", "│ @@ -1,2 +1,2 @@ def f():", "│ -    return 1", "│ +    return 2"];
//! let filtered = extract_diff(raw, Dialect::Plain);
//!
//! let classifier = FunctionClassifier::from_config(&FunctionsConfig::default()).unwrap();
//! let changes = classifier.classify_functions(&filtered);
//! assert!(changes.modified.contains("def f"));
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // `old`/`new` pairs are everywhere
    clippy::similar_names
)]

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod extract;
pub mod functions;
pub mod model;
pub mod pipeline;
pub mod sbom;
pub mod structural;
pub mod tools;
pub mod utils;

// Re-export main types for convenience
pub use compare::{SourceFilter, TreeComparator};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, RunConfig, RunMode, Validatable};
pub use error::{DiffSbomError, ErrorContext, Result};
pub use extract::{extract_diff, Dialect};
pub use functions::FunctionClassifier;
pub use model::{DiffRecord, FunctionChangeSet, UpgradeRecord, UpgradeSection};
pub use sbom::{SbomFormat, ScannerTool};
