//! Data model shared by the comparison pipeline and the SBOM merger.
//!
//! [`UpgradeRecord`] is the canonical `upgrade` body; its serde layout is the
//! on-disk format consumers of the augmented SBOM rely on:
//!
//! ```json
//! {"file_changes": {"old_version": "...", "New file": [], "Deleted file": [],
//!                   "Modified file": [{"file": "...", "change": ["..."]}]}}
//! ```

mod functions;
mod upgrade;

pub use functions::{FunctionChange, FunctionChangeSet};
pub use upgrade::{
    DiffRecord, FileChanges, FileSetDelta, UpgradeRecord, UpgradeSection, UPGRADE_KEY,
};
