//! Pipeline stages for an upgrade run.
//!
//! A run is: input checks, then either the diff stage (compare the two
//! versions) or the user stage (load a prepared record), then the SBOM stage.
//! Stages return typed [`DiffSbomError`](crate::error::DiffSbomError)s; the
//! CLI handlers sequence them and add context.

mod diff_stage;
mod input;
mod sbom_stage;
mod user_stage;

pub use diff_stage::{compute_upgrade, DiffOutcome};
pub use input::{validate_input_shape, validate_target, InputShape};
pub use sbom_stage::augment_sbom;
pub use user_stage::{load_user_upgrade, sidecar_path};

/// Process exit codes
pub mod exit_codes {
    /// The augmented SBOM was written
    pub const SUCCESS: i32 = 0;
    /// Any configuration, tool, input or write failure
    pub const ERROR: i32 = 1;
}
