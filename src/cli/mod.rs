//! CLI command handlers.
//!
//! Handlers are invoked by main.rs once arguments and configuration have been
//! merged, and are testable without a process boundary.

mod run;

pub use run::run_upgrade;

// Re-export config types used by handlers
pub use crate::config::{RunConfig, RunMode};
