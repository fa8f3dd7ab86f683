//! Structural diff invocation.
//!
//! The diff itself is computed by an external tool (diffoscope by default).
//! This module only runs it, degrades failures to placeholder lines and keeps
//! the raw output in a per-run [`DiffLog`].

mod invoker;
mod log;

pub use invoker::{is_placeholder, StructuralDiffInvoker, ERROR_TAG, WARN_TAG};
pub use log::DiffLog;
