//! Shared utilities.

mod path;

pub use path::{absolute_path, absolute_path_string};
