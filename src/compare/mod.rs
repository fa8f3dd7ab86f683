//! Tree comparison.
//!
//! Partitions the source files of two artifact versions into added, removed
//! and modified sets and attaches a structural diff to every modified file.
//! The partition comes from a built-in recursive walk or, when configured,
//! from an external [`TreeDiffDelegate`] script.

mod delegate;
mod filter;
mod tree;

pub use delegate::{parse_delegate_output, TreeDiffDelegate};
pub use filter::SourceFilter;
pub use tree::TreeComparator;
