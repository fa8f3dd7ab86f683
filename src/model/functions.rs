//! Function-level change classification results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a function's changed lines are distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionChange {
    /// Only `+` lines
    Added,
    /// Only `-` lines
    Removed,
    /// Both `+` and `-` lines
    Modified,
}

impl FunctionChange {
    /// Classify from the presence of added and removed lines.
    ///
    /// Returns `None` when neither is present.
    #[must_use]
    pub const fn from_polarity(has_added: bool, has_removed: bool) -> Option<Self> {
        match (has_added, has_removed) {
            (true, false) => Some(Self::Added),
            (false, true) => Some(Self::Removed),
            (true, true) => Some(Self::Modified),
            (false, false) => None,
        }
    }
}

/// Function identifiers grouped by change kind. Each identifier is in at most one set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionChangeSet {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub modified: BTreeSet<String>,
}

impl FunctionChangeSet {
    /// Record `name` under `change`.
    pub fn insert(&mut self, name: String, change: FunctionChange) {
        match change {
            FunctionChange::Added => self.added.insert(name),
            FunctionChange::Removed => self.removed.insert(name),
            FunctionChange::Modified => self.modified.insert(name),
        };
    }

    /// Which set `name` is in, if any.
    #[must_use]
    pub fn change_of(&self, name: &str) -> Option<FunctionChange> {
        if self.added.contains(name) {
            Some(FunctionChange::Added)
        } else if self.removed.contains(name) {
            Some(FunctionChange::Removed)
        } else if self.modified.contains(name) {
            Some(FunctionChange::Modified)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}
