//! Function-change classification over extracted diff lines.

use super::markers::MarkerTable;
use crate::config::FunctionsConfig;
use crate::error::Result;
use crate::model::{FunctionChange, FunctionChangeSet};
use std::collections::BTreeMap;

/// Which kinds of changed lines were seen for one identifier.
#[derive(Debug, Clone, Copy, Default)]
struct Polarity {
    added: bool,
    removed: bool,
}

/// Attributes changed lines to the function named in their hunk header.
///
/// Lines are attributed to the most recent matching hunk header, so changes
/// in a nested function count towards the enclosing one when the diff tool
/// names the outer function in the header.
#[derive(Debug, Clone)]
pub struct FunctionClassifier {
    markers: MarkerTable,
}

impl FunctionClassifier {
    #[must_use]
    pub fn new(markers: MarkerTable) -> Self {
        Self { markers }
    }

    pub fn from_config(config: &FunctionsConfig) -> Result<Self> {
        Ok(Self::new(MarkerTable::compile(&config.markers)?))
    }

    /// Classify every identifier that has at least one changed line.
    ///
    /// Changes for the same identifier in different hunks are combined, so
    /// each identifier lands in exactly one set.
    ///
    /// A `--- ` line directly followed by a `+++ ` line is a file header pair
    /// and closes the current hunk. Either line on its own is a changed line,
    /// so a removed `-- x` immediately followed by an added `++ y` is the one
    /// shape still read as a header.
    pub fn classify_functions<I, S>(&self, lines: I) -> FunctionChangeSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: BTreeMap<String, Polarity> = BTreeMap::new();
        let mut current: Option<String> = None;

        let mut lines = lines.into_iter().peekable();
        while let Some(owned) = lines.next() {
            let line = owned.as_ref();
            if line.starts_with("@@") {
                current = self.markers.identifier(line).map(str::to_string);
            } else if line.starts_with("--- ")
                && lines.peek().is_some_and(|next| next.as_ref().starts_with("+++ "))
            {
                lines.next();
                current = None;
            } else if let Some(name) = &current {
                if line.starts_with('+') {
                    seen.entry(name.clone()).or_default().added = true;
                } else if line.starts_with('-') {
                    seen.entry(name.clone()).or_default().removed = true;
                }
            }
        }

        let mut set = FunctionChangeSet::default();
        for (name, polarity) in seen {
            if let Some(change) = FunctionChange::from_polarity(polarity.added, polarity.removed) {
                set.insert(name, change);
            }
        }
        tracing::debug!(
            "Classified {} functions: {} added, {} removed, {} modified",
            set.len(),
            set.added.len(),
            set.removed.len(),
            set.modified.len()
        );
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> FunctionClassifier {
        FunctionClassifier::from_config(&FunctionsConfig::default()).expect("classifier")
    }

    #[test]
    fn test_modified_function() {
        let set = classifier().classify_functions([
            "--- /old/m.py",
            "+++ /new/m.py",
            "@@ -1,2 +1,2 @@ def f():",
            "-    return 1",
            "+    return 2",
        ]);
        assert_eq!(set.change_of("def f"), Some(FunctionChange::Modified));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_added_and_removed() {
        let set = classifier().classify_functions([
            "@@ -3 +3,2 @@ def grow():",
            "+    extra()",
            "@@ -9,2 +10 @@ def shrink():",
            "-    dropped()",
        ]);
        assert_eq!(set.change_of("def grow"), Some(FunctionChange::Added));
        assert_eq!(set.change_of("def shrink"), Some(FunctionChange::Removed));
    }

    #[test]
    fn test_polarity_combined_across_hunks() {
        let set = classifier().classify_functions([
            "@@ -1 +1,2 @@ def f():",
            "+    a()",
            "@@ -20,2 +21 @@ def f():",
            "-    b()",
        ]);
        assert_eq!(set.change_of("def f"), Some(FunctionChange::Modified));
        assert!(set.added.is_empty());
        assert!(set.removed.is_empty());
    }

    #[test]
    fn test_unmatched_header_drops_lines() {
        let set = classifier().classify_functions([
            "@@ -1 +1 @@ def f():",
            "+    a()",
            "@@ -30 +30 @@",
            "-    orphan()",
        ]);
        assert_eq!(set.change_of("def f"), Some(FunctionChange::Added));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_file_header_closes_context() {
        let set = classifier().classify_functions([
            "@@ -1 +1 @@ def f():",
            "--- /old/other.py",
            "+++ /new/other.py",
            "+stray",
        ]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_changed_lines_resembling_headers_are_counted() {
        let set = classifier().classify_functions([
            "@@ -1,3 +1,3 @@ def f():",
            "--- old banner",
            "+new banner",
            "@@ -8 +8 @@ def g():",
            "+++ extra banner",
        ]);
        assert_eq!(set.change_of("def f"), Some(FunctionChange::Modified));
        assert_eq!(set.change_of("def g"), Some(FunctionChange::Added));
    }

    #[test]
    fn test_empty_hunk_has_no_entry() {
        let set = classifier().classify_functions(["@@ -1 +1 @@ def f():", " context only"]);
        assert!(set.is_empty());
    }
}
