//! Source-file allow-list.

use crate::config::FilterConfig;
use std::collections::BTreeSet;
use std::path::Path;

/// Decides which files take part in a comparison, by extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilter {
    extensions: BTreeSet<String>,
}

impl SourceFilter {
    /// Build from extensions given with or without a leading dot.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(&config.extensions)
    }

    /// True when `path` has an allowed extension (case-insensitive).
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.contains(&e.to_lowercase()))
    }
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}
