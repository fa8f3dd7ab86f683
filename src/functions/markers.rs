//! Function-definition markers.

use crate::config::MarkerConfig;
use crate::error::{DiffSbomError, Result};
use regex::Regex;

/// Compiled marker regexes, tried in configuration order.
#[derive(Debug, Clone)]
pub struct MarkerTable {
    markers: Vec<(String, Regex)>,
}

impl MarkerTable {
    /// Compile every marker, anchoring it at the start of the hunk context.
    pub fn compile(markers: &[MarkerConfig]) -> Result<Self> {
        let markers = markers
            .iter()
            .map(|m| {
                Regex::new(&format!("^(?:{})", m.pattern))
                    .map(|re| (m.name.clone(), re))
                    .map_err(|e| {
                        DiffSbomError::config(format!(
                            "function marker '{}' has an invalid pattern: {e}",
                            m.name
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { markers })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Identifier named by a hunk header's trailing context, if any marker matches.
    ///
    /// For `@@ -1,2 +1,2 @@ def f():` with the Python marker this is `def f`.
    #[must_use]
    pub fn identifier<'a>(&self, header: &'a str) -> Option<&'a str> {
        let context = hunk_context(header)?;
        self.markers
            .iter()
            .find_map(|(_, re)| re.find(context))
            .map(|m| m.as_str())
    }
}

/// Text after the closing `@@` of a hunk header, leading whitespace removed.
fn hunk_context(header: &str) -> Option<&str> {
    let rest = header.strip_prefix("@@")?;
    let close = rest.find("@@")?;
    Some(rest[close + 2..].trim_start())
}
