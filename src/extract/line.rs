//! Classification of structural diff output lines.

use regex::Regex;
use std::sync::LazyLock;

static BOXED_HUNK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^│ @@ .+ @@").expect("static regex"));
static UNIFIED_HUNK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@@ .*@@").expect("static regex"));
static FILE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-|\+){3}").expect("static regex"));
static RENAME_OLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^│   -{3} ").expect("static regex"));
static RENAME_NEW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^├── \+{3} ").expect("static regex"));

/// diffoscope's note that two archive members only differ by name.
pub const IDENTICAL_SENTINEL: &str = "│┄ Files identical despite different names";

/// What a single diffoscope output line is, with decoration already stripped
/// from the carried text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// `--- old` / `+++ new` at column 0
    FileHeader(&'a str),
    /// `│ @@ -a,b +c,d @@ ...`
    HunkHeader(&'a str),
    /// `│   --- old-member` inside an archive
    RenameOld(&'a str),
    /// `├── +++ new-member` inside an archive
    RenameNew(&'a str),
    /// Archive members identical apart from their names
    IdenticalSentinel,
    /// Anything else
    Content(&'a str),
}

impl<'a> LineClass<'a> {
    /// Classify one line of diffoscope output.
    #[must_use]
    pub fn of(line: &'a str) -> Self {
        if line.trim_end() == IDENTICAL_SENTINEL {
            Self::IdenticalSentinel
        } else if BOXED_HUNK_HEADER.is_match(line) {
            Self::HunkHeader(strip_box(line))
        } else if RENAME_OLD.is_match(line) {
            Self::RenameOld(line.trim_start_matches('│').trim_start())
        } else if RENAME_NEW.is_match(line) {
            Self::RenameNew(line.trim_start_matches("├── "))
        } else if FILE_HEADER.is_match(line) {
            Self::FileHeader(line)
        } else {
            Self::Content(strip_box(line))
        }
    }
}

/// True for a bare unified-diff hunk header.
#[must_use]
pub fn is_unified_hunk_header(line: &str) -> bool {
    UNIFIED_HUNK_HEADER.is_match(line)
}

/// Remove one level of diffoscope box decoration.
fn strip_box(line: &str) -> &str {
    line.strip_prefix("│ ")
        .or_else(|| line.strip_prefix('│'))
        .unwrap_or(line)
}
