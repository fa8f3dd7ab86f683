//! The extraction state machine.

use super::line::{is_unified_hunk_header, LineClass};
use serde::{Deserialize, Serialize};

/// Shape of the structural diff output being filtered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// diffoscope output for plain files and directories
    #[default]
    Plain,
    /// diffoscope output for compressed archives, with renamed members
    Compressed,
    /// Bare unified diff (`diff -u`, `git diff`)
    Unified,
}

impl Dialect {
    /// diffoscope dialect for the `compressed` switch.
    #[must_use]
    pub const fn from_compressed(compressed: bool) -> Self {
        if compressed {
            Self::Compressed
        } else {
            Self::Plain
        }
    }
}

/// Where the machine is between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractState {
    /// Outside any hunk; content is dropped
    Idle,
    /// Inside a hunk; content is emitted
    Recording,
    /// A member rename pair was seen and waits for its first hunk
    PendingRename,
}

/// Line-at-a-time diff extractor.
///
/// Feed lines in order with [`feed`](Self::feed) and collect the result with
/// [`finish`](Self::finish). Emitted lines keep their relative order.
#[derive(Debug)]
pub struct DiffExtractor {
    dialect: Dialect,
    state: ExtractState,
    pending: Vec<String>,
    output: Vec<String>,
}

impl DiffExtractor {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            state: ExtractState::Idle,
            pending: Vec::new(),
            output: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> ExtractState {
        self.state
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Process one line.
    pub fn feed(&mut self, line: &str) {
        match self.dialect {
            Dialect::Plain => self.step_plain(LineClass::of(line)),
            Dialect::Compressed => self.step_compressed(LineClass::of(line)),
            Dialect::Unified => self.step_unified(line),
        }
    }

    /// Emitted lines. A rename pair never followed by a hunk is dropped.
    #[must_use]
    pub fn finish(self) -> Vec<String> {
        self.output
    }

    fn emit(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn step_plain(&mut self, class: LineClass<'_>) {
        match class {
            LineClass::FileHeader(text) => {
                self.emit(text);
                self.state = ExtractState::Idle;
            }
            LineClass::HunkHeader(text) => {
                self.emit(text);
                self.state = ExtractState::Recording;
            }
            LineClass::RenameOld(_) => self.state = ExtractState::Idle,
            LineClass::RenameNew(_) | LineClass::IdenticalSentinel => {}
            LineClass::Content(text) => {
                if self.state == ExtractState::Recording {
                    self.emit(text);
                }
            }
        }
    }

    fn step_compressed(&mut self, class: LineClass<'_>) {
        match class {
            LineClass::HunkHeader(text) => {
                self.output.append(&mut self.pending);
                self.emit(text);
                self.state = ExtractState::Recording;
            }
            LineClass::RenameOld(text) => {
                self.pending.clear();
                self.pending.push(text.to_string());
                self.state = ExtractState::PendingRename;
            }
            LineClass::RenameNew(text) => {
                self.pending.push(text.to_string());
                self.state = ExtractState::PendingRename;
            }
            LineClass::IdenticalSentinel => {
                self.pending.clear();
                self.state = ExtractState::Idle;
            }
            // Top-level headers belong to the archive itself, not a member.
            LineClass::FileHeader(text) | LineClass::Content(text) => {
                if self.state == ExtractState::Recording {
                    self.emit(text);
                }
            }
        }
    }

    fn step_unified(&mut self, line: &str) {
        if is_unified_hunk_header(line) {
            self.emit(line);
            self.state = ExtractState::Recording;
            return;
        }
        if self.state != ExtractState::Recording {
            return;
        }
        if line.starts_with('+') || line.starts_with('-') {
            self.emit(line);
        } else if !line.trim().is_empty() {
            self.state = ExtractState::Idle;
        }
    }
}
