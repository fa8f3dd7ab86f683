//! Unified error types for diffsbom.
//!
//! Errors fall into four groups: configuration problems (unknown choices,
//! missing tools), fatal tool failures, input data that cannot be parsed,
//! and unsupported input shapes. Degraded per-file diffs are not errors and
//! never reach this module.

use std::path::PathBuf;
use thiserror::Error;

/// Maximum number of characters of offending output quoted in an error.
pub const PREVIEW_CHARS: usize = 200;

/// Main error type for diffsbom operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DiffSbomError {
    /// Configuration errors, carrying a remediation message
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A required external tool failed
    #[error("External tool failed: {context}")]
    Tool {
        context: String,
        #[source]
        source: ToolErrorKind,
    },

    /// Input data could not be parsed
    #[error("Failed to parse input: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Old and new paths are not both files or both directories
    #[error(
        "Both paths must be either files or directories: {} and {}",
        old.display(),
        new.display()
    )]
    InputShape { old: PathBuf, new: PathBuf },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Failure modes of a fatal external tool invocation
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ToolErrorKind {
    #[error("'{program}' could not be started: {message}")]
    Spawn { program: String, message: String },

    #[error("'{program}' timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },

    #[error("'{program}' exited with status {code}: {stderr}")]
    NonZeroExit {
        program: String,
        code: String,
        stderr: String,
    },
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON ({message}); output starts with: {preview:?}")]
    InvalidJson { message: String, preview: String },

    #[error("Expected a JSON object; output starts with: {preview:?}")]
    NotAnObject { preview: String },

    #[error("Malformed tree-diff output: {0}")]
    MalformedDelegateOutput(String),
}

/// Convenient Result type for diffsbom operations
pub type Result<T> = std::result::Result<T, DiffSbomError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl DiffSbomError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a tool error with context
    pub fn tool(context: impl Into<String>, source: ToolErrorKind) -> Self {
        Self::Tool {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid-JSON parse error quoting the start of the offending text
    pub fn invalid_json(
        context: impl Into<String>,
        err: &serde_json::Error,
        content: &str,
    ) -> Self {
        Self::parse(
            context,
            ParseErrorKind::InvalidJson {
                message: err.to_string(),
                preview: preview(content),
            },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Truncate `content` to at most [`PREVIEW_CHARS`] characters.
#[must_use]
pub fn preview(content: &str) -> String {
    let trimmed = content.trim();
    let mut out: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    if trimmed.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to whatever context the error already
/// carries, so nested calls read outermost first:
///
/// ```ignore
/// use diffsbom::error::ErrorContext;
///
/// let record = comparator
///     .compare_directories(old, new)
///     .with_context(|| format!("comparing {}", old.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<DiffSbomError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: DiffSbomError, new_ctx: &str) -> DiffSbomError {
    match err {
        DiffSbomError::Tool {
            context: existing,
            source,
        } => DiffSbomError::Tool {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DiffSbomError::Parse {
            context: existing,
            source,
        } => DiffSbomError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DiffSbomError::Io {
            path,
            message,
            source,
        } => DiffSbomError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        DiffSbomError::Config(msg) => DiffSbomError::Config(chain_context(new_ctx, &msg)),
        DiffSbomError::Validation(msg) => {
            DiffSbomError::Validation(chain_context(new_ctx, &msg))
        }
        other @ DiffSbomError::InputShape { .. } => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
