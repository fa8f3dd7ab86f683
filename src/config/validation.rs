//! Configuration validation for diffsbom.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{
    AppConfig, FilterConfig, FunctionsConfig, OutputConfig, SbomConfig, StructuralDiffConfig,
    TreeDiffConfig,
};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.filter.validate());
        errors.extend(self.structural_diff.validate());
        errors.extend(self.tree_diff.validate());
        errors.extend(self.functions.validate());
        errors.extend(self.sbom.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for FilterConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.extensions.is_empty() {
            errors.push(ConfigError::new(
                "filter.extensions",
                "At least one source extension is required",
            ));
        }
        for ext in &self.extensions {
            if ext.is_empty() || ext.contains('/') {
                errors.push(ConfigError::new(
                    "filter.extensions",
                    format!("Invalid extension '{ext}'"),
                ));
            }
        }
        errors
    }
}

impl Validatable for StructuralDiffConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.program.trim().is_empty() {
            errors.push(ConfigError::new(
                "structural_diff.program",
                "Program must not be empty",
            ));
        }
        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "structural_diff.timeout_secs",
                "Timeout must be greater than 0",
            ));
        }
        errors
    }
}

impl Validatable for TreeDiffConfig {
    fn validate(&self) -> Vec<ConfigError> {
        if self.timeout_secs == 0 {
            vec![ConfigError::new(
                "tree_diff.timeout_secs",
                "Timeout must be greater than 0",
            )]
        } else {
            Vec::new()
        }
    }
}

impl Validatable for FunctionsConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for marker in &self.markers {
            if let Err(e) = regex::Regex::new(&marker.pattern) {
                errors.push(ConfigError::new(
                    "functions.markers",
                    format!("Invalid pattern for '{}': {e}", marker.name),
                ));
            }
        }
        errors
    }
}

impl Validatable for SbomConfig {
    fn validate(&self) -> Vec<ConfigError> {
        if self.timeout_secs == 0 {
            vec![ConfigError::new(
                "sbom.timeout_secs",
                "Timeout must be greater than 0",
            )]
        } else {
            Vec::new()
        }
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        if !self.dir.as_os_str().is_empty() && !self.dir.is_dir() {
            vec![ConfigError::new(
                "output.dir",
                format!("Output directory does not exist: {}", self.dir.display()),
            )]
        } else {
            Vec::new()
        }
    }
}
