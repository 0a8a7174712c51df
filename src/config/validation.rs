//! Configuration validation for api-evolution.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{
    AnalyzeConfig, AppConfig, BehaviorConfig, CompareConfig, FilterConfig, LifecycleConfig,
    LifecycleSource, OutputConfig, SelectionSettings, SummaryConfig, VersionsConfig,
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
        errors.extend(self.selection.validate());
        errors.extend(self.filtering.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for SelectionSettings {
    fn validate(&self) -> Vec<ConfigError> {
        match self.max_versions {
            Some(0) => vec![ConfigError::new(
                "selection.max_versions",
                "must be at least 1",
            )],
            _ => Vec::new(),
        }
    }
}

impl Validatable for FilterConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(pattern) = &self.name_pattern {
            if let Err(e) = regex::Regex::new(pattern) {
                errors.push(ConfigError::new(
                    "filtering.name_pattern",
                    format!("Invalid regex '{pattern}': {e}"),
                ));
            }
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(file_path) = &self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }
        if self.max_items == Some(0) {
            errors.push(ConfigError::new("output.max_items", "must be at least 1"));
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        if self.fail_on_breaking && !self.calculate_changes {
            return vec![ConfigError::new(
                "behavior.fail_on_breaking",
                "requires calculate_changes; no changes would be checked",
            )];
        }
        Vec::new()
    }
}

fn validate_package(package: &str) -> Vec<ConfigError> {
    if package.trim().is_empty() {
        return vec![ConfigError::new("package", "package name cannot be empty")];
    }
    Vec::new()
}

impl Validatable for AnalyzeConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.app.validate();
        errors.extend(validate_package(&self.package));
        if let Err(e) = self.selection.strategy() {
            errors.push(ConfigError::new("selection", e.to_string()));
        }
        errors
    }
}

impl Validatable for CompareConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.app.validate();
        errors.extend(validate_package(&self.package));
        if self.from_version == self.to_version {
            errors.push(ConfigError::new(
                "to_version",
                format!("cannot compare version '{}' with itself", self.from_version),
            ));
        }
        errors
    }
}

impl Validatable for LifecycleConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.app.validate();
        if self.api.trim().is_empty() {
            errors.push(ConfigError::new("api", "API name cannot be empty"));
        }
        match &self.source {
            LifecycleSource::Package { package, selection } => {
                errors.extend(validate_package(package));
                if let Err(e) = selection.strategy() {
                    errors.push(ConfigError::new("selection", e.to_string()));
                }
            }
            LifecycleSource::Input(path) => {
                if !path.exists() {
                    errors.push(ConfigError::new(
                        "input",
                        format!("File not found: {}", path.display()),
                    ));
                }
            }
        }
        errors
    }
}

impl Validatable for VersionsConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.app.validate();
        errors.extend(validate_package(&self.package));
        if self.limit == Some(0) {
            errors.push(ConfigError::new("limit", "must be at least 1"));
        }
        errors
    }
}

impl Validatable for SummaryConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.app.validate();
        if !self.input.exists() {
            errors.push(ConfigError::new(
                "input",
                format!("File not found: {}", self.input.display()),
            ));
        }
        errors
    }
}
