//! Unified error types for api-evolution.
//!
//! This module provides the error hierarchy for the library. The four
//! analysis failure classes (configuration, missing versions, extraction,
//! and data-model invariants) each get a dedicated variant so callers can
//! decide which ones are fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for api-evolution operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EvolutionError {
    /// Conflicting or invalid selection parameters. Always fatal and raised
    /// before any catalog or extraction work.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An explicitly requested version is absent from the catalog
    #[error("Version '{version}' not found in catalog{}", suggestion_suffix(.suggestion))]
    NotFound {
        version: String,
        suggestion: Option<String>,
    },

    /// The extraction collaborator failed for one version
    #[error("Extraction failed for version {version}: {context}")]
    Extraction {
        version: String,
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input violated a data-model invariant
    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    /// Malformed serialized input (JSON, YAML, signature text)
    #[error("Failed to parse {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors during report generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default()
}

/// Contract violations in snapshots, catalogs or diff input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[error("duplicate API element '{full_name}' in snapshot for {version}")]
    DuplicateElement { version: String, full_name: String },

    #[error("version '{0}' appears more than once in the sequence")]
    DuplicateVersion(String),

    #[error("version '{next}' is ordered after '{previous}' but released before it")]
    NonChronological { previous: String, next: String },

    #[error("{versions} versions but {snapshots} snapshots")]
    Misaligned { versions: usize, snapshots: usize },

    #[error("snapshot at position {index} is for '{found}', expected '{expected}'")]
    SnapshotVersionMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("snapshot key '{key}' does not match element full name '{full_name}'")]
    ElementKeyMismatch { key: String, full_name: String },

    #[error("more than one {change_type} record for '{full_name}' in transition {transition}")]
    DuplicateChange {
        full_name: String,
        transition: String,
        change_type: String,
    },

    #[error("change for '{full_name}' refers to version '{version}' outside the sequence")]
    UnknownChangeVersion { full_name: String, version: String },
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid YAML structure: {0}")]
    InvalidYaml(String),

    #[error("Invalid signature '{text}': {reason}")]
    InvalidSignature { text: String, reason: String },

    #[error("Invalid field value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),

    #[error("Output format not supported for this operation: {0}")]
    UnsupportedFormat(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for api-evolution operations
pub type Result<T> = std::result::Result<T, EvolutionError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl EvolutionError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a not-found error for a requested version
    pub fn not_found(version: impl Into<String>, suggestion: Option<String>) -> Self {
        Self::NotFound {
            version: version.into(),
            suggestion,
        }
    }

    /// Create an extraction error without an underlying cause
    pub fn extraction(version: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Extraction {
            version: version.into(),
            context: context.into(),
            source: None,
        }
    }

    /// Create an extraction error wrapping the collaborator's failure
    pub fn extraction_with_source(
        version: impl Into<String>,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Extraction {
            version: version.into(),
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for malformed signature text
    pub fn invalid_signature(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::parse(
            "signature",
            ParseErrorKind::InvalidSignature {
                text: text.into(),
                reason: reason.into(),
            },
        )
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
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

    /// Whether the analysis session may continue after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Extraction { .. })
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for EvolutionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for EvolutionError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<serde_yaml::Error> for EvolutionError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::parse(
            "YAML deserialization",
            ParseErrorKind::InvalidYaml(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain outward, so an error raised three calls deep reads
/// `"outer: middle: base"`.
///
/// # Example
///
/// ```ignore
/// use api_evolution::error::ErrorContext;
///
/// fn load_catalog(path: &Path) -> Result<Vec<VersionInfo>> {
///     let content = std::fs::read_to_string(path)
///         .map_err(|e| EvolutionError::io(path, e))?;
///     serde_json::from_str(&content)
///         .with_context(|| format!("catalog {}", path.display()))
/// }
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    ///
    /// The context string is prepended to the error's existing context.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<EvolutionError>> ErrorContext<T> for std::result::Result<T, E> {
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
///
/// `NotFound` and `Invariant` carry structured payloads and pass through
/// unchanged.
fn add_context_to_error(err: EvolutionError, new_ctx: &str) -> EvolutionError {
    match err {
        EvolutionError::Parse {
            context: existing,
            source,
        } => EvolutionError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        EvolutionError::Report {
            context: existing,
            source,
        } => EvolutionError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        EvolutionError::Extraction {
            version,
            context: existing,
            source,
        } => EvolutionError::Extraction {
            version,
            context: chain_context(new_ctx, &existing),
            source,
        },
        EvolutionError::Io {
            path,
            message,
            source,
        } => EvolutionError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        EvolutionError::Config(msg) => EvolutionError::Config(chain_context(new_ctx, &msg)),
        other @ (EvolutionError::NotFound { .. } | EvolutionError::Invariant(_)) => other,
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

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to a config error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to a config error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| EvolutionError::Config(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| EvolutionError::Config(f().into()))
    }
}
