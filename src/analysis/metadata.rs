//! Result metadata and recorded warnings.

use crate::error::EvolutionError;
use crate::selection::SelectionWarning;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the analysis was requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    /// Full selection over the catalog
    #[default]
    Analyze,
    /// Two explicit versions
    Compare,
}

/// Non-fatal problem recorded while building a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    VersionNotFound {
        version: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suggestion: Option<String>,
    },
    VersionYanked {
        version: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    ExtractionFailed {
        version: String,
        message: String,
    },
}

impl AnalysisWarning {
    /// Record a failed extraction, keeping the full error chain as text.
    pub fn extraction(version: impl Into<String>, err: &EvolutionError) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::ExtractionFailed {
            version: version.into(),
            message,
        }
    }

    #[must_use]
    pub fn version(&self) -> &str {
        match self {
            Self::VersionNotFound { version, .. }
            | Self::VersionYanked { version, .. }
            | Self::ExtractionFailed { version, .. } => version,
        }
    }
}

impl From<SelectionWarning> for AnalysisWarning {
    fn from(warning: SelectionWarning) -> Self {
        match warning {
            SelectionWarning::NotFound {
                requested,
                suggestion,
            } => Self::VersionNotFound {
                version: requested,
                suggestion,
            },
            SelectionWarning::Yanked { version, reason } => Self::VersionYanked { version, reason },
        }
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionNotFound {
                version,
                suggestion,
            } => {
                write!(f, "version '{version}' not found in catalog")?;
                if let Some(s) = suggestion {
                    write!(f, " (did you mean '{s}'?)")?;
                }
                Ok(())
            }
            Self::VersionYanked { version, reason } => {
                write!(f, "version '{version}' is yanked")?;
                if let Some(reason) = reason {
                    write!(f, ": {reason}")?;
                }
                Ok(())
            }
            Self::ExtractionFailed { version, message } => {
                write!(f, "extraction failed for '{version}': {message}")
            }
        }
    }
}

/// Provenance of an analysis result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisMetadata {
    pub analysis_type: AnalysisType,
    /// Selection strategy name, e.g. `range` or `sample`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_strategy: Option<String>,
    /// Versions chosen by the selector, before extraction
    pub requested_versions: Vec<String>,
    /// Versions with a snapshot in the result
    pub successful_versions: Vec<String>,
    /// Versions dropped because extraction failed
    pub failed_versions: Vec<String>,
    /// Whether the change list was computed
    pub changes_calculated: bool,
    pub warnings: Vec<AnalysisWarning>,
}

impl AnalysisMetadata {
    #[must_use]
    pub fn new(analysis_type: AnalysisType) -> Self {
        Self {
            analysis_type,
            changes_calculated: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_warning_conversion() {
        let warning: AnalysisWarning = SelectionWarning::NotFound {
            requested: "9.9.9".into(),
            suggestion: None,
        }
        .into();
        assert_eq!(warning.version(), "9.9.9");
        assert_eq!(warning.to_string(), "version '9.9.9' not found in catalog");
    }

    #[test]
    fn test_extraction_warning_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = EvolutionError::extraction_with_source("1.0", "reading snapshot", io);
        let warning = AnalysisWarning::extraction("1.0", &err);
        assert!(warning.to_string().contains("no such file"));
    }

    #[test]
    fn test_warning_serde_tagged() {
        let warning = AnalysisWarning::VersionYanked {
            version: "1.1".into(),
            reason: Some("broken".into()),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "version_yanked");
        let back: AnalysisWarning = serde_json::from_value(json).unwrap();
        assert_eq!(back, warning);
    }
}
