//! Report type definitions.

use crate::analysis::ChangeFilter;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Auto-detect: summary if TTY, JSON otherwise
    #[default]
    Auto,
    /// Stable JSON serialization
    Json,
    /// Brief summary output
    Summary,
    /// Human-readable Markdown
    #[value(alias = "md")]
    Markdown,
    /// CSV of changes for spreadsheet import
    Csv,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Json => write!(f, "json"),
            Self::Summary => write!(f, "summary"),
            Self::Markdown => write!(f, "markdown"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    /// Which changes to render
    pub filter: ChangeFilter,
    /// Maximum change rows per report section
    pub max_items: Option<usize>,
    /// Title for the report
    pub title: Option<String>,
    /// Additional metadata to include
    pub metadata: ReportMetadata,
}

impl ReportConfig {
    #[must_use]
    pub fn with_filter(filter: ChangeFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

/// Metadata included in reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Tool version
    pub tool_version: String,
    /// Path of a loaded result file, when rendering from disk
    pub input_path: Option<String>,
}

impl ReportMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            ..Self::default()
        }
    }
}
