//! Report generation for analysis results.
//!
//! This module provides multiple output formats:
//! - JSON: the stable result serialization, for programmatic integration
//! - Summary: compact shell-friendly output
//! - Markdown: human-readable changelogs
//! - CSV: one row per change for spreadsheet import
//!
//! # Security
//!
//! The `escape` module provides utilities for safe output generation.
//! Names, descriptions and signature text come from the analyzed package
//! and must be escaped before embedding in Markdown or CSV reports.

mod csv;
pub mod escape;
mod json;
mod markdown;
mod summary;
mod types;

pub use csv::CsvReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use summary::SummaryReporter;
pub use types::{ReportConfig, ReportFormat, ReportMetadata};

use crate::analysis::AnalysisResult;
use crate::lifecycle::Lifecycle;
use crate::model::VersionInfo;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a full analysis result
    fn generate_analysis_report(
        &self,
        result: &AnalysisResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Render one lifecycle query answer
    fn generate_lifecycle_report(
        &self,
        lifecycle: &Lifecycle,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Render a package's release catalog
    fn generate_versions_report(
        &self,
        package: &str,
        versions: &[VersionInfo],
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Write an analysis report to a writer
    fn write_analysis_report(
        &self,
        result: &AnalysisResult,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate_analysis_report(result, config)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Auto | ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        ReportFormat::Csv => Box::new(CsvReporter::new()),
    }
}

/// Changes selected by the config's filter, capped at `max_items`.
pub(crate) fn selected_changes<'a>(
    result: &'a AnalysisResult,
    config: &'a ReportConfig,
) -> Vec<&'a crate::diff::ApiChange> {
    let limit = config.max_items.unwrap_or(usize::MAX);
    result.filtered_changes(&config.filter).take(limit).collect()
}
