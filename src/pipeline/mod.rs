//! Pipeline orchestration for analysis sessions.
//!
//! This module wires the collaborator sources, the analyzer and the report
//! writers together so the CLI command handlers stay thin:
//! source → select → extract → diff → report.

mod analyzer;
mod load;
mod report_stage;
mod sources;

pub use analyzer::{AnalysisOptions, Analyzer};
pub use load::load_result;
pub use report_stage::{output_analysis, output_lifecycle, output_loaded_analysis, output_versions};
pub use sources::{CatalogSource, DirectorySource, InMemorySource, SnapshotSource};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or parse a saved analysis result
    #[error("Load failed for {path}: {source}")]
    LoadFailed {
        path: String,
        source: anyhow::Error,
    },

    /// Analysis of a package failed
    #[error("Analysis of {package} failed: {source}")]
    AnalysisFailed {
        package: String,
        #[source]
        source: anyhow::Error,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - no breaking changes (or no --fail-on-breaking), query resolved
    pub const SUCCESS: i32 = 0;
    /// Breaking changes found with --fail-on-breaking, or a lifecycle query
    /// matched nothing or several APIs
    pub const CHECK_FAILED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
