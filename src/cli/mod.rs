//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand
//! and returns the process exit code.

mod analyze;
mod compare;
mod lifecycle;
mod summary;
mod versions;

pub use analyze::run_analyze;
pub use compare::run_compare;
pub use lifecycle::run_lifecycle;
pub use summary::run_summary;
pub use versions::run_versions;

// Re-export config types used by handlers
pub use crate::config::{
    AnalyzeConfig, CompareConfig, LifecycleConfig, LifecycleSource, SummaryConfig, VersionsConfig,
};

use crate::analysis::AnalysisResult;
use crate::config::{AppConfig, Validatable};
use crate::pipeline::{exit_codes, Analyzer, DirectorySource};
use anyhow::{bail, Result};

/// Reject an invalid command configuration with every problem listed.
fn ensure_valid(config: &impl Validatable) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
    bail!("Invalid configuration:\n  {}", details.join("\n  "))
}

/// An analyzer reading from the configured data directory.
fn directory_analyzer(app: &AppConfig) -> Analyzer {
    let root = app.data_dir();
    tracing::debug!("Reading catalogs and snapshots from {}", root.display());
    Analyzer::new(DirectorySource::new(root)).with_options(app.analysis_options())
}

/// Exit code for an analysis, honoring `--fail-on-breaking`.
///
/// Only changes that pass the configured filter count.
fn breaking_exit_code(app: &AppConfig, result: &AnalysisResult) -> Result<i32> {
    if !app.behavior.fail_on_breaking {
        return Ok(exit_codes::SUCCESS);
    }
    let filter = app.change_filter()?;
    let breaking = result
        .filtered_changes(&filter)
        .filter(|change| !change.is_backwards_compatible)
        .count();
    if breaking > 0 {
        tracing::error!("{breaking} breaking change(s) found");
        return Ok(exit_codes::CHECK_FAILED);
    }
    Ok(exit_codes::SUCCESS)
}
