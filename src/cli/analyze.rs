//! Analyze command handler.
//!
//! Implements the `analyze` subcommand: select versions of a package, diff
//! the snapshot sequence and report the changes.

use crate::config::AnalyzeConfig;
use crate::pipeline::{output_analysis, PipelineError};
use anyhow::Result;

/// Run the analyze command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_analyze(config: AnalyzeConfig) -> Result<i32> {
    super::ensure_valid(&config)?;

    let analyzer = super::directory_analyzer(&config.app);
    let selection = config.app.apply_selection_defaults(config.selection.clone());
    let result = analyzer
        .analyze(&config.package, &selection)
        .map_err(|e| PipelineError::AnalysisFailed {
            package: config.package.clone(),
            source: e.into(),
        })?;

    if !config.app.behavior.quiet {
        for warning in &result.metadata().warnings {
            tracing::warn!("{warning}");
        }
    }

    output_analysis(&config.app, &result)?;
    super::breaking_exit_code(&config.app, &result)
}
