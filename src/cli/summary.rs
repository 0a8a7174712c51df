//! Summary command handler.
//!
//! Re-renders a saved analysis result in any report format.

use crate::config::SummaryConfig;
use crate::pipeline::{load_result, output_loaded_analysis};
use anyhow::Result;

/// Run the summary command over a result file written by `analyze -o json`.
#[allow(clippy::needless_pass_by_value)]
pub fn run_summary(config: SummaryConfig) -> Result<i32> {
    super::ensure_valid(&config)?;

    let result = load_result(&config.input)?;
    output_loaded_analysis(
        &config.app,
        &result,
        &config.input.display().to_string(),
    )?;
    super::breaking_exit_code(&config.app, &result)
}
