//! Lifecycle command handler.
//!
//! Answers "when did this API appear, change and disappear" either from a
//! fresh analysis or from a saved result.

use crate::config::{LifecycleConfig, LifecycleSource};
use crate::pipeline::{exit_codes, load_result, output_lifecycle, PipelineError};
use anyhow::Result;

/// Run the lifecycle command.
///
/// Exits with `CHECK_FAILED` when the query matches no API or several.
#[allow(clippy::needless_pass_by_value)]
pub fn run_lifecycle(config: LifecycleConfig) -> Result<i32> {
    super::ensure_valid(&config)?;

    let result = match &config.source {
        LifecycleSource::Package { package, selection } => {
            let analyzer = super::directory_analyzer(&config.app);
            let selection = config.app.apply_selection_defaults(selection.clone());
            analyzer
                .analyze(package, &selection)
                .map_err(|e| PipelineError::AnalysisFailed {
                    package: package.clone(),
                    source: e.into(),
                })?
        }
        LifecycleSource::Input(path) => load_result(path)?,
    };

    let lifecycle = result.lifecycle(&config.api);
    output_lifecycle(&config.app, &lifecycle)?;

    if lifecycle.collision_detected {
        tracing::warn!(
            candidates = lifecycle.available_apis.len(),
            "'{}' is ambiguous; use a full name",
            config.api
        );
        return Ok(exit_codes::CHECK_FAILED);
    }
    if !lifecycle.is_resolved() {
        tracing::warn!("No API matching '{}' in {}", config.api, result.package_name());
        return Ok(exit_codes::CHECK_FAILED);
    }
    Ok(exit_codes::SUCCESS)
}
