//! Compare command handler.

use crate::config::CompareConfig;
use crate::pipeline::{output_analysis, PipelineError};
use anyhow::Result;

/// Run the compare command for exactly two versions of a package.
#[allow(clippy::needless_pass_by_value)]
pub fn run_compare(config: CompareConfig) -> Result<i32> {
    super::ensure_valid(&config)?;

    let analyzer = super::directory_analyzer(&config.app);
    let result = analyzer
        .compare(&config.package, &config.from_version, &config.to_version)
        .map_err(|e| PipelineError::AnalysisFailed {
            package: config.package.clone(),
            source: e.into(),
        })?;

    // A missing side leaves nothing to compare against
    if result.versions().len() < 2 {
        let found: Vec<&str> = result.version_names().collect();
        anyhow::bail!(
            "Cannot compare {} {} with {}: only [{}] could be analyzed",
            config.package,
            config.from_version,
            config.to_version,
            found.join(", ")
        );
    }

    output_analysis(&config.app, &result)?;
    super::breaking_exit_code(&config.app, &result)
}
