//! Loading saved analysis results.

use super::PipelineError;
use crate::analysis::AnalysisResult;
use anyhow::Context;
use std::path::Path;

/// Read and validate an analysis result written by `analyze -o json`.
pub fn load_result(path: &Path) -> Result<AnalysisResult, PipelineError> {
    let load = || -> anyhow::Result<AnalysisResult> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let result = AnalysisResult::from_json(&content)
            .with_context(|| format!("Invalid analysis result in {}", path.display()))?;
        Ok(result)
    };

    let result = load().map_err(|source| PipelineError::LoadFailed {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(
        package = result.package_name(),
        versions = result.versions().len(),
        changes = result.changes().len(),
        "Loaded analysis result from {}",
        path.display()
    );
    Ok(result)
}
