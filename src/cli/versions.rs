//! Versions command handler.

use crate::config::VersionsConfig;
use crate::pipeline::{exit_codes, output_versions};
use anyhow::{Context, Result};

/// List a package's release catalog, oldest first.
///
/// `limit` keeps only the newest N releases.
#[allow(clippy::needless_pass_by_value)]
pub fn run_versions(config: VersionsConfig) -> Result<i32> {
    super::ensure_valid(&config)?;

    let analyzer = super::directory_analyzer(&config.app);
    let catalog = analyzer
        .versions(&config.package)
        .with_context(|| format!("Failed to list versions of {}", config.package))?;

    let entries = catalog.entries();
    let skip = config
        .limit
        .map_or(0, |limit| entries.len().saturating_sub(limit));
    output_versions(&config.app, &config.package, &entries[skip..])?;
    Ok(exit_codes::SUCCESS)
}
