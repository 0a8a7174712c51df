//! Analysis session: selection → extraction → assembly → diff → result.

use super::sources::{CatalogSource, SnapshotSource};
use crate::analysis::{AnalysisMetadata, AnalysisResult, AnalysisType, AnalysisWarning};
use crate::diff::DiffEngine;
use crate::error::{InvariantViolation, Result};
use crate::model::{Snapshot, SnapshotStore, VersionCatalog, VersionInfo};
use crate::selection::{Selection, SelectionConfig, VersionSelector};
use rayon::prelude::*;
use std::sync::Arc;

/// Knobs for one analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Compute the change list; when false only snapshots are recorded
    pub calculate_changes: bool,
    /// Emit `Deprecated` records
    pub track_deprecations: bool,
    /// Extract snapshots on the rayon pool
    pub parallel: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            calculate_changes: true,
            track_deprecations: true,
            parallel: true,
        }
    }
}

/// Runs analyses for packages against a catalog and a snapshot source.
#[derive(Clone)]
pub struct Analyzer {
    catalogs: Arc<dyn CatalogSource>,
    snapshots: Arc<dyn SnapshotSource>,
    options: AnalysisOptions,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("catalogs", &self.catalogs.name())
            .field("snapshots", &self.snapshots.name())
            .field("options", &self.options)
            .finish()
    }
}

impl Analyzer {
    /// Use one value as both catalog and snapshot source.
    pub fn new<S>(source: S) -> Self
    where
        S: CatalogSource + SnapshotSource + 'static,
    {
        let shared = Arc::new(source);
        Self::with_sources(shared.clone(), shared)
    }

    pub fn with_sources(
        catalogs: Arc<dyn CatalogSource>,
        snapshots: Arc<dyn SnapshotSource>,
    ) -> Self {
        Self {
            catalogs,
            snapshots,
            options: AnalysisOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// The package's full release catalog, in chronological order.
    pub fn versions(&self, package: &str) -> Result<VersionCatalog> {
        self.catalogs.catalog(package)
    }

    /// Analyze the versions of `package` chosen by `selection`.
    ///
    /// Selection parameters are validated before the catalog is fetched.
    /// Missing, yanked and unextractable versions become warnings in the
    /// result metadata; invariant violations abort the session.
    pub fn analyze(&self, package: &str, selection: &SelectionConfig) -> Result<AnalysisResult> {
        let selector = VersionSelector::new(selection)?;
        self.run(package, &selector, AnalysisType::Analyze)
    }

    /// Analyze exactly two versions, oldest first.
    pub fn compare(&self, package: &str, from: &str, to: &str) -> Result<AnalysisResult> {
        let selector = VersionSelector::new(&SelectionConfig::explicit([from, to]))?;
        self.run(package, &selector, AnalysisType::Compare)
    }

    fn run(
        &self,
        package: &str,
        selector: &VersionSelector,
        analysis_type: AnalysisType,
    ) -> Result<AnalysisResult> {
        let catalog = self.catalogs.catalog(package)?;
        tracing::info!(
            package,
            catalog = catalog.len(),
            strategy = selector.strategy().name(),
            "starting analysis"
        );

        let Selection { versions, warnings } = selector.select(&catalog)?;
        let mut metadata = AnalysisMetadata::new(analysis_type);
        metadata.selection_strategy = Some(selector.strategy().name().to_string());
        metadata.changes_calculated = self.options.calculate_changes;
        metadata.requested_versions = versions.iter().map(|v| v.version.clone()).collect();
        for warning in warnings {
            tracing::warn!("{warning}");
            metadata.warnings.push(warning.into());
        }

        let mut snapshots = Vec::with_capacity(versions.len());
        for (index, (info, extracted)) in self.extract(package, &versions).into_iter().enumerate() {
            match extracted {
                Ok(snapshot) if snapshot.version() != info.version => {
                    return Err(InvariantViolation::SnapshotVersionMismatch {
                        index,
                        expected: info.version.clone(),
                        found: snapshot.version().to_string(),
                    }
                    .into());
                }
                Ok(snapshot) => snapshots.push(snapshot),
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(version = %info.version, error = %err, "dropping version");
                    metadata.failed_versions.push(info.version.clone());
                    metadata
                        .warnings
                        .push(AnalysisWarning::extraction(&info.version, &err));
                }
                Err(err) => return Err(err),
            }
        }

        let (store, _missing) = SnapshotStore::assemble(&versions, snapshots)?;
        metadata.successful_versions = store.version_names().map(str::to_string).collect();

        let changes = if self.options.calculate_changes {
            DiffEngine::new()
                .track_deprecations(self.options.track_deprecations)
                .diff(&store)
        } else {
            Vec::new()
        };

        tracing::info!(
            package,
            versions = store.len(),
            failed = metadata.failed_versions.len(),
            changes = changes.len(),
            "analysis complete"
        );
        AnalysisResult::new(package, store, changes, metadata)
    }

    /// One extraction per version; output order matches `versions`.
    fn extract(
        &self,
        package: &str,
        versions: &[VersionInfo],
    ) -> Vec<(VersionInfo, Result<Snapshot>)> {
        let extract_one = |info: &VersionInfo| {
            tracing::debug!(version = %info.version, source = self.snapshots.name(), "extracting");
            (info.clone(), self.snapshots.snapshot(package, info))
        };
        if self.options.parallel {
            versions.par_iter().map(extract_one).collect()
        } else {
            versions.iter().map(extract_one).collect()
        }
    }
}
