//! Collaborator interfaces for version catalogs and per-version snapshots.
//!
//! Registry access and source extraction live outside this crate. The
//! [`CatalogSource`] and [`SnapshotSource`] traits are the seams they plug
//! into; [`DirectorySource`] reads pre-extracted data from disk and
//! [`InMemorySource`] serves tests and embedders.

use crate::error::{ErrorContext, EvolutionError, Result};
use crate::model::{ApiElement, Snapshot, VersionCatalog, VersionInfo};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Supplies the chronologically ordered release catalog of a package.
pub trait CatalogSource: Send + Sync {
    fn catalog(&self, package: &str) -> Result<VersionCatalog>;

    /// Get the name of this source for logging/debugging.
    fn name(&self) -> &str;
}

/// Supplies the extracted API snapshot of one release.
///
/// Implementations must be safe to call concurrently for different versions.
/// A failure for one version should be an [`EvolutionError::Extraction`] so
/// the analysis can drop that version and continue.
pub trait SnapshotSource: Send + Sync {
    fn snapshot(&self, package: &str, version: &VersionInfo) -> Result<Snapshot>;

    /// Get the name of this source for logging/debugging.
    fn name(&self) -> &str;
}

/// Reads catalogs and snapshots from a directory tree:
///
/// ```text
/// <root>/<package>/catalog.json             array of VersionInfo
/// <root>/<package>/snapshots/<version>.json array of ApiElement
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn catalog_path(&self, package: &str) -> PathBuf {
        self.root.join(package).join("catalog.json")
    }

    #[must_use]
    pub fn snapshot_path(&self, package: &str, version: &str) -> PathBuf {
        self.root
            .join(package)
            .join("snapshots")
            .join(format!("{version}.json"))
    }

    /// Write a catalog in the layout this source reads.
    pub fn write_catalog(&self, package: &str, versions: &[VersionInfo]) -> Result<()> {
        let path = self.catalog_path(package);
        write_json(&path, versions)
    }

    /// Write one snapshot in the layout this source reads.
    pub fn write_snapshot(&self, package: &str, snapshot: &Snapshot) -> Result<()> {
        check_package_name(package)?;
        check_version_name(snapshot.version())
            .map_err(|reason| EvolutionError::extraction(snapshot.version(), reason))?;
        let path = self.snapshot_path(package, snapshot.version());
        let elements: Vec<&ApiElement> = snapshot.elements().collect();
        write_json(&path, &elements)
    }
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| EvolutionError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| EvolutionError::io(path, e))
}

fn check_package_name(package: &str) -> Result<()> {
    if package.is_empty() || package.contains(['/', '\\']) || package.starts_with('.') {
        return Err(EvolutionError::config(format!(
            "invalid package name '{package}'"
        )));
    }
    Ok(())
}

fn check_version_name(version: &str) -> std::result::Result<(), String> {
    if version.is_empty() || version.contains(['/', '\\']) || version.starts_with('.') {
        return Err(format!("version '{version}' cannot be used as a file name"));
    }
    Ok(())
}

impl CatalogSource for DirectorySource {
    fn catalog(&self, package: &str) -> Result<VersionCatalog> {
        check_package_name(package)?;
        let path = self.catalog_path(package);
        let content = std::fs::read_to_string(&path).map_err(|e| EvolutionError::io(&path, e))?;
        let versions: Vec<VersionInfo> = serde_json::from_str(&content)
            .with_context(|| format!("catalog {}", path.display()))?;
        tracing::debug!(package, versions = versions.len(), "loaded catalog");
        VersionCatalog::sorted(versions)
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}

impl SnapshotSource for DirectorySource {
    fn snapshot(&self, package: &str, version: &VersionInfo) -> Result<Snapshot> {
        check_package_name(package)?;
        let name = version.version.as_str();
        check_version_name(name).map_err(|reason| EvolutionError::extraction(name, reason))?;

        let path = self.snapshot_path(package, name);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            EvolutionError::extraction_with_source(
                name,
                format!("cannot read {}", path.display()),
                e,
            )
        })?;
        let elements: Vec<ApiElement> = serde_json::from_str(&content).map_err(|e| {
            EvolutionError::extraction_with_source(
                name,
                format!("malformed snapshot {}", path.display()),
                e,
            )
        })?;
        Snapshot::new(name, elements)
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}

/// Catalogs and snapshots held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    catalogs: HashMap<String, Vec<VersionInfo>>,
    snapshots: HashMap<(String, String), Snapshot>,
    failures: HashMap<(String, String), String>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_catalog(mut self, package: impl Into<String>, versions: Vec<VersionInfo>) -> Self {
        self.catalogs.insert(package.into(), versions);
        self
    }

    #[must_use]
    pub fn with_snapshot(mut self, package: impl Into<String>, snapshot: Snapshot) -> Self {
        self.snapshots
            .insert((package.into(), snapshot.version().to_string()), snapshot);
        self
    }

    /// Make extraction of `version` fail with `message`.
    #[must_use]
    pub fn with_failure(
        mut self,
        package: impl Into<String>,
        version: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.failures
            .insert((package.into(), version.into()), message.into());
        self
    }
}

impl CatalogSource for InMemorySource {
    fn catalog(&self, package: &str) -> Result<VersionCatalog> {
        let versions = self.catalogs.get(package).cloned().ok_or_else(|| {
            EvolutionError::config(format!("no catalog for package '{package}'"))
        })?;
        VersionCatalog::sorted(versions)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

impl SnapshotSource for InMemorySource {
    fn snapshot(&self, package: &str, version: &VersionInfo) -> Result<Snapshot> {
        let key = (package.to_string(), version.version.clone());
        if let Some(message) = self.failures.get(&key) {
            return Err(EvolutionError::extraction(&version.version, message.clone()));
        }
        self.snapshots
            .get(&key)
            .cloned()
            .ok_or_else(|| EvolutionError::extraction(&version.version, "no snapshot recorded"))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
