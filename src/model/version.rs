//! Release metadata and the chronologically ordered version catalog.

use crate::error::{InvariantViolation, Result};
use crate::utils::compare_versions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for one published release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    #[serde(default, alias = "release_date", skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub yanked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yanked_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_python: Option<String>,
}

impl VersionInfo {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            released_at: None,
            yanked: false,
            yanked_reason: None,
            dependencies: Vec::new(),
            requires_python: None,
        }
    }

    #[must_use]
    pub const fn released(mut self, at: DateTime<Utc>) -> Self {
        self.released_at = Some(at);
        self
    }

    #[must_use]
    pub fn yanked(mut self, reason: Option<&str>) -> Self {
        self.yanked = true;
        self.yanked_reason = reason.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// Check that a version sequence is duplicate-free and never goes back in
/// time between two dated entries.
pub(crate) fn check_sequence(versions: &[VersionInfo]) -> Result<()> {
    let mut seen = HashMap::with_capacity(versions.len());
    let mut last_dated: Option<&VersionInfo> = None;

    for (idx, info) in versions.iter().enumerate() {
        if seen.insert(info.version.as_str(), idx).is_some() {
            return Err(InvariantViolation::DuplicateVersion(info.version.clone()).into());
        }
        if let Some(at) = info.released_at {
            if let Some(prev) = last_dated {
                if prev.released_at.is_some_and(|prev_at| at < prev_at) {
                    return Err(InvariantViolation::NonChronological {
                        previous: prev.version.clone(),
                        next: info.version.clone(),
                    }
                    .into());
                }
            }
            last_dated = Some(info);
        }
    }
    Ok(())
}

/// The full, chronologically ordered list of releases of one package.
#[derive(Debug, Clone, Default)]
pub struct VersionCatalog {
    entries: Vec<VersionInfo>,
    positions: HashMap<String, usize>,
}

impl VersionCatalog {
    /// Wrap entries that are already in chronological order.
    pub fn new(entries: Vec<VersionInfo>) -> Result<Self> {
        check_sequence(&entries)?;
        let positions = entries
            .iter()
            .enumerate()
            .map(|(idx, info)| (info.version.clone(), idx))
            .collect();
        Ok(Self { entries, positions })
    }

    /// Order entries chronologically, then wrap them.
    ///
    /// When every entry has a release time the catalog is ordered by it (ties
    /// by version order). Otherwise it is ordered by version alone; dates that
    /// contradict that order are rejected as non-chronological.
    pub fn sorted(mut entries: Vec<VersionInfo>) -> Result<Self> {
        if entries.iter().all(|v| v.released_at.is_some()) {
            entries.sort_by(|a, b| {
                a.released_at
                    .cmp(&b.released_at)
                    .then_with(|| compare_versions(&a.version, &b.version))
            });
        } else {
            entries.sort_by(|a, b| compare_versions(&a.version, &b.version));
        }
        Self::new(entries)
    }

    #[must_use]
    pub fn entries(&self) -> &[VersionInfo] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalog position of an exact version string.
    #[must_use]
    pub fn position(&self, version: &str) -> Option<usize> {
        self.positions.get(version).copied()
    }

    #[must_use]
    pub fn get(&self, version: &str) -> Option<&VersionInfo> {
        self.position(version).map(|idx| &self.entries[idx])
    }

    #[must_use]
    pub fn latest(&self) -> Option<&VersionInfo> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VersionInfo> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a VersionCatalog {
    type Item = &'a VersionInfo;
    type IntoIter = std::slice::Iter<'a, VersionInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvolutionError;
    use chrono::TimeZone;

    fn at(year: i32, month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let err = VersionCatalog::new(vec![VersionInfo::new("1.0"), VersionInfo::new("1.0")])
            .unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Invariant(InvariantViolation::DuplicateVersion(_))
        ));
    }

    #[test]
    fn test_catalog_rejects_time_travel() {
        let err = VersionCatalog::new(vec![
            VersionInfo::new("2.0").released(at(2023, 5)),
            VersionInfo::new("1.0").released(at(2023, 1)),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Invariant(InvariantViolation::NonChronological { .. })
        ));
    }

    #[test]
    fn test_undated_entries_do_not_break_chronology() {
        let catalog = VersionCatalog::new(vec![
            VersionInfo::new("1.0").released(at(2023, 1)),
            VersionInfo::new("1.1"),
            VersionInfo::new("2.0").released(at(2023, 6)),
        ])
        .unwrap();
        assert_eq!(catalog.position("1.1"), Some(1));
        assert_eq!(catalog.latest().map(|v| v.version.as_str()), Some("2.0"));
    }

    #[test]
    fn test_sorted_by_release_time() {
        let catalog = VersionCatalog::sorted(vec![
            VersionInfo::new("2.0").released(at(2023, 6)),
            VersionInfo::new("1.2.10").released(at(2023, 9)),
            VersionInfo::new("1.0").released(at(2023, 1)),
        ])
        .unwrap();
        let order: Vec<_> = catalog.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(order, vec!["1.0", "2.0", "1.2.10"]);
    }

    #[test]
    fn test_sorted_by_version_without_timestamps() {
        let catalog = VersionCatalog::sorted(vec![
            VersionInfo::new("1.10"),
            VersionInfo::new("1.2"),
            VersionInfo::new("1.0rc1"),
            VersionInfo::new("1.0"),
        ])
        .unwrap();
        let order: Vec<_> = catalog.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(order, vec!["1.0rc1", "1.0", "1.2", "1.10"]);
    }

    #[test]
    fn test_sorted_mixed_falls_back_to_version_order() {
        let catalog = VersionCatalog::sorted(vec![
            VersionInfo::new("3.0").released(at(2022, 1)),
            VersionInfo::new("2.0"),
            VersionInfo::new("1.0").released(at(2021, 1)),
        ])
        .unwrap();
        let order: Vec<_> = catalog.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(order, vec!["1.0", "2.0", "3.0"]);

        // 1.2.10 was released after 2.0, which only the dates can tell
        let err = VersionCatalog::sorted(vec![
            VersionInfo::new("2.0").released(at(2023, 6)),
            VersionInfo::new("1.2.10").released(at(2023, 9)),
            VersionInfo::new("1.0"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Invariant(InvariantViolation::NonChronological { .. })
        ));
    }

    #[test]
    fn test_version_info_accepts_release_date_alias() {
        let info: VersionInfo =
            serde_json::from_str(r#"{"version":"1.0","release_date":"2023-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(info.released_at, Some(at(2023, 1)));
        assert!(!info.yanked);
    }
}
