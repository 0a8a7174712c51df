//! Summary statistics over a change list.

use crate::diff::{ApiChange, ChangeType};
use crate::model::{ApiKind, SnapshotStore};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// First and last analyzed versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    pub first: String,
    pub last: String,
}

/// Per-version row of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub version: String,
    pub release_date: Option<NaiveDate>,
    /// Elements in this version's snapshot
    pub api_count: usize,
    /// Changes that became visible in this version
    pub changes_count: usize,
}

/// Counts and statistics for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_versions: usize,
    pub total_changes: usize,
    /// Every change type, zero counts included
    pub change_types: IndexMap<ChangeType, usize>,
    /// Distinct full names per kind, zero counts included
    pub api_kinds: IndexMap<ApiKind, usize>,
    /// Distinct full names ever observed across all snapshots
    pub unique_apis: usize,
    pub breaking_changes: usize,
    pub version_range: Option<VersionRange>,
    pub versions: Vec<VersionSummary>,
}

impl AnalysisSummary {
    #[must_use]
    pub fn count(&self, change_type: ChangeType) -> usize {
        self.change_types.get(&change_type).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn has_breaking_changes(&self) -> bool {
        self.breaking_changes > 0
    }
}

/// Pure reduction from snapshots and changes to an [`AnalysisSummary`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryAggregator;

impl SummaryAggregator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn aggregate(&self, store: &SnapshotStore, changes: &[ApiChange]) -> AnalysisSummary {
        let mut change_types: IndexMap<ChangeType, usize> =
            ChangeType::all().iter().map(|&ct| (ct, 0)).collect();
        let mut per_version: HashMap<&str, usize> = HashMap::new();
        let mut breaking_changes = 0;

        for change in changes {
            *change_types.entry(change.change_type).or_insert(0) += 1;
            if let Some(version) = change.to_version.as_deref() {
                *per_version.entry(version).or_insert(0) += 1;
            }
            if change.is_breaking() {
                breaking_changes += 1;
            }
        }

        let mut distinct: BTreeMap<&str, ApiKind> = BTreeMap::new();
        for snapshot in store.snapshots() {
            for (full_name, element) in snapshot.iter() {
                distinct.entry(full_name).or_insert(element.kind);
            }
        }
        let mut api_kinds: IndexMap<ApiKind, usize> =
            ApiKind::all().iter().map(|&kind| (kind, 0)).collect();
        for kind in distinct.values() {
            *api_kinds.entry(*kind).or_insert(0) += 1;
        }

        let versions: Vec<VersionSummary> = store
            .versions()
            .iter()
            .zip(store.snapshots())
            .map(|(info, snapshot)| VersionSummary {
                version: info.version.clone(),
                release_date: info.released_at.map(|at| at.date_naive()),
                api_count: snapshot.len(),
                changes_count: per_version.get(info.version.as_str()).copied().unwrap_or(0),
            })
            .collect();

        let version_range = match (store.versions().first(), store.versions().last()) {
            (Some(first), Some(last)) => Some(VersionRange {
                first: first.version.clone(),
                last: last.version.clone(),
            }),
            _ => None,
        };

        AnalysisSummary {
            total_versions: store.len(),
            total_changes: changes.len(),
            change_types,
            api_kinds,
            unique_apis: distinct.len(),
            breaking_changes,
            version_range,
            versions,
        }
    }
}
