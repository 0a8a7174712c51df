//! The analysis result record and its stable serialization.

use super::{AnalysisMetadata, AnalysisSummary, ChangeFilter, SummaryAggregator};
use crate::diff::ApiChange;
use crate::error::{ErrorContext, EvolutionError, InvariantViolation, Result};
use crate::lifecycle::{Lifecycle, LifecycleIndex};
use crate::model::{ApiElement, Snapshot, SnapshotStore, VersionInfo};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Everything one analysis session produced for one package.
///
/// Immutable after construction. Serializes to a stable JSON shape:
/// `versions` in sequence order, `api_elements` keyed by version in the same
/// order, then the ordered `changes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AnalysisResultRepr", into = "AnalysisResultRepr")]
pub struct AnalysisResult {
    package_name: String,
    store: SnapshotStore,
    changes: Vec<ApiChange>,
    analysis_date: DateTime<Utc>,
    metadata: AnalysisMetadata,
    /// Built on the first lifecycle query
    lifecycle: OnceLock<LifecycleIndex>,
}

impl PartialEq for AnalysisResult {
    fn eq(&self, other: &Self) -> bool {
        self.package_name == other.package_name
            && self.store == other.store
            && self.changes == other.changes
            && self.analysis_date == other.analysis_date
            && self.metadata == other.metadata
    }
}

#[derive(Serialize, Deserialize)]
struct AnalysisResultRepr {
    package_name: String,
    versions: Vec<VersionInfo>,
    api_elements: IndexMap<String, Vec<ApiElement>>,
    changes: Vec<ApiChange>,
    analysis_date: DateTime<Utc>,
    #[serde(default)]
    metadata: AnalysisMetadata,
}

impl TryFrom<AnalysisResultRepr> for AnalysisResult {
    type Error = EvolutionError;

    fn try_from(repr: AnalysisResultRepr) -> Result<Self> {
        if repr.versions.len() != repr.api_elements.len() {
            return Err(InvariantViolation::Misaligned {
                versions: repr.versions.len(),
                snapshots: repr.api_elements.len(),
            }
            .into());
        }
        let snapshots = repr
            .api_elements
            .into_iter()
            .map(|(version, elements)| Snapshot::new(version, elements))
            .collect::<Result<Vec<_>>>()?;
        let store = SnapshotStore::new(repr.versions, snapshots)?;
        Self::new(repr.package_name, store, repr.changes, repr.metadata)
            .map(|result| result.with_analysis_date(repr.analysis_date))
    }
}

impl From<AnalysisResult> for AnalysisResultRepr {
    fn from(result: AnalysisResult) -> Self {
        let (versions, snapshots) = result.store.into_parts();
        let api_elements = snapshots
            .into_iter()
            .map(|snapshot| {
                let version = snapshot.version().to_string();
                let elements = snapshot.elements().cloned().collect();
                (version, elements)
            })
            .collect();
        Self {
            package_name: result.package_name,
            versions,
            api_elements,
            changes: result.changes,
            analysis_date: result.analysis_date,
            metadata: result.metadata,
        }
    }
}

impl AnalysisResult {
    /// Assemble a result, checking the change list against the sequence.
    ///
    /// Every change must name versions from the sequence, and at most one
    /// record may exist per (full name, transition, change type).
    pub fn new(
        package_name: impl Into<String>,
        store: SnapshotStore,
        changes: Vec<ApiChange>,
        metadata: AnalysisMetadata,
    ) -> Result<Self> {
        validate_changes(&store, &changes)?;
        Ok(Self {
            package_name: package_name.into(),
            store,
            changes,
            analysis_date: Utc::now(),
            metadata,
            lifecycle: OnceLock::new(),
        })
    }

    #[must_use]
    pub const fn with_analysis_date(mut self, date: DateTime<Utc>) -> Self {
        self.analysis_date = date;
        self
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    #[must_use]
    pub fn versions(&self) -> &[VersionInfo] {
        self.store.versions()
    }

    pub fn version_names(&self) -> impl Iterator<Item = &str> {
        self.store.version_names()
    }

    #[must_use]
    pub const fn store(&self) -> &SnapshotStore {
        &self.store
    }

    #[must_use]
    pub fn changes(&self) -> &[ApiChange] {
        &self.changes
    }

    #[must_use]
    pub const fn analysis_date(&self) -> DateTime<Utc> {
        self.analysis_date
    }

    #[must_use]
    pub const fn metadata(&self) -> &AnalysisMetadata {
        &self.metadata
    }

    /// The snapshot recorded for `version`, if it was analyzed.
    #[must_use]
    pub fn snapshot(&self, version: &str) -> Option<&Snapshot> {
        self.store.snapshot(version)
    }

    pub fn filtered_changes<'a>(
        &'a self,
        filter: &'a ChangeFilter,
    ) -> impl Iterator<Item = &'a ApiChange> + 'a {
        self.changes.iter().filter(move |c| filter.matches(c))
    }

    pub fn breaking_changes(&self) -> impl Iterator<Item = &ApiChange> {
        self.changes.iter().filter(|c| c.is_breaking())
    }

    #[must_use]
    pub fn has_breaking_changes(&self) -> bool {
        self.changes.iter().any(ApiChange::is_breaking)
    }

    /// The lifecycle index, built once per result on first use.
    #[must_use]
    pub fn lifecycle_index(&self) -> &LifecycleIndex {
        self.lifecycle
            .get_or_init(|| LifecycleIndex::build(&self.store, &self.changes))
    }

    /// Lifecycle query against the cached index.
    #[must_use]
    pub fn lifecycle(&self, name: &str) -> Lifecycle {
        self.lifecycle_index().lifecycle(name)
    }

    #[must_use]
    pub fn summary(&self) -> AnalysisSummary {
        SummaryAggregator::new().aggregate(&self.store, &self.changes)
    }

    /// Serialize to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Deserialize from JSON, re-checking every invariant.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("analysis result")
    }
}

fn validate_changes(store: &SnapshotStore, changes: &[ApiChange]) -> Result<()> {
    let positions: HashSet<&str> = store.version_names().collect();
    let mut seen = HashSet::with_capacity(changes.len());

    for change in changes {
        let full_name = change.full_name();
        for version in [&change.from_version, &change.to_version].into_iter().flatten() {
            if !positions.contains(version.as_str()) {
                return Err(InvariantViolation::UnknownChangeVersion {
                    full_name,
                    version: version.clone(),
                }
                .into());
            }
        }

        let from = change.from_version.as_deref();
        let to = change.to_version.as_deref();
        if !seen.insert((full_name.clone(), from, to, change.change_type)) {
            return Err(InvariantViolation::DuplicateChange {
                full_name,
                transition: format!("{} -> {}", from.unwrap_or("-"), to.unwrap_or("-")),
                change_type: change.change_type.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisType;
    use crate::diff::{ChangeType, DiffEngine};
    use crate::model::{ApiKind, Signature};

    fn sample() -> AnalysisResult {
        let foo = |sig: &str| {
            ApiElement::new("pkg", "foo", ApiKind::Function)
                .with_signature(Signature::parse(sig).unwrap())
        };
        let store = SnapshotStore::new(
            vec![
                VersionInfo::new("V1"),
                VersionInfo::new("V2"),
                VersionInfo::new("V3"),
            ],
            vec![
                Snapshot::new("V1", vec![foo("(x)")]).unwrap(),
                Snapshot::new("V2", vec![foo("(x, y=1)")]).unwrap(),
                Snapshot::empty("V3"),
            ],
        )
        .unwrap();
        let changes = DiffEngine::new().diff(&store);
        AnalysisResult::new("demo", store, changes, AnalysisMetadata::new(AnalysisType::Analyze))
            .unwrap()
    }

    #[test]
    fn test_json_roundtrip_is_equal() {
        let result = sample();
        let json = result.to_json(true).unwrap();
        let back = AnalysisResult::from_json(&json).unwrap();
        assert_eq!(result, back);
        assert_eq!(back.changes().len(), 2);
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["package_name"], "demo");
        assert_eq!(value["versions"][0]["version"], "V1");
        assert!(value["api_elements"]["V3"].as_array().unwrap().is_empty());
        assert_eq!(value["changes"][1]["change_type"], "removed");
    }

    #[test]
    fn test_snapshot_lookup_and_filters() {
        let result = sample();
        assert_eq!(result.snapshot("V2").map(Snapshot::len), Some(1));
        assert!(result.snapshot("V9").is_none());

        let filter = ChangeFilter::new().change_types([ChangeType::Removed]);
        assert_eq!(result.filtered_changes(&filter).count(), 1);
        assert!(result.has_breaking_changes());
        assert_eq!(result.breaking_changes().count(), 1);
    }

    #[test]
    fn test_duplicate_change_is_rejected() {
        let result = sample();
        let mut changes = result.changes().to_vec();
        changes.push(changes[0].clone());
        let err = AnalysisResult::new(
            "demo",
            result.store().clone(),
            changes,
            AnalysisMetadata::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Invariant(InvariantViolation::DuplicateChange { .. })
        ));
    }

    #[test]
    fn test_change_outside_sequence_is_rejected() {
        let result = sample();
        let mut changes = result.changes().to_vec();
        changes[0].to_version = Some("V9".into());
        assert!(AnalysisResult::new(
            "demo",
            result.store().clone(),
            changes,
            AnalysisMetadata::default()
        )
        .is_err());
    }

    #[test]
    fn test_from_json_rejects_misaligned_input() {
        let json = r#"{
            "package_name": "demo",
            "versions": [{"version": "1.0"}],
            "api_elements": {},
            "changes": [],
            "analysis_date": "2024-01-01T00:00:00Z"
        }"#;
        assert!(matches!(
            AnalysisResult::from_json(json),
            Err(EvolutionError::Parse { .. })
        ));
    }

    #[test]
    fn test_lifecycle_through_result() {
        let life = sample().lifecycle("foo");
        assert_eq!(life.introduced_in.as_deref(), Some("V1"));
        assert_eq!(life.removed_in.as_deref(), Some("V3"));
        assert_eq!(life.versions_present, vec!["V1", "V2"]);
    }

    #[test]
    fn test_lifecycle_index_built_once() {
        let result = sample();
        let first = result.lifecycle_index();
        let second = result.lifecycle_index();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.api_count(), 1);

        // the cache is not part of equality or the serialized form
        let fresh = sample().with_analysis_date(result.analysis_date());
        assert_eq!(result, fresh);
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("lifecycle").is_none());
    }
}
