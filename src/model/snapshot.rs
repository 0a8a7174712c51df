//! Per-version API snapshots and the ordered snapshot store.

use super::version::check_sequence;
use super::{ApiElement, VersionInfo};
use crate::error::{EvolutionError, InvariantViolation, Result};
use crate::utils::hash_str_parts;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Immutable mapping from full name to element for exactly one version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRepr", into = "SnapshotRepr")]
pub struct Snapshot {
    version: String,
    elements: BTreeMap<String, ApiElement>,
    /// Hash over everything the diff inspects, for quick equality checks
    content_hash: u64,
}

/// Wire form: elements as a list ordered by full name.
#[derive(Serialize, Deserialize)]
struct SnapshotRepr {
    version: String,
    elements: Vec<ApiElement>,
}

impl TryFrom<SnapshotRepr> for Snapshot {
    type Error = EvolutionError;

    fn try_from(repr: SnapshotRepr) -> Result<Self> {
        Self::new(repr.version, repr.elements)
    }
}

impl From<Snapshot> for SnapshotRepr {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            version: snapshot.version,
            elements: snapshot.elements.into_values().collect(),
        }
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.elements == other.elements
    }
}

impl Snapshot {
    /// Build a snapshot, rejecting duplicate full names.
    ///
    /// Signatures are normalized on the way in.
    pub fn new(
        version: impl Into<String>,
        elements: impl IntoIterator<Item = ApiElement>,
    ) -> Result<Self> {
        let version = version.into();
        let mut map = BTreeMap::new();
        for mut element in elements {
            element.signature = element.signature.map(|s| s.normalized());
            let full_name = element.full_name();
            if map.contains_key(&full_name) {
                return Err(InvariantViolation::DuplicateElement { version, full_name }.into());
            }
            map.insert(full_name, element);
        }
        Ok(Self::from_validated(version, map))
    }

    /// Build a snapshot from an already keyed map, checking every key.
    pub fn from_map(
        version: impl Into<String>,
        elements: BTreeMap<String, ApiElement>,
    ) -> Result<Self> {
        let version = version.into();
        let mut normalized = BTreeMap::new();
        for (key, mut element) in elements {
            let full_name = element.full_name();
            if key != full_name {
                return Err(InvariantViolation::ElementKeyMismatch { key, full_name }.into());
            }
            element.signature = element.signature.map(|s| s.normalized());
            normalized.insert(key, element);
        }
        Ok(Self::from_validated(version, normalized))
    }

    /// An empty snapshot, e.g. for a release that exports nothing.
    pub fn empty(version: impl Into<String>) -> Self {
        Self::from_validated(version.into(), BTreeMap::new())
    }

    fn from_validated(version: String, elements: BTreeMap<String, ApiElement>) -> Self {
        let content_hash = compute_content_hash(&elements);
        Self {
            version,
            elements,
            content_hash,
        }
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn get(&self, full_name: &str) -> Option<&ApiElement> {
        self.elements.get(full_name)
    }

    #[must_use]
    pub fn contains(&self, full_name: &str) -> bool {
        self.elements.contains_key(full_name)
    }

    /// Elements ordered by full name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApiElement)> {
        self.elements.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn elements(&self) -> impl Iterator<Item = &ApiElement> {
        self.elements.values()
    }

    pub fn full_names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub const fn content_hash(&self) -> u64 {
        self.content_hash
    }
}

fn compute_content_hash(elements: &BTreeMap<String, ApiElement>) -> u64 {
    let rendered: Vec<String> = elements
        .iter()
        .map(|(name, elem)| {
            format!(
                "{name}|{}|{}",
                elem.signature_text().unwrap_or_default(),
                elem.is_deprecated
            )
        })
        .collect();
    hash_str_parts(rendered.iter().map(String::as_str))
}

/// Check that `versions` and `snapshots` line up 1:1 and form a valid
/// chronological sequence.
pub(crate) fn validate_sequence(versions: &[VersionInfo], snapshots: &[Snapshot]) -> Result<()> {
    if versions.len() != snapshots.len() {
        return Err(InvariantViolation::Misaligned {
            versions: versions.len(),
            snapshots: snapshots.len(),
        }
        .into());
    }
    check_sequence(versions)?;
    for (index, (info, snapshot)) in versions.iter().zip(snapshots).enumerate() {
        if info.version != snapshot.version {
            return Err(InvariantViolation::SnapshotVersionMismatch {
                index,
                expected: info.version.clone(),
                found: snapshot.version.clone(),
            }
            .into());
        }
    }
    Ok(())
}

/// Ordered sequence of `(version, snapshot)` pairs, immutable once assembled.
///
/// Guarantees: versions and snapshots are aligned 1:1, versions are unique,
/// and dated versions never go backwards in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotStore {
    versions: Vec<VersionInfo>,
    snapshots: Vec<Snapshot>,
}

impl SnapshotStore {
    pub fn new(versions: Vec<VersionInfo>, snapshots: Vec<Snapshot>) -> Result<Self> {
        validate_sequence(&versions, &snapshots)?;
        Ok(Self {
            versions,
            snapshots,
        })
    }

    /// Reassemble snapshots produced out of order (e.g. by parallel
    /// extraction) into the order of `sequence`.
    ///
    /// Versions in `sequence` without a snapshot are dropped and returned.
    pub fn assemble(
        sequence: &[VersionInfo],
        snapshots: impl IntoIterator<Item = Snapshot>,
    ) -> Result<(Self, Vec<String>)> {
        let mut by_version: HashMap<String, Snapshot> = HashMap::new();
        for snapshot in snapshots {
            let version = snapshot.version.clone();
            if by_version.insert(version.clone(), snapshot).is_some() {
                return Err(InvariantViolation::DuplicateVersion(version).into());
            }
        }

        let mut versions = Vec::with_capacity(sequence.len());
        let mut ordered = Vec::with_capacity(sequence.len());
        let mut missing = Vec::new();
        for info in sequence {
            match by_version.remove(&info.version) {
                Some(snapshot) => {
                    versions.push(info.clone());
                    ordered.push(snapshot);
                }
                None => missing.push(info.version.clone()),
            }
        }

        Ok((Self::new(versions, ordered)?, missing))
    }

    #[must_use]
    pub fn versions(&self) -> &[VersionInfo] {
        &self.versions
    }

    #[must_use]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn version_names(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(|v| v.version.as_str())
    }

    #[must_use]
    pub fn snapshot(&self, version: &str) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.version == version)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Consecutive snapshot pairs, in sequence order.
    pub fn transitions(&self) -> impl Iterator<Item = (&Snapshot, &Snapshot)> {
        self.snapshots.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<VersionInfo>, Vec<Snapshot>) {
        (self.versions, self.snapshots)
    }
}
