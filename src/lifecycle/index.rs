//! Lifecycle index over one package's change history.

use super::{ApiCandidate, Lifecycle, MatchKind, Modification};
use crate::diff::{ApiChange, ChangeType};
use crate::model::{ApiKind, SnapshotStore};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Everything the index knows about one full name.
#[derive(Debug, Clone)]
struct Entry {
    kind: ApiKind,
    /// Indices into the version sequence, ascending
    present: Vec<usize>,
    deprecated_at: Option<usize>,
    modifications: Vec<Modification>,
}

/// Queryable index built once per analysis result.
///
/// A query is first tried as an exact full name, then as a simple name.
/// A simple name shared by more than one element reports a collision
/// instead of guessing; anything else resolves to nothing.
#[derive(Debug, Clone, Default)]
pub struct LifecycleIndex {
    versions: Vec<String>,
    entries: BTreeMap<String, Entry>,
    by_simple: HashMap<String, BTreeSet<String>>,
}

impl LifecycleIndex {
    /// Build the index from the snapshot sequence and its change list.
    #[must_use]
    pub fn build(store: &SnapshotStore, changes: &[ApiChange]) -> Self {
        let mut index = Self {
            versions: store.version_names().map(str::to_string).collect(),
            ..Self::default()
        };

        for (position, snapshot) in store.snapshots().iter().enumerate() {
            for (full_name, element) in snapshot.iter() {
                let entry = index
                    .entries
                    .entry(full_name.to_string())
                    .or_insert_with(|| Entry {
                        kind: element.kind,
                        present: Vec::new(),
                        deprecated_at: None,
                        modifications: Vec::new(),
                    });
                entry.present.push(position);
                if element.is_deprecated && entry.deprecated_at.is_none() {
                    entry.deprecated_at = Some(position);
                }
                index
                    .by_simple
                    .entry(element.simple_name().to_string())
                    .or_default()
                    .insert(full_name.to_string());
            }
        }

        for change in changes.iter().filter(|c| c.change_type == ChangeType::Modified) {
            if let Some(entry) = index.entries.get_mut(&change.full_name()) {
                entry.modifications.push(Modification {
                    version: change.to_version.clone().unwrap_or_default(),
                    old_signature: change.old_signature.clone(),
                    new_signature: change.new_signature.clone(),
                    description: change.description.clone(),
                    is_backwards_compatible: change.is_backwards_compatible,
                });
            }
        }

        tracing::debug!(
            apis = index.entries.len(),
            versions = index.versions.len(),
            "built lifecycle index"
        );
        index
    }

    /// Number of distinct full names ever observed.
    #[must_use]
    pub fn api_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Every full name the index knows, sorted.
    pub fn full_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Elements a query could refer to: the exact full name, else every
    /// element sharing the simple name.
    #[must_use]
    pub fn candidates(&self, query: &str) -> (Option<MatchKind>, Vec<ApiCandidate>) {
        if self.entries.contains_key(query) {
            return (Some(MatchKind::Exact), self.to_candidates([query]));
        }
        match self.by_simple.get(query).filter(|hits| !hits.is_empty()) {
            Some(hits) => (
                Some(MatchKind::SimpleName),
                self.to_candidates(hits.iter().map(String::as_str)),
            ),
            None => (None, Vec::new()),
        }
    }

    /// Answer "when did this API appear, change, and disappear?".
    #[must_use]
    pub fn lifecycle(&self, query: &str) -> Lifecycle {
        let (match_kind, candidates) = self.candidates(query);

        if candidates.len() > 1 {
            tracing::debug!(query, matches = candidates.len(), "ambiguous lifecycle query");
            return Lifecycle {
                query: query.to_string(),
                match_kind,
                collision_detected: true,
                available_apis: candidates,
                ..Lifecycle::default()
            };
        }

        match candidates.first() {
            Some(single) => self.resolved(query, &single.full_name, match_kind),
            None => Lifecycle::unresolved(query),
        }
    }

    fn resolved(&self, query: &str, full_name: &str, match_kind: Option<MatchKind>) -> Lifecycle {
        let Some(entry) = self.entries.get(full_name) else {
            return Lifecycle::unresolved(query);
        };
        let name_at = |idx: usize| self.versions.get(idx).cloned();

        let last = entry.present.last().copied();
        Lifecycle {
            query: query.to_string(),
            introduced_in: entry.present.first().and_then(|&idx| name_at(idx)),
            removed_in: last.and_then(|idx| name_at(idx + 1)),
            deprecated_in: entry.deprecated_at.and_then(name_at),
            versions_present: entry.present.iter().filter_map(|&idx| name_at(idx)).collect(),
            modifications: entry.modifications.clone(),
            matched_api: Some(full_name.to_string()),
            match_kind,
            collision_detected: false,
            available_apis: Vec::new(),
        }
    }

    fn to_candidates<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<ApiCandidate> {
        names
            .into_iter()
            .filter_map(|name| {
                self.entries.get(name).map(|entry| ApiCandidate {
                    full_name: name.to_string(),
                    kind: entry.kind,
                })
            })
            .collect()
    }
}
