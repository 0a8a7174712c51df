//! Evolution diff engine implementation.

use super::changes::{DeprecationChangeComputer, PresenceChangeComputer, SignatureChangeComputer};
use super::traits::ChangeComputer;
use super::ApiChange;
use crate::error::Result;
use crate::model::{validate_sequence, Snapshot, SnapshotStore, VersionInfo};

/// Computes the ordered change list over a snapshot sequence.
///
/// Output order: transition index ascending, then full name, then change
/// type. Running the engine twice on the same input yields the same list.
pub struct DiffEngine {
    track_deprecations: bool,
    use_content_hash: bool,
}

impl DiffEngine {
    /// Create a new diff engine with default settings
    #[must_use]
    pub const fn new() -> Self {
        Self {
            track_deprecations: true,
            use_content_hash: true,
        }
    }

    /// Emit `Deprecated` records when `is_deprecated` flips on
    #[must_use]
    pub const fn track_deprecations(mut self, track: bool) -> Self {
        self.track_deprecations = track;
        self
    }

    /// Skip transitions whose snapshots hash identically
    #[must_use]
    pub const fn with_content_hash(mut self, enabled: bool) -> Self {
        self.use_content_hash = enabled;
        self
    }

    /// Diff every consecutive pair of an assembled store.
    #[must_use]
    pub fn diff(&self, store: &SnapshotStore) -> Vec<ApiChange> {
        self.diff_snapshots(store.snapshots())
    }

    /// Diff a loose version/snapshot sequence, validating it first.
    ///
    /// Fails with an invariant error when the sequence is misaligned,
    /// duplicated, or not chronological.
    pub fn diff_sequence(
        &self,
        versions: &[VersionInfo],
        snapshots: &[Snapshot],
    ) -> Result<Vec<ApiChange>> {
        validate_sequence(versions, snapshots)?;
        Ok(self.diff_snapshots(snapshots))
    }

    /// Changes for one transition, sorted by full name then change type.
    #[must_use]
    pub fn diff_pair(&self, old: &Snapshot, new: &Snapshot) -> Vec<ApiChange> {
        if self.use_content_hash
            && old.content_hash() == new.content_hash()
            && old.len() == new.len()
        {
            tracing::debug!(
                from = old.version(),
                to = new.version(),
                "snapshots identical, skipping transition"
            );
            return Vec::new();
        }

        let presence = PresenceChangeComputer::new().compute(old, new);
        let modified = SignatureChangeComputer::new().compute(old, new);
        let deprecated = if self.track_deprecations {
            DeprecationChangeComputer::new().compute(old, new)
        } else {
            Vec::new()
        };

        tracing::debug!(
            from = old.version(),
            to = new.version(),
            added = presence.added.len(),
            removed = presence.removed.len(),
            modified = modified.len(),
            deprecated = deprecated.len(),
            "computed transition"
        );

        let mut changes: Vec<(String, ApiChange)> = presence
            .added
            .into_iter()
            .chain(presence.removed)
            .chain(modified)
            .chain(deprecated)
            .map(|change| (change.full_name(), change))
            .collect();
        changes.sort_by(|(a_name, a), (b_name, b)| {
            a_name.cmp(b_name).then(a.change_type.cmp(&b.change_type))
        });
        changes.into_iter().map(|(_, change)| change).collect()
    }

    fn diff_snapshots(&self, snapshots: &[Snapshot]) -> Vec<ApiChange> {
        snapshots
            .windows(2)
            .flat_map(|pair| self.diff_pair(&pair[0], &pair[1]))
            .collect()
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}
