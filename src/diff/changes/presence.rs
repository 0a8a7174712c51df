//! Presence change computer implementation.

use crate::diff::traits::{ChangeComputer, PresenceChangeSet};
use crate::diff::ApiChange;
use crate::model::Snapshot;

/// Computes additions and removals of full names between snapshots.
pub struct PresenceChangeComputer;

impl PresenceChangeComputer {
    /// Create a new presence change computer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for PresenceChangeComputer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeComputer for PresenceChangeComputer {
    type ChangeSet = PresenceChangeSet;

    fn compute(&self, old: &Snapshot, new: &Snapshot) -> PresenceChangeSet {
        let mut result = PresenceChangeSet::new();

        for (full_name, element) in new.iter() {
            if !old.contains(full_name) {
                result
                    .added
                    .push(ApiChange::added(element, old.version(), new.version()));
            }
        }

        for (full_name, element) in old.iter() {
            if !new.contains(full_name) {
                result
                    .removed
                    .push(ApiChange::removed(element, old.version(), new.version()));
            }
        }

        result
    }

    fn name(&self) -> &'static str {
        "PresenceChangeComputer"
    }
}
