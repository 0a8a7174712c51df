//! Trait definitions for diff computation strategies.
//!
//! Each change category (presence, signature, deprecation) is computed by its
//! own [`ChangeComputer`] over one pair of consecutive snapshots, which keeps
//! the categories independent and testable in isolation.

use super::ApiChange;
use crate::model::Snapshot;

/// Trait for computing a specific type of change between two snapshots.
pub trait ChangeComputer: Send + Sync {
    /// The type of changes this computer produces.
    type ChangeSet;

    /// Compute changes from `old` (earlier version) to `new` (later version).
    fn compute(&self, old: &Snapshot, new: &Snapshot) -> Self::ChangeSet;

    /// Get the name of this change computer for logging/debugging.
    fn name(&self) -> &str;
}

/// Container for presence changes (added, removed).
#[derive(Debug, Clone, Default)]
pub struct PresenceChangeSet {
    pub added: Vec<ApiChange>,
    pub removed: Vec<ApiChange>,
}

impl PresenceChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_change_set_empty() {
        let set = PresenceChangeSet::new();
        assert!(set.is_empty());
        assert_eq!(set.total(), 0);
    }
}
