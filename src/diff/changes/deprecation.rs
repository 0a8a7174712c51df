//! Deprecation change computer implementation.

use crate::diff::traits::ChangeComputer;
use crate::diff::ApiChange;
use crate::model::Snapshot;

/// Computes `is_deprecated` flips from false to true.
///
/// Independent of signature equality: an element may be both modified and
/// deprecated in the same transition.
pub struct DeprecationChangeComputer;

impl DeprecationChangeComputer {
    /// Create a new deprecation change computer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for DeprecationChangeComputer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeComputer for DeprecationChangeComputer {
    type ChangeSet = Vec<ApiChange>;

    fn compute(&self, old: &Snapshot, new: &Snapshot) -> Vec<ApiChange> {
        new.iter()
            .filter(|(full_name, after)| {
                after.is_deprecated
                    && old
                        .get(full_name)
                        .is_some_and(|before| !before.is_deprecated)
            })
            .map(|(_, after)| ApiChange::deprecated(after, old.version(), new.version()))
            .collect()
    }

    fn name(&self) -> &'static str {
        "DeprecationChangeComputer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApiElement, ApiKind};

    fn snapshot(version: &str, deprecated: bool) -> Snapshot {
        Snapshot::new(
            version,
            vec![ApiElement::new("pkg", "old_api", ApiKind::Function).deprecated(deprecated)],
        )
        .unwrap()
    }

    #[test]
    fn test_flip_to_deprecated() {
        let changes =
            DeprecationChangeComputer::new().compute(&snapshot("1.0", false), &snapshot("1.1", true));
        assert_eq!(changes.len(), 1);
        assert!(changes[0].is_backwards_compatible);
    }

    #[test]
    fn test_no_record_for_undeprecation_or_steady_state() {
        let computer = DeprecationChangeComputer::new();
        assert!(computer
            .compute(&snapshot("1.0", true), &snapshot("1.1", false))
            .is_empty());
        assert!(computer
            .compute(&snapshot("1.0", true), &snapshot("1.1", true))
            .is_empty());
    }

    #[test]
    fn test_added_already_deprecated_is_not_a_deprecation() {
        let changes = DeprecationChangeComputer::new()
            .compute(&Snapshot::empty("1.0"), &snapshot("1.1", true));
        assert!(changes.is_empty());
    }
}
