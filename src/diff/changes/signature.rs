//! Signature change computer implementation.

use crate::diff::traits::ChangeComputer;
use crate::diff::{ApiChange, Compatibility};
use crate::model::Snapshot;

/// Computes signature modifications of elements present on both sides.
///
/// Signatures are compared structurally after normalization; differences in
/// decorators or metadata alone never produce a record.
pub struct SignatureChangeComputer;

impl SignatureChangeComputer {
    /// Create a new signature change computer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for SignatureChangeComputer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeComputer for SignatureChangeComputer {
    type ChangeSet = Vec<ApiChange>;

    fn compute(&self, old: &Snapshot, new: &Snapshot) -> Vec<ApiChange> {
        new.iter()
            .filter_map(|(full_name, after)| {
                let before = old.get(full_name)?;
                if before.signature == after.signature {
                    return None;
                }
                let compat =
                    Compatibility::check(before.signature.as_ref(), after.signature.as_ref());
                Some(ApiChange::modified(
                    before,
                    after,
                    old.version(),
                    new.version(),
                    compat.reasons(),
                ))
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "SignatureChangeComputer"
    }
}
