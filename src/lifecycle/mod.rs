//! API lifecycle queries.
//!
//! [`LifecycleIndex`] answers "when did this API appear, change, and
//! disappear?" for one analysis result. The name lookup is tiered and refuses
//! to guess: when a name is shared by several elements the result reports a
//! collision and lists the candidates.

mod index;
mod types;

pub use index::LifecycleIndex;
pub use types::{ApiCandidate, Lifecycle, MatchKind, Modification};
