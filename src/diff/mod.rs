//! Evolution diff engine.
//!
//! Computes the ordered list of [`ApiChange`] records between consecutive
//! snapshots of a [`SnapshotStore`](crate::model::SnapshotStore).
//!
//! # Architecture
//!
//! - [`ChangeComputer`](traits::ChangeComputer): trait for one change category
//! - Individual change computers in the [`changes`] module
//! - [`Compatibility`]: the advisory backward-compatibility heuristic applied
//!   to signature modifications
//!
//! # Example
//!
//! ```ignore
//! use api_evolution::diff::DiffEngine;
//!
//! let changes = DiffEngine::new().diff(&store);
//! for change in changes.iter().filter(|c| c.is_breaking()) {
//!     println!("{}: {}", change.full_name(), change.description);
//! }
//! ```

pub mod changes;
mod compat;
mod engine;
mod result;
pub mod traits;

pub use compat::Compatibility;
pub use engine::DiffEngine;
pub use result::{ApiChange, ChangeType};
pub use traits::{ChangeComputer, PresenceChangeSet};
