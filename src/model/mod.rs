//! Data model for API evolution analysis.
//!
//! Everything here is produced once and never mutated afterwards:
//!
//! - [`ApiElement`] is one element of a library's interface, identified by
//!   `(module_path, name, kind)`.
//! - [`Signature`] is the normalized callable descriptor used for structural
//!   equality.
//! - [`VersionInfo`] and [`VersionCatalog`] describe the published releases.
//! - [`Snapshot`] maps full names to elements for one version, and
//!   [`SnapshotStore`] pairs an ordered version sequence with its snapshots.

mod element;
mod signature;
mod snapshot;
mod version;

pub use element::{format_full_name, ApiElement, ApiKind};
pub use signature::{normalize_annotation, Parameter, ParameterKind, Signature};
pub(crate) use snapshot::validate_sequence;
pub use snapshot::{Snapshot, SnapshotStore};
pub use version::{VersionCatalog, VersionInfo};
