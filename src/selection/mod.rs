//! Version selection.
//!
//! Resolves a chronologically ordered [`VersionCatalog`](crate::model::VersionCatalog)
//! and a [`SelectionConfig`] into the ordered, duplicate-free list of versions
//! to analyze. Exactly one strategy may be configured:
//!
//! - explicit list of versions (unknown entries are reported, not fatal)
//! - inclusive `from`/`to` range in catalog order
//! - evenly spaced sample of at most `max_versions`
//! - inclusive release-date window
//!
//! Yanked releases are skipped unless `include_yanked` is set.

mod config;
mod selector;

pub use config::{SelectionConfig, SelectionStrategy};
pub use selector::{sample_indices, Selection, SelectionWarning, VersionSelector};
