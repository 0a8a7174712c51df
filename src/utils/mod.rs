//! Shared utilities.

mod hash;
mod version;

pub use hash::{content_hash, hash_str_parts};
pub use version::{compare_versions, normalize_version};
