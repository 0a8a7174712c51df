//! **Track how a package's public API evolves across its release history.**
//!
//! `api-evolution` takes per-version snapshots of a package's public API
//! (functions, classes, methods, properties, constants and modules together
//! with their call signatures) and turns them into an ordered change history:
//! what was added, removed, modified or deprecated between each pair of
//! consecutive releases, and whether each change keeps callers working.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: API elements, parsed [`Signature`]s, per-version
//!   [`Snapshot`]s and the ordered [`SnapshotStore`].
//! - **[`selection`]**: The [`VersionSelector`] that picks which releases to
//!   analyze (explicit list, range, even sample or release-date window).
//! - **[`diff`]**: The [`DiffEngine`] producing [`ApiChange`] records with a
//!   backwards-compatibility verdict.
//! - **[`lifecycle`]**: The [`LifecycleIndex`] answering "when did `X`
//!   appear, change and disappear", with name-collision detection.
//! - **[`analysis`]**: The serializable [`AnalysisResult`] and its
//!   [`AnalysisSummary`].
//! - **[`pipeline`]**: The [`Analyzer`] that wires catalog and snapshot
//!   sources, selection and diffing together.
//! - **[`reports`]**: JSON, summary, Markdown and CSV renderers.
//!
//! Snapshot extraction itself is outside this crate: snapshots come from a
//! [`SnapshotSource`] such as the on-disk [`DirectorySource`].
//!
//! ## Getting Started
//!
//! ```
//! use api_evolution::{
//!     Analyzer, ApiElement, ApiKind, ChangeType, InMemorySource, SelectionConfig, Signature,
//!     Snapshot, VersionInfo,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connect = |sig: &str| -> api_evolution::Result<ApiElement> {
//!         Ok(ApiElement::new("netlib", "connect", ApiKind::Function)
//!             .with_signature(Signature::parse(sig)?))
//!     };
//!
//!     let source = InMemorySource::new()
//!         .with_catalog("netlib", vec![VersionInfo::new("1.0"), VersionInfo::new("2.0")])
//!         .with_snapshot("netlib", Snapshot::new("1.0", vec![connect("(host)")?])?)
//!         .with_snapshot("netlib", Snapshot::new("2.0", vec![connect("(host, port)")?])?);
//!
//!     let result = Analyzer::new(source).analyze("netlib", &SelectionConfig::default())?;
//!
//!     let change = &result.changes()[0];
//!     assert_eq!(change.change_type, ChangeType::Modified);
//!     assert!(!change.is_backwards_compatible);
//!
//!     let lifecycle = result.lifecycle("connect");
//!     assert_eq!(lifecycle.introduced_in.as_deref(), Some("1.0"));
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `api-evolution` library crate. The binary
//! of the same name exposes `analyze`, `compare`, `lifecycle`, `versions` and
//! `summary` subcommands over a data directory of catalogs and snapshots.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Sampling and percentage math cast between usize and f64; values are bounded
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod analysis;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod pipeline;
pub mod reports;
pub mod selection;
pub mod utils;

// Re-export main types for convenience
pub use analysis::{AnalysisMetadata, AnalysisResult, AnalysisSummary, ChangeFilter};
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset};
pub use config::{ConfigError, Validatable};
pub use diff::{ApiChange, ChangeType, DiffEngine};
pub use error::{ErrorContext, EvolutionError, InvariantViolation, OptionContext, Result};
pub use lifecycle::{Lifecycle, LifecycleIndex};
pub use model::{
    ApiElement, ApiKind, Signature, Snapshot, SnapshotStore, VersionCatalog, VersionInfo,
};
pub use pipeline::{
    AnalysisOptions, Analyzer, CatalogSource, DirectorySource, InMemorySource, SnapshotSource,
};
pub use reports::{ReportFormat, ReportGenerator};
pub use selection::{SelectionConfig, VersionSelector};
