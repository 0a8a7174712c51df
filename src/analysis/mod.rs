//! Analysis results and summaries.
//!
//! [`AnalysisResult`] is the record one analysis session produces: the
//! version sequence, per-version snapshots, the ordered change list, and
//! [`AnalysisMetadata`] describing how it was obtained. [`SummaryAggregator`]
//! reduces a result to counts; [`ChangeFilter`] narrows the change list.

mod filter;
mod metadata;
mod result;
mod summary;

pub use filter::ChangeFilter;
pub use metadata::{AnalysisMetadata, AnalysisType, AnalysisWarning};
pub use result::AnalysisResult;
pub use summary::{AnalysisSummary, SummaryAggregator, VersionRange, VersionSummary};
