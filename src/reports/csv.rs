//! CSV report generator.
//!
//! One row per change, suitable for spreadsheet import and data analysis
//! pipelines.

use super::escape::escape_csv;
use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::analysis::AnalysisResult;
use crate::lifecycle::Lifecycle;
use crate::model::VersionInfo;

/// CSV report generator.
pub struct CsvReporter;

impl CsvReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn opt(s: Option<&str>) -> String {
    escape_csv(s.unwrap_or("-"))
}

impl ReportGenerator for CsvReporter {
    fn generate_analysis_report(
        &self,
        result: &AnalysisResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut content = String::new();
        content.push_str(
            "Change,API,Kind,From,To,Old Signature,New Signature,Backwards Compatible,Description\n",
        );

        for change in super::selected_changes(result, config) {
            content.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                change.change_type,
                escape_csv(&change.full_name()),
                change.element.kind,
                opt(change.from_version.as_deref()),
                opt(change.to_version.as_deref()),
                opt(change.old_signature.as_deref()),
                opt(change.new_signature.as_deref()),
                change.is_backwards_compatible,
                escape_csv(&change.description)
            ));
        }

        Ok(content)
    }

    fn generate_lifecycle_report(
        &self,
        lifecycle: &Lifecycle,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut content = String::new();
        if lifecycle.collision_detected {
            content.push_str("Candidate,Kind\n");
            for candidate in &lifecycle.available_apis {
                content.push_str(&format!(
                    "{},{}\n",
                    escape_csv(&candidate.full_name),
                    candidate.kind
                ));
            }
            return Ok(content);
        }

        content.push_str("API,Introduced,Removed,Deprecated,Versions Present\n");
        if let Some(matched) = &lifecycle.matched_api {
            content.push_str(&format!(
                "{},{},{},{},{}\n",
                escape_csv(matched),
                opt(lifecycle.introduced_in.as_deref()),
                opt(lifecycle.removed_in.as_deref()),
                opt(lifecycle.deprecated_in.as_deref()),
                escape_csv(&lifecycle.versions_present.join(" "))
            ));
        }
        Ok(content)
    }

    fn generate_versions_report(
        &self,
        _package: &str,
        versions: &[VersionInfo],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut content = String::from("Version,Released,Yanked,Yanked Reason\n");
        for info in versions {
            let released = info.released_at.map(|at| at.to_rfc3339());
            content.push_str(&format!(
                "{},{},{},{}\n",
                escape_csv(&info.version),
                opt(released.as_deref()),
                info.yanked,
                opt(info.yanked_reason.as_deref())
            ));
        }
        Ok(content)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisMetadata, ChangeFilter};
    use crate::diff::{ChangeType, DiffEngine};
    use crate::model::{ApiElement, ApiKind, Signature, Snapshot, SnapshotStore};

    fn result() -> AnalysisResult {
        let foo = |sig: &str| {
            ApiElement::new("pkg", "foo", ApiKind::Function)
                .with_signature(Signature::parse(sig).unwrap())
        };
        let store = SnapshotStore::new(
            vec![VersionInfo::new("1.0"), VersionInfo::new("2.0"), VersionInfo::new("3.0")],
            vec![
                Snapshot::new("1.0", vec![foo("(x)")]).unwrap(),
                Snapshot::new("2.0", vec![foo("(x, y=1)")]).unwrap(),
                Snapshot::empty("3.0"),
            ],
        )
        .unwrap();
        let changes = DiffEngine::new().diff(&store);
        AnalysisResult::new("demo", store, changes, AnalysisMetadata::default()).unwrap()
    }

    #[test]
    fn test_one_row_per_change() {
        let csv = CsvReporter::new()
            .generate_analysis_report(&result(), &ReportConfig::default())
            .unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("modified,\"pkg.foo:function\",function,\"1.0\",\"2.0\""));
        assert!(lines[2].starts_with("removed,"));
        assert!(lines[2].contains(",false,"));
    }

    #[test]
    fn test_filter_and_limit() {
        let config = ReportConfig {
            filter: ChangeFilter::new().change_types([ChangeType::Modified, ChangeType::Removed]),
            max_items: Some(1),
            ..ReportConfig::default()
        };
        let csv = CsvReporter::new()
            .generate_analysis_report(&result(), &config)
            .unwrap();
        assert_eq!(csv.lines().count(), 2);
    }
}
