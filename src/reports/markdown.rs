//! Markdown report generator.

use super::escape::{escape_markdown_inline, escape_markdown_table, escape_md_opt};
use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::analysis::AnalysisResult;
use crate::lifecycle::Lifecycle;
use crate::model::VersionInfo;
use std::fmt::Write;

/// Markdown report generator, suitable for changelogs and PR comments.
pub struct MarkdownReporter;

impl MarkdownReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate_analysis_report(
        &self,
        result: &AnalysisResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let summary = result.summary();
        let mut md = String::new();

        let title = config
            .title
            .clone()
            .unwrap_or_else(|| format!("API Evolution: {}", result.package_name()));
        writeln!(md, "# {}\n", escape_markdown_inline(&title))?;

        if let Some(range) = &summary.version_range {
            writeln!(
                md,
                "Analyzed **{}** versions, `{}` to `{}`, on {}.\n",
                summary.total_versions,
                range.first,
                range.last,
                result.analysis_date().format("%Y-%m-%d")
            )?;
        } else {
            writeln!(md, "No versions were analyzed.\n")?;
        }

        writeln!(md, "## Summary\n")?;
        writeln!(md, "| Change | Count |")?;
        writeln!(md, "|--------|------:|")?;
        for (change_type, count) in &summary.change_types {
            writeln!(md, "| {change_type} | {count} |")?;
        }
        writeln!(md, "| **breaking** | {} |", summary.breaking_changes)?;
        writeln!(md)?;
        writeln!(md, "Distinct APIs observed: {}\n", summary.unique_apis)?;

        let changes = super::selected_changes(result, config);
        if !changes.is_empty() {
            writeln!(md, "## Changes\n")?;
            writeln!(md, "| Transition | Change | API | Old signature | New signature | Breaking |")?;
            writeln!(md, "|------------|--------|-----|---------------|---------------|:--------:|")?;
            for change in changes {
                writeln!(
                    md,
                    "| {} → {} | {} | `{}` | {} | {} | {} |",
                    escape_md_opt(change.from_version.as_deref()),
                    escape_md_opt(change.to_version.as_deref()),
                    change.change_type,
                    escape_markdown_table(&change.element.qualified_name()),
                    escape_md_opt(change.old_signature.as_deref()),
                    escape_md_opt(change.new_signature.as_deref()),
                    if change.is_breaking() { "yes" } else { "" }
                )?;
            }
            writeln!(md)?;
        }

        let metadata = result.metadata();
        if metadata.has_warnings() {
            writeln!(md, "## Warnings\n")?;
            for warning in &metadata.warnings {
                writeln!(md, "- {}", escape_markdown_inline(&warning.to_string()))?;
            }
            writeln!(md)?;
        }

        if !config.metadata.tool_version.is_empty() {
            writeln!(
                md,
                "---\n*Generated by api-evolution {}*",
                config.metadata.tool_version
            )?;
        }
        Ok(md)
    }

    fn generate_lifecycle_report(
        &self,
        lifecycle: &Lifecycle,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut md = String::new();
        writeln!(md, "# Lifecycle of `{}`\n", escape_markdown_table(&lifecycle.query))?;

        if lifecycle.collision_detected {
            writeln!(md, "The name is ambiguous. Matching APIs:\n")?;
            for candidate in &lifecycle.available_apis {
                writeln!(
                    md,
                    "- `{}` ({})",
                    escape_markdown_table(&candidate.full_name),
                    candidate.kind
                )?;
            }
            return Ok(md);
        }
        let Some(matched) = &lifecycle.matched_api else {
            writeln!(md, "No matching API found.")?;
            return Ok(md);
        };

        writeln!(md, "| Field | Value |")?;
        writeln!(md, "|-------|-------|")?;
        writeln!(md, "| API | `{}` |", escape_markdown_table(matched))?;
        writeln!(md, "| Introduced | {} |", escape_md_opt(lifecycle.introduced_in.as_deref()))?;
        writeln!(md, "| Removed | {} |", escape_md_opt(lifecycle.removed_in.as_deref()))?;
        writeln!(md, "| Deprecated | {} |", escape_md_opt(lifecycle.deprecated_in.as_deref()))?;
        writeln!(
            md,
            "| Present in | {} |",
            escape_markdown_table(&lifecycle.versions_present.join(", "))
        )?;

        if !lifecycle.modifications.is_empty() {
            writeln!(md, "\n## Modifications\n")?;
            for modification in &lifecycle.modifications {
                writeln!(
                    md,
                    "- **{}**: {}",
                    escape_markdown_inline(&modification.version),
                    escape_markdown_inline(&modification.description)
                )?;
            }
        }
        Ok(md)
    }

    fn generate_versions_report(
        &self,
        package: &str,
        versions: &[VersionInfo],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut md = String::new();
        writeln!(md, "# Versions of {}\n", escape_markdown_inline(package))?;
        writeln!(md, "| Version | Released | Yanked |")?;
        writeln!(md, "|---------|----------|--------|")?;
        for info in versions {
            let released = info
                .released_at
                .map_or_else(|| "-".to_string(), |at| at.date_naive().to_string());
            let yanked = match (info.yanked, info.yanked_reason.as_deref()) {
                (false, _) => String::new(),
                (true, Some(reason)) => format!("yes: {}", escape_markdown_table(reason)),
                (true, None) => "yes".to_string(),
            };
            writeln!(
                md,
                "| {} | {released} | {yanked} |",
                escape_markdown_table(&info.version)
            )?;
        }
        Ok(md)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Markdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisMetadata;
    use crate::diff::DiffEngine;
    use crate::model::{ApiElement, ApiKind, Signature, Snapshot, SnapshotStore};

    #[test]
    fn test_union_annotation_does_not_break_table() {
        let foo = |sig: &str| {
            ApiElement::new("pkg", "foo", ApiKind::Function)
                .with_signature(Signature::parse(sig).unwrap())
        };
        let store = SnapshotStore::new(
            vec![VersionInfo::new("1.0"), VersionInfo::new("2.0")],
            vec![
                Snapshot::new("1.0", vec![foo("(x: int)")]).unwrap(),
                Snapshot::new("2.0", vec![foo("(x: int | None)")]).unwrap(),
            ],
        )
        .unwrap();
        let changes = DiffEngine::new().diff(&store);
        let result =
            AnalysisResult::new("demo", store, changes, AnalysisMetadata::default()).unwrap();
        let md = MarkdownReporter::new()
            .generate_analysis_report(&result, &ReportConfig::default())
            .unwrap();

        assert!(md.starts_with("# API Evolution: demo"));
        assert!(md.contains("| modified | 1 |"));
        let row = md
            .lines()
            .find(|l| l.starts_with("| 1.0 → 2.0"))
            .unwrap();
        assert!(row.contains("\\|"));
    }

    #[test]
    fn test_versions_table() {
        let md = MarkdownReporter::new()
            .generate_versions_report(
                "demo",
                &[VersionInfo::new("1.0").yanked(None)],
                &ReportConfig::default(),
            )
            .unwrap();
        assert!(md.contains("| 1.0 | - | yes |"));
    }
}
