//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::analysis::AnalysisResult;
use crate::diff::{ApiChange, ChangeType};
use crate::lifecycle::Lifecycle;
use crate::model::VersionInfo;
use unicode_width::UnicodeWidthStr;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Pad to a display width, counting wide characters correctly.
fn pad(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}

const fn change_style(change_type: ChangeType) -> (&'static str, &'static str) {
    match change_type {
        ChangeType::Added => ("+", "green"),
        ChangeType::Removed => ("-", "red"),
        ChangeType::Modified => ("~", "yellow"),
        ChangeType::Deprecated => ("!", "dim"),
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn header(&self, lines: &mut Vec<String>, title: &str) {
        lines.push(self.color(title, "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
    }

    fn change_line(&self, change: &ApiChange) -> String {
        let (marker, color) = change_style(change.change_type);
        let breaking = if change.is_breaking() {
            format!(" {}", self.color("[breaking]", "red"))
        } else {
            String::new()
        };
        format!(
            "  {} {}{}",
            self.color(marker, color),
            change.description,
            breaking
        )
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_analysis_report(
        &self,
        result: &AnalysisResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let summary = result.summary();
        let mut lines = Vec::new();

        let title = config
            .title
            .clone()
            .unwrap_or_else(|| format!("API Evolution: {}", result.package_name()));
        self.header(&mut lines, &title);

        match &summary.version_range {
            Some(range) => lines.push(format!(
                "{}  {} → {} ({} versions)",
                self.color("Versions:", "cyan"),
                range.first,
                range.last,
                summary.total_versions
            )),
            None => lines.push(format!(
                "{}  {}",
                self.color("Versions:", "cyan"),
                self.color("none analyzed", "dim")
            )),
        }
        lines.push(format!(
            "{}  {} distinct",
            self.color("APIs:", "cyan"),
            summary.unique_apis
        ));

        lines.push(String::new());
        lines.push(self.color("Changes:", "bold"));
        if summary.total_changes == 0 {
            lines.push(format!("  {}", self.color("No changes", "dim")));
        }
        for (change_type, count) in &summary.change_types {
            if *count > 0 {
                let (marker, color) = change_style(*change_type);
                lines.push(format!(
                    "  {} {change_type}",
                    self.color(&format!("{marker}{count}"), color)
                ));
            }
        }
        if summary.has_breaking_changes() {
            lines.push(format!(
                "  {}",
                self.color(&format!("{} breaking", summary.breaking_changes), "red")
            ));
        }

        if !summary.versions.is_empty() {
            lines.push(String::new());
            let width = summary
                .versions
                .iter()
                .map(|v| UnicodeWidthStr::width(v.version.as_str()))
                .max()
                .unwrap_or(0)
                .max("VERSION".len());
            lines.push(self.color(
                &format!("{}  {:<10}  {:>6}  {:>7}", pad("VERSION", width), "RELEASED", "APIS", "CHANGES"),
                "bold",
            ));
            for row in &summary.versions {
                let released = row
                    .release_date
                    .map_or_else(|| "-".to_string(), |d| d.to_string());
                lines.push(format!(
                    "{}  {:<10}  {:>6}  {:>7}",
                    pad(&row.version, width),
                    released,
                    row.api_count,
                    row.changes_count
                ));
            }
        }

        let changes = super::selected_changes(result, config);
        if !changes.is_empty() {
            let mut transition: Option<(Option<&str>, Option<&str>)> = None;
            for change in changes {
                let current = (change.from_version.as_deref(), change.to_version.as_deref());
                if transition != Some(current) {
                    lines.push(String::new());
                    lines.push(self.color(
                        &format!(
                            "{} → {}",
                            current.0.unwrap_or("?"),
                            current.1.unwrap_or("?")
                        ),
                        "bold",
                    ));
                    transition = Some(current);
                }
                lines.push(self.change_line(change));
            }
        }

        let metadata = result.metadata();
        if metadata.has_warnings() {
            lines.push(String::new());
            lines.push(self.color("Warnings:", "bold"));
            for warning in &metadata.warnings {
                lines.push(format!("  {}", self.color(&warning.to_string(), "yellow")));
            }
        }

        Ok(lines.join("\n"))
    }

    fn generate_lifecycle_report(
        &self,
        lifecycle: &Lifecycle,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        self.header(&mut lines, &format!("Lifecycle: {}", lifecycle.query));

        if lifecycle.collision_detected {
            lines.push(self.color(
                &format!(
                    "Ambiguous: {} APIs match this name",
                    lifecycle.available_apis.len()
                ),
                "yellow",
            ));
            for candidate in &lifecycle.available_apis {
                lines.push(format!("  {} ({})", candidate.full_name, candidate.kind));
            }
            return Ok(lines.join("\n"));
        }

        let Some(matched) = &lifecycle.matched_api else {
            lines.push(self.color("No matching API found", "dim"));
            return Ok(lines.join("\n"));
        };

        let dash = || "-".to_string();
        let rows = [
            ("API:", matched.clone()),
            ("Introduced:", lifecycle.introduced_in.clone().unwrap_or_else(dash)),
            (
                "Removed:",
                lifecycle
                    .removed_in
                    .clone()
                    .unwrap_or_else(|| "still present".to_string()),
            ),
            ("Deprecated:", lifecycle.deprecated_in.clone().unwrap_or_else(dash)),
            ("Present in:", lifecycle.versions_present.join(", ")),
        ];
        for (label, value) in rows {
            lines.push(format!("{}  {value}", self.color(&pad(label, 12), "cyan")));
        }

        if !lifecycle.modifications.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Modifications:", "bold"));
            for modification in &lifecycle.modifications {
                let verdict = if modification.is_backwards_compatible {
                    self.color("compatible", "green")
                } else {
                    self.color("breaking", "red")
                };
                lines.push(format!(
                    "  {}  {} → {}  [{verdict}]",
                    modification.version,
                    modification.old_signature.as_deref().unwrap_or("-"),
                    modification.new_signature.as_deref().unwrap_or("-"),
                ));
            }
        }

        Ok(lines.join("\n"))
    }

    fn generate_versions_report(
        &self,
        package: &str,
        versions: &[VersionInfo],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        self.header(&mut lines, &format!("Versions of {package} ({})", versions.len()));

        let width = versions
            .iter()
            .map(|v| UnicodeWidthStr::width(v.version.as_str()))
            .max()
            .unwrap_or(0);
        for info in versions {
            let released = info
                .released_at
                .map_or_else(|| "-".to_string(), |at| at.date_naive().to_string());
            let mut line = format!("  {}  {released}", pad(&info.version, width));
            if info.yanked {
                let reason = info
                    .yanked_reason
                    .as_deref()
                    .map(|r| format!(" ({r})"))
                    .unwrap_or_default();
                line.push_str(&self.color(&format!("  yanked{reason}"), "red"));
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
