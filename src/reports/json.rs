//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::analysis::AnalysisResult;
use crate::lifecycle::Lifecycle;
use crate::model::VersionInfo;
use serde::Serialize;
use serde_json::Value;

/// JSON report generator
///
/// Analysis reports use the stable [`AnalysisResult`] serialization, so the
/// output can be loaded again with `--input`. A non-empty filter narrows the
/// `changes` array; the result stays loadable.
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct VersionsReport<'a> {
    package_name: &'a str,
    total: usize,
    versions: &'a [VersionInfo],
}

impl ReportGenerator for JsonReporter {
    fn generate_analysis_report(
        &self,
        result: &AnalysisResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut value = serde_json::to_value(result)?;
        if !config.filter.is_empty() || config.max_items.is_some() {
            let changes = super::selected_changes(result, config);
            if let Value::Object(map) = &mut value {
                map.insert("changes".to_string(), serde_json::to_value(changes)?);
            }
        }
        self.render(&value)
    }

    fn generate_lifecycle_report(
        &self,
        lifecycle: &Lifecycle,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        self.render(lifecycle)
    }

    fn generate_versions_report(
        &self,
        package: &str,
        versions: &[VersionInfo],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        self.render(&VersionsReport {
            package_name: package,
            total: versions.len(),
            versions,
        })
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}
