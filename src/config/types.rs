//! Configuration types for api-evolution operations.
//!
//! Provides structured configuration for the analyze, compare, lifecycle,
//! versions and summary commands.

use super::defaults::DEFAULT_DATA_DIR;
use crate::analysis::ChangeFilter;
use crate::diff::ChangeType;
use crate::error::Result;
use crate::model::ApiKind;
use crate::pipeline::AnalysisOptions;
use crate::reports::{ReportConfig, ReportFormat, ReportMetadata};
use crate::selection::SelectionConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// Command-line arguments override values loaded from a config file, which
/// override the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Default version selection
    pub selection: SelectionSettings,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Which changes to report
    pub filtering: FilterConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
    /// Where catalogs and snapshots are read from
    pub sources: SourcesConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Build the change filter described by the `filtering` section.
    pub fn change_filter(&self) -> Result<ChangeFilter> {
        let filter = ChangeFilter::new()
            .change_types(self.filtering.change_types.iter().copied())
            .kinds(self.filtering.kinds.iter().copied())
            .breaking_only(self.filtering.breaking_only)
            .include_private(self.filtering.include_private);
        match &self.filtering.name_pattern {
            Some(pattern) => filter.name_pattern(pattern),
            None => Ok(filter),
        }
    }

    /// Report settings for this configuration.
    pub fn report_config(&self) -> Result<ReportConfig> {
        Ok(ReportConfig {
            filter: self.change_filter()?,
            max_items: self.output.max_items,
            title: self.output.title.clone(),
            metadata: ReportMetadata::new(),
        })
    }

    #[must_use]
    pub const fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            calculate_changes: self.behavior.calculate_changes,
            track_deprecations: self.behavior.track_deprecations,
            parallel: self.behavior.parallel,
        }
    }

    /// Root directory of the directory source.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.sources
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Apply the selection defaults to a command's selection.
    ///
    /// `max_versions` only applies when the command chose no strategy of its
    /// own, so it never conflicts with explicit versions or ranges.
    #[must_use]
    pub fn apply_selection_defaults(&self, mut selection: SelectionConfig) -> SelectionConfig {
        let has_strategy = selection.versions.is_some()
            || selection.from_version.is_some()
            || selection.to_version.is_some()
            || selection.max_versions.is_some()
            || selection.from_date.is_some()
            || selection.to_date.is_some();
        if !has_strategy {
            selection.max_versions = self.selection.max_versions;
        }
        selection.include_yanked |= self.selection.include_yanked;
        selection
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the default sampling cap.
    pub const fn max_versions(mut self, max: Option<usize>) -> Self {
        self.config.selection.max_versions = max;
        self
    }

    /// Keep yanked versions by default.
    pub const fn include_yanked(mut self, include: bool) -> Self {
        self.config.selection.include_yanked = include;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Only report these change types.
    pub fn change_types(mut self, types: Vec<ChangeType>) -> Self {
        self.config.filtering.change_types = types;
        self
    }

    /// Only report changes to these element kinds.
    pub fn kinds(mut self, kinds: Vec<ApiKind>) -> Self {
        self.config.filtering.kinds = kinds;
        self
    }

    /// Only report changes whose qualified name matches this regex.
    pub fn name_pattern(mut self, pattern: Option<String>) -> Self {
        self.config.filtering.name_pattern = pattern;
        self
    }

    /// Only report breaking changes.
    pub const fn breaking_only(mut self, breaking_only: bool) -> Self {
        self.config.filtering.breaking_only = breaking_only;
        self
    }

    /// Report changes to private elements.
    pub const fn include_private(mut self, include: bool) -> Self {
        self.config.filtering.include_private = include;
        self
    }

    /// Enable fail-on-breaking mode.
    pub const fn fail_on_breaking(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_breaking = fail;
        self
    }

    /// Compute the change list.
    pub const fn calculate_changes(mut self, calculate: bool) -> Self {
        self.config.behavior.calculate_changes = calculate;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Set the data directory.
    pub fn data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.sources.data_dir = dir;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Command Configuration Types
// ============================================================================

/// Configuration for `analyze`.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub package: String,
    pub selection: SelectionConfig,
    pub app: AppConfig,
}

/// Configuration for `compare`.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub package: String,
    pub from_version: String,
    pub to_version: String,
    pub app: AppConfig,
}

/// Where a lifecycle query reads its history from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleSource {
    /// Run a fresh analysis of a package
    Package {
        package: String,
        selection: SelectionConfig,
    },
    /// Load a saved analysis result
    Input(PathBuf),
}

/// Configuration for `lifecycle`.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub api: String,
    pub source: LifecycleSource,
    pub app: AppConfig,
}

/// Configuration for `versions`.
#[derive(Debug, Clone)]
pub struct VersionsConfig {
    pub package: String,
    /// Show only the newest N versions
    pub limit: Option<usize>,
    pub app: AppConfig,
}

/// Configuration for `summary`.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub input: PathBuf,
    pub app: AppConfig,
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Default version selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SelectionSettings {
    /// Sample at most this many versions when a command names no strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_versions: Option<usize>,
    /// Keep versions the registry marked as yanked
    pub include_yanked: bool,
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
    /// Maximum change rows per report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    /// Report title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Filtering options for reported changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilterConfig {
    /// Only these change types (empty: all)
    pub change_types: Vec<ChangeType>,
    /// Only these element kinds (empty: all)
    pub kinds: Vec<ApiKind>,
    /// Regex over `module.name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<String>,
    /// Report changes to `_private` elements
    pub include_private: bool,
    /// Only backwards-incompatible changes
    pub breaking_only: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            change_types: Vec::new(),
            kinds: Vec::new(),
            name_pattern: None,
            include_private: true,
            breaking_only: false,
        }
    }
}

/// Behavior flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 if any breaking change is found
    pub fail_on_breaking: bool,
    /// Compute the change list (false: snapshots only)
    pub calculate_changes: bool,
    /// Emit `deprecated` change records
    pub track_deprecations: bool,
    /// Extract versions in parallel
    pub parallel: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            fail_on_breaking: false,
            calculate_changes: true,
            track_deprecations: true,
            parallel: true,
            quiet: false,
        }
    }
}

/// Catalog and snapshot locations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SourcesConfig {
    /// Root of `<package>/catalog.json` and `<package>/snapshots/`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}
