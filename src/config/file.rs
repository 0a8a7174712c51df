//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".api-evolution.yaml",
    ".api-evolution.yml",
    "api-evolution.yaml",
    "api-evolution.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/api-evolution/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    let cwd = std::env::current_dir().ok();
    if let Some(path) = cwd.as_deref().and_then(find_config_in_dir) {
        return Some(path);
    }

    if let Some(path) = find_git_root().as_deref().and_then(find_config_in_dir) {
        return Some(path);
    }

    if let Some(path) = user_config_dir().as_deref().and_then(find_config_in_dir) {
        return Some(path);
    }

    dirs::home_dir().as_deref().and_then(find_config_in_dir)
}

/// The per-user config directory, e.g. `~/.config/api-evolution`.
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("api-evolution"))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults override; this layers CLI
    /// args over file config.
    pub fn merge(&mut self, other: &Self) {
        // Selection defaults
        if other.selection.max_versions.is_some() {
            self.selection.max_versions = other.selection.max_versions;
        }
        if other.selection.include_yanked {
            self.selection.include_yanked = true;
        }

        // Output config - only override if explicitly set
        if other.output.format != crate::reports::ReportFormat::Auto {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }
        if other.output.max_items.is_some() {
            self.output.max_items = other.output.max_items;
        }
        if other.output.title.is_some() {
            self.output.title.clone_from(&other.output.title);
        }

        // Filtering config
        if !other.filtering.change_types.is_empty() {
            self.filtering.change_types.clone_from(&other.filtering.change_types);
        }
        if !other.filtering.kinds.is_empty() {
            self.filtering.kinds.clone_from(&other.filtering.kinds);
        }
        if other.filtering.name_pattern.is_some() {
            self.filtering.name_pattern.clone_from(&other.filtering.name_pattern);
        }
        if !other.filtering.include_private {
            self.filtering.include_private = false;
        }
        if other.filtering.breaking_only {
            self.filtering.breaking_only = true;
        }

        // Behavior config (booleans - a non-default value overrides)
        if other.behavior.fail_on_breaking {
            self.behavior.fail_on_breaking = true;
        }
        if !other.behavior.calculate_changes {
            self.behavior.calculate_changes = false;
        }
        if !other.behavior.track_deprecations {
            self.behavior.track_deprecations = false;
        }
        if !other.behavior.parallel {
            self.behavior.parallel = false;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }

        // Sources
        if other.sources.data_dir.is_some() {
            self.sources.data_dir.clone_from(&other.sources.data_dir);
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_example_config() -> String {
    format!(
        r"# api-evolution configuration
# Place this file at .api-evolution.yaml in your project root
# or in ~/.config/api-evolution/. CLI arguments override file settings.

# Default version selection (used when a command names no strategy)
selection:
  # Evenly sample at most this many versions
  # max_versions: {max}
  # Keep versions the registry marked as yanked
  include_yanked: false

# Output configuration
output:
  # Format: auto, json, summary, markdown, csv
  format: auto
  # Output file path (omit for stdout)
  # file: report.json
  no_color: false
  # Cap on change rows per report
  # max_items: 200

# Which changes to report
filtering:
  # Any of: added, removed, modified, deprecated (empty: all)
  change_types: []
  # Any of: function, class, method, property, constant, module
  kinds: []
  # Regex over module.name
  # name_pattern: '^mypkg\.core\.'
  include_private: true
  breaking_only: false

# Behavior flags
behavior:
  # Exit with code 1 if a breaking change is found
  fail_on_breaking: false
  calculate_changes: true
  track_deprecations: true
  parallel: true
  quiet: false

# Where catalogs and snapshots are read from
sources:
  # Unset means ./{data_dir}
  data_dir: null
",
        max = super::DEFAULT_MAX_VERSIONS,
        data_dir = super::DEFAULT_DATA_DIR,
    )
}
