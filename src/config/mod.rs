//! Configuration module for api-evolution.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust
//! use api_evolution::config::{AppConfig, ConfigPreset};
//!
//! // Use defaults
//! let config = AppConfig::default();
//!
//! // Use a preset
//! let strict = AppConfig::from_preset(ConfigPreset::Strict);
//! assert!(strict.behavior.fail_on_breaking);
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .breaking_only(true)
//!     .fail_on_breaking(true)
//!     .build();
//! ```
//!
//! # Configuration File
//!
//! Place a `.api-evolution.yaml` file in your project root or
//! `~/.config/api-evolution/`:
//!
//! ```yaml
//! filtering:
//!   include_private: false
//! behavior:
//!   fail_on_breaking: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

// Re-export main types
pub use defaults::{ConfigPreset, DEFAULT_DATA_DIR, DEFAULT_MAX_VERSIONS};
pub use types::{
    AnalyzeConfig, AppConfig, AppConfigBuilder, BehaviorConfig, CompareConfig, FilterConfig,
    LifecycleConfig, LifecycleSource, OutputConfig, SelectionSettings, SourcesConfig,
    SummaryConfig, VersionsConfig,
};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    user_config_dir, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.api-evolution.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> serde_json::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
