//! Default configurations and presets for api-evolution.
//!
//! Provides named presets for common use cases and default values.

use super::types::{AppConfig, BehaviorConfig, FilterConfig, SelectionSettings};

// ============================================================================
// Default Values
// ============================================================================

/// Sampling cap suggested for packages with long release histories.
pub const DEFAULT_MAX_VERSIONS: usize = 50;

/// Directory searched for `<package>/catalog.json` when none is configured.
pub const DEFAULT_DATA_DIR: &str = "api-data";

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Default balanced settings suitable for most cases
    Default,
    /// CI gate: public API only, fail on breaking changes
    Strict,
    /// Everything: yanked releases and private elements included
    Exhaustive,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Exhaustive => "exhaustive",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "balanced" => Some(Self::Default),
            "strict" | "ci" => Some(Self::Strict),
            "exhaustive" | "all" => Some(Self::Exhaustive),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Every non-yanked version, all changes reported",
            Self::Strict => "Public API only, exit 1 on any breaking change",
            Self::Exhaustive => "Yanked versions and private elements included",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Exhaustive]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self::strict_preset(),
            ConfigPreset::Exhaustive => Self::exhaustive_preset(),
        }
    }

    /// Strict preset.
    ///
    /// - Private elements hidden
    /// - Fail on breaking changes
    #[must_use]
    pub fn strict_preset() -> Self {
        Self {
            filtering: FilterConfig {
                include_private: false,
                ..FilterConfig::default()
            },
            behavior: BehaviorConfig {
                fail_on_breaking: true,
                ..BehaviorConfig::default()
            },
            ..Self::default()
        }
    }

    /// Exhaustive preset.
    #[must_use]
    pub fn exhaustive_preset() -> Self {
        Self {
            selection: SelectionSettings {
                max_versions: None,
                include_yanked: true,
            },
            filtering: FilterConfig {
                include_private: true,
                ..FilterConfig::default()
            },
            ..Self::default()
        }
    }
}
