//! Selection parameters and strategy resolution.

use crate::error::{EvolutionError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw selection parameters, as collected from the CLI, a config file or an
/// API caller. At most one strategy's parameters may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Explicit list of version strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<String>>,
    /// Inclusive lower bound of a version range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_version: Option<String>,
    /// Inclusive upper bound of a version range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_version: Option<String>,
    /// Evenly sample at most this many versions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_versions: Option<usize>,
    /// Inclusive lower bound on release date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound on release date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    /// Keep versions the registry marked as yanked
    pub include_yanked: bool,
}

/// The single strategy a [`SelectionConfig`] resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// No strategy parameters: every (non-yanked) version
    All,
    Explicit(Vec<String>),
    Range {
        from: Option<String>,
        to: Option<String>,
    },
    Sample(usize),
    DateWindow {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl SelectionStrategy {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Explicit(_) => "explicit",
            Self::Range { .. } => "range",
            Self::Sample(_) => "sample",
            Self::DateWindow { .. } => "date-window",
        }
    }
}

impl SelectionConfig {
    /// Select an explicit list of versions.
    pub fn explicit(versions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            versions: Some(versions.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Select an inclusive version range.
    pub fn range(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from_version: from.map(str::to_string),
            to_version: to.map(str::to_string),
            ..Self::default()
        }
    }

    /// Evenly sample at most `max` versions.
    #[must_use]
    pub fn sample(max: usize) -> Self {
        Self {
            max_versions: Some(max),
            ..Self::default()
        }
    }

    /// Select versions released inside an inclusive date window.
    #[must_use]
    pub fn date_window(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            from_date: from,
            to_date: to,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_yanked(mut self, include: bool) -> Self {
        self.include_yanked = include;
        self
    }

    /// Resolve the configured strategy, failing when parameters for more
    /// than one strategy are present or a parameter is unusable on its own.
    pub fn strategy(&self) -> Result<SelectionStrategy> {
        let mut active = Vec::new();
        if self.versions.is_some() {
            active.push("versions");
        }
        if self.from_version.is_some() || self.to_version.is_some() {
            active.push("from_version/to_version");
        }
        if self.max_versions.is_some() {
            active.push("max_versions");
        }
        if self.from_date.is_some() || self.to_date.is_some() {
            active.push("from_date/to_date");
        }
        if active.len() > 1 {
            return Err(EvolutionError::config(format!(
                "conflicting version selection parameters: {} (choose one strategy)",
                active.join(", ")
            )));
        }

        if let Some(versions) = &self.versions {
            return Ok(SelectionStrategy::Explicit(versions.clone()));
        }
        if self.from_version.is_some() || self.to_version.is_some() {
            return Ok(SelectionStrategy::Range {
                from: self.from_version.clone(),
                to: self.to_version.clone(),
            });
        }
        if let Some(max) = self.max_versions {
            if max == 0 {
                return Err(EvolutionError::config("max_versions must be at least 1"));
            }
            return Ok(SelectionStrategy::Sample(max));
        }
        if self.from_date.is_some() || self.to_date.is_some() {
            if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
                if from > to {
                    return Err(EvolutionError::config(format!(
                        "from_date {from} is after to_date {to}"
                    )));
                }
            }
            return Ok(SelectionStrategy::DateWindow {
                from: self.from_date,
                to: self.to_date,
            });
        }
        Ok(SelectionStrategy::All)
    }
}
