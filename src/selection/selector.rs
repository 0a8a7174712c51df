//! Resolves a catalog plus a strategy into an ordered version subsequence.

use super::{SelectionConfig, SelectionStrategy};
use crate::error::{EvolutionError, Result};
use crate::model::{VersionCatalog, VersionInfo};
use crate::utils::normalize_version;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Non-fatal outcome recorded while selecting versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionWarning {
    /// An explicitly requested version is not in the catalog
    NotFound {
        requested: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suggestion: Option<String>,
    },
    /// A version was skipped because it is yanked
    Yanked {
        version: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl SelectionWarning {
    /// The error this warning stands for, if it maps to one.
    #[must_use]
    pub fn as_error(&self) -> Option<EvolutionError> {
        match self {
            Self::NotFound {
                requested,
                suggestion,
            } => Some(EvolutionError::not_found(requested, suggestion.clone())),
            Self::Yanked { .. } => None,
        }
    }
}

impl std::fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { .. } => match self.as_error() {
                Some(err) => write!(f, "{err}"),
                None => Ok(()),
            },
            Self::Yanked { version, reason } => {
                write!(f, "Version '{version}' is yanked")?;
                if let Some(reason) = reason {
                    write!(f, ": {reason}")?;
                }
                Ok(())
            }
        }
    }
}

/// Ordered, duplicate-free selection plus what was skipped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub versions: Vec<VersionInfo>,
    pub warnings: Vec<SelectionWarning>,
}

impl Selection {
    pub fn version_names(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(|v| v.version.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Requested versions that could not be resolved.
    pub fn not_found(&self) -> impl Iterator<Item = &str> {
        self.warnings.iter().filter_map(|w| match w {
            SelectionWarning::NotFound { requested, .. } => Some(requested.as_str()),
            SelectionWarning::Yanked { .. } => None,
        })
    }
}

/// Picks the versions to analyze from a catalog.
///
/// The strategy is validated on construction so conflicting parameters fail
/// before the catalog is fetched.
#[derive(Debug, Clone)]
pub struct VersionSelector {
    strategy: SelectionStrategy,
    include_yanked: bool,
}

impl VersionSelector {
    pub fn new(config: &SelectionConfig) -> Result<Self> {
        Ok(Self {
            strategy: config.strategy()?,
            include_yanked: config.include_yanked,
        })
    }

    #[must_use]
    pub const fn strategy(&self) -> &SelectionStrategy {
        &self.strategy
    }

    pub fn select(&self, catalog: &VersionCatalog) -> Result<Selection> {
        let mut warnings = Vec::new();

        let positions: Vec<usize> = match &self.strategy {
            SelectionStrategy::All => self.eligible(catalog).collect(),
            SelectionStrategy::Explicit(requested) => {
                self.select_explicit(catalog, requested, &mut warnings)
            }
            SelectionStrategy::Range { from, to } => {
                let (start, end) = resolve_range(catalog, from.as_deref(), to.as_deref())?;
                self.eligible(catalog)
                    .filter(|idx| (start..=end).contains(idx))
                    .collect()
            }
            SelectionStrategy::Sample(max) => {
                let eligible: Vec<usize> = self.eligible(catalog).collect();
                sample_indices(eligible.len(), *max)
                    .into_iter()
                    .map(|i| eligible[i])
                    .collect()
            }
            SelectionStrategy::DateWindow { from, to } => self
                .eligible(catalog)
                .filter(|&idx| within_window(&catalog.entries()[idx], *from, *to))
                .collect(),
        };

        let versions: Vec<VersionInfo> = positions
            .into_iter()
            .map(|idx| catalog.entries()[idx].clone())
            .collect();

        tracing::debug!(
            strategy = self.strategy.name(),
            selected = versions.len(),
            catalog = catalog.len(),
            "version selection complete"
        );

        Ok(Selection { versions, warnings })
    }

    /// Catalog positions that survive the yanked filter.
    fn eligible<'a>(&'a self, catalog: &'a VersionCatalog) -> impl Iterator<Item = usize> + 'a {
        catalog
            .iter()
            .enumerate()
            .filter(move |(_, info)| self.include_yanked || !info.yanked)
            .map(|(idx, _)| idx)
    }

    fn select_explicit(
        &self,
        catalog: &VersionCatalog,
        requested: &[String],
        warnings: &mut Vec<SelectionWarning>,
    ) -> Vec<usize> {
        let resolver = Resolver::new(catalog);
        let mut picked = BTreeSet::new();

        for version in requested {
            let Some(idx) = resolver.resolve(version) else {
                let suggestion = resolver.suggest(version);
                tracing::warn!(version = %version, "requested version not found in catalog");
                warnings.push(SelectionWarning::NotFound {
                    requested: version.clone(),
                    suggestion,
                });
                continue;
            };

            let info = &catalog.entries()[idx];
            if info.yanked && !self.include_yanked {
                tracing::warn!(version = %info.version, "skipping yanked version");
                let warning = SelectionWarning::Yanked {
                    version: info.version.clone(),
                    reason: info.yanked_reason.clone(),
                };
                if !warnings.contains(&warning) {
                    warnings.push(warning);
                }
                continue;
            }
            picked.insert(idx);
        }

        picked.into_iter().collect()
    }
}

/// Exact-then-normalized lookup of user supplied version strings.
struct Resolver<'a> {
    catalog: &'a VersionCatalog,
    by_normalized: HashMap<String, usize>,
}

impl<'a> Resolver<'a> {
    fn new(catalog: &'a VersionCatalog) -> Self {
        let mut by_normalized = HashMap::with_capacity(catalog.len());
        for (idx, info) in catalog.iter().enumerate() {
            by_normalized
                .entry(normalize_version(&info.version))
                .or_insert(idx);
        }
        Self {
            catalog,
            by_normalized,
        }
    }

    fn resolve(&self, version: &str) -> Option<usize> {
        self.catalog
            .position(version)
            .or_else(|| self.by_normalized.get(&normalize_version(version)).copied())
    }

    fn suggest(&self, version: &str) -> Option<String> {
        let wanted = normalize_version(version);
        self.catalog
            .iter()
            .map(|info| {
                let score = strsim::jaro_winkler(&wanted, &normalize_version(&info.version));
                (score, &info.version)
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, v)| v.clone())
    }
}

fn resolve_range(
    catalog: &VersionCatalog,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(usize, usize)> {
    let resolver = Resolver::new(catalog);
    let lookup = |bound: &str, label: &str| {
        resolver.resolve(bound).ok_or_else(|| {
            let hint = resolver
                .suggest(bound)
                .map(|s| format!(" (did you mean '{s}'?)"))
                .unwrap_or_default();
            EvolutionError::config(format!(
                "{label} '{bound}' is not in the version catalog{hint}"
            ))
        })
    };

    let start = from.map(|v| lookup(v, "from_version")).transpose()?.unwrap_or(0);
    let end = match to {
        Some(v) => lookup(v, "to_version")?,
        None => catalog.len().saturating_sub(1),
    };

    if start > end {
        return Err(EvolutionError::config(format!(
            "from_version '{}' comes after to_version '{}' in the catalog",
            from.unwrap_or_default(),
            to.unwrap_or_default()
        )));
    }
    Ok((start, end))
}

fn within_window(info: &VersionInfo, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    let Some(released) = info.released_at.map(|at| at.date_naive()) else {
        return false;
    };
    from.map_or(true, |f| released >= f) && to.map_or(true, |t| released <= t)
}

/// Evenly spaced indices into `0..len`, keeping both ends.
///
/// Positions are rounded half-up to the nearest index. When `max` is 1 the
/// newest entry is kept.
#[must_use]
pub fn sample_indices(len: usize, max: usize) -> Vec<usize> {
    if len <= max {
        return (0..len).collect();
    }
    if max == 0 {
        return Vec::new();
    }
    if max == 1 {
        return vec![len - 1];
    }

    let span = len - 1;
    let steps = max - 1;
    let mut picks: Vec<usize> = (0..max)
        .map(|i| (2 * i * span + steps) / (2 * steps))
        .collect();
    picks.dedup();
    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn catalog(versions: &[&str]) -> VersionCatalog {
        VersionCatalog::new(versions.iter().map(|v| VersionInfo::new(*v)).collect()).unwrap()
    }

    fn names(selection: &Selection) -> Vec<&str> {
        selection.version_names().collect()
    }

    fn select(config: SelectionConfig, catalog: &VersionCatalog) -> Selection {
        VersionSelector::new(&config)
            .unwrap()
            .select(catalog)
            .unwrap()
    }

    #[test]
    fn test_sample_hundred_into_five() {
        let picks = sample_indices(100, 5);
        assert_eq!(picks, vec![0, 25, 50, 74, 99]);
    }

    #[test]
    fn test_sample_small_catalog_returns_all() {
        assert_eq!(sample_indices(3, 5), vec![0, 1, 2]);
        assert_eq!(sample_indices(5, 5), vec![0, 1, 2, 3, 4]);
        assert!(sample_indices(0, 5).is_empty());
    }

    #[test]
    fn test_sample_edges() {
        assert_eq!(sample_indices(10, 1), vec![9]);
        assert_eq!(sample_indices(10, 2), vec![0, 9]);
        assert_eq!(sample_indices(4, 3), vec![0, 2, 3]);
    }

    #[test]
    fn test_all_excludes_yanked_by_default() {
        let catalog = VersionCatalog::new(vec![
            VersionInfo::new("1.0"),
            VersionInfo::new("1.1").yanked(Some("broken wheel")),
            VersionInfo::new("1.2"),
        ])
        .unwrap();
        let selection = select(SelectionConfig::default(), &catalog);
        assert_eq!(names(&selection), vec!["1.0", "1.2"]);

        let selection = select(SelectionConfig::default().with_yanked(true), &catalog);
        assert_eq!(names(&selection), vec!["1.0", "1.1", "1.2"]);
    }

    #[test]
    fn test_explicit_preserves_catalog_order_and_dedups() {
        let catalog = catalog(&["1.0", "1.1", "2.0", "2.1"]);
        let selection = select(
            SelectionConfig::explicit(["2.1", "1.0", "v2.1", "1.1"]),
            &catalog,
        );
        assert_eq!(names(&selection), vec!["1.0", "1.1", "2.1"]);
        assert!(selection.warnings.is_empty());
    }

    #[test]
    fn test_explicit_missing_versions_are_reported() {
        let catalog = catalog(&["1.0", "2.0"]);
        let selection = select(SelectionConfig::explicit(["9.9.9", "2.0"]), &catalog);
        assert_eq!(names(&selection), vec!["2.0"]);
        assert_eq!(selection.not_found().collect::<Vec<_>>(), vec!["9.9.9"]);

        let selection = select(SelectionConfig::explicit(["9.9.9"]), &catalog);
        assert!(selection.is_empty());
        assert!(matches!(
            selection.warnings[0].as_error(),
            Some(EvolutionError::NotFound { .. })
        ));
    }

    #[test]
    fn test_explicit_suggests_close_versions() {
        let catalog = catalog(&["1.0.0", "2.0.0"]);
        let selection = select(SelectionConfig::explicit(["2.0.1"]), &catalog);
        match &selection.warnings[0] {
            SelectionWarning::NotFound { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("2.0.0"));
            }
            other => panic!("unexpected warning {other:?}"),
        }
    }

    #[test]
    fn test_explicit_yanked_is_skipped_with_warning() {
        let catalog = VersionCatalog::new(vec![
            VersionInfo::new("1.0"),
            VersionInfo::new("1.1").yanked(None),
        ])
        .unwrap();
        let selection = select(SelectionConfig::explicit(["1.1", "1.0"]), &catalog);
        assert_eq!(names(&selection), vec!["1.0"]);
        assert!(matches!(
            selection.warnings[0],
            SelectionWarning::Yanked { .. }
        ));
    }

    #[test]
    fn test_range_inclusive() {
        let catalog = catalog(&["1.0", "1.1", "1.2", "2.0"]);
        let selection = select(SelectionConfig::range(Some("1.1"), Some("1.2")), &catalog);
        assert_eq!(names(&selection), vec!["1.1", "1.2"]);

        let selection = select(SelectionConfig::range(Some("1.2"), None), &catalog);
        assert_eq!(names(&selection), vec!["1.2", "2.0"]);

        let selection = select(SelectionConfig::range(None, Some("1.0")), &catalog);
        assert_eq!(names(&selection), vec!["1.0"]);
    }

    #[test]
    fn test_range_inverted_fails() {
        let catalog = catalog(&["1.0", "1.1", "1.2"]);
        let selector =
            VersionSelector::new(&SelectionConfig::range(Some("1.2"), Some("1.0"))).unwrap();
        assert!(matches!(
            selector.select(&catalog),
            Err(EvolutionError::Config(_))
        ));
    }

    #[test]
    fn test_range_unknown_bound_fails() {
        let catalog = catalog(&["1.0", "1.1"]);
        let selector =
            VersionSelector::new(&SelectionConfig::range(Some("0.9"), None)).unwrap();
        assert!(matches!(
            selector.select(&catalog),
            Err(EvolutionError::Config(_))
        ));
    }

    #[test]
    fn test_date_window() {
        let at = |m| Utc.with_ymd_and_hms(2023, m, 15, 12, 0, 0).unwrap();
        let catalog = VersionCatalog::new(vec![
            VersionInfo::new("1.0").released(at(1)),
            VersionInfo::new("1.1"),
            VersionInfo::new("1.2").released(at(3)),
            VersionInfo::new("1.3").released(at(6)),
        ])
        .unwrap();
        let selection = select(
            SelectionConfig::date_window(
                NaiveDate::from_ymd_opt(2023, 1, 15),
                NaiveDate::from_ymd_opt(2023, 3, 15),
            ),
            &catalog,
        );
        assert_eq!(names(&selection), vec!["1.0", "1.2"]);
    }

    #[test]
    fn test_sample_over_catalog() {
        let versions: Vec<String> = (0..100).map(|i| format!("1.{i}")).collect();
        let catalog = VersionCatalog::new(versions.iter().map(VersionInfo::new).collect()).unwrap();
        let selection = select(SelectionConfig::sample(5), &catalog);
        let picked = names(&selection);
        assert_eq!(picked.len(), 5);
        assert_eq!(picked.first(), Some(&"1.0"));
        assert_eq!(picked.last(), Some(&"1.99"));
    }

    #[test]
    fn test_empty_catalog_is_not_an_error() {
        let catalog = VersionCatalog::default();
        assert!(select(SelectionConfig::default(), &catalog).is_empty());
        assert!(select(SelectionConfig::sample(3), &catalog).is_empty());
    }
}
