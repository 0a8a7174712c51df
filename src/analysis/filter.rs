//! Change list filtering.

use crate::diff::{ApiChange, ChangeType};
use crate::error::{EvolutionError, Result};
use crate::model::ApiKind;
use regex::Regex;

/// Predicate over [`ApiChange`] records.
///
/// Empty `change_types` / `kinds` lists mean "any". The default filter
/// accepts every change.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    pub change_types: Vec<ChangeType>,
    pub kinds: Vec<ApiKind>,
    name_pattern: Option<Regex>,
    pub breaking_only: bool,
    pub include_private: bool,
}

impl Default for ChangeFilter {
    fn default() -> Self {
        Self {
            change_types: Vec::new(),
            kinds: Vec::new(),
            name_pattern: None,
            breaking_only: false,
            include_private: true,
        }
    }
}

impl ChangeFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn change_types(mut self, types: impl IntoIterator<Item = ChangeType>) -> Self {
        self.change_types = types.into_iter().collect();
        self
    }

    #[must_use]
    pub fn kinds(mut self, kinds: impl IntoIterator<Item = ApiKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// Keep only changes whose qualified name matches `pattern`.
    pub fn name_pattern(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            EvolutionError::config(format!("invalid name pattern '{pattern}': {e}"))
        })?;
        self.name_pattern = Some(regex);
        Ok(self)
    }

    #[must_use]
    pub const fn breaking_only(mut self, breaking_only: bool) -> Self {
        self.breaking_only = breaking_only;
        self
    }

    #[must_use]
    pub const fn include_private(mut self, include: bool) -> Self {
        self.include_private = include;
        self
    }

    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.name_pattern.as_ref().map(Regex::as_str)
    }

    #[must_use]
    pub fn matches(&self, change: &ApiChange) -> bool {
        if !self.change_types.is_empty() && !self.change_types.contains(&change.change_type) {
            return false;
        }
        if !self.kinds.is_empty() && !self.kinds.contains(&change.element.kind) {
            return false;
        }
        if self.breaking_only && change.is_backwards_compatible {
            return false;
        }
        if !self.include_private && change.element.is_private {
            return false;
        }
        self.name_pattern
            .as_ref()
            .map_or(true, |re| re.is_match(&change.element.qualified_name()))
    }

    /// Whether this filter accepts everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.change_types.is_empty()
            && self.kinds.is_empty()
            && self.name_pattern.is_none()
            && !self.breaking_only
            && self.include_private
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ApiElement;

    fn change(name: &str, kind: ApiKind, change_type: ChangeType) -> ApiChange {
        let element = ApiElement::new("pkg.sub", name, kind);
        match change_type {
            ChangeType::Added => ApiChange::added(&element, "1", "2"),
            ChangeType::Removed => ApiChange::removed(&element, "1", "2"),
            ChangeType::Modified => ApiChange::modified(&element, &element, "1", "2", &[]),
            ChangeType::Deprecated => ApiChange::deprecated(&element, "1", "2"),
        }
    }

    #[test]
    fn test_default_accepts_everything() {
        let filter = ChangeFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&change("_hidden", ApiKind::Function, ChangeType::Removed)));
    }

    #[test]
    fn test_type_and_kind_filters() {
        let filter = ChangeFilter::new()
            .change_types([ChangeType::Removed])
            .kinds([ApiKind::Class]);
        assert!(filter.matches(&change("Widget", ApiKind::Class, ChangeType::Removed)));
        assert!(!filter.matches(&change("Widget", ApiKind::Class, ChangeType::Added)));
        assert!(!filter.matches(&change("widget", ApiKind::Function, ChangeType::Removed)));
    }

    #[test]
    fn test_breaking_and_privacy() {
        let filter = ChangeFilter::new().breaking_only(true).include_private(false);
        assert!(filter.matches(&change("run", ApiKind::Function, ChangeType::Removed)));
        assert!(!filter.matches(&change("run", ApiKind::Function, ChangeType::Added)));
        assert!(!filter.matches(&change("_run", ApiKind::Function, ChangeType::Removed)));
    }

    #[test]
    fn test_name_pattern() {
        let filter = ChangeFilter::new().name_pattern(r"^pkg\.sub\.load").unwrap();
        assert_eq!(filter.pattern(), Some(r"^pkg\.sub\.load"));
        assert!(filter.matches(&change("load_all", ApiKind::Function, ChangeType::Added)));
        assert!(!filter.matches(&change("save", ApiKind::Function, ChangeType::Added)));
        assert!(ChangeFilter::new().name_pattern("(").is_err());
    }
}
