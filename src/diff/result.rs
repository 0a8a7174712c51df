//! Change records produced by the diff engine.

use crate::model::ApiElement;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of change between two consecutive versions.
///
/// Declaration order doubles as the tie-break order for records of the same
/// element within one transition.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    ValueEnum,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
    Deprecated,
}

impl ChangeType {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Added, Self::Removed, Self::Modified, Self::Deprecated]
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
            Self::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|ct| ct.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown change type '{s}'"))
    }
}

/// One change to one API element across one transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiChange {
    /// The element as it looks after the change (before it, for removals)
    pub element: ApiElement,
    pub change_type: ChangeType,
    /// Older side of the transition; `None` only for a boundary addition
    #[serde(default)]
    pub from_version: Option<String>,
    /// Newer side of the transition
    #[serde(default)]
    pub to_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_signature: Option<String>,
    pub is_backwards_compatible: bool,
    pub description: String,
}

impl ApiChange {
    /// Element appeared in `to`.
    pub fn added(element: &ApiElement, from: &str, to: &str) -> Self {
        Self {
            element: element.clone(),
            change_type: ChangeType::Added,
            from_version: Some(from.to_string()),
            to_version: Some(to.to_string()),
            old_signature: None,
            new_signature: element.signature_text(),
            is_backwards_compatible: true,
            description: format!("Added {} {}", element.kind, element.qualified_name()),
        }
    }

    /// Element disappeared in `to`.
    pub fn removed(element: &ApiElement, from: &str, to: &str) -> Self {
        Self {
            element: element.clone(),
            change_type: ChangeType::Removed,
            from_version: Some(from.to_string()),
            to_version: Some(to.to_string()),
            old_signature: element.signature_text(),
            new_signature: None,
            is_backwards_compatible: false,
            description: format!("Removed {} {}", element.kind, element.qualified_name()),
        }
    }

    /// Signature changed between `from` and `to`.
    ///
    /// `reasons` lists why the change breaks callers; empty means compatible.
    pub fn modified(
        old: &ApiElement,
        new: &ApiElement,
        from: &str,
        to: &str,
        reasons: &[String],
    ) -> Self {
        let mut description = format!("Signature of {} {} changed", new.kind, new.qualified_name());
        if !reasons.is_empty() {
            description.push_str(": ");
            description.push_str(&reasons.join("; "));
        }
        Self {
            element: new.clone(),
            change_type: ChangeType::Modified,
            from_version: Some(from.to_string()),
            to_version: Some(to.to_string()),
            old_signature: old.signature_text(),
            new_signature: new.signature_text(),
            is_backwards_compatible: reasons.is_empty(),
            description,
        }
    }

    /// Element became deprecated in `to`.
    pub fn deprecated(element: &ApiElement, from: &str, to: &str) -> Self {
        Self {
            element: element.clone(),
            change_type: ChangeType::Deprecated,
            from_version: Some(from.to_string()),
            to_version: Some(to.to_string()),
            old_signature: None,
            new_signature: None,
            is_backwards_compatible: true,
            description: format!("Deprecated {} {}", element.kind, element.qualified_name()),
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        self.element.full_name()
    }

    /// The version in which the change became visible.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.to_version.as_deref().or(self.from_version.as_deref())
    }

    #[must_use]
    pub const fn is_breaking(&self) -> bool {
        !self.is_backwards_compatible
    }
}
