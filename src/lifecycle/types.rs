//! Lifecycle query results.

use crate::model::ApiKind;
use serde::{Deserialize, Serialize};

/// How a lifecycle query was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The query is a full name
    Exact,
    /// The query equals the element's simple name
    SimpleName,
}

/// One element a query could refer to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApiCandidate {
    pub full_name: String,
    pub kind: ApiKind,
}

/// A signature modification in an element's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    /// Version in which the new signature first appears
    pub version: String,
    pub old_signature: Option<String>,
    pub new_signature: Option<String>,
    pub description: String,
    pub is_backwards_compatible: bool,
}

/// When an API appeared, changed, and disappeared.
///
/// A query that resolves to nothing leaves every field empty. A query that
/// matches several elements sets `collision_detected`, lists the candidates in
/// `available_apis`, and leaves the history fields empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub query: String,
    pub introduced_in: Option<String>,
    pub removed_in: Option<String>,
    pub deprecated_in: Option<String>,
    pub versions_present: Vec<String>,
    pub modifications: Vec<Modification>,
    pub matched_api: Option<String>,
    pub match_kind: Option<MatchKind>,
    pub collision_detected: bool,
    pub available_apis: Vec<ApiCandidate>,
}

impl Lifecycle {
    /// Empty result for a query that matched nothing.
    pub(crate) fn unresolved(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::default()
        }
    }

    /// Whether the query resolved to exactly one element.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.matched_api.is_some()
    }

    /// Present through the final analyzed version.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.is_resolved() && self.removed_in.is_none()
    }
}
