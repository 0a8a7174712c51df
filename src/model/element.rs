//! API element identity and attributes.

use super::Signature;
use clap::ValueEnum;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of API element kinds.
///
/// Consumers match on this exhaustively; adding a variant is a breaking change.
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
pub enum ApiKind {
    Function,
    Class,
    Method,
    Property,
    Constant,
    Module,
}

impl ApiKind {
    /// All kinds in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Function,
            Self::Class,
            Self::Method,
            Self::Property,
            Self::Constant,
            Self::Module,
        ]
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Property => "property",
            Self::Constant => "constant",
            Self::Module => "module",
        }
    }

    /// Whether elements of this kind carry a callable signature.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Function | Self::Method | Self::Class)
    }
}

impl fmt::Display for ApiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown API kind '{s}'"))
    }
}

/// A single public (or private) element of a library's interface in one version.
///
/// Identity is `(module_path, name, kind)`; see [`ApiElement::full_name`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiElement {
    /// Qualified name inside its module, e.g. `Session.get` for a method
    pub name: String,
    pub kind: ApiKind,
    /// Dotted module path, e.g. `requests.sessions`
    pub module_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, serde_json::Value>,
}

impl ApiElement {
    /// Create an element; privacy follows the leading-underscore convention
    /// (a single leading underscore is private, a double one is not).
    pub fn new(module_path: impl Into<String>, name: impl Into<String>, kind: ApiKind) -> Self {
        let name = name.into();
        let is_private = is_private_name(&name);
        Self {
            name,
            kind,
            module_path: module_path.into(),
            signature: None,
            is_private,
            is_deprecated: false,
            decorators: Vec::new(),
            metadata: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    #[must_use]
    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.is_deprecated = deprecated;
        self
    }

    #[must_use]
    pub fn with_decorator(mut self, decorator: impl Into<String>) -> Self {
        self.decorators.push(decorator.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Unique identity within one snapshot: `module.path.name:kind`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format_full_name(&self.module_path, &self.name, self.kind)
    }

    /// `module.path.name` without the kind suffix.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.module_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module_path, self.name)
        }
    }

    /// The name without module path or kind.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Canonical signature text, if the element has a signature.
    #[must_use]
    pub fn signature_text(&self) -> Option<String> {
        self.signature.as_ref().map(ToString::to_string)
    }
}

/// Build a full name from its parts.
#[must_use]
pub fn format_full_name(module_path: &str, name: &str, kind: ApiKind) -> String {
    if module_path.is_empty() {
        format!("{name}:{kind}")
    } else {
        format!("{module_path}.{name}:{kind}")
    }
}

fn is_private_name(name: &str) -> bool {
    let last = name.rsplit('.').next().unwrap_or(name);
    last.starts_with('_') && !last.starts_with("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_format() {
        let elem = ApiElement::new("pkg.mod", "foo", ApiKind::Function);
        assert_eq!(elem.full_name(), "pkg.mod.foo:function");
        assert_eq!(elem.qualified_name(), "pkg.mod.foo");
        assert_eq!(elem.simple_name(), "foo");

        let top = ApiElement::new("", "VERSION", ApiKind::Constant);
        assert_eq!(top.full_name(), "VERSION:constant");
    }

    #[test]
    fn test_kind_distinguishes_identity() {
        let func = ApiElement::new("pkg", "thing", ApiKind::Function);
        let class = ApiElement::new("pkg", "thing", ApiKind::Class);
        assert_ne!(func.full_name(), class.full_name());
    }

    #[test]
    fn test_privacy_convention() {
        assert!(ApiElement::new("m", "_helper", ApiKind::Function).is_private);
        assert!(!ApiElement::new("m", "__init__", ApiKind::Method).is_private);
        assert!(!ApiElement::new("m", "public", ApiKind::Function).is_private);
        assert!(ApiElement::new("m", "Session._prepare", ApiKind::Method).is_private);
        assert!(!ApiElement::new("m", "__mangled", ApiKind::Method).is_private);
        assert!(!ApiElement::new("m", "Session.__slots", ApiKind::Property).is_private);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Function".parse::<ApiKind>(), Ok(ApiKind::Function));
        assert_eq!(" method ".parse::<ApiKind>(), Ok(ApiKind::Method));
        assert!("lambda".parse::<ApiKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ApiKind::Property).unwrap();
        assert_eq!(json, "\"property\"");
    }

    #[test]
    fn test_element_deserializes_with_defaults() {
        let elem: ApiElement =
            serde_json::from_str(r#"{"name":"get","kind":"function","module_path":"requests"}"#)
                .unwrap();
        assert!(!elem.is_deprecated);
        assert!(elem.signature.is_none());
        assert!(elem.decorators.is_empty());
    }
}
