//! Normalized callable signatures.
//!
//! Signatures are compared structurally: the ordered parameter descriptors
//! plus the return annotation. Default *values* are not part of the
//! descriptor, only whether a default exists. Annotations are normalized so
//! whitespace and quote style never produce a spurious difference.

use crate::error::{EvolutionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a parameter may be bound by a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    PositionalOnly,
    #[default]
    PositionalOrKeyword,
    /// `*args`
    VarPositional,
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

impl ParameterKind {
    #[must_use]
    pub const fn is_variadic(&self) -> bool {
        matches!(self, Self::VarPositional | Self::VarKeyword)
    }

    /// Whether the parameter can be supplied positionally.
    #[must_use]
    pub const fn is_positional(&self) -> bool {
        matches!(self, Self::PositionalOnly | Self::PositionalOrKeyword)
    }
}

/// One parameter descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub kind: ParameterKind,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Parameter {
    /// A required positional-or-keyword parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::PositionalOrKeyword,
            has_default: false,
            annotation: None,
        }
    }

    #[must_use]
    pub const fn kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub const fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    #[must_use]
    pub fn annotated(mut self, annotation: impl AsRef<str>) -> Self {
        self.annotation = normalize_annotation(annotation.as_ref());
        self
    }

    /// Required parameters must be supplied by every caller.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        !self.has_default && !self.kind.is_variadic()
    }
}

/// Ordered parameter descriptors plus the return annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_annotation: Option<String>,
}

impl Signature {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self {
            parameters,
            return_annotation: None,
        }
    }

    #[must_use]
    pub fn returns(mut self, annotation: impl AsRef<str>) -> Self {
        self.return_annotation = normalize_annotation(annotation.as_ref());
        self
    }

    /// Copy with every annotation normalized.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            parameters: self
                .parameters
                .iter()
                .map(|p| Parameter {
                    annotation: p.annotation.as_deref().and_then(normalize_annotation),
                    ..p.clone()
                })
                .collect(),
            return_annotation: self
                .return_annotation
                .as_deref()
                .and_then(normalize_annotation),
        }
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Parse signature text such as `(x, y: int = 1, *args, z, **kw) -> str`.
    ///
    /// A leading callable name (`foo(x)`) is accepted and ignored. The `/`
    /// and bare `*` markers are honoured.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let open = find_top_level(trimmed, '(')
            .ok_or_else(|| EvolutionError::invalid_signature(text, "missing '('"))?;
        let prefix = trimmed[..open].trim();
        if !prefix.is_empty() && !is_dotted_identifier(prefix) {
            return Err(EvolutionError::invalid_signature(
                text,
                format!("unexpected text before parameters: '{prefix}'"),
            ));
        }

        let close = matching_close(trimmed, open)
            .ok_or_else(|| EvolutionError::invalid_signature(text, "unbalanced brackets"))?;
        let inner = &trimmed[open + 1..close];
        let rest = trimmed[close + 1..].trim();

        let return_annotation = if rest.is_empty() {
            None
        } else if let Some(ann) = rest.strip_prefix("->") {
            let ann = ann.trim().trim_end_matches(':').trim();
            if ann.is_empty() {
                return Err(EvolutionError::invalid_signature(text, "empty return annotation"));
            }
            normalize_annotation(ann)
        } else {
            return Err(EvolutionError::invalid_signature(
                text,
                format!("unexpected trailing text: '{rest}'"),
            ));
        };

        let mut parameters: Vec<Parameter> = Vec::new();
        let mut keyword_only = false;
        let mut seen_slash = false;

        for raw in split_top_level(inner, ',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            if raw == "/" {
                if seen_slash || keyword_only {
                    return Err(EvolutionError::invalid_signature(text, "misplaced '/'"));
                }
                seen_slash = true;
                for param in &mut parameters {
                    param.kind = ParameterKind::PositionalOnly;
                }
                continue;
            }
            if raw == "*" {
                if keyword_only {
                    return Err(EvolutionError::invalid_signature(text, "duplicate '*'"));
                }
                keyword_only = true;
                continue;
            }

            let (kind, body) = if let Some(body) = raw.strip_prefix("**") {
                (ParameterKind::VarKeyword, body)
            } else if let Some(body) = raw.strip_prefix('*') {
                if keyword_only {
                    return Err(EvolutionError::invalid_signature(text, "duplicate '*'"));
                }
                keyword_only = true;
                (ParameterKind::VarPositional, body)
            } else if keyword_only {
                (ParameterKind::KeywordOnly, raw)
            } else {
                (ParameterKind::PositionalOrKeyword, raw)
            };

            let param = parse_parameter(text, kind, body)?;
            if parameters.iter().any(|p| p.name == param.name) {
                return Err(EvolutionError::invalid_signature(
                    text,
                    format!("duplicate parameter '{}'", param.name),
                ));
            }
            if parameters
                .last()
                .is_some_and(|p| p.kind == ParameterKind::VarKeyword)
            {
                return Err(EvolutionError::invalid_signature(
                    text,
                    "parameter after '**'",
                ));
            }
            parameters.push(param);
        }

        Ok(Self {
            parameters,
            return_annotation,
        })
    }
}

fn parse_parameter(text: &str, kind: ParameterKind, body: &str) -> Result<Parameter> {
    let (decl, default) = match find_top_level(body, '=') {
        Some(eq) => (&body[..eq], Some(body[eq + 1..].trim())),
        None => (body, None),
    };
    if default.is_some_and(str::is_empty) {
        return Err(EvolutionError::invalid_signature(text, "empty default value"));
    }
    if default.is_some() && kind.is_variadic() {
        return Err(EvolutionError::invalid_signature(
            text,
            "variadic parameter cannot have a default",
        ));
    }

    let (name, annotation) = match find_top_level(decl, ':') {
        Some(colon) => (decl[..colon].trim(), Some(decl[colon + 1..].trim())),
        None => (decl.trim(), None),
    };
    if !is_identifier(name) {
        return Err(EvolutionError::invalid_signature(
            text,
            format!("invalid parameter name '{name}'"),
        ));
    }

    Ok(Parameter {
        name: name.to_string(),
        kind,
        has_default: default.is_some(),
        annotation: annotation.and_then(normalize_annotation),
    })
}

/// Strip whitespace, unify quote style and unquote forward references.
///
/// Returns `None` for an empty annotation.
pub fn normalize_annotation(annotation: &str) -> Option<String> {
    let normalized: String = annotation
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '\'' { '"' } else { c })
        .collect();
    let unquoted = normalized
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .filter(|s| !s.contains('"'))
        .map_or(normalized.as_str(), |s| s);
    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_dotted_identifier(s: &str) -> bool {
    s.split('.').all(is_identifier)
}

/// Byte offset of the first `target` outside brackets and string literals.
fn find_top_level(s: &str, target: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            _ if c == target && depth == 0 => return Some(i),
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// Byte offset of the `)` closing the `(` at `open`.
fn matching_close(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in s[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (c == ')').then_some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = s;
    while let Some(idx) = find_top_level(rest, sep) {
        parts.push(&rest[..idx]);
        rest = &rest[idx + sep.len_utf8()..];
    }
    parts.push(rest);
    parts
}

impl fmt::Display for Signature {
    /// Canonical text: `(a, /, b: int=..., *, c, **kw) -> str`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(self.parameters.len() + 2);
        let last_positional_only = self
            .parameters
            .iter()
            .rposition(|p| p.kind == ParameterKind::PositionalOnly);
        let mut star_emitted = false;

        for (i, param) in self.parameters.iter().enumerate() {
            if param.kind == ParameterKind::KeywordOnly && !star_emitted {
                parts.push("*".to_string());
                star_emitted = true;
            }
            let mut text = match param.kind {
                ParameterKind::VarPositional => {
                    star_emitted = true;
                    format!("*{}", param.name)
                }
                ParameterKind::VarKeyword => format!("**{}", param.name),
                _ => param.name.clone(),
            };
            if let Some(ann) = &param.annotation {
                text.push_str(": ");
                text.push_str(ann);
            }
            if param.has_default {
                text.push_str(if param.annotation.is_some() { " = ..." } else { "=..." });
            }
            parts.push(text);
            if Some(i) == last_positional_only {
                parts.push("/".to_string());
            }
        }

        write!(f, "({})", parts.join(", "))?;
        if let Some(ret) = &self.return_annotation {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Signature {
    type Err = EvolutionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let sig = Signature::parse("(x, y=1)").unwrap();
        assert_eq!(sig.parameters.len(), 2);
        assert!(!sig.parameters[0].has_default);
        assert!(sig.parameters[1].has_default);
        assert_eq!(sig.to_string(), "(x, y=...)");
    }

    #[test]
    fn test_parse_full_python_signature() {
        let sig =
            Signature::parse("request(method, url, /, params: dict = None, *args, timeout: float, **kwargs) -> Response")
                .unwrap();
        let kinds: Vec<_> = sig.parameters.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParameterKind::PositionalOnly,
                ParameterKind::PositionalOnly,
                ParameterKind::PositionalOrKeyword,
                ParameterKind::VarPositional,
                ParameterKind::KeywordOnly,
                ParameterKind::VarKeyword,
            ]
        );
        assert_eq!(sig.return_annotation.as_deref(), Some("Response"));
        assert_eq!(
            sig.parameter("params").and_then(|p| p.annotation.as_deref()),
            Some("dict")
        );
    }

    #[test]
    fn test_bare_star_marks_keyword_only() {
        let sig = Signature::parse("(a, *, b=2)").unwrap();
        assert_eq!(sig.parameters[1].kind, ParameterKind::KeywordOnly);
        assert_eq!(sig.to_string(), "(a, *, b=...)");
    }

    #[test]
    fn test_nested_defaults_and_annotations() {
        let sig = Signature::parse("(a: Dict[str, int] = {'k': (1, 2)}, b: str = 'x,y')").unwrap();
        assert_eq!(sig.parameters.len(), 2);
        assert_eq!(sig.parameters[0].annotation.as_deref(), Some("Dict[str,int]"));
        assert!(sig.parameters[1].has_default);
    }

    #[test]
    fn test_whitespace_and_quotes_normalize() {
        let a = Signature::parse("(x: 'Optional[ int ]')").unwrap();
        let b = Signature::parse("(x:\"Optional[int]\")").unwrap();
        let c = Signature::parse("(x: Optional[int])").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_default_value_text_is_not_identity() {
        let a = Signature::parse("(x=1)").unwrap();
        let b = Signature::parse("(x=2)").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_roundtrip() {
        let text = "(a, /, b: int = ..., *args, c, **kw) -> List[str]";
        let sig = Signature::parse(text).unwrap();
        assert_eq!(sig.to_string(), text);
        assert_eq!(Signature::parse(&sig.to_string()).unwrap(), sig);
    }

    #[test]
    fn test_empty_and_trailing_comma() {
        assert!(Signature::parse("()").unwrap().parameters.is_empty());
        assert_eq!(Signature::parse("(a, b,)").unwrap().parameters.len(), 2);
    }

    #[test]
    fn test_invalid_signatures() {
        for bad in [
            "x, y",
            "(x",
            "(x) extra",
            "(1x)",
            "(a, a)",
            "(**kw, a)",
            "(*a, *b)",
            "(*args=1)",
            "(a=)",
            "(a) ->",
            "not a name(x)",
        ] {
            assert!(Signature::parse(bad).is_err(), "'{bad}' should be rejected");
        }
    }

    #[test]
    fn test_required_parameters() {
        assert!(Parameter::new("x").is_required());
        assert!(!Parameter::new("x").with_default().is_required());
        assert!(!Parameter::new("a")
            .kind(ParameterKind::VarPositional)
            .is_required());
    }
}
