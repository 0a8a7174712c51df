//! Backward-compatibility heuristic for signature changes.
//!
//! A modified signature is compatible when every existing call site keeps
//! working: previously accepted parameters are still accepted with a type at
//! least as wide, previously required positional parameters keep their slot,
//! no new parameter is required, and the return type is at most as wide as
//! before. This is advisory; it reasons
//! only about declared signatures.

use crate::model::{Parameter, ParameterKind, Signature};
use std::collections::BTreeSet;

/// Outcome of a compatibility check: compatible iff there are no reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compatibility {
    reasons: Vec<String>,
}

impl Compatibility {
    /// Compare an old signature with its replacement.
    ///
    /// Gaining or losing a signature entirely is treated as incompatible.
    #[must_use]
    pub fn check(old: Option<&Signature>, new: Option<&Signature>) -> Self {
        let mut compat = Self::default();
        match (old, new) {
            (None, None) => {}
            (Some(_), None) => compat.reject("signature removed"),
            (None, Some(_)) => compat.reject("signature introduced on a previously opaque element"),
            (Some(old), Some(new)) => {
                compat.check_parameters(old, new);
                compat.check_return(old, new);
            }
        }
        compat
    }

    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.reasons.is_empty()
    }

    #[must_use]
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    fn reject(&mut self, reason: impl Into<String>) {
        self.reasons.push(reason.into());
    }

    fn check_parameters(&mut self, old: &Signature, new: &Signature) {
        let old_positional = positional(old);
        let new_positional = positional(new);
        let mut matched: BTreeSet<usize> = BTreeSet::new();

        for param in &old.parameters {
            let Some((new_idx, counterpart)) = find_counterpart(param, old, new) else {
                self.reject(format!("parameter '{}' removed", param.name));
                continue;
            };
            matched.insert(new_idx);

            if !kind_transition_allowed(param.kind, counterpart.kind) {
                self.reject(format!(
                    "parameter '{}' changed from {} to {}",
                    param.name,
                    kind_label(param.kind),
                    kind_label(counterpart.kind)
                ));
                continue;
            }

            if param.kind.is_positional() && param.is_required() {
                let old_pos = old_positional.iter().position(|p| same(p, param));
                let new_pos = new_positional.iter().position(|p| same(p, counterpart));
                if old_pos != new_pos {
                    self.reject(format!("parameter '{}' moved", param.name));
                }
            }

            if param.has_default && !counterpart.has_default {
                self.reject(format!("parameter '{}' lost its default", param.name));
            }

            if !annotation_widens(param.annotation.as_deref(), counterpart.annotation.as_deref()) {
                self.reject(format!(
                    "parameter '{}' type narrowed from {} to {}",
                    param.name,
                    param.annotation.as_deref().unwrap_or("Any"),
                    counterpart.annotation.as_deref().unwrap_or("Any")
                ));
            }
        }

        for (idx, param) in new.parameters.iter().enumerate() {
            if !matched.contains(&idx) && param.is_required() {
                self.reject(format!("new required parameter '{}'", param.name));
            }
        }
    }

    fn check_return(&mut self, old: &Signature, new: &Signature) {
        let old_ret = old.return_annotation.as_deref();
        let new_ret = new.return_annotation.as_deref();
        // The old return type must accept everything the new one produces.
        if !annotation_widens(new_ret, old_ret) {
            self.reject(format!(
                "return type widened from {} to {}",
                old_ret.unwrap_or("Any"),
                new_ret.unwrap_or("Any")
            ));
        }
    }
}

fn positional(sig: &Signature) -> Vec<&Parameter> {
    sig.parameters
        .iter()
        .filter(|p| p.kind.is_positional())
        .collect()
}

fn same(a: &Parameter, b: &Parameter) -> bool {
    std::ptr::eq(a, b)
}

/// Locate the parameter in `new` that serves the callers of `param`.
///
/// Variadics match by kind, named parameters by name. A positional-only
/// parameter may be renamed, so it falls back to its positional slot.
fn find_counterpart<'a>(
    param: &Parameter,
    old: &Signature,
    new: &'a Signature,
) -> Option<(usize, &'a Parameter)> {
    if param.kind.is_variadic() {
        return new
            .parameters
            .iter()
            .enumerate()
            .find(|(_, p)| p.kind == param.kind);
    }

    let by_name = new
        .parameters
        .iter()
        .enumerate()
        .find(|(_, p)| p.name == param.name && !p.kind.is_variadic());
    if by_name.is_some() || param.kind != ParameterKind::PositionalOnly {
        return by_name;
    }

    let slot = positional(old).iter().position(|p| same(p, param))?;
    let mut seen = 0;
    for (idx, candidate) in new.parameters.iter().enumerate() {
        if candidate.kind.is_positional() {
            if seen == slot {
                return Some((idx, candidate));
            }
            seen += 1;
        }
    }
    None
}

fn kind_transition_allowed(old: ParameterKind, new: ParameterKind) -> bool {
    old == new
        || matches!(
            (old, new),
            (ParameterKind::PositionalOnly, ParameterKind::PositionalOrKeyword)
                | (ParameterKind::KeywordOnly, ParameterKind::PositionalOrKeyword)
        )
}

const fn kind_label(kind: ParameterKind) -> &'static str {
    match kind {
        ParameterKind::PositionalOnly => "positional-only",
        ParameterKind::PositionalOrKeyword => "positional-or-keyword",
        ParameterKind::VarPositional => "*args",
        ParameterKind::KeywordOnly => "keyword-only",
        ParameterKind::VarKeyword => "**kwargs",
    }
}

/// Whether `wider` accepts every value `narrower` accepts.
///
/// A missing annotation means `Any`. Unions (`Union[..]`, `Optional[..]`,
/// `a | b`) compare as member sets; anything else compares textually.
fn annotation_widens(narrower: Option<&str>, wider: Option<&str>) -> bool {
    let Some(wider) = wider else {
        return true;
    };
    if is_any(wider) {
        return true;
    }
    let Some(narrower) = narrower else {
        return false;
    };
    if narrower == wider {
        return true;
    }
    if is_any(narrower) {
        return false;
    }
    let wide_members = union_members(wider);
    union_members(narrower).is_subset(&wide_members)
}

fn is_any(annotation: &str) -> bool {
    matches!(strip_typing(annotation), "Any" | "object")
}

fn strip_typing(annotation: &str) -> &str {
    annotation.strip_prefix("typing.").unwrap_or(annotation)
}

/// Flatten an annotation into its union members.
fn union_members(annotation: &str) -> BTreeSet<String> {
    let mut members = BTreeSet::new();
    collect_members(annotation, &mut members);
    members
}

fn collect_members(annotation: &str, out: &mut BTreeSet<String>) {
    let parts = split_top_level(annotation, '|');
    if parts.len() > 1 {
        for part in parts {
            collect_members(part, out);
        }
        return;
    }

    let text = strip_typing(annotation.trim());
    if let Some(inner) = bracket_body(text, "Union") {
        for part in split_top_level(inner, ',') {
            collect_members(part, out);
        }
    } else if let Some(inner) = bracket_body(text, "Optional") {
        collect_members(inner, out);
        out.insert("None".to_string());
    } else if !text.is_empty() {
        let text = if text == "NoneType" { "None" } else { text };
        out.insert(text.to_string());
    }
}

fn bracket_body<'a>(text: &'a str, head: &str) -> Option<&'a str> {
    text.strip_prefix(head)?
        .strip_prefix('[')?
        .strip_suffix(']')
}

/// Split on `sep` outside brackets.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match ch {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(old: &str, new: &str) -> Compatibility {
        let old = Signature::parse(old).unwrap();
        let new = Signature::parse(new).unwrap();
        Compatibility::check(Some(&old), Some(&new))
    }

    #[test]
    fn test_adding_optional_parameter_is_compatible() {
        assert!(check("(x)", "(x, y=1)").is_compatible());
        assert!(check("(x)", "(x, *, flag=False)").is_compatible());
        assert!(check("(x)", "(x, *args, **kwargs)").is_compatible());
    }

    #[test]
    fn test_new_required_parameter_breaks() {
        let compat = check("(x)", "(x, y)");
        assert!(!compat.is_compatible());
        assert_eq!(compat.reasons(), ["new required parameter 'y'"]);
        assert!(!check("(x)", "(x, *, key)").is_compatible());
    }

    #[test]
    fn test_removal_and_reordering_break() {
        assert!(!check("(x, y)", "(x)").is_compatible());
        assert!(!check("(x, y=1)", "(x)").is_compatible());
        assert!(!check("(a, b)", "(b, a)").is_compatible());
        assert!(!check("(x, *args)", "(x)").is_compatible());
    }

    #[test]
    fn test_inserting_optional_before_optional_is_compatible() {
        assert!(check("(x, y=1)", "(x, z=2, y=1)").is_compatible());
    }

    #[test]
    fn test_parameter_kind_transitions() {
        assert!(check("(x, /)", "(x)").is_compatible());
        assert!(check("(x, *, key=1)", "(x, key=1)").is_compatible());
        assert!(!check("(x)", "(x, /)").is_compatible());
        assert!(!check("(x, key=1)", "(x, *, key=1)").is_compatible());
    }

    #[test]
    fn test_positional_only_may_be_renamed() {
        assert!(check("(a, /)", "(value, /)").is_compatible());
    }

    #[test]
    fn test_removing_default_breaks() {
        let compat = check("(x, y=1)", "(x, y)");
        assert!(!compat.is_compatible());
        assert!(compat.reasons()[0].contains("lost its default"));
    }

    #[test]
    fn test_type_widening() {
        assert!(check("(x: int)", "(x: Union[int, str])").is_compatible());
        assert!(check("(x: int)", "(x: int | None)").is_compatible());
        assert!(check("(x: int)", "(x: Optional[int])").is_compatible());
        assert!(check("(x: int)", "(x)").is_compatible());
        assert!(check("(x: int)", "(x: Any)").is_compatible());
        assert!(!check("(x: Union[int, str])", "(x: int)").is_compatible());
        assert!(!check("(x)", "(x: int)").is_compatible());
        assert!(!check("(x: int)", "(x: str)").is_compatible());
    }

    #[test]
    fn test_return_type_may_narrow() {
        assert!(check("(x) -> Optional[int]", "(x) -> int").is_compatible());
        assert!(check("(x)", "(x) -> int").is_compatible());
        assert!(!check("(x) -> int", "(x) -> Optional[int]").is_compatible());
        assert!(!check("(x) -> int", "(x)").is_compatible());
    }

    #[test]
    fn test_signature_gained_or_lost() {
        let sig = Signature::parse("(x)").unwrap();
        assert!(!Compatibility::check(Some(&sig), None).is_compatible());
        assert!(!Compatibility::check(None, Some(&sig)).is_compatible());
        assert!(Compatibility::check(None, None).is_compatible());
    }

    #[test]
    fn test_union_member_flattening() {
        let members = union_members("Union[int,Optional[str]]|bytes");
        let expected: BTreeSet<String> = ["int", "str", "None", "bytes"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(members, expected);
    }
}
