//! Property-based tests for signature parsing.
//!
//! Signature text comes from untrusted package metadata, so parsing must
//! never panic, and accepted signatures must render back to equivalent text.

use api_evolution::model::Signature;
use proptest::prelude::*;

fn parameter_strategy() -> impl Strategy<Value = String> {
    (
        "[a-z_][a-z0-9_]{0,6}",
        prop::option::of(prop::sample::select(vec![
            "int",
            "str",
            "List[int]",
            "Dict[str, int]",
            "Optional['Node']",
            "Callable[[int], None]",
        ])),
        any::<bool>(),
    )
        .prop_map(|(name, annotation, default)| {
            let mut text = name;
            if let Some(ann) = annotation {
                text.push_str(": ");
                text.push_str(ann);
            }
            if default {
                text.push_str(" = None");
            }
            text
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn parse_doesnt_panic(s in "\\PC{0,200}") {
        let _ = Signature::parse(&s);
    }

    #[test]
    fn bracketed_garbage_doesnt_panic(inner in "[a-z0-9_ ,=*/:'\"\\[\\]()]{0,80}") {
        if let Ok(sig) = Signature::parse(&format!("({inner})")) {
            let _ = sig.to_string();
        }
    }

    #[test]
    fn display_roundtrip(
        params in prop::collection::vec(parameter_strategy(), 0..6),
        star in prop::option::of(0usize..6),
        returns in prop::option::of("(int|str|None|List\\[str\\])"),
    ) {
        let mut parts = params;
        if let Some(at) = star {
            parts.insert(at.min(parts.len()), "*".to_string());
        }
        let mut text = format!("({})", parts.join(", "));
        if let Some(ret) = returns {
            text.push_str(" -> ");
            text.push_str(&ret);
        }

        if let Ok(sig) = Signature::parse(&text) {
            let rendered = sig.to_string();
            let reparsed = Signature::parse(&rendered).unwrap();
            prop_assert_eq!(reparsed, sig);
        }
    }

    #[test]
    fn normalization_is_stable(text in "\\(x(: int)?(, y(: 'str')? ?= ?1)?\\)") {
        let sig = Signature::parse(&text).unwrap();
        prop_assert_eq!(sig.normalized(), sig.normalized().normalized());
    }
}
