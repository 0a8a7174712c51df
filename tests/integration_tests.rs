//! Integration tests for api-evolution
//!
//! These tests verify end-to-end behavior of version selection, the diff
//! engine, lifecycle queries and result serialization.

use api_evolution::{
    analysis::{AnalysisMetadata, AnalysisWarning, ChangeFilter},
    diff::{ChangeType, DiffEngine},
    error::{EvolutionError, InvariantViolation},
    model::{ApiElement, ApiKind, Signature, Snapshot, SnapshotStore, VersionCatalog, VersionInfo},
    pipeline::{Analyzer, InMemorySource},
    selection::{SelectionConfig, VersionSelector},
    AnalysisResult,
};
use chrono::{TimeZone, Utc};

// ============================================================================
// Test Fixtures
// ============================================================================

fn function(module: &str, name: &str, sig: &str) -> ApiElement {
    ApiElement::new(module, name, ApiKind::Function)
        .with_signature(Signature::parse(sig).expect("fixture signature"))
}

fn versions(names: &[&str]) -> Vec<VersionInfo> {
    names.iter().map(|v| VersionInfo::new(*v)).collect()
}

/// V1={foo(x)}, V2={foo(x, y=1)}, V3={}
fn foo_history() -> SnapshotStore {
    SnapshotStore::new(
        versions(&["1.0", "2.0", "3.0"]),
        vec![
            Snapshot::new("1.0", vec![function("pkg", "foo", "(x)")]).unwrap(),
            Snapshot::new("2.0", vec![function("pkg", "foo", "(x, y=1)")]).unwrap(),
            Snapshot::empty("3.0"),
        ],
    )
    .unwrap()
}

fn result_from(store: SnapshotStore) -> AnalysisResult {
    let changes = DiffEngine::new().diff(&store);
    AnalysisResult::new("pkg", store, changes, AnalysisMetadata::default()).unwrap()
}

// ============================================================================
// Diff Engine Tests
// ============================================================================

mod diff_tests {
    use super::*;

    #[test]
    fn test_modified_then_removed() {
        let changes = DiffEngine::new().diff(&foo_history());
        assert_eq!(changes.len(), 2);

        assert_eq!(changes[0].change_type, ChangeType::Modified);
        assert_eq!(changes[0].from_version.as_deref(), Some("1.0"));
        assert_eq!(changes[0].to_version.as_deref(), Some("2.0"));
        assert!(changes[0].is_backwards_compatible);
        assert_eq!(changes[0].old_signature.as_deref(), Some("(x)"));
        assert_eq!(changes[0].new_signature.as_deref(), Some("(x, y=...)"));

        assert_eq!(changes[1].change_type, ChangeType::Removed);
        assert_eq!(changes[1].from_version.as_deref(), Some("2.0"));
        assert_eq!(changes[1].to_version.as_deref(), Some("3.0"));
        assert!(!changes[1].is_backwards_compatible);
    }

    #[test]
    fn test_first_snapshot_is_never_added() {
        let store = SnapshotStore::new(
            versions(&["1.0", "2.0"]),
            vec![
                Snapshot::new("1.0", vec![function("pkg", "a", "()")]).unwrap(),
                Snapshot::new(
                    "2.0",
                    vec![function("pkg", "a", "()"), function("pkg", "b", "()")],
                )
                .unwrap(),
            ],
        )
        .unwrap();
        let changes = DiffEngine::new().diff(&store);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Added);
        assert_eq!(changes[0].element.name, "b");
    }

    #[test]
    fn test_deprecation_coexists_with_modification() {
        let store = SnapshotStore::new(
            versions(&["1.0", "2.0"]),
            vec![
                Snapshot::new("1.0", vec![function("pkg", "old", "(x)")]).unwrap(),
                Snapshot::new("2.0", vec![function("pkg", "old", "(x, y)").deprecated(true)])
                    .unwrap(),
            ],
        )
        .unwrap();
        let changes = DiffEngine::new().diff(&store);
        let types: Vec<ChangeType> = changes.iter().map(|c| c.change_type).collect();
        assert_eq!(types, vec![ChangeType::Modified, ChangeType::Deprecated]);
        assert!(!changes[0].is_backwards_compatible);
        assert!(changes[1].is_backwards_compatible);
    }

    #[test]
    fn test_whitespace_and_quotes_are_not_changes() {
        let store = SnapshotStore::new(
            versions(&["1.0", "2.0"]),
            vec![
                Snapshot::new("1.0", vec![function("pkg", "f", "(x: Dict[str, int] = 'a')")])
                    .unwrap(),
                Snapshot::new("2.0", vec![function("pkg", "f", "(x: Dict[str,int] = \"a\")")])
                    .unwrap(),
            ],
        )
        .unwrap();
        assert!(DiffEngine::new().diff(&store).is_empty());
    }

    #[test]
    fn test_changes_sorted_by_transition_then_name() {
        let store = SnapshotStore::new(
            versions(&["1.0", "2.0", "3.0"]),
            vec![
                Snapshot::empty("1.0"),
                Snapshot::new("2.0", vec![function("pkg", "zeta", "()"), function("pkg", "alpha", "()")])
                    .unwrap(),
                Snapshot::new("3.0", vec![function("pkg", "beta", "()")]).unwrap(),
            ],
        )
        .unwrap();
        let changes = DiffEngine::new().diff(&store);
        let keys: Vec<(String, String)> = changes
            .iter()
            .map(|c| (c.to_version.clone().unwrap_or_default(), c.element.name.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2.0".into(), "alpha".into()),
                ("2.0".into(), "zeta".into()),
                ("3.0".into(), "alpha".into()),
                ("3.0".into(), "beta".into()),
                ("3.0".into(), "zeta".into()),
            ]
        );
    }

    #[test]
    fn test_degenerate_sequences() {
        let engine = DiffEngine::new();
        assert!(engine.diff(&SnapshotStore::default()).is_empty());

        let single = SnapshotStore::new(
            versions(&["1.0"]),
            vec![Snapshot::new("1.0", vec![function("pkg", "f", "()")]).unwrap()],
        )
        .unwrap();
        assert!(engine.diff(&single).is_empty());
    }

    #[test]
    fn test_non_chronological_sequence_fails_fast() {
        let newer = VersionInfo::new("1.0").released(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let older = VersionInfo::new("2.0").released(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        let err = DiffEngine::new()
            .diff_sequence(
                &[newer, older],
                &[Snapshot::empty("1.0"), Snapshot::empty("2.0")],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Invariant(InvariantViolation::NonChronological { .. })
        ));
    }

    #[test]
    fn test_idempotent() {
        let store = foo_history();
        let engine = DiffEngine::new();
        assert_eq!(engine.diff(&store), engine.diff(&store));
    }
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_foo_lifecycle() {
        let result = result_from(foo_history());
        let lifecycle = result.lifecycle("foo");
        assert_eq!(lifecycle.matched_api.as_deref(), Some("pkg.foo:function"));
        assert_eq!(lifecycle.introduced_in.as_deref(), Some("1.0"));
        assert_eq!(lifecycle.removed_in.as_deref(), Some("3.0"));
        assert_eq!(lifecycle.versions_present, vec!["1.0", "2.0"]);
        assert_eq!(lifecycle.modifications.len(), 1);
        assert_eq!(lifecycle.modifications[0].version, "2.0");
        assert!(!lifecycle.collision_detected);
    }

    #[test]
    fn test_exact_full_name_wins() {
        let result = result_from(foo_history());
        let lifecycle = result.lifecycle("pkg.foo:function");
        assert_eq!(lifecycle.introduced_in.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_collision_on_shared_simple_name() {
        let store = SnapshotStore::new(
            versions(&["1.0"]),
            vec![Snapshot::new(
                "1.0",
                vec![function("pkg.a", "get", "()"), function("pkg.b", "get", "(key)")],
            )
            .unwrap()],
        )
        .unwrap();
        let lifecycle = result_from(store).lifecycle("get");
        assert!(lifecycle.collision_detected);
        assert!(lifecycle.matched_api.is_none());
        assert!(lifecycle.introduced_in.is_none());
        assert!(lifecycle.removed_in.is_none());
        let names: Vec<&str> = lifecycle
            .available_apis
            .iter()
            .map(|c| c.full_name.as_str())
            .collect();
        assert_eq!(names, vec!["pkg.a.get:function", "pkg.b.get:function"]);
    }

    #[test]
    fn test_dotted_or_recased_name_does_not_resolve() {
        let result = result_from(foo_history());
        for query in ["pkg.foo", "FOO", "Foo"] {
            let lifecycle = result.lifecycle(query);
            assert!(lifecycle.matched_api.is_none(), "{query} resolved");
            assert!(lifecycle.introduced_in.is_none());
            assert!(!lifecycle.collision_detected);
        }
    }

    #[test]
    fn test_unknown_api() {
        let lifecycle = result_from(foo_history()).lifecycle("nothing_here");
        assert!(!lifecycle.is_resolved());
        assert!(lifecycle.introduced_in.is_none());
        assert!(lifecycle.versions_present.is_empty());
        assert!(lifecycle.available_apis.is_empty());
    }
}

// ============================================================================
// Selection Tests
// ============================================================================

mod selection_tests {
    use super::*;

    fn catalog(n: usize) -> VersionCatalog {
        VersionCatalog::new((0..n).map(|i| VersionInfo::new(format!("0.{i}"))).collect()).unwrap()
    }

    #[test]
    fn test_sample_keeps_endpoints() {
        let catalog = catalog(100);
        let selector = VersionSelector::new(&SelectionConfig::sample(5)).unwrap();
        let selection = selector.select(&catalog).unwrap();
        let names: Vec<&str> = selection.version_names().collect();
        assert_eq!(names.len(), 5);
        assert_eq!(names[0], "0.0");
        assert_eq!(names[4], "0.99");
    }

    #[test]
    fn test_explicit_preserves_catalog_order() {
        let catalog = catalog(5);
        let selector =
            VersionSelector::new(&SelectionConfig::explicit(["0.3", "0.1", "0.4"])).unwrap();
        let names: Vec<String> = selector
            .select(&catalog)
            .unwrap()
            .version_names()
            .map(str::to_string)
            .collect();
        assert_eq!(names, vec!["0.1", "0.3", "0.4"]);
    }

    #[test]
    fn test_conflicting_strategies_rejected() {
        let config = SelectionConfig {
            max_versions: Some(3),
            from_version: Some("0.1".into()),
            ..SelectionConfig::default()
        };
        assert!(matches!(
            VersionSelector::new(&config),
            Err(EvolutionError::Config(_))
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let selector = VersionSelector::new(&SelectionConfig::range(Some("0.4"), Some("0.1"))).unwrap();
        assert!(matches!(
            selector.select(&catalog(5)),
            Err(EvolutionError::Config(_))
        ));
    }
}

// ============================================================================
// End-to-end Analysis Tests
// ============================================================================

mod analysis_tests {
    use super::*;

    fn source() -> InMemorySource {
        InMemorySource::new()
            .with_catalog("pkg", versions(&["1.0", "2.0", "3.0"]))
            .with_snapshot("pkg", Snapshot::new("1.0", vec![function("pkg", "foo", "(x)")]).unwrap())
            .with_snapshot(
                "pkg",
                Snapshot::new("2.0", vec![function("pkg", "foo", "(x, y=1)")]).unwrap(),
            )
            .with_snapshot("pkg", Snapshot::empty("3.0"))
    }

    #[test]
    fn test_missing_explicit_version_is_not_fatal() {
        let result = Analyzer::new(source())
            .analyze("pkg", &SelectionConfig::explicit(["9.9.9"]))
            .unwrap();
        assert!(result.versions().is_empty());
        assert!(result.changes().is_empty());
        assert!(matches!(
            result.metadata().warnings.as_slice(),
            [AnalysisWarning::VersionNotFound { version, .. }] if version == "9.9.9"
        ));
    }

    #[test]
    fn test_extraction_failure_drops_version() {
        let source = source().with_failure("pkg", "2.0", "wheel is corrupt");
        let result = Analyzer::new(source)
            .analyze("pkg", &SelectionConfig::default())
            .unwrap();
        let names: Vec<&str> = result.version_names().collect();
        assert_eq!(names, vec!["1.0", "3.0"]);
        assert_eq!(result.metadata().failed_versions, vec!["2.0"]);
        assert_eq!(result.changes().len(), 1);
        assert_eq!(result.changes()[0].change_type, ChangeType::Removed);
    }

    #[test]
    fn test_result_json_roundtrip() {
        let result = Analyzer::new(source())
            .analyze("pkg", &SelectionConfig::default())
            .unwrap();
        let json = result.to_json(true).unwrap();
        let restored = AnalysisResult::from_json(&json).unwrap();
        assert_eq!(result, restored);
    }

    #[test]
    fn test_summary_counts() {
        let result = Analyzer::new(source())
            .analyze("pkg", &SelectionConfig::default())
            .unwrap();
        let summary = result.summary();
        assert_eq!(summary.total_versions, 3);
        assert_eq!(summary.total_changes, 2);
        assert_eq!(summary.count(ChangeType::Modified), 1);
        assert_eq!(summary.count(ChangeType::Removed), 1);
        assert_eq!(summary.count(ChangeType::Added), 0);
        assert_eq!(summary.unique_apis, 1);
        assert_eq!(summary.breaking_changes, 1);
    }

    #[test]
    fn test_filtered_changes() {
        let result = Analyzer::new(source())
            .analyze("pkg", &SelectionConfig::default())
            .unwrap();
        let filter = ChangeFilter::new().breaking_only(true);
        let breaking: Vec<_> = result
            .filtered_changes(&filter)
            .collect();
        assert_eq!(breaking.len(), 1);
        assert_eq!(breaking[0].change_type, ChangeType::Removed);
    }
}
