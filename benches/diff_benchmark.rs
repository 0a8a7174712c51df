//! Benchmarks for the diff engine and lifecycle index.

use api_evolution::{
    analysis::AnalysisMetadata,
    diff::DiffEngine,
    model::{ApiElement, ApiKind, Signature, Snapshot, SnapshotStore, VersionInfo},
    AnalysisResult, LifecycleIndex,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// `versions` snapshots of `apis` functions each; every tenth function gains
/// an optional parameter per release and every fiftieth is dropped halfway.
fn build_store(versions: usize, apis: usize) -> SnapshotStore {
    let mut infos = Vec::with_capacity(versions);
    let mut snapshots = Vec::with_capacity(versions);
    for v in 0..versions {
        let version = format!("1.{v}.0");
        let elements = (0..apis)
            .filter(|i| !(i % 50 == 0 && v >= versions / 2))
            .map(|i| {
                let extra = if i % 10 == 0 { v } else { 0 };
                let params: Vec<String> = std::iter::once("self".to_string())
                    .chain((0..extra).map(|p| format!("opt{p}=None")))
                    .collect();
                let sig = Signature::parse(&format!("({})", params.join(", ")))
                    .expect("generated signature");
                ApiElement::new(format!("pkg.mod{}", i % 20), format!("func{i}"), ApiKind::Function)
                    .with_signature(sig)
            });
        snapshots.push(Snapshot::new(version.clone(), elements).expect("unique names"));
        infos.push(VersionInfo::new(version));
    }
    SnapshotStore::new(infos, snapshots).expect("aligned sequence")
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");
    for &(versions, apis) in &[(10, 500), (20, 2_000), (50, 5_000)] {
        let store = build_store(versions, apis);
        group.bench_with_input(
            BenchmarkId::new("sequence", format!("{versions}x{apis}")),
            &store,
            |b, store| b.iter(|| DiffEngine::new().diff(black_box(store))),
        );
        group.bench_with_input(
            BenchmarkId::new("sequence_no_hash", format!("{versions}x{apis}")),
            &store,
            |b, store| {
                let engine = DiffEngine::new().with_content_hash(false);
                b.iter(|| engine.diff(black_box(store)));
            },
        );
    }
    group.finish();
}

fn bench_lifecycle(c: &mut Criterion) {
    let store = build_store(20, 2_000);
    let changes = DiffEngine::new().diff(&store);
    let result = AnalysisResult::new("pkg", store, changes, AnalysisMetadata::default())
        .expect("valid result");

    c.bench_function("lifecycle_index_build", |b| {
        b.iter(|| LifecycleIndex::build(black_box(result.store()), black_box(result.changes())));
    });

    let index = result.lifecycle_index();
    c.bench_function("lifecycle_query_simple_name", |b| {
        b.iter(|| index.lifecycle(black_box("func990")));
    });
}

criterion_group!(benches, bench_diff, bench_lifecycle);
criterion_main!(benches);
