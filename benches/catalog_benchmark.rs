use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use program_signup::models::Selection;
use program_signup::services::{resolve_cost, ProgramCatalog};

fn benchmark_resolve(c: &mut Criterion) {
    let catalog = ProgramCatalog::standard().expect("Failed to load catalog");

    let hit: Selection = serde_json::from_value(serde_json::json!({
        "track": "fall",
        "segment": "Coach Guided",
        "activityType": "Masters",
        "userType": "return",
        "trainingMode": "Speed",
    }))
    .expect("Failed to build selection");

    // Summer has no Masters programs
    let mut miss = hit.clone();
    miss.track = Some(program_signup::models::Track::Summer);

    let mut group = c.benchmark_group("resolve");

    group.bench_function("url_hit", |b| b.iter(|| catalog.resolve_url(black_box(&hit))));
    group.bench_function("url_miss", |b| b.iter(|| catalog.resolve_url(black_box(&miss))));
    group.bench_function("cost", |b| b.iter(|| resolve_cost(black_box(&hit))));
    group.bench_function("load_standard", |b| b.iter(ProgramCatalog::standard));

    group.finish();
}

criterion_group!(benches, benchmark_resolve);
criterion_main!(benches);
