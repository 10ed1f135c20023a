use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use json_edit::document::{parse, serialize};
use json_edit::sync::locate;
use json_edit::tree::project;
use serde_json::json;
use std::time::Duration;

fn sample_document(users: usize) -> String {
    let entries: Vec<_> = (0..users)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("user-{}", i),
                "active": i % 2 == 0,
                "tags": ["alpha", "beta"],
            })
        })
        .collect();
    serialize(&json!({"users": entries, "count": users}), true)
}

fn projection_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");
    group.measurement_time(Duration::from_secs(10));

    for size in [10, 100, 1000].iter() {
        let text = sample_document(*size);
        let value = parse(&text).unwrap();
        group.bench_with_input(BenchmarkId::new("users", size), &value, |b, value| {
            b.iter(|| black_box(project(value)))
        });
    }

    group.finish();
}

fn locate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");
    group.measurement_time(Duration::from_secs(10));

    for size in [10, 100, 1000].iter() {
        let text = sample_document(*size);
        // Worst case: the last duplicated value in the document.
        let occurrence = size / 2 - 1;
        group.bench_with_input(BenchmarkId::new("duplicate_value", size), &text, |b, text| {
            b.iter(|| black_box(locate(text, "true", Some("active"), occurrence)))
        });
    }

    group.finish();
}

criterion_group!(benches, projection_benchmark, locate_benchmark);
criterion_main!(benches);
