//! Pipeline benchmark: fit on a training table, then single-record transform.

mod common;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cvd_risk::features::FeaturePipeline;

fn bench_fit(c: &mut Criterion) {
    let table = common::table(1000, 1);
    c.bench_function("pipeline_fit_1000_rows", |b| {
        b.iter(|| {
            let mut pipeline = FeaturePipeline::new();
            black_box(pipeline.fit_transform(black_box(&table)).unwrap())
        })
    });
}

fn bench_transform(c: &mut Criterion) {
    let table = common::table(1000, 1);
    let mut pipeline = FeaturePipeline::new();
    pipeline.fit_transform(&table).unwrap();
    let record = &table.records[0];

    c.bench_function("pipeline_transform_one", |b| {
        b.iter(|| pipeline.transform(black_box(record)).unwrap())
    });
}

criterion_group!(benches, bench_fit, bench_transform);
criterion_main!(benches);
