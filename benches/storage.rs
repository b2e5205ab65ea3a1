//! Storage benchmark: sealed artifact write/read through both backends.

mod common;

use criterion::{criterion_group, criterion_main, Criterion};
use cvd_risk::model::{ModelVariant, RiskModel};
use cvd_risk::storage::{ArtifactStore, FileArtifactStore, SecureArtifactStore};

fn trained() -> RiskModel {
    let mut config = common::config();
    config.forest.n_trees = 50;
    let mut model = RiskModel::with_variant(config, ModelVariant::RandomForest);
    model.train_on(&common::table(500, 3)).unwrap();
    model
}

fn bench_backend(c: &mut Criterion, label: &str, store: &dyn ArtifactStore) {
    let model = trained();
    c.bench_function(&format!("{label}_persist"), |b| {
        b.iter(|| model.persist(store, "bench").unwrap())
    });

    let mut restored = RiskModel::new(common::config());
    c.bench_function(&format!("{label}_restore"), |b| {
        b.iter(|| restored.restore(store, "bench").unwrap())
    });
}

fn bench_file_store(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileArtifactStore::new(dir.path());
    bench_backend(c, "file", &store);
}

fn bench_encrypted_store(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let store = SecureArtifactStore::open(&dir.path().join("bench.db"), b"bench-secret").unwrap();
    bench_backend(c, "encrypted", &store);
}

criterion_group!(benches, bench_file_store, bench_encrypted_store);
criterion_main!(benches);
