use criterion::{black_box, criterion_group, criterion_main, Criterion};
use house_price_engine::{PriceEngine, RawAttributes};
use std::path::PathBuf;

fn demo_engine() -> PriceEngine {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts/demo");
    PriceEngine::load(&dir).expect("demo artifacts should load")
}

fn sample(location: &str) -> RawAttributes {
    RawAttributes::new()
        .with("carpet_area", 1100.0)
        .with("bathroom_count", 2)
        .with("balcony_count", 1)
        .with("current_floor", 6)
        .with("total_floor", 12)
        .with("bhk", 2)
        .with("location", location)
        .with("transaction_type", "Resale")
        .with("furnishing", "Semi-Furnished")
}

fn bench_predict(c: &mut Criterion) {
    let engine = demo_engine();
    let raw = sample("thane");

    c.bench_function("predict_single", |b| {
        b.iter(|| engine.predict(black_box(&raw)))
    });

    let batch: Vec<RawAttributes> = ["mumbai", "pune", "thane", "chennai"]
        .iter()
        .cycle()
        .take(1_000)
        .map(|loc| sample(loc))
        .collect();

    c.bench_function("predict_batch_1000", |b| {
        b.iter(|| engine.predict_batch(black_box(&batch)))
    });
}

criterion_group!(benches, bench_predict);
criterion_main!(benches);
