//! Benchmarks for seed hashing and pin displacement.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use foodshare_geo::Coordinate;
use foodshare_privacy::batch::{obfuscate_pins, PinRequest};
use foodshare_privacy::{obfuscate, LocationObfuscator, RollingSeedHash, SeedHash};

fn create_test_pins(count: usize) -> Vec<PinRequest> {
    (0..count)
        .map(|i| {
            // Grid of listings around Calgary
            let lat = 50.8 + (i as f64 * 0.001) % 0.5;
            let lng = -114.3 + (i as f64 * 0.001) % 0.5;
            PinRequest {
                id: format!("record-{i}"),
                coordinate: Coordinate::new(lat, lng),
            }
        })
        .collect()
}

fn bench_seed_hash(c: &mut Criterion) {
    c.bench_function("rolling_hash", |b| {
        b.iter(|| RollingSeedHash.unit_interval(black_box("event-123_angle")))
    });
}

fn bench_single_obfuscation(c: &mut Criterion) {
    let home = Coordinate::new(51.0447, -114.0719);

    c.bench_function("obfuscate_single", |b| {
        b.iter(|| obfuscate(black_box(&home), black_box("event-123"), black_box(2.0)))
    });
}

fn bench_batch_obfuscation(c: &mut Criterion) {
    let mut group = c.benchmark_group("obfuscate_batch");
    let obfuscator = LocationObfuscator::default();

    for size in [10, 100, 1000, 10000].iter() {
        let pins = create_test_pins(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| obfuscate_pins(black_box(&obfuscator), black_box(&pins)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_seed_hash,
    bench_single_obfuscation,
    bench_batch_obfuscation
);
criterion_main!(benches);
