//! Criterion benchmarks comparing the three construction strategies.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tare_core::{Instance, StrategyKind};
use tare_population::Population;
use tare_strategy::build_at;
use tare_test_utils::{ramp_spec, FIXED_CREATED_AT};

fn bench_construction(c: &mut Criterion) {
    let spec = ramp_spec(1, 64);
    let mut group = c.benchmark_group("construct");
    for kind in StrategyKind::ALL {
        group.bench_function(kind.label(), |b| {
            b.iter(|| black_box(build_at(black_box(kind), &spec, FIXED_CREATED_AT)));
        });
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let spec = ramp_spec(1, 64);
    let mut group = c.benchmark_group("dispatch_checksum");
    for kind in StrategyKind::ALL {
        let instance = build_at(kind, &spec, FIXED_CREATED_AT);
        group.bench_function(kind.label(), |b| {
            b.iter(|| black_box(instance.checksum()));
        });
    }
    group.finish();
}

fn bench_population_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("population_generate_1000");
    group.sample_size(20);
    for kind in StrategyKind::ALL {
        group.bench_function(kind.label(), |b| {
            b.iter(|| {
                black_box(Population::generate_at(
                    black_box(kind),
                    1000,
                    FIXED_CREATED_AT,
                ))
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_dispatch,
    bench_population_generation
);
criterion_main!(benches);
