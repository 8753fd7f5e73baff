//! Criterion benchmarks for heap-graph construction and capture.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tare_core::StrategyKind;
use tare_population::Population;
use tare_snapshot::{capture_to_writer, HeapGraph};

const T0: i64 = 1_700_000_000;

fn bench_graph_build(c: &mut Criterion) {
    let population = Population::generate_at(StrategyKind::Closure, 500, T0);
    c.bench_function("graph_from_population_500", |b| {
        b.iter(|| black_box(HeapGraph::from_population(black_box(&population))));
    });
}

fn bench_graph_encode(c: &mut Criterion) {
    let population = Population::generate_at(StrategyKind::Closure, 500, T0);
    let graph = HeapGraph::from_population(&population);
    c.bench_function("graph_to_json_500", |b| {
        b.iter(|| black_box(graph.to_json().unwrap()));
    });
}

fn bench_capture_protocol(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture_to_writer");
    group.sample_size(20);
    for count in [50u32, 500] {
        group.bench_function(format!("instances_{count}"), |b| {
            b.iter_batched(
                || {
                    let population = Population::generate_at(StrategyKind::Shared, count, T0);
                    HeapGraph::from_population(&population)
                },
                |graph| black_box(capture_to_writer(graph, Vec::new()).unwrap()),
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_graph_build,
    bench_graph_encode,
    bench_capture_protocol
);
criterion_main!(benches);
