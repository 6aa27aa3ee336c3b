//! Criterion benchmarks for the export graph (`bounce-core::graph`).
//!
//! Two axes:
//!
//! - **Edit** — `split()` / `remove()` on graphs of growing fan-out
//! - **Materialize** — job expansion throughput
//!
//! Run with: `cargo bench -p bounce-core -- graph/`
#![allow(missing_docs)]

use bounce_core::{ConfigPath, ExportGraph, ExportSchema};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const FAN_OUTS: &[usize] = &[2, 8, 32];

struct Bench;

impl ExportSchema for Bench {
    type TimeRange = (u64, u64);
    type ChannelConfig = u8;
    type Format = u8;
    type Filename = u8;
}

// ---------------------------------------------------------------------------
// Graph constructors
// ---------------------------------------------------------------------------

/// One timespan, `n` formats under one channel config, `n` filenames each.
fn make_grid(n: usize) -> (ExportGraph<Bench>, ConfigPath) {
    let mut graph = ExportGraph::new();
    let path = graph.create_empty_config(vec![(0, 48_000), (48_000, 96_000)], 2, 0, 0);
    for _ in 1..n {
        graph.split(path.filename, 0.5).unwrap();
    }
    for _ in 1..n {
        graph.split(path.format, 0.5).unwrap();
    }
    (graph, path)
}

// ---------------------------------------------------------------------------
// Edit benchmarks
// ---------------------------------------------------------------------------

fn bench_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/edit");

    for &n in FAN_OUTS {
        // Fresh graph per iteration; ids are stable across rebuilds.
        let path = make_grid(n).1;

        group.bench_with_input(BenchmarkId::new("split_timespan", n), &n, |b, _| {
            b.iter_batched(
                || make_grid(n).0,
                |mut g| black_box(g.split(path.timespan, 0.5).unwrap()),
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("remove_format", n), &n, |b, _| {
            b.iter_batched(
                || make_grid(n).0,
                |mut g| black_box(g.remove(path.format).unwrap()),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Materialize benchmarks
// ---------------------------------------------------------------------------

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/materialize");

    for &n in FAN_OUTS {
        let (graph, _) = make_grid(n);
        group.bench_with_input(BenchmarkId::new("collect", n), &n, |b, _| {
            b.iter(|| black_box(graph.materialize().len()));
        });
        group.bench_with_input(BenchmarkId::new("job_count", n), &n, |b, _| {
            b.iter(|| black_box(graph.job_count()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_edit, bench_materialize);
criterion_main!(benches);
