//! Analytics benchmarks: indicator dispatch, bar transforms, profiles and
//! format round trips.
//!
//! Run with: `cargo bench --package candela-bench`

use candela_bench::synthetic_series;
use candela_lib::bars::TransformKind;
use candela_lib::format::{CsvFormatter, Formatter, Table, read_bars};
use candela_lib::indicators::IndicatorKind;
use candela_lib::profile::{ProfileParams, RowSpec, TpoParams, build_profile, footprint, tpo_profile};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::fs::File;
use std::hint::black_box;
use std::io::BufWriter;
use tempfile::TempDir;

const SIZES: [usize; 2] = [1_000, 10_000];

fn indicator_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");
    let bars = synthetic_series(10_000, 42);
    group.throughput(Throughput::Elements(bars.len() as u64));

    for kind in IndicatorKind::catalog() {
        group.bench_with_input(BenchmarkId::from_parameter(kind.name()), &kind, |b, kind| {
            b.iter(|| kind.compute(black_box(&bars)));
        });
    }
    group.finish();
}

fn transform_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("transforms");
    for size in SIZES {
        let bars = synthetic_series(size, 42);
        group.throughput(Throughput::Elements(size as u64));
        for kind in TransformKind::catalog() {
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &kind, |b, kind| {
                b.iter(|| kind.apply(black_box(&bars)));
            });
        }
    }
    group.finish();
}

fn profile_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("profiles");
    for size in SIZES {
        let bars = synthetic_series(size, 42);
        group.throughput(Throughput::Elements(size as u64));
        for rows in [24, 200] {
            let params = ProfileParams::default().with_rows(RowSpec::Count(rows));
            group.bench_with_input(
                BenchmarkId::new(format!("volume/{rows}"), size),
                &params,
                |b, params| b.iter(|| build_profile(black_box(&bars), params)),
            );
        }
        group.bench_with_input(BenchmarkId::new("footprint", size), &bars, |b, bars| {
            b.iter(|| footprint(black_box(bars), RowSpec::Count(24)));
        });
        group.bench_with_input(BenchmarkId::new("tpo", size), &bars, |b, bars| {
            b.iter(|| tpo_profile(black_box(bars), &TpoParams::default()));
        });
    }
    group.finish();
}

fn format_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    let dir = TempDir::new().expect("Failed to create temp dir");
    let bars = synthetic_series(10_000, 42);
    let table = Table::from_bars(&bars);
    let path = dir.path().join("bars.csv");
    group.throughput(Throughput::Elements(bars.len() as u64));

    group.bench_function("csv_write", |b| {
        b.iter(|| {
            let file = BufWriter::new(File::create(&path).expect("create"));
            CsvFormatter::new().write_table(black_box(&table), file)
        });
    });
    group.bench_function("csv_read", |b| {
        b.iter(|| read_bars(black_box(&path)));
    });
    group.finish();
}

criterion_group!(
    benches,
    indicator_benchmark,
    transform_benchmark,
    profile_benchmark,
    format_benchmark
);
criterion_main!(benches);
