//! Benchmarks for sequence operations
//!
//! Run with: cargo bench --bench sequence

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prng_kit::engines::{SeedableRng, Sfc64};
use prng_kit::Generator;
use std::hint::black_box;

fn bench_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle_in_place");
    for len in [16_usize, 1024, 65_536] {
        let mut rng = Generator::new(Sfc64::seed_from_u64(1));
        let mut items: Vec<u32> = (0..len as u32).collect();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| rng.shuffle_in_place(black_box(&mut items)));
        });
    }
    group.finish();
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");
    let items: Vec<u32> = (0..10_000).collect();
    for k in [1_usize, 100, 5_000] {
        let mut rng = Generator::new(Sfc64::seed_from_u64(2));
        group.bench_with_input(BenchmarkId::new("reservoir", k), &k, |b, &k| {
            b.iter(|| rng.sample(black_box(&items), k));
        });
    }
    group.finish();
}

fn bench_choose_multiple(c: &mut Criterion) {
    let items: Vec<u32> = (0..10_000).collect();
    let mut rng = Generator::new(Sfc64::seed_from_u64(3));
    c.bench_function("choose_multiple (100 of 10000)", |b| {
        b.iter(|| rng.choose_multiple(black_box(&items), 100));
    });
}

criterion_group!(benches, bench_shuffle, bench_sample, bench_choose_multiple);
criterion_main!(benches);
