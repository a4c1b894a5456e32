//! Benchmarks for bounded integer sampling
//!
//! Run with: cargo bench --bench bounded
//!
//! Ranges are picked to cover the cheap path (power of two), a small awkward range and
//! a range just above 2^31 where almost half of all candidates are rejected.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use prng_kit::bounded::{bounded_u32, bounded_u64};
use prng_kit::engines::{Pcg32, SeedableRng, Xoshiro256StarStar};
use prng_kit::{Generator, RejectionContext};
use std::hint::black_box;

fn bench_bounded_u32(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_u32");
    let context = RejectionContext::default();
    for upper in [1_u32 << 16, 10, 6, (1 << 31) + 1] {
        let mut engine = Xoshiro256StarStar::seed_from_u64(1);
        group.bench_with_input(BenchmarkId::new("xoshiro256**", upper), &upper, |b, &upper| {
            b.iter(|| bounded_u32(&mut engine, 0, black_box(upper), &context));
        });
        let mut engine = Pcg32::seed_from_u64(1);
        group.bench_with_input(BenchmarkId::new("pcg32", upper), &upper, |b, &upper| {
            b.iter(|| bounded_u32(&mut engine, 0, black_box(upper), &context));
        });
    }
    group.finish();
}

fn bench_bounded_u64(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_u64");
    let context = RejectionContext::default();
    for upper in [1_000_u64, (1 << 63) + 1] {
        let mut engine = Xoshiro256StarStar::seed_from_u64(2);
        group.bench_with_input(BenchmarkId::from_parameter(upper), &upper, |b, &upper| {
            b.iter(|| bounded_u64(&mut engine, 0, black_box(upper), &context));
        });
    }
    group.finish();
}

fn bench_generator_overhead(c: &mut Criterion) {
    let mut rng = Generator::new(Xoshiro256StarStar::seed_from_u64(3));
    c.bench_function("Generator::bounded_u32 (0..6)", |b| {
        b.iter(|| rng.bounded_u32(0, black_box(6)));
    });
}

criterion_group!(
    benches,
    bench_bounded_u32,
    bench_bounded_u64,
    bench_generator_overhead
);
criterion_main!(benches);
