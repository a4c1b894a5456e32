//! Raw word throughput for every engine.
//!
//! Run with: cargo bench --bench engines

use criterion::measurement::WallTime;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, Criterion, Throughput};
use prng_kit::engines::*;
use prng_kit::WordSource;
use std::hint::black_box;

const WORDS: u64 = 1024;

fn bench_source<S: WordSource>(group: &mut BenchmarkGroup<'_, WallTime>, mut source: S) {
    let name = source.algorithm_name();
    group.bench_function(name, |b| {
        b.iter(|| {
            let mut acc = 0_u64;
            for _ in 0..WORDS {
                acc ^= source.next_u64();
            }
            black_box(acc)
        });
    });
}

fn bench_next_u64(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_u64");
    group.throughput(Throughput::Bytes(WORDS * 8));
    bench_source(&mut group, SplitMix64::seed_from_u64(1));
    bench_source(&mut group, Xoshiro256Plus::seed_from_u64(1));
    bench_source(&mut group, Xoshiro256PlusPlus::seed_from_u64(1));
    bench_source(&mut group, Xoshiro256StarStar::seed_from_u64(1));
    bench_source(&mut group, Xoroshiro128Plus::seed_from_u64(1));
    bench_source(&mut group, Xoroshiro128PlusPlus::seed_from_u64(1));
    bench_source(&mut group, Xoroshiro128StarStar::seed_from_u64(1));
    bench_source(&mut group, Pcg32::seed_from_u64(1));
    bench_source(&mut group, Sfc32::seed_from_u64(1));
    bench_source(&mut group, Sfc64::seed_from_u64(1));
    bench_source(&mut group, Jsf32::seed_from_u64(1));
    bench_source(&mut group, Jsf64::seed_from_u64(1));
    bench_source(&mut group, RomuTrio::seed_from_u64(1));
    bench_source(&mut group, RomuDuoJr::seed_from_u64(1));
    bench_source(&mut group, WyRng::seed_from_u64(1));
    group.finish();
}

fn bench_seeding(c: &mut Criterion) {
    let mut group = c.benchmark_group("seed_from_u64");
    group.bench_function("Xoshiro 256**", |b| {
        b.iter(|| black_box(Xoshiro256StarStar::seed_from_u64(black_box(42))));
    });
    // SFC and JSF run their warm-up rounds on every seed.
    group.bench_function("SFC 64-bit", |b| {
        b.iter(|| black_box(Sfc64::seed_from_u64(black_box(42))));
    });
    group.bench_function("JSF 64-bit", |b| {
        b.iter(|| black_box(Jsf64::seed_from_u64(black_box(42))));
    });
    group.finish();
}

criterion_group!(benches, bench_next_u64, bench_seeding);
criterion_main!(benches);
