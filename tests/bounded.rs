//! Integration tests for bounded integer sampling through the `Generator` facade.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

#[path = "common/mod.rs"]
mod common;

use common::stats::{chi_square, chi_square_limit};
use common::SAMPLE_SIZE;
use prng_kit::engines::{Jsf32, Pcg32, SeedableRng, Sfc64, WyRng, Xoshiro256StarStar};
use prng_kit::{Generator, RngError, WordSource};

fn assert_uniform_u32<S: WordSource>(source: S, lower: u32, upper: u32) {
    let name = source.algorithm_name();
    let mut rng = Generator::new(source);
    let buckets = (upper - lower) as usize;
    let mut counts = vec![0_u64; buckets];
    for _ in 0..SAMPLE_SIZE {
        let value = rng.bounded_u32(lower, upper).unwrap();
        assert!((lower..upper).contains(&value), "{name}: {value} out of range");
        counts[(value - lower) as usize] += 1;
    }
    let stat = chi_square(&counts);
    assert!(
        stat < chi_square_limit(buckets),
        "{name}: chi-square {stat:.2} over limit for [{lower}, {upper})"
    );
}

#[test]
fn test_bounded_u32_uniform_small_ranges() {
    assert_uniform_u32(Pcg32::seed_from_u64(1), 0, 10);
    assert_uniform_u32(Xoshiro256StarStar::seed_from_u64(2), 5, 12);
    assert_uniform_u32(Jsf32::seed_from_u64(3), 100, 137);
    assert_uniform_u32(Sfc64::seed_from_u64(4), 0, 6);
}

// 3 * 2^30 does not divide 2^32, so an unbiased sampler must reject here.
#[test]
fn test_bounded_u32_uniform_for_awkward_range() {
    let mut rng = Generator::new(WyRng::seed_from_u64(9));
    let range = 3_u32 << 30;
    let mut thirds = [0_u64; 3];
    for _ in 0..SAMPLE_SIZE {
        let value = rng.bounded_u32(0, range).unwrap();
        thirds[(value / (1 << 30)) as usize] += 1;
    }
    assert!(chi_square(&thirds) < chi_square_limit(3));
}

#[test]
fn test_bounded_u64_uniform() {
    let mut rng = Generator::new(Sfc64::seed_from_u64(5));
    let lower = u64::MAX - 20;
    let mut counts = [0_u64; 20];
    for _ in 0..SAMPLE_SIZE {
        let value = rng.bounded_u64(lower, u64::MAX).unwrap();
        counts[(value - lower) as usize] += 1;
    }
    assert!(chi_square(&counts) < chi_square_limit(20));
}

#[test]
fn test_bounded_u8_and_usize_stay_in_range() {
    let mut rng = Generator::new(Pcg32::seed_from_u64(6));
    for _ in 0..10_000 {
        let byte = rng.bounded_u8(250, 255).unwrap();
        assert!((250..255).contains(&byte));
        let index = rng.bounded_usize(3, 4).unwrap();
        assert_eq!(index, 3);
    }
}

#[test]
fn test_bounded_full_width() {
    let mut rng = Generator::new(Xoshiro256StarStar::seed_from_u64(7));
    let mut reference = Xoshiro256StarStar::seed_from_u64(7);
    // A range of 2^32 - 1 almost never rejects; the result tracks the raw high word.
    let value = rng.bounded_u32(0, u32::MAX).unwrap();
    assert!(value < u32::MAX);
    let _ = reference.next_u32();
    assert_eq!(rng.source(), &reference);
}

#[test]
fn test_empty_range_draws_nothing() {
    let mut rng = Generator::new(Pcg32::seed_from_u64(8));
    let before = rng.source().clone();
    assert!(matches!(
        rng.bounded_u32(5, 5),
        Err(RngError::InvalidArgument { .. })
    ));
    assert!(matches!(
        rng.bounded_u64(9, 2),
        Err(RngError::InvalidArgument { .. })
    ));
    assert_eq!(rng.source(), &before);
}
