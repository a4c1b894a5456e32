//! Selection and permutation behavior through the `Generator` facade.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

#[path = "common/mod.rs"]
mod common;

use std::collections::{BTreeMap, BTreeSet};

use common::stats::{chi_square, chi_square_limit};
use prng_kit::engines::{Pcg32, RomuTrio, SeedableRng, Sfc32, Xoshiro256PlusPlus};
use prng_kit::{Generator, RngError};

#[test]
fn test_sample_inclusion_frequency() {
    const TRIALS: usize = 100_000;
    let items = [1_usize, 2, 3, 4, 5];
    let mut rng = Generator::new(Xoshiro256PlusPlus::seed_from_u64(1));
    let mut included = [0_usize; 5];
    for _ in 0..TRIALS {
        let picked = rng.sample(&items, 3).unwrap();
        let distinct: BTreeSet<_> = picked.iter().copied().collect();
        assert_eq!(distinct.len(), 3, "sample must not repeat an element");
        for value in picked {
            included[value - 1] += 1;
        }
    }
    for (index, &count) in included.iter().enumerate() {
        let frequency = count as f64 / TRIALS as f64;
        assert!(
            (frequency - 0.6).abs() < 0.01,
            "element {} included with frequency {frequency:.4}",
            index + 1
        );
    }
}

#[test]
fn test_sample_full_length_is_identity_without_draws() {
    let items: Vec<u32> = (0..20).collect();
    let mut rng = Generator::new(Pcg32::seed_from_u64(2));
    let before = rng.source().clone();
    assert_eq!(rng.sample(&items, 20).unwrap(), items);
    assert_eq!(rng.source(), &before);
}

#[test]
fn test_count_outside_range_is_rejected() {
    let items = [1, 2, 3];
    let mut rng = Generator::new(Pcg32::seed_from_u64(3));
    for k in [0, 4] {
        assert!(matches!(
            rng.sample(&items, k),
            Err(RngError::InvalidArgument { .. })
        ));
        assert!(matches!(
            rng.choose_multiple(&items, k),
            Err(RngError::InvalidArgument { .. })
        ));
    }
    let empty: [u8; 0] = [];
    assert!(rng.choice(&empty).is_err());
    assert!(rng.shuffle(&empty).is_err());
}

#[test]
fn test_choose_multiple_repeats_elements() {
    let items = [0_u8, 1];
    let mut rng = Generator::new(Sfc32::seed_from_u64(4));
    let mut saw_repeat = false;
    for _ in 0..100 {
        let picks = rng.choose_multiple(&items, 2).unwrap();
        if picks[0] == picks[1] {
            saw_repeat = true;
            break;
        }
    }
    assert!(saw_repeat, "picks with replacement should sometimes repeat");
}

#[test]
fn test_choice_frequencies() {
    let items = ['a', 'b', 'c', 'd', 'e', 'f', 'g'];
    let mut rng = Generator::new(RomuTrio::seed_from_u64(5));
    let mut counts = BTreeMap::new();
    for _ in 0..70_000 {
        *counts.entry(*rng.choice(&items).unwrap()).or_insert(0_u64) += 1;
    }
    let observed: Vec<u64> = counts.values().copied().collect();
    assert_eq!(observed.len(), items.len());
    assert!(chi_square(&observed) < chi_square_limit(items.len()));
}

#[test]
fn test_shuffle_permutation_frequencies() {
    let items = [1, 2, 3, 4];
    let mut rng = Generator::new(Xoshiro256PlusPlus::seed_from_u64(6));
    let mut counts: BTreeMap<Vec<i32>, u64> = BTreeMap::new();
    for _ in 0..120_000 {
        *counts.entry(rng.shuffle(&items).unwrap()).or_insert(0) += 1;
    }
    assert_eq!(counts.len(), 24, "every permutation of 4 must appear");
    let observed: Vec<u64> = counts.values().copied().collect();
    assert!(chi_square(&observed) < chi_square_limit(24));
}

#[test]
fn test_shuffle_preserves_multiset_and_input() {
    let items = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];
    let mut rng = Generator::new(Pcg32::seed_from_u64(7));
    let shuffled = rng.shuffle(&items).unwrap();
    assert_eq!(items, vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5]);

    let mut a = items.clone();
    let mut b = shuffled;
    a.sort_unstable();
    b.sort_unstable();
    assert_eq!(a, b);
}

#[test]
fn test_shuffle_is_deterministic_per_seed() {
    let items: Vec<u16> = (0..50).collect();
    let mut first = Generator::new(Sfc32::seed_from_u64(8));
    let mut second = Generator::new(Sfc32::seed_from_u64(8));
    let copy = first.shuffle(&items).unwrap();
    let mut in_place = items.clone();
    second.shuffle_in_place(&mut in_place).unwrap();
    assert_eq!(copy, in_place);
    assert_eq!(first.source(), second.source());
}

#[test]
fn test_single_element_shuffle_draws_nothing() {
    let mut rng = Generator::new(Pcg32::seed_from_u64(9));
    let mut one = [42];
    rng.shuffle_in_place(&mut one).unwrap();
    assert_eq!(one, [42]);
    assert_eq!(rng.source(), &Pcg32::seed_from_u64(9));
}
