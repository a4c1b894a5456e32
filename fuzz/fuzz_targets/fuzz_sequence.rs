//! Fuzz target for sequence operations.
//!
//! # Safety Properties Tested
//! - No panics on arbitrary collections and counts
//! - `sample` returns `k` elements drawn from distinct positions
//! - Shuffles preserve the multiset of elements

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use prng_kit::engines::{SeedableRng, Sfc32};
use prng_kit::Generator;

#[derive(Debug, Arbitrary)]
struct FuzzSequence {
    seed: u64,
    items: Vec<u16>,
    count: u8,
}

fuzz_target!(|input: FuzzSequence| {
    let mut rng = Generator::new(Sfc32::seed_from_u64(input.seed));
    let n = input.items.len();
    let k = input.count as usize;
    let count_ok = n > 0 && k >= 1 && k <= n;

    // Tag each element with its position so distinctness is checkable with duplicates.
    let tagged: Vec<(usize, u16)> = input.items.iter().copied().enumerate().collect();
    match rng.sample(&tagged, k) {
        Ok(picked) => {
            assert!(count_ok);
            let mut positions: Vec<usize> = picked.iter().map(|(i, _)| *i).collect();
            positions.sort_unstable();
            positions.dedup();
            assert_eq!(positions.len(), k);
        },
        Err(_) => assert!(!count_ok),
    }

    match rng.choose_multiple(&input.items, k) {
        Ok(picked) => {
            assert!(count_ok);
            assert!(picked.iter().all(|v| input.items.contains(v)));
        },
        Err(_) => assert!(!count_ok),
    }

    match rng.shuffle(&input.items) {
        Ok(mut shuffled) => {
            let mut original = input.items.clone();
            original.sort_unstable();
            shuffled.sort_unstable();
            assert_eq!(original, shuffled);
        },
        Err(_) => assert_eq!(n, 0),
    }
});
