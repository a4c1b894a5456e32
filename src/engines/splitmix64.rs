//! SplitMix64, the seed expander behind every `seed_from_u64`.
//!
//! Also usable as an engine in its own right.

use crate::engines::SeedableRng;
use crate::error::RngError;
use crate::source::{require_seed_words, WordSource};

/// Weyl-sequence increment (the 64-bit golden ratio).
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64: a Weyl sequence passed through a variant of the MurmurHash3 finalizer.
///
/// One word of state, period 2^64. Mostly used here to expand a single `u64` seed into
/// the state of larger engines.
///
/// Reference: Steele, Lea, Flood, "Fast Splittable Pseudorandom Number Generators" (2014).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Creates a generator whose first output mixes `seed + GOLDEN_GAMMA`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl SeedableRng for SplitMix64 {
    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed)
    }
}

impl WordSource for SplitMix64 {
    type Word = u64;
    const STATE_WORDS: usize = 1;

    fn algorithm_name(&self) -> &'static str {
        "SplitMix64"
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn set_seed(&mut self, seed: &[u64]) -> Result<(), RngError> {
        require_seed_words(seed, Self::STATE_WORDS)?;
        self.state = seed[0];
        tracing::trace!(algorithm = self.algorithm_name(), "seeded");
        Ok(())
    }

    fn clear(&mut self) {
        self.state = 0;
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    // Reference outputs for seed 1234567 from the published C implementation.
    #[test]
    fn test_splitmix64_reference_vector() {
        let mut engine = SplitMix64::new(1_234_567);
        let expected = [
            6_457_827_717_110_365_317_u64,
            3_203_168_211_198_807_973,
            9_817_491_932_198_370_423,
            4_593_380_528_125_082_431,
            16_408_922_859_458_223_821,
        ];
        for &exp in &expected {
            assert_eq!(engine.next_word(), exp);
        }
    }

    #[test]
    fn test_clear_restarts_from_zero_seed() {
        let mut engine = SplitMix64::new(5);
        let _ = engine.next_word();
        engine.clear();
        assert_eq!(engine, SplitMix64::new(0));
    }
}
