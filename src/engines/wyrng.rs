//! wyrand, the generator from Wang Yi's wyhash family.
//!
//! A Weyl counter mixed through one full 64x64->128 multiply, computed with
//! [`mul_wide_u64`] so no 128-bit arithmetic is needed.

use crate::bounded::mul_wide_u64;
use crate::engines::SeedableRng;
use crate::error::RngError;
use crate::source::{require_seed_words, WordSource};

const WY_INCREMENT: u64 = 0xa076_1d64_78bd_642f;
const WY_XOR: u64 = 0xe703_7ed1_a0b4_28db;

/// wyrand: a Weyl counter folded through one 64x64->128 multiply.
///
/// One word of state, period 2^64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WyRng {
    state: u64,
}

impl WyRng {
    /// Creates an engine with the given counter value.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl SeedableRng for WyRng {
    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed)
    }
}

impl WordSource for WyRng {
    type Word = u64;
    const STATE_WORDS: usize = 1;

    fn algorithm_name(&self) -> &'static str {
        "WyRng"
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        self.state = self.state.wrapping_add(WY_INCREMENT);
        let (hi, lo) = mul_wide_u64(self.state ^ WY_XOR, self.state);
        hi ^ lo
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

    #[test]
    fn test_wyrng_vector() {
        let mut engine = WyRng::new(1);
        for exp in [
            0xcdef_1695_e1f8_ed2c_u64,
            0x61d6_d24b_1c9a_ad40,
            0x8cf8_80c2_2eeb_fadf,
            0x05b3_a992_fedc_4f8a,
        ] {
            assert_eq!(engine.next_word(), exp);
        }
    }

    #[test]
    fn test_set_seed_resets_counter() {
        let mut engine = WyRng::new(1);
        let first = engine.next_word();
        engine.set_seed(&[1]).unwrap();
        assert_eq!(engine.next_word(), first);
    }
}
