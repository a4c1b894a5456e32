//! Bob Jenkins' Small Fast generators ("JSF", also known as smallprng).
//!
//! Four words of state seeded as `[0xF1EA5EED, seed, seed, seed]` followed by
//! [`INITIAL_ROLL`] warm-up steps.

use crate::engines::{SeedableRng, INITIAL_ROLL};
use crate::error::RngError;
use crate::source::{require_seed_words, WordSource};

const SEED_TAG: u32 = 0xF1EA_5EED;

/// JSF32: 32-bit output, three-rotate variant (27, 17).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jsf32 {
    s: [u32; 4],
}

impl Jsf32 {
    /// Creates an engine from a single seed word.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        let mut engine = Self {
            s: [SEED_TAG, seed, seed, seed],
        };
        for _ in 0..INITIAL_ROLL {
            let _ = engine.next_word();
        }
        engine
    }
}

impl SeedableRng for Jsf32 {
    fn seed_from_u64(seed: u64) -> Self {
        Self::new((seed ^ (seed >> 32)) as u32)
    }
}

impl WordSource for Jsf32 {
    type Word = u32;
    const STATE_WORDS: usize = 1;

    fn algorithm_name(&self) -> &'static str {
        "JSF 32-bit"
    }

    #[inline]
    fn next_word(&mut self) -> u32 {
        let [a, b, c, d] = self.s;
        let e = a.wrapping_sub(b.rotate_left(27));
        let a = b ^ c.rotate_left(17);
        let b = c.wrapping_add(d);
        let c = d.wrapping_add(e);
        let d = e.wrapping_add(a);
        self.s = [a, b, c, d];
        d
    }

    fn set_seed(&mut self, seed: &[u32]) -> Result<(), RngError> {
        require_seed_words(seed, Self::STATE_WORDS)?;
        *self = Self::new(seed[0]);
        tracing::trace!(algorithm = self.algorithm_name(), "seeded");
        Ok(())
    }

    fn clear(&mut self) {
        self.s = [0; 4];
    }
}

/// JSF64: 64-bit output, three-rotate variant (7, 13, 37).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jsf64 {
    s: [u64; 4],
}

impl Jsf64 {
    /// Creates an engine from a single seed word.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut engine = Self {
            s: [u64::from(SEED_TAG), seed, seed, seed],
        };
        for _ in 0..INITIAL_ROLL {
            let _ = engine.next_word();
        }
        engine
    }
}

impl SeedableRng for Jsf64 {
    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed)
    }
}

impl WordSource for Jsf64 {
    type Word = u64;
    const STATE_WORDS: usize = 1;

    fn algorithm_name(&self) -> &'static str {
        "JSF 64-bit"
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        let [a, b, c, d] = self.s;
        let e = a.wrapping_sub(b.rotate_left(7));
        let a = b ^ c.rotate_left(13);
        let b = c.wrapping_add(d.rotate_left(37));
        let c = d.wrapping_add(e);
        let d = e.wrapping_add(a);
        self.s = [a, b, c, d];
        d
    }

    fn set_seed(&mut self, seed: &[u64]) -> Result<(), RngError> {
        require_seed_words(seed, Self::STATE_WORDS)?;
        *self = Self::new(seed[0]);
        tracing::trace!(algorithm = self.algorithm_name(), "seeded");
        Ok(())
    }

    fn clear(&mut self) {
        self.s = [0; 4];
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
    fn test_jsf32_vector() {
        let mut engine = Jsf32::new(1);
        for exp in [0xa251_32f4_u32, 0x1efa_0761, 0x332b_56b3, 0xd1ae_db87] {
            assert_eq!(engine.next_word(), exp);
        }
    }

    #[test]
    fn test_jsf64_vector() {
        let mut engine = Jsf64::new(1);
        for exp in [
            0xae73_5ca1_0d06_0948_u64,
            0x8e16_aa02_6856_3732,
            0x8f06_1cf1_eaa2_da64,
            0xe15a_e6dd_e013_cc82,
        ] {
            assert_eq!(engine.next_word(), exp);
        }
    }

    #[test]
    fn test_set_seed_restarts_warm_up() {
        let mut engine = Jsf32::new(5);
        let _ = engine.next_word();
        engine.set_seed(&[5]).unwrap();
        assert_eq!(engine, Jsf32::new(5));
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut engine = Jsf64::new(0);
        let words: Vec<u64> = (0..4).map(|_| engine.next_word()).collect();
        assert!(words.iter().any(|&w| w != 0));
    }
}
