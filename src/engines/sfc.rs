//! Chris Doty-Humphrey's Small Fast Chaotic generators.
//!
//! Three words of chaotic state plus a counter, which guarantees a minimum period of
//! 2^W. Both widths run [`INITIAL_ROLL`] steps after seeding to mix weak seeds.

use crate::engines::{expand_seed, SeedableRng, INITIAL_ROLL};
use crate::error::RngError;
use crate::source::{require_seed_words, WordSource};

/// SFC32: 32-bit output, 128 bits of state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sfc32 {
    a: u32,
    b: u32,
    c: u32,
    counter: u32,
}

impl Sfc32 {
    /// Creates an engine from three seed words and runs the warm-up steps.
    #[must_use]
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        let mut engine = Self {
            a,
            b,
            c,
            counter: 0,
        };
        engine.roll();
        engine
    }

    fn roll(&mut self) {
        for _ in 0..INITIAL_ROLL {
            let _ = self.next_word();
        }
    }
}

impl SeedableRng for Sfc32 {
    fn seed_from_u64(seed: u64) -> Self {
        let [w0, w1]: [u64; 2] = expand_seed(seed);
        Self::new(w0 as u32, (w0 >> 32) as u32, w1 as u32)
    }
}

impl WordSource for Sfc32 {
    type Word = u32;
    const STATE_WORDS: usize = 3;

    fn algorithm_name(&self) -> &'static str {
        "SFC 32-bit"
    }

    #[inline]
    fn next_word(&mut self) -> u32 {
        let result = self.a.wrapping_add(self.b).wrapping_add(self.counter);
        self.counter = self.counter.wrapping_add(1);
        self.a = self.b ^ (self.b >> 9);
        self.b = self.c.wrapping_add(self.c << 3);
        self.c = self.c.rotate_left(21).wrapping_add(result);
        result
    }

    fn set_seed(&mut self, seed: &[u32]) -> Result<(), RngError> {
        require_seed_words(seed, Self::STATE_WORDS)?;
        *self = Self::new(seed[0], seed[1], seed[2]);
        tracing::trace!(algorithm = self.algorithm_name(), "seeded");
        Ok(())
    }

    fn clear(&mut self) {
        self.a = 0;
        self.b = 0;
        self.c = 0;
        self.counter = 0;
    }
}

/// SFC64: 64-bit output, 256 bits of state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sfc64 {
    a: u64,
    b: u64,
    c: u64,
    counter: u64,
}

impl Sfc64 {
    /// Creates an engine from three seed words and runs the warm-up steps.
    #[must_use]
    pub fn new(a: u64, b: u64, c: u64) -> Self {
        let mut engine = Self {
            a,
            b,
            c,
            counter: 0,
        };
        engine.roll();
        engine
    }

    fn roll(&mut self) {
        for _ in 0..INITIAL_ROLL {
            let _ = self.next_word();
        }
    }
}

impl SeedableRng for Sfc64 {
    fn seed_from_u64(seed: u64) -> Self {
        let [a, b, c] = expand_seed(seed);
        Self::new(a, b, c)
    }
}

impl WordSource for Sfc64 {
    type Word = u64;
    const STATE_WORDS: usize = 3;

    fn algorithm_name(&self) -> &'static str {
        "SFC 64-bit"
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        let result = self.a.wrapping_add(self.b).wrapping_add(self.counter);
        self.counter = self.counter.wrapping_add(1);
        self.a = self.b ^ (self.b >> 11);
        self.b = self.c.wrapping_add(self.c << 3);
        self.c = self.c.rotate_left(24).wrapping_add(result);
        result
    }

    fn set_seed(&mut self, seed: &[u64]) -> Result<(), RngError> {
        require_seed_words(seed, Self::STATE_WORDS)?;
        *self = Self::new(seed[0], seed[1], seed[2]);
        tracing::trace!(algorithm = self.algorithm_name(), "seeded");
        Ok(())
    }

    fn clear(&mut self) {
        self.a = 0;
        self.b = 0;
        self.c = 0;
        self.counter = 0;
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
    fn test_sfc32_vector() {
        let mut engine = Sfc32::new(1, 2, 3);
        for exp in [0x534c_b117_u32, 0x8a5f_20ae, 0x5959_581a, 0x6082_f254] {
            assert_eq!(engine.next_word(), exp);
        }
    }

    #[test]
    fn test_sfc64_vector() {
        let mut engine = Sfc64::new(1, 2, 3);
        for exp in [
            0x2a38_adeb_fc40_944a_u64,
            0x6124_6320_3d93_9dbb,
            0xc905_ae83_a99f_2171,
            0x1742_78d2_5809_a1f7,
        ] {
            assert_eq!(engine.next_word(), exp);
        }
    }

    #[test]
    fn test_new_runs_warm_up() {
        let engine = Sfc32::new(0, 0, 0);
        assert_eq!(engine.counter, INITIAL_ROLL as u32);
    }

    #[test]
    fn test_set_seed_matches_new() {
        let mut engine = Sfc64::seed_from_u64(9);
        engine.set_seed(&[1, 2, 3]).unwrap();
        assert_eq!(engine, Sfc64::new(1, 2, 3));
    }
}
