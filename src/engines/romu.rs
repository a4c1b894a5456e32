//! Romu nonlinear generators (Overton, 2020).
//!
//! Rotate-multiply engines with no fixed period; the all-zero state is a fixed point.
//! Outputs are the previous `x` word, so a freshly seeded engine first returns its seed.

use crate::debug_check_invariants;
use crate::engines::{expand_seed, SeedableRng};
use crate::error::RngError;
use crate::source::{require_seed_words, WordSource};
use crate::telemetry::{InvariantChecker, InvariantViolation};

const ROMU_MULTIPLIER: u64 = 15_241_094_284_759_029_579;

/// RomuTrio: three words of state, the general-purpose Romu variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomuTrio {
    x: u64,
    y: u64,
    z: u64,
}

impl RomuTrio {
    /// Creates an engine from three state words.
    #[must_use]
    pub fn new(x: u64, y: u64, z: u64) -> Self {
        let engine = Self { x, y, z };
        debug_check_invariants!(engine, "RomuTrio construction");
        engine
    }
}

impl SeedableRng for RomuTrio {
    fn seed_from_u64(seed: u64) -> Self {
        let [x, y, z] = expand_seed(seed);
        Self { x, y, z }
    }
}

impl InvariantChecker for RomuTrio {
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.x == 0 && self.y == 0 && self.z == 0 {
            return Err(InvariantViolation::new(
                "RomuTrio",
                "state must not be all zero",
            ));
        }
        Ok(())
    }
}

impl WordSource for RomuTrio {
    type Word = u64;
    const STATE_WORDS: usize = 3;

    fn algorithm_name(&self) -> &'static str {
        "Romu Trio 64 bit"
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        let (xp, yp, zp) = (self.x, self.y, self.z);
        self.x = ROMU_MULTIPLIER.wrapping_mul(zp);
        self.y = yp.wrapping_sub(xp).rotate_left(12);
        self.z = zp.wrapping_sub(yp).rotate_left(44);
        xp
    }

    fn set_seed(&mut self, seed: &[u64]) -> Result<(), RngError> {
        require_seed_words(seed, Self::STATE_WORDS)?;
        self.x = seed[0];
        self.y = seed[1];
        self.z = seed[2];
        tracing::trace!(algorithm = self.algorithm_name(), "seeded");
        Ok(())
    }

    fn validate_state(&self) -> Result<(), InvariantViolation> {
        self.check_invariants()
    }

    fn clear(&mut self) {
        self.x = 0;
        self.y = 0;
        self.z = 0;
    }
}

/// RomuDuoJr: two words of state. Fastest of the family, smallest capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomuDuoJr {
    x: u64,
    y: u64,
}

impl RomuDuoJr {
    /// Creates an engine from two state words.
    #[must_use]
    pub fn new(x: u64, y: u64) -> Self {
        let engine = Self { x, y };
        debug_check_invariants!(engine, "RomuDuoJr construction");
        engine
    }
}

impl SeedableRng for RomuDuoJr {
    fn seed_from_u64(seed: u64) -> Self {
        let [x, y] = expand_seed(seed);
        Self { x, y }
    }
}

impl InvariantChecker for RomuDuoJr {
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.x == 0 && self.y == 0 {
            return Err(InvariantViolation::new(
                "RomuDuoJr",
                "state must not be all zero",
            ));
        }
        Ok(())
    }
}

impl WordSource for RomuDuoJr {
    type Word = u64;
    const STATE_WORDS: usize = 2;

    fn algorithm_name(&self) -> &'static str {
        "Romu Duo Jr 64 bit"
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        let xp = self.x;
        self.x = ROMU_MULTIPLIER.wrapping_mul(self.y);
        self.y = self.y.wrapping_sub(xp).rotate_left(27);
        xp
    }

    fn set_seed(&mut self, seed: &[u64]) -> Result<(), RngError> {
        require_seed_words(seed, Self::STATE_WORDS)?;
        self.x = seed[0];
        self.y = seed[1];
        tracing::trace!(algorithm = self.algorithm_name(), "seeded");
        Ok(())
    }

    fn validate_state(&self) -> Result<(), InvariantViolation> {
        self.check_invariants()
    }

    fn clear(&mut self) {
        self.x = 0;
        self.y = 0;
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
    fn test_romu_trio_vector() {
        let mut engine = RomuTrio::new(1, 2, 3);
        for exp in [
            0x1_u64,
            0x7a89_bb80_ede5_05e1,
            0xc574_b000_0000_0000,
            0x61cc_0dd6_fbb3_a8b5,
        ] {
            assert_eq!(engine.next_word(), exp);
        }
    }

    #[test]
    fn test_romu_duo_jr_vector() {
        let mut engine = RomuDuoJr::new(1, 2);
        for exp in [
            0x1_u64,
            0xa706_7d00_9e98_ae96,
            0x027a_62ba_5800_0000,
            0xbbf0_58be_d6b8_9bbd,
        ] {
            assert_eq!(engine.next_word(), exp);
        }
    }

    #[test]
    fn test_cleared_state_is_flagged() {
        let mut engine = RomuDuoJr::seed_from_u64(3);
        engine.clear();
        assert!(engine.check_invariants().is_err());
        assert_eq!(engine.next_word(), 0);
        assert_eq!(engine.next_word(), 0);
    }
}
