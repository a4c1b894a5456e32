//! xoroshiro128 family: 128 bits of state, period 2^128 - 1.
//!
//! `+` and `**` use the (24, 16, 37) linear engine; `++` uses (49, 21, 28) and so has its
//! own jump polynomial.

use crate::debug_check_invariants;
use crate::engines::{expand_seed, SeedableRng};
use crate::error::RngError;
use crate::source::{require_seed_words, WordSource};
use crate::telemetry::{InvariantChecker, InvariantViolation};

/// Jump polynomial (2^64 steps) for the (24, 16, 37) engine.
const JUMP_24_16_37: [u64; 2] = [0xdf90_0294_d8f5_54a5, 0x1708_65df_4b32_01fc];
/// Jump polynomial (2^64 steps) for the (49, 21, 28) engine.
const JUMP_49_21_28: [u64; 2] = [0x2bd7_a6a6_e99c_2ddc, 0x0992_ccaf_6a6f_ca05];

#[inline]
fn step<const A: u32, const B: u32, const C: u32>(s: &mut [u64; 2]) {
    let s0 = s[0];
    let s1 = s[1] ^ s0;
    s[0] = s0.rotate_left(A) ^ s1 ^ (s1 << B);
    s[1] = s1.rotate_left(C);
}

fn jump<const A: u32, const B: u32, const C: u32>(s: &mut [u64; 2], poly: [u64; 2]) {
    let mut acc = [0_u64; 2];
    for word in poly {
        for bit in 0..64 {
            if word & (1_u64 << bit) != 0 {
                acc[0] ^= s[0];
                acc[1] ^= s[1];
            }
            step::<A, B, C>(s);
        }
    }
    *s = acc;
}

macro_rules! xoroshiro128_engine {
    (
        $(#[$doc:meta])* $name:ident, $label:literal,
        engine = ($a:literal, $b:literal, $c:literal), jump = $poly:ident,
        |$s:ident| $output:expr
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            s: [u64; 2],
        }

        impl $name {
            /// Creates an engine from two state words.
            ///
            /// The all-zero state is a fixed point and is reported as an invariant violation.
            #[must_use]
            pub fn new(s0: u64, s1: u64) -> Self {
                let engine = Self { s: [s0, s1] };
                debug_check_invariants!(engine, concat!($label, " construction"));
                engine
            }

            /// Advances the state by 2^64 steps.
            pub fn jump(&mut self) {
                jump::<$a, $b, $c>(&mut self.s, $poly);
            }
        }

        impl SeedableRng for $name {
            fn seed_from_u64(seed: u64) -> Self {
                Self {
                    s: expand_seed(seed),
                }
            }
        }

        impl InvariantChecker for $name {
            fn check_invariants(&self) -> Result<(), InvariantViolation> {
                if self.s == [0, 0] {
                    return Err(InvariantViolation::new(
                        stringify!($name),
                        "state must not be all zero",
                    ));
                }
                Ok(())
            }
        }

        impl WordSource for $name {
            type Word = u64;
            const STATE_WORDS: usize = 2;

            fn algorithm_name(&self) -> &'static str {
                $label
            }

            #[inline]
            fn next_word(&mut self) -> u64 {
                let $s = &self.s;
                let result = $output;
                step::<$a, $b, $c>(&mut self.s);
                result
            }

            fn set_seed(&mut self, seed: &[u64]) -> Result<(), RngError> {
                require_seed_words(seed, Self::STATE_WORDS)?;
                self.s = [seed[0], seed[1]];
                tracing::trace!(algorithm = $label, "seeded");
                Ok(())
            }

            fn validate_state(&self) -> Result<(), InvariantViolation> {
                self.check_invariants()
            }

            fn clear(&mut self) {
                self.s = [0; 2];
            }
        }
    };
}

xoroshiro128_engine!(
    /// xoroshiro128+: output is `s0 + s1`.
    Xoroshiro128Plus,
    "Xoroshiro 128+",
    engine = (24, 16, 37),
    jump = JUMP_24_16_37,
    |s| s[0].wrapping_add(s[1])
);

xoroshiro128_engine!(
    /// xoroshiro128++: output is `rotl(s0 + s1, 17) + s0`.
    Xoroshiro128PlusPlus,
    "Xoroshiro 128++",
    engine = (49, 21, 28),
    jump = JUMP_49_21_28,
    |s| s[0].wrapping_add(s[1]).rotate_left(17).wrapping_add(s[0])
);

xoroshiro128_engine!(
    /// xoroshiro128**: output is `rotl(s0 * 5, 7) * 9`.
    Xoroshiro128StarStar,
    "Xoroshiro 128**",
    engine = (24, 16, 37),
    jump = JUMP_24_16_37,
    |s| s[0].wrapping_mul(5).rotate_left(7).wrapping_mul(9)
);

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    // Reference outputs for state [1, 2].
    #[test]
    fn test_reference_vectors() {
        let mut plus = Xoroshiro128Plus::new(1, 2);
        for exp in [3_u64, 412333834243, 2360170716294286339, 9295852285959843169] {
            assert_eq!(plus.next_word(), exp);
        }

        let mut plus_plus = Xoroshiro128PlusPlus::new(1, 2);
        for exp in [393217_u64, 669327710093319, 1732421326133921491, 11394790081659126983] {
            assert_eq!(plus_plus.next_word(), exp);
        }

        let mut star_star = Xoroshiro128StarStar::new(1, 2);
        for exp in [5760_u64, 97769243520, 9706862127477703552, 9223447511460779954] {
            assert_eq!(star_star.next_word(), exp);
        }
    }

    #[test]
    fn test_jump_xors_state_not_polynomial() {
        let mut plus = Xoroshiro128Plus::new(1, 2);
        plus.jump();
        assert_eq!(plus.s, [0x66fb_d4be_1df0_a7b5, 0x830c_3ddb_b4aa_3172]);

        let mut plus_plus = Xoroshiro128PlusPlus::new(1, 2);
        plus_plus.jump();
        assert_eq!(plus_plus.s, [0x77b2_ead1_23dd_e4bb, 0xf60f_09e0_665f_8d42]);
    }

    #[test]
    fn test_set_seed_ignores_extra_words() {
        let mut engine = Xoroshiro128StarStar::seed_from_u64(0);
        engine.set_seed(&[1, 2, 3, 4]).unwrap();
        assert_eq!(engine, Xoroshiro128StarStar::new(1, 2));
    }
}
