//! xoshiro256 family: 256 bits of state, period 2^256 - 1.
//!
//! The three variants share the linear engine and differ only in the output scrambler:
//! `+` (fastest, weak low bits), `++` and `**` (all bits pass statistical tests).
//!
//! Reference: Blackman, Vigna, "Scrambled Linear Pseudorandom Number Generators" (2021).

use crate::debug_check_invariants;
use crate::engines::{expand_seed, SeedableRng};
use crate::error::RngError;
use crate::source::{require_seed_words, WordSource};
use crate::telemetry::{InvariantChecker, InvariantViolation};

/// Polynomial for `jump()`, equivalent to 2^128 calls to `next_word`.
const JUMP: [u64; 4] = [
    0x180e_c6d3_3cfd_0aba,
    0xd5a6_1266_f0c9_392c,
    0xa958_2618_e03f_c9aa,
    0x39ab_dc45_29b1_661c,
];

/// Advances the shared linear engine by one step.
#[inline]
fn step(s: &mut [u64; 4]) {
    let t = s[1] << 17;
    s[2] ^= s[0];
    s[3] ^= s[1];
    s[1] ^= s[2];
    s[0] ^= s[3];
    s[2] ^= t;
    s[3] = s[3].rotate_left(45);
}

/// Applies the jump polynomial to `s`.
fn jump(s: &mut [u64; 4]) {
    let mut acc = [0_u64; 4];
    for word in JUMP {
        for bit in 0..64 {
            if word & (1_u64 << bit) != 0 {
                for (a, v) in acc.iter_mut().zip(s.iter()) {
                    *a ^= *v;
                }
            }
            step(s);
        }
    }
    *s = acc;
}

macro_rules! xoshiro256_engine {
    ($(#[$doc:meta])* $name:ident, $label:literal, |$s:ident| $output:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            s: [u64; 4],
        }

        impl $name {
            /// Creates an engine from four state words.
            ///
            /// The all-zero state is a fixed point and is reported as an invariant violation.
            #[must_use]
            pub fn new(s0: u64, s1: u64, s2: u64, s3: u64) -> Self {
                let engine = Self {
                    s: [s0, s1, s2, s3],
                };
                debug_check_invariants!(engine, concat!($label, " construction"));
                engine
            }

            /// Advances the state by 2^128 steps.
            ///
            /// Starting from one seed, repeated jumps yield 2^128 non-overlapping
            /// subsequences for parallel use.
            pub fn jump(&mut self) {
                jump(&mut self.s);
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
                if self.s.iter().all(|&w| w == 0) {
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
            const STATE_WORDS: usize = 4;

            fn algorithm_name(&self) -> &'static str {
                $label
            }

            #[inline]
            fn next_word(&mut self) -> u64 {
                let $s = &self.s;
                let result = $output;
                step(&mut self.s);
                result
            }

            fn set_seed(&mut self, seed: &[u64]) -> Result<(), RngError> {
                require_seed_words(seed, Self::STATE_WORDS)?;
                self.s.copy_from_slice(&seed[..4]);
                tracing::trace!(algorithm = $label, "seeded");
                Ok(())
            }

            fn validate_state(&self) -> Result<(), InvariantViolation> {
                self.check_invariants()
            }

            fn clear(&mut self) {
                self.s = [0; 4];
            }
        }
    };
}

xoshiro256_engine!(
    /// xoshiro256+: output is `s0 + s3`. The lowest bits have low linear complexity;
    /// prefer it for floating-point generation.
    Xoshiro256Plus,
    "Xoshiro 256+",
    |s| s[0].wrapping_add(s[3])
);

xoshiro256_engine!(
    /// xoshiro256++: output is `rotl(s0 + s3, 23) + s0`.
    Xoshiro256PlusPlus,
    "Xoshiro 256++",
    |s| s[0].wrapping_add(s[3]).rotate_left(23).wrapping_add(s[0])
);

xoshiro256_engine!(
    /// xoshiro256**: output is `rotl(s1 * 5, 7) * 9`. The general-purpose choice.
    Xoshiro256StarStar,
    "Xoshiro 256**",
    |s| s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9)
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

    // Reference outputs for state [1, 2, 3, 4].
    #[test]
    fn test_reference_vectors() {
        let mut plus = Xoshiro256Plus::new(1, 2, 3, 4);
        for exp in [5_u64, 211106232532999, 211106635186183, 9223759065350669058] {
            assert_eq!(plus.next_word(), exp);
        }

        let mut plus_plus = Xoshiro256PlusPlus::new(1, 2, 3, 4);
        for exp in [41943041_u64, 58720359, 3588806011781223, 3591011842654386] {
            assert_eq!(plus_plus.next_word(), exp);
        }

        let mut star_star = Xoshiro256StarStar::new(1, 2, 3, 4);
        for exp in [11520_u64, 0, 1509978240, 1215971899390074240] {
            assert_eq!(star_star.next_word(), exp);
        }
    }

    #[test]
    fn test_jump_reference() {
        let mut engine = Xoshiro256StarStar::new(1, 2, 3, 4);
        engine.jump();
        assert_eq!(
            engine,
            Xoshiro256StarStar {
                s: [
                    0x8c7a_1539_56b5_f3d1,
                    0x701f_1a71_3401_d85e,
                    0x6527_f66a_6546_9085,
                    0x8386_b786_c440_8050,
                ]
            }
        );
    }

    #[test]
    fn test_jump_diverges_from_original_stream() {
        let mut original = Xoshiro256PlusPlus::seed_from_u64(8);
        let mut jumped = original.clone();
        jumped.jump();
        let a: Vec<u64> = (0..8).map(|_| original.next_word()).collect();
        let b: Vec<u64> = (0..8).map(|_| jumped.next_word()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_state_fails_invariant() {
        let mut engine = Xoshiro256Plus::seed_from_u64(1);
        assert!(engine.check_invariants().is_ok());
        engine.clear();
        let violation = engine.check_invariants().unwrap_err();
        assert_eq!(violation.type_name, "Xoshiro256Plus");
    }

    #[test]
    fn test_names() {
        assert_eq!(Xoshiro256Plus::seed_from_u64(0).algorithm_name(), "Xoshiro 256+");
        assert_eq!(
            Xoshiro256PlusPlus::seed_from_u64(0).algorithm_name(),
            "Xoshiro 256++"
        );
        assert_eq!(
            Xoshiro256StarStar::seed_from_u64(0).algorithm_name(),
            "Xoshiro 256**"
        );
    }
}
