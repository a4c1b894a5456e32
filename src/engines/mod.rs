//! Concrete word-source engines.
//!
//! Every engine here is a small closed-form bit-mixing recurrence. None of them are
//! cryptographically secure, including after [`WordSource::reseed`].
//!
//! | Engine | Word | Seed words |
//! |---|---|---|
//! | [`SplitMix64`] | `u64` | 1 |
//! | [`Xoshiro256Plus`], [`Xoshiro256PlusPlus`], [`Xoshiro256StarStar`] | `u64` | 4 |
//! | [`Xoroshiro128Plus`], [`Xoroshiro128PlusPlus`], [`Xoroshiro128StarStar`] | `u64` | 2 |
//! | [`Pcg32`] | `u32` | 4 (state and stream halves) |
//! | [`Sfc32`] | `u32` | 3 |
//! | [`Sfc64`] | `u64` | 3 |
//! | [`Jsf32`] | `u32` | 1 |
//! | [`Jsf64`] | `u64` | 1 |
//! | [`RomuTrio`] | `u64` | 3 |
//! | [`RomuDuoJr`] | `u64` | 2 |
//! | [`WyRng`] | `u64` | 1 |
//!
//! # Usage
//!
//! ```rust
//! use prng_kit::engines::{Pcg32, SeedableRng, Xoshiro256StarStar};
//! use prng_kit::WordSource;
//!
//! // Deterministic: a u64 seed expanded through SplitMix64
//! let mut engine = Xoshiro256StarStar::seed_from_u64(12345);
//! let word = engine.next_u64();
//!
//! // Explicit state
//! let mut pcg = Pcg32::new(42, 54);
//! let value = pcg.next_u32();
//! # let _ = (word, value);
//! ```

use crate::error::RngError;
use crate::source::WordSource;

mod jsf;
mod pcg32;
mod romu;
mod sfc;
mod splitmix64;
mod wyrng;
mod xoroshiro128;
mod xoshiro256;

pub use jsf::{Jsf32, Jsf64};
pub use pcg32::Pcg32;
pub use romu::{RomuDuoJr, RomuTrio};
pub use sfc::{Sfc32, Sfc64};
pub use splitmix64::SplitMix64;
pub use wyrng::WyRng;
pub use xoroshiro128::{Xoroshiro128Plus, Xoroshiro128PlusPlus, Xoroshiro128StarStar};
pub use xoshiro256::{Xoshiro256Plus, Xoshiro256PlusPlus, Xoshiro256StarStar};

/// Number of warm-up steps SFC and JSF engines run after seeding.
pub(crate) const INITIAL_ROLL: usize = 20;

/// Trait for seeding engines.
///
/// Provides a simple interface for creating deterministic engine instances.
pub trait SeedableRng: WordSource + Sized {
    /// Creates a new engine seeded from a 64-bit value.
    ///
    /// Different seeds produce different (statistically independent) sequences.
    /// Multi-word engines expand the value through [`SplitMix64`].
    #[must_use]
    fn seed_from_u64(seed: u64) -> Self;

    /// Creates a new engine seeded from the operating system's secure random facility.
    ///
    /// This does NOT make the engine cryptographically secure.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::EntropyUnavailable`] if the OS facility cannot be read.
    fn from_entropy() -> Result<Self, RngError> {
        let mut engine = Self::seed_from_u64(0);
        engine.reseed()?;
        tracing::trace!(algorithm = engine.algorithm_name(), "engine created from OS entropy");
        Ok(engine)
    }
}

/// Expands one `u64` into `N` state words with [`SplitMix64`].
pub(crate) fn expand_seed<const N: usize>(seed: u64) -> [u64; N] {
    let mut mixer = SplitMix64::new(seed);
    let mut words = [0_u64; N];
    for word in &mut words {
        *word = mixer.next_word();
    }
    words
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

    fn assert_seeding_contract<S: SeedableRng + Clone>() {
        let engine = S::seed_from_u64(99);
        let short: Vec<S::Word> = vec![Default::default(); S::STATE_WORDS - 1];
        let mut target = engine.clone();
        assert_eq!(
            target.set_seed(&short),
            Err(RngError::InsufficientSeedMaterial {
                required: S::STATE_WORDS,
                provided: S::STATE_WORDS - 1,
            }),
            "{}",
            engine.algorithm_name()
        );

        let mut a = S::from_entropy().unwrap();
        let mut b = S::from_entropy().unwrap();
        let seq_a: Vec<u64> = (0..4).map(|_| a.next_u64()).collect();
        let seq_b: Vec<u64> = (0..4).map(|_| b.next_u64()).collect();
        assert_ne!(seq_a, seq_b, "{} entropy seeds collided", engine.algorithm_name());
    }

    #[test]
    fn test_every_engine_honors_seeding_contract() {
        assert_seeding_contract::<SplitMix64>();
        assert_seeding_contract::<Xoshiro256Plus>();
        assert_seeding_contract::<Xoshiro256PlusPlus>();
        assert_seeding_contract::<Xoshiro256StarStar>();
        assert_seeding_contract::<Xoroshiro128Plus>();
        assert_seeding_contract::<Xoroshiro128PlusPlus>();
        assert_seeding_contract::<Xoroshiro128StarStar>();
        assert_seeding_contract::<Pcg32>();
        assert_seeding_contract::<Sfc32>();
        assert_seeding_contract::<Sfc64>();
        assert_seeding_contract::<Jsf32>();
        assert_seeding_contract::<Jsf64>();
        assert_seeding_contract::<RomuTrio>();
        assert_seeding_contract::<RomuDuoJr>();
        assert_seeding_contract::<WyRng>();
    }

    #[test]
    fn test_expand_seed_matches_splitmix_stream() {
        let words: [u64; 3] = expand_seed(7);
        let mut mixer = SplitMix64::new(7);
        for word in words {
            assert_eq!(word, mixer.next_word());
        }
    }
}
