//! Byte extraction from a word stream.
//!
//! Bytes are produced one native word at a time. Each full word is written in the
//! requested byte order; a trailing partial group consumes one more word and keeps only
//! its leading bytes in that order. Reversing every word group of a little-endian
//! buffer therefore yields the big-endian buffer for the same seed.

use crate::error::RngError;
use crate::source::{Word, WordSource};

/// Byte order used when writing words into a buffer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum Endianness {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
    /// Whatever the host uses.
    Native,
}

impl Endianness {
    /// Resolves [`Endianness::Native`] to the host's concrete order.
    #[must_use]
    pub const fn resolve(self) -> Self {
        match self {
            Self::Native => {
                if cfg!(target_endian = "big") {
                    Self::Big
                } else {
                    Self::Little
                }
            },
            other => other,
        }
    }
}

/// Fills `buffer` with bytes from `source` in the given order.
///
/// # Errors
///
/// Returns [`RngError::InvalidArgument`] if `buffer` is empty. Nothing is drawn.
///
/// # Example
///
/// ```
/// use prng_kit::{bytes, engines::SplitMix64, Endianness};
///
/// let mut little = [0u8; 12];
/// let mut big = [0u8; 12];
/// bytes::fill(&mut SplitMix64::new(7), &mut little, Endianness::Little).unwrap();
/// bytes::fill(&mut SplitMix64::new(7), &mut big, Endianness::Big).unwrap();
///
/// let mut reversed = little[..8].to_vec();
/// reversed.reverse();
/// assert_eq!(reversed, big[..8]);
/// ```
pub fn fill<S: WordSource + ?Sized>(
    source: &mut S,
    buffer: &mut [u8],
    order: Endianness,
) -> Result<(), RngError> {
    if buffer.is_empty() {
        return Err(RngError::invalid("byte buffer must not be empty"));
    }
    let order = order.resolve();
    for chunk in buffer.chunks_mut(<S::Word as Word>::BYTES) {
        source.next_word().write_bytes(chunk, order);
    }
    Ok(())
}

/// Returns `length` fresh bytes from `source` in the given order.
///
/// # Errors
///
/// Returns [`RngError::InvalidArgument`] if `length` is zero.
pub fn next_bytes<S: WordSource + ?Sized>(
    source: &mut S,
    length: usize,
    order: Endianness,
) -> Result<Vec<u8>, RngError> {
    if length == 0 {
        return Err(RngError::invalid("requested byte count must be at least 1"));
    }
    let mut buffer = vec![0u8; length];
    fill(source, &mut buffer, order)?;
    Ok(buffer)
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
    use crate::engines::{Pcg32, SplitMix64};

    #[test]
    fn test_empty_requests_rejected() {
        let mut engine = SplitMix64::new(1);
        let before = engine.clone();
        assert!(matches!(
            fill(&mut engine, &mut [], Endianness::Little),
            Err(RngError::InvalidArgument { .. })
        ));
        assert!(next_bytes(&mut engine, 0, Endianness::Big).is_err());
        assert_eq!(engine, before, "no draws on invalid input");
    }

    #[test]
    fn test_little_endian_matches_word_bytes() {
        let mut reference = SplitMix64::new(42);
        let first = reference.next_word();
        let second = reference.next_word();

        let bytes = next_bytes(&mut SplitMix64::new(42), 11, Endianness::Little).unwrap();
        assert_eq!(bytes[..8], first.to_le_bytes());
        assert_eq!(bytes[8..], second.to_le_bytes()[..3]);
    }

    #[test]
    fn test_big_endian_partial_takes_high_bytes() {
        let mut reference = Pcg32::new(42, 54);
        let first = reference.next_word();
        let second = reference.next_word();

        let bytes = next_bytes(&mut Pcg32::new(42, 54), 6, Endianness::Big).unwrap();
        assert_eq!(bytes[..4], first.to_be_bytes());
        assert_eq!(bytes[4..], second.to_be_bytes()[..2]);
    }

    #[test]
    fn test_partial_group_consumes_one_word() {
        let mut engine = SplitMix64::new(3);
        let _ = next_bytes(&mut engine, 9, Endianness::Little).unwrap();
        let mut reference = SplitMix64::new(3);
        for _ in 0..2 {
            let _ = reference.next_word();
        }
        assert_eq!(engine.next_word(), reference.next_word());
    }

    #[test]
    fn test_native_resolves_to_host() {
        let expected = if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        };
        assert_eq!(Endianness::Native.resolve(), expected);
        assert_eq!(Endianness::Big.resolve(), Endianness::Big);
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod property_tests {
    use super::*;
    use crate::engines::{SeedableRng, Sfc32, Xoshiro256StarStar};
    use crate::test_config::miri_case_count;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: miri_case_count(),
            ..ProptestConfig::default()
        })]

        /// Property: big-endian output is little-endian output with each full word group reversed.
        #[test]
        fn prop_big_is_reversed_little_groups(seed in any::<u64>(), words in 1usize..16) {
            let len = words * 8;
            let le = next_bytes(&mut Xoshiro256StarStar::seed_from_u64(seed), len, Endianness::Little).unwrap();
            let be = next_bytes(&mut Xoshiro256StarStar::seed_from_u64(seed), len, Endianness::Big).unwrap();
            for (le_group, be_group) in le.chunks(8).zip(be.chunks(8)) {
                let mut reversed = le_group.to_vec();
                reversed.reverse();
                prop_assert_eq!(reversed.as_slice(), be_group);
            }
        }

        /// Property: the requested length is honored exactly for 32-bit engines.
        #[test]
        fn prop_length_honored(seed in any::<u32>(), len in 1usize..100) {
            let mut engine = Sfc32::new(seed, seed, seed);
            let bytes = next_bytes(&mut engine, len, Endianness::Native).unwrap();
            prop_assert_eq!(bytes.len(), len);
        }
    }
}
