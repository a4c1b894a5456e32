//! Byte extraction across engines of both word widths.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use prng_kit::engines::{Jsf32, Pcg32, SeedableRng, Sfc64, SplitMix64, Xoroshiro128StarStar};
use prng_kit::{Endianness, Generator, RngError, Word, WordSource};

/// Checks that every full word group of the big-endian buffer is the reverse of the
/// little-endian one.
fn assert_groups_reversed<S: WordSource + Clone>(source: S, length: usize) {
    let width = <S::Word as Word>::BYTES;
    let mut little_rng = Generator::new(source.clone());
    let mut big_rng = Generator::new(source);
    let little = little_rng.next_bytes(length, Endianness::Little).unwrap();
    let big = big_rng.next_bytes(length, Endianness::Big).unwrap();
    assert_eq!(little.len(), length);

    for (l, b) in little.chunks_exact(width).zip(big.chunks_exact(width)) {
        let mut reversed = l.to_vec();
        reversed.reverse();
        assert_eq!(reversed, b);
    }
}

#[test]
fn test_word_groups_reverse_between_orders() {
    assert_groups_reversed(Pcg32::seed_from_u64(1), 64);
    assert_groups_reversed(Jsf32::seed_from_u64(2), 17);
    assert_groups_reversed(Sfc64::seed_from_u64(3), 64);
    assert_groups_reversed(Xoroshiro128StarStar::seed_from_u64(4), 23);
}

#[test]
fn test_partial_tail_takes_leading_bytes() {
    let mut reference = SplitMix64::new(11);
    let first = reference.next_word();
    let second = reference.next_word();

    let mut rng = Generator::new(SplitMix64::new(11));
    let little = rng.next_bytes(11, Endianness::Little).unwrap();
    assert_eq!(&little[..8], &first.to_le_bytes());
    assert_eq!(&little[8..], &second.to_le_bytes()[..3]);

    let mut rng = Generator::new(SplitMix64::new(11));
    let big = rng.next_bytes(11, Endianness::Big).unwrap();
    assert_eq!(&big[..8], &first.to_be_bytes());
    assert_eq!(&big[8..], &second.to_be_bytes()[..3]);
}

#[test]
fn test_partial_tail_consumes_one_word() {
    let mut rng = Generator::new(Pcg32::seed_from_u64(5));
    let mut reference = Pcg32::seed_from_u64(5);
    let mut buffer = [0_u8; 6];
    rng.fill(&mut buffer, Endianness::Little).unwrap();
    let _ = reference.next_word();
    let _ = reference.next_word();
    assert_eq!(rng.source(), &reference);
}

#[test]
fn test_native_matches_host_order() {
    let mut native = Generator::new(Sfc64::seed_from_u64(6));
    let mut explicit = Generator::new(Sfc64::seed_from_u64(6));
    let host = if cfg!(target_endian = "big") {
        Endianness::Big
    } else {
        Endianness::Little
    };
    assert_eq!(
        native.next_bytes(32, Endianness::Native).unwrap(),
        explicit.next_bytes(32, host).unwrap()
    );
}

#[test]
fn test_empty_requests_are_rejected() {
    let mut rng = Generator::new(Pcg32::seed_from_u64(7));
    assert!(matches!(
        rng.next_bytes(0, Endianness::Little),
        Err(RngError::InvalidArgument { .. })
    ));
    let mut empty: [u8; 0] = [];
    assert!(matches!(
        rng.fill(&mut empty, Endianness::Big),
        Err(RngError::InvalidArgument { .. })
    ));
    assert_eq!(rng.source(), &Pcg32::seed_from_u64(7));
}

#[test]
fn test_bytes_cover_all_values() {
    let mut rng = Generator::new(Xoroshiro128StarStar::seed_from_u64(8));
    let bytes = rng.next_bytes(64 * 1024, Endianness::Little).unwrap();
    let mut seen = [false; 256];
    for byte in bytes {
        seen[byte as usize] = true;
    }
    assert!(seen.iter().all(|&s| s));
}
