//! Unbiased bounded integers via Lemire's nearly-divisionless method.
//!
//! A raw word `x` is mapped into `[0, range)` by taking the high word of the wide product
//! `x * range`. That alone is biased whenever `range` does not divide `2^W`, so candidates
//! whose low word falls below `2^W mod range` are rejected and redrawn. The threshold is
//! only computed when the low word is below `range`, which keeps the common path free of
//! division.
//!
//! Reference: Daniel Lemire, "Fast Random Integer Generation in an Interval" (2019).
//!
//! # Example
//!
//! ```
//! use prng_kit::{bounded, engines::Pcg32, RejectionContext};
//!
//! let mut engine = Pcg32::new(42, 54);
//! let die = bounded::bounded_u32(&mut engine, 1, 7, &RejectionContext::default()).unwrap();
//! assert!((1..7).contains(&die));
//! ```

use crate::error::RngError;
use crate::rejection::RejectionContext;
use crate::source::WordSource;

/// Full 128-bit product of two 64-bit values as `(high, low)`.
///
/// Built from four 32x32 partial products so it does not depend on native 128-bit
/// multiplication.
#[inline]
#[must_use]
pub const fn mul_wide_u64(a: u64, b: u64) -> (u64, u64) {
    const MASK: u64 = 0xFFFF_FFFF;
    let a_lo = a & MASK;
    let a_hi = a >> 32;
    let b_lo = b & MASK;
    let b_hi = b >> 32;

    let lo_lo = a_lo * b_lo;
    let hi_lo = a_hi * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_hi = a_hi * b_hi;

    // Cannot overflow: each term is bounded so the sum stays below 2^64.
    let cross = (lo_lo >> 32) + (hi_lo & MASK) + lo_hi;
    let high = hi_hi + (hi_lo >> 32) + (cross >> 32);
    let low = (cross << 32) | (lo_lo & MASK);
    (high, low)
}

/// `2^32 mod range` using two conditional subtractions before falling back to `%`.
#[inline]
const fn threshold_u32(range: u32) -> u32 {
    let mut t = range.wrapping_neg();
    if t >= range {
        t -= range;
        if t >= range {
            t %= range;
        }
    }
    t
}

/// `2^64 mod range`, same shape as [`threshold_u32`].
#[inline]
const fn threshold_u64(range: u64) -> u64 {
    let mut t = range.wrapping_neg();
    if t >= range {
        t -= range;
        if t >= range {
            t %= range;
        }
    }
    t
}

/// Returns a uniform `u32` in `[lower, upper)`.
///
/// # Errors
///
/// - [`RngError::InvalidArgument`] if `lower >= upper`. Nothing is drawn.
/// - [`RngError::RejectionLimitExceeded`] if the context caps attempts and the cap is hit.
pub fn bounded_u32<S: WordSource + ?Sized>(
    source: &mut S,
    lower: u32,
    upper: u32,
    context: &RejectionContext<'_>,
) -> Result<u32, RngError> {
    if lower >= upper {
        return Err(RngError::invalid(format!(
            "lower bound {} must be below upper bound {}",
            lower, upper
        )));
    }
    let range = upper - lower;
    let mut product = u64::from(source.next_u32()) * u64::from(range);
    let mut low = product as u32;
    if low < range {
        let threshold = threshold_u32(range);
        let mut tracker = context.track("bounded_u32");
        while low < threshold {
            tracker.reject()?;
            product = u64::from(source.next_u32()) * u64::from(range);
            low = product as u32;
        }
    }
    Ok((product >> 32) as u32 + lower)
}

/// Returns a uniform `u64` in `[lower, upper)`.
///
/// # Errors
///
/// - [`RngError::InvalidArgument`] if `lower >= upper`. Nothing is drawn.
/// - [`RngError::RejectionLimitExceeded`] if the context caps attempts and the cap is hit.
pub fn bounded_u64<S: WordSource + ?Sized>(
    source: &mut S,
    lower: u64,
    upper: u64,
    context: &RejectionContext<'_>,
) -> Result<u64, RngError> {
    if lower >= upper {
        return Err(RngError::invalid(format!(
            "lower bound {} must be below upper bound {}",
            lower, upper
        )));
    }
    let range = upper - lower;
    let (mut high, mut low) = mul_wide_u64(source.next_u64(), range);
    if low < range {
        let threshold = threshold_u64(range);
        let mut tracker = context.track("bounded_u64");
        while low < threshold {
            tracker.reject()?;
            (high, low) = mul_wide_u64(source.next_u64(), range);
        }
    }
    Ok(high + lower)
}

/// Returns a uniform `usize` in `[lower, upper)`.
///
/// Spans that fit in 32 bits use the 32-bit path; wider spans use the 64-bit path.
///
/// # Errors
///
/// Same as [`bounded_u32`] and [`bounded_u64`].
pub fn bounded_usize<S: WordSource + ?Sized>(
    source: &mut S,
    lower: usize,
    upper: usize,
    context: &RejectionContext<'_>,
) -> Result<usize, RngError> {
    if lower >= upper {
        return Err(RngError::invalid(format!(
            "lower bound {} must be below upper bound {}",
            lower, upper
        )));
    }
    let span = upper - lower;
    if let Ok(span32) = u32::try_from(span) {
        let offset = bounded_u32(source, 0, span32, context)?;
        Ok(lower + offset as usize)
    } else {
        let offset = bounded_u64(source, 0, span as u64, context)?;
        Ok(lower + offset as usize)
    }
}

/// Returns a uniform `u8` in `[lower, upper)`.
///
/// # Errors
///
/// Same as [`bounded_u32`].
pub fn bounded_u8<S: WordSource + ?Sized>(
    source: &mut S,
    lower: u8,
    upper: u8,
    context: &RejectionContext<'_>,
) -> Result<u8, RngError> {
    let value = bounded_u32(source, u32::from(lower), u32::from(upper), context)?;
    Ok(value as u8)
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
    use crate::config::RejectionPolicy;
    use crate::engines::{Pcg32, SeedableRng, Xoshiro256StarStar};
    use crate::telemetry::{CollectingObserver, ViolationKind};
    use crate::test_config::{statistical_sample_size, ScriptedSource};

    fn ctx() -> RejectionContext<'static> {
        RejectionContext::default()
    }

    #[test]
    fn test_mul_wide_edges() {
        assert_eq!(mul_wide_u64(0, u64::MAX), (0, 0));
        assert_eq!(mul_wide_u64(1, u64::MAX), (0, u64::MAX));
        assert_eq!(mul_wide_u64(u64::MAX, u64::MAX), (u64::MAX - 1, 1));
        assert_eq!(mul_wide_u64(1 << 32, 1 << 32), (1, 0));
    }

    #[test]
    fn test_thresholds_match_modulo() {
        for range in [1_u32, 2, 3, 7, 10, 1 << 31, (1 << 31) + 1, u32::MAX] {
            let expected = ((1_u64 << 32) % u64::from(range)) as u32;
            assert_eq!(threshold_u32(range), expected, "range {range}");
        }
        for range in [1_u64, 3, 10, 1 << 63, (1 << 63) + 1, u64::MAX] {
            let expected = ((1_u128 << 64) % u128::from(range)) as u64;
            assert_eq!(threshold_u64(range), expected, "range {range}");
        }
    }

    #[test]
    fn test_empty_range_rejected_without_draw() {
        let mut source = ScriptedSource::new(vec![1_u32]);
        assert!(matches!(
            bounded_u32(&mut source, 5, 5, &ctx()),
            Err(RngError::InvalidArgument { .. })
        ));
        assert!(bounded_u32(&mut source, 6, 5, &ctx()).is_err());
        assert!(bounded_u64(&mut source, 9, 1, &ctx()).is_err());
        assert!(bounded_usize(&mut source, 0, 0, &ctx()).is_err());
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_biased_candidate_is_redrawn() {
        // range 3: 2^32 mod 3 == 1, so only x == 0 (low word 0) is rejected.
        let mut source = ScriptedSource::new(vec![0_u32, 5]);
        assert_eq!(bounded_u32(&mut source, 10, 13, &ctx()).unwrap(), 10);
        assert_eq!(source.draws(), 2);
    }

    #[test]
    fn test_max_word_maps_to_top_of_range() {
        let mut source = ScriptedSource::new(vec![u32::MAX]);
        assert_eq!(bounded_u32(&mut source, 0, 10, &ctx()).unwrap(), 9);

        let mut source = ScriptedSource::new(vec![u64::MAX]);
        assert_eq!(bounded_u64(&mut source, 100, 110, &ctx()).unwrap(), 109);
    }

    #[test]
    fn test_single_value_range() {
        let mut engine = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(bounded_u32(&mut engine, 42, 43, &ctx()).unwrap(), 42);
            assert_eq!(bounded_u64(&mut engine, 7, 8, &ctx()).unwrap(), 7);
        }
    }

    #[test]
    fn test_full_u64_span_accepted() {
        let mut engine = Xoshiro256StarStar::seed_from_u64(1);
        let value = bounded_u64(&mut engine, 0, u64::MAX, &ctx()).unwrap();
        assert!(value < u64::MAX);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_usize_large_span_uses_wide_path() {
        let mut engine = Xoshiro256StarStar::seed_from_u64(42);
        let start = (u32::MAX as usize) + 1000;
        let end = start + (u32::MAX as usize) * 4;
        for _ in 0..100 {
            let value = bounded_usize(&mut engine, start, end, &ctx()).unwrap();
            assert!((start..end).contains(&value));
        }
    }

    #[test]
    fn test_stuck_source_hits_cap_and_warns() {
        let observer = CollectingObserver::new();
        let policy = RejectionPolicy {
            warn_after: Some(8),
            max_attempts: Some(16),
        };
        let context = RejectionContext::new(policy, Some(&observer));
        let mut source = ScriptedSource::new(vec![0_u32]);
        let err = bounded_u32(&mut source, 0, 3, &context).unwrap_err();
        assert_eq!(
            err,
            RngError::RejectionLimitExceeded {
                operation: "bounded_u32",
                attempts: 16
            }
        );
        assert!(observer.has_violation(ViolationKind::Rejection));
        assert_eq!(observer.len(), 1);
    }

    #[test]
    fn test_chi_square_uniform_small_range() {
        let mut engine = Xoshiro256StarStar::seed_from_u64(0xdead_beef);
        let draws = statistical_sample_size();
        let mut counts = [0_usize; 10];
        for _ in 0..draws {
            counts[bounded_u32(&mut engine, 0, 10, &ctx()).unwrap() as usize] += 1;
        }
        let expected = draws as f64 / 10.0;
        let chi2: f64 = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum();
        if !cfg!(miri) {
            // 9 degrees of freedom, p = 0.001 critical value.
            assert!(chi2 < 27.88, "chi-square {chi2} too large: {counts:?}");
        }
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
    use crate::engines::{Pcg32, SeedableRng, Sfc64};
    use crate::test_config::miri_case_count;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: miri_case_count(),
            ..ProptestConfig::default()
        })]

        /// Property: the emulated wide product agrees with native 128-bit multiplication.
        #[test]
        fn prop_mul_wide_matches_u128(a in any::<u64>(), b in any::<u64>()) {
            let wide = u128::from(a) * u128::from(b);
            prop_assert_eq!(mul_wide_u64(a, b), ((wide >> 64) as u64, wide as u64));
        }

        /// Property: 32-bit output always lies in [lower, upper).
        #[test]
        fn prop_bounded_u32_within_bounds(seed in any::<u64>(), lower in any::<u32>(), span in 1u32..) {
            let upper = lower.saturating_add(span);
            prop_assume!(upper > lower);
            let mut engine = Pcg32::seed_from_u64(seed);
            for _ in 0..50 {
                let value = bounded_u32(&mut engine, lower, upper, &RejectionContext::default()).unwrap();
                prop_assert!(value >= lower && value < upper, "{} outside [{}, {})", value, lower, upper);
            }
        }

        /// Property: 64-bit output always lies in [lower, upper).
        #[test]
        fn prop_bounded_u64_within_bounds(seed in any::<u64>(), lower in any::<u64>(), span in 1u64..) {
            let upper = lower.saturating_add(span);
            prop_assume!(upper > lower);
            let mut engine = Sfc64::seed_from_u64(seed);
            for _ in 0..50 {
                let value = bounded_u64(&mut engine, lower, upper, &RejectionContext::default()).unwrap();
                prop_assert!(value >= lower && value < upper, "{} outside [{}, {})", value, lower, upper);
            }
        }

        /// Property: the same seed yields the same bounded sequence.
        #[test]
        fn prop_bounded_deterministic(seed in any::<u64>(), upper in 1u32..1000) {
            let mut a = Pcg32::seed_from_u64(seed);
            let mut b = Pcg32::seed_from_u64(seed);
            for _ in 0..20 {
                prop_assert_eq!(
                    bounded_u32(&mut a, 0, upper, &RejectionContext::default()).unwrap(),
                    bounded_u32(&mut b, 0, upper, &RejectionContext::default()).unwrap()
                );
            }
        }
    }
}
