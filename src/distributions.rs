//! Continuous distributions and scalar helpers built on the word stream.
//!
//! Uniform doubles take the top 53 bits of a 64-bit draw, so every value is an exact
//! multiple of `2^-53` in `[0, 1)`.

use std::f64::consts::{E, TAU};

use crate::error::RngError;
use crate::rejection::RejectionContext;
use crate::source::WordSource;

const F64_SCALE: f64 = 1.0 / (1_u64 << 53) as f64;

/// Cheng's acceptance window for the first uniform.
const CHENG_U1_MIN: f64 = 1e-7;
const CHENG_U1_MAX: f64 = 1.0 - 1e-7;

/// Returns a uniform `f64` in `[0, 1)`.
#[inline]
pub fn next_f64<S: WordSource + ?Sized>(source: &mut S) -> f64 {
    (source.next_u64() >> 11) as f64 * F64_SCALE
}

/// Returns a uniform `f64` in `[lower, upper)` by linear interpolation.
///
/// The bounds are weighted separately, so ranges wider than `f64::MAX` (such as
/// `[-f64::MAX, f64::MAX)`) stay finite.
///
/// # Errors
///
/// Returns [`RngError::InvalidArgument`] unless both bounds are finite and `lower < upper`.
pub fn next_f64_in<S: WordSource + ?Sized>(
    source: &mut S,
    lower: f64,
    upper: f64,
) -> Result<f64, RngError> {
    if !lower.is_finite() || !upper.is_finite() || lower >= upper {
        return Err(RngError::invalid(format!(
            "float range [{}, {}) must be finite and non-empty",
            lower, upper
        )));
    }
    let u = next_f64(source);
    let value = lower * (1.0 - u) + upper * u;
    // Rounding can land just outside the range.
    Ok(if value >= lower && value < upper { value } else { lower })
}

/// Returns `true` when the top bit of a 32-bit draw is clear.
#[inline]
pub fn next_bool<S: WordSource + ?Sized>(source: &mut S) -> bool {
    source.next_u32() >> 31 == 0
}

/// Returns the top byte of a 32-bit draw.
#[inline]
pub fn next_u8<S: WordSource + ?Sized>(source: &mut S) -> u8 {
    (source.next_u32() >> 24) as u8
}

/// Samples `Gamma(alpha, beta)` with shape `alpha` and scale `beta`.
///
/// - `alpha > 1`: Cheng (1977), "The generation of Gamma variables with non-integral
///   shape parameters".
/// - `alpha == 1`: inverse CDF of the exponential distribution.
/// - `0 < alpha < 1`: Ahrens-Dieter GS as given by Kennedy & Gentle.
///
/// # Errors
///
/// - [`RngError::InvalidArgument`] unless `alpha` and `beta` are finite and positive.
/// - [`RngError::RejectionLimitExceeded`] if the context caps attempts and the cap is hit.
pub fn gamma<S: WordSource + ?Sized>(
    source: &mut S,
    alpha: f64,
    beta: f64,
    context: &RejectionContext<'_>,
) -> Result<f64, RngError> {
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(RngError::invalid(format!(
            "gamma shape alpha must be finite and > 0, got {}",
            alpha
        )));
    }
    if !beta.is_finite() || beta <= 0.0 {
        return Err(RngError::invalid(format!(
            "gamma scale beta must be finite and > 0, got {}",
            beta
        )));
    }

    if alpha > 1.0 {
        gamma_cheng(source, alpha, beta, context)
    } else if alpha == 1.0 {
        Ok(-(1.0 - next_f64(source)).ln() * beta)
    } else {
        gamma_gs(source, alpha, beta, context)
    }
}

fn gamma_cheng<S: WordSource + ?Sized>(
    source: &mut S,
    alpha: f64,
    beta: f64,
    context: &RejectionContext<'_>,
) -> Result<f64, RngError> {
    let ainv = (2.0 * alpha - 1.0).sqrt();
    let bbb = alpha - 4.0_f64.ln();
    let ccc = alpha + ainv;
    let sg_magic = 1.0 + 4.5_f64.ln();

    let mut tracker = context.track("next_gamma");
    loop {
        let u1 = next_f64(source);
        if u1 <= CHENG_U1_MIN || u1 >= CHENG_U1_MAX {
            tracker.reject()?;
            continue;
        }
        let u2 = 1.0 - next_f64(source);
        let v = (u1 / (1.0 - u1)).ln() / ainv;
        let x = alpha * v.exp();
        let z = u1 * u1 * u2;
        let r = bbb + ccc * v - x;
        if r + sg_magic - 4.5 * z >= 0.0 || r >= z.ln() {
            return Ok(x * beta);
        }
        tracker.reject()?;
    }
}

fn gamma_gs<S: WordSource + ?Sized>(
    source: &mut S,
    alpha: f64,
    beta: f64,
    context: &RejectionContext<'_>,
) -> Result<f64, RngError> {
    let b = (E + alpha) / E;
    let mut tracker = context.track("next_gamma");
    loop {
        let p = b * next_f64(source);
        let x = if p < 1.0 {
            p.powf(1.0 / alpha)
        } else {
            -((b - p) / alpha).ln()
        };
        let u1 = next_f64(source);
        let accepted = if p > 1.0 {
            u1 <= x.powf(alpha - 1.0)
        } else {
            u1 <= (-x).exp()
        };
        if accepted {
            return Ok(x * beta);
        }
        tracker.reject()?;
    }
}

/// Gaussian sampler holding the spare value from the last Box-Muller pair.
///
/// Box-Muller produces two independent normals per pair of uniforms. The first is
/// returned and the second is cached; the next call consumes the cache instead of
/// drawing. The cache is a single slot per sampler, so callers interleaving calls with
/// different parameters still see values from the same pair. Reseeding a
/// [`Generator`](crate::Generator) clears it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistributionSampler {
    spare: Option<f64>,
}

impl DistributionSampler {
    /// Creates a sampler with no cached value.
    #[must_use]
    pub const fn new() -> Self {
        Self { spare: None }
    }

    /// The cached standard normal, if any.
    #[must_use]
    pub const fn spare(&self) -> Option<f64> {
        self.spare
    }

    /// Drops the cached value.
    pub fn clear_spare(&mut self) {
        self.spare = None;
    }

    /// Samples `Normal(mean, std)`.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::InvalidArgument`] if `mean` is NaN or `std` is negative or NaN.
    /// Nothing is drawn and the cache is left as it was.
    pub fn next_gaussian<S: WordSource + ?Sized>(
        &mut self,
        source: &mut S,
        mean: f64,
        std: f64,
    ) -> Result<f64, RngError> {
        if mean.is_nan() {
            return Err(RngError::invalid("gaussian mean must not be NaN"));
        }
        if std.is_nan() || std < 0.0 {
            return Err(RngError::invalid(format!(
                "gaussian standard deviation must be >= 0, got {}",
                std
            )));
        }

        if let Some(spare) = self.spare.take() {
            return Ok(mean + std * spare);
        }

        let theta = TAU * next_f64(source);
        let radius = (-2.0 * (1.0 - next_f64(source)).ln()).sqrt();
        self.spare = Some(radius * theta.sin());
        Ok(mean + std * radius * theta.cos())
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
    use crate::config::RejectionPolicy;
    use crate::engines::{SeedableRng, Xoshiro256StarStar};
    use crate::test_config::ScriptedSource;

    fn ctx() -> RejectionContext<'static> {
        RejectionContext::default()
    }

    #[test]
    fn test_next_f64_extremes() {
        let mut zero = ScriptedSource::new(vec![0_u64]);
        assert_eq!(next_f64(&mut zero), 0.0);
        let mut max = ScriptedSource::new(vec![u64::MAX]);
        let top = next_f64(&mut max);
        assert!(top < 1.0);
        assert_eq!(top, 1.0 - F64_SCALE);
    }

    #[test]
    fn test_bool_and_byte_use_top_bits() {
        let mut source = ScriptedSource::new(vec![0x8000_0000_0000_0000_u64]);
        assert!(!next_bool(&mut source));
        let mut source = ScriptedSource::new(vec![0x7fff_ffff_u32]);
        assert!(next_bool(&mut source));
        let mut source = ScriptedSource::new(vec![0xab00_0000_0000_0001_u64]);
        assert_eq!(next_u8(&mut source), 0xab);
    }

    #[test]
    fn test_next_f64_in_validation() {
        let mut engine = Xoshiro256StarStar::seed_from_u64(3);
        assert!(next_f64_in(&mut engine, 1.0, 1.0).is_err());
        assert!(next_f64_in(&mut engine, 2.0, 1.0).is_err());
        assert!(next_f64_in(&mut engine, f64::NEG_INFINITY, 1.0).is_err());
        for _ in 0..1000 {
            let v = next_f64_in(&mut engine, -3.0, 5.0).unwrap();
            assert!((-3.0..5.0).contains(&v));
        }
    }

    #[test]
    fn test_next_f64_in_full_float_span() {
        let mut engine = Xoshiro256StarStar::seed_from_u64(1);
        let values: Vec<f64> = (0..1000)
            .map(|_| next_f64_in(&mut engine, -f64::MAX, f64::MAX).unwrap())
            .collect();
        assert!(values.iter().all(|v| v.is_finite() && *v >= -f64::MAX && *v < f64::MAX));
        let negative = values.iter().filter(|v| v.is_sign_negative()).count();
        assert!((400..600).contains(&negative), "negative draws: {negative}");
    }

    #[test]
    fn test_next_f64_in_endpoints() {
        let mut zero = ScriptedSource::new(vec![0_u64]);
        assert_eq!(next_f64_in(&mut zero, -2.0, 6.0).unwrap(), -2.0);
        let mut max = ScriptedSource::new(vec![u64::MAX]);
        let top = next_f64_in(&mut max, -2.0, 6.0).unwrap();
        assert!(top < 6.0 && top > 5.999_999);
    }

    #[test]
    fn test_gaussian_pair_comes_from_one_draw_pair() {
        // u1 = 0.25 and u2 = 0.5 put theta at a quarter turn.
        let mut source = ScriptedSource::new(vec![1_u64 << 62, 1_u64 << 63, 0]);
        let mut sampler = DistributionSampler::new();
        let radius = (-2.0 * 0.5_f64.ln()).sqrt();

        let first = sampler.next_gaussian(&mut source, 0.0, 1.0).unwrap();
        assert_eq!(first, radius * (TAU * 0.25).cos());
        assert_eq!(source.draws(), 2);

        let second = sampler.next_gaussian(&mut source, 0.0, 1.0).unwrap();
        assert_eq!(second, 1.1774100225154747);
        assert_eq!(second, radius * (TAU * 0.25).sin());
        assert_eq!(source.draws(), 2, "the spare takes no draws");

        let _ = sampler.next_gaussian(&mut source, 0.0, 1.0).unwrap();
        assert_eq!(source.draws(), 4, "a fresh pair takes two draws");
    }

    #[test]
    fn test_gaussian_rejects_bad_parameters_without_drawing() {
        let mut source = ScriptedSource::new(vec![1_u64]);
        let mut sampler = DistributionSampler::new();
        assert!(sampler.next_gaussian(&mut source, f64::NAN, 1.0).is_err());
        assert!(sampler.next_gaussian(&mut source, 0.0, -0.5).is_err());
        assert!(sampler.next_gaussian(&mut source, 0.0, f64::NAN).is_err());
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_gaussian_second_call_uses_spare() {
        let mut engine = Xoshiro256StarStar::seed_from_u64(11);
        let mut sampler = DistributionSampler::new();
        let _ = sampler.next_gaussian(&mut engine, 0.0, 1.0).unwrap();
        let spare = sampler.spare().unwrap();

        let before = engine.clone();
        let second = sampler.next_gaussian(&mut engine, 10.0, 2.0).unwrap();
        assert_eq!(second, 10.0 + 2.0 * spare);
        assert_eq!(engine, before, "spare path draws nothing");
        assert_eq!(sampler.spare(), None, "spare is never returned twice");
    }

    #[test]
    fn test_gaussian_zero_std_returns_mean() {
        let mut engine = Xoshiro256StarStar::seed_from_u64(4);
        let mut sampler = DistributionSampler::new();
        for _ in 0..10 {
            assert_eq!(sampler.next_gaussian(&mut engine, 7.5, 0.0).unwrap(), 7.5);
        }
    }

    #[test]
    fn test_gamma_rejects_bad_parameters() {
        let mut source = ScriptedSource::new(vec![1_u64]);
        for (alpha, beta) in [
            (0.0, 1.0),
            (-1.0, 1.0),
            (f64::NAN, 1.0),
            (1.0, 0.0),
            (1.0, f64::NAN),
            (f64::INFINITY, 1.0),
        ] {
            assert!(
                matches!(
                    gamma(&mut source, alpha, beta, &ctx()),
                    Err(RngError::InvalidArgument { .. })
                ),
                "alpha={alpha} beta={beta}"
            );
        }
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_gamma_exponential_branch_is_inverse_cdf() {
        // u = 0.5 exactly: top 53 bits = 2^52.
        let mut source = ScriptedSource::new(vec![1_u64 << 63]);
        let value = gamma(&mut source, 1.0, 3.0, &ctx()).unwrap();
        assert!((value - 2.0_f64.ln() * 3.0).abs() < 1e-12);
        assert_eq!(source.draws(), 1);
    }

    #[test]
    fn test_gamma_cheng_rejects_edge_uniform() {
        // u1 == 0 is outside Cheng's window; a stuck source never gets accepted.
        let context = RejectionContext::new(
            RejectionPolicy {
                warn_after: None,
                max_attempts: Some(5),
            },
            None,
        );
        let mut source = ScriptedSource::new(vec![0_u64]);
        assert_eq!(
            gamma(&mut source, 2.5, 1.0, &context),
            Err(RngError::RejectionLimitExceeded {
                operation: "next_gamma",
                attempts: 5
            })
        );
    }

    #[test]
    fn test_gamma_means_track_alpha_beta() {
        let mut engine = Xoshiro256StarStar::seed_from_u64(2024);
        for (alpha, beta) in [(0.5, 2.0), (1.0, 1.5), (3.0, 0.5), (9.0, 1.0)] {
            let n = 40_000;
            let mean: f64 = (0..n)
                .map(|_| gamma(&mut engine, alpha, beta, &ctx()).unwrap())
                .sum::<f64>()
                / n as f64;
            let expected = alpha * beta;
            let sd_of_mean = (alpha * beta * beta / n as f64).sqrt();
            assert!(
                (mean - expected).abs() < 5.0 * sd_of_mean,
                "alpha={alpha} beta={beta}: mean {mean} vs {expected}"
            );
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
    use crate::engines::{Jsf64, SeedableRng};
    use crate::test_config::miri_case_count;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: miri_case_count(),
            ..ProptestConfig::default()
        })]

        /// Property: gamma samples are positive and finite for valid parameters.
        #[test]
        fn prop_gamma_positive(seed in any::<u64>(), alpha in 0.05f64..20.0, beta in 0.01f64..100.0) {
            let mut engine = Jsf64::seed_from_u64(seed);
            for _ in 0..20 {
                let v = gamma(&mut engine, alpha, beta, &RejectionContext::default()).unwrap();
                prop_assert!(v >= 0.0 && v.is_finite(), "gamma({}, {}) produced {}", alpha, beta, v);
            }
        }

        /// Property: uniform doubles stay in [0, 1).
        #[test]
        fn prop_f64_bounds(seed in any::<u64>()) {
            let mut engine = Jsf64::seed_from_u64(seed);
            for _ in 0..100 {
                let v = next_f64(&mut engine);
                prop_assert!((0.0..1.0).contains(&v));
            }
        }
    }
}
