//! The [`Generator`] facade: one engine plus every derived operation.

use std::fmt;
use std::sync::Arc;

use crate::bounded;
use crate::bytes::{self, Endianness};
use crate::config::GeneratorConfig;
use crate::distributions::{self, DistributionSampler};
use crate::error::RngError;
use crate::rejection::RejectionContext;
use crate::seq;
use crate::source::{report_invalid_state, reseed_from_os, WordSource};
use crate::telemetry::{
    observer_ref, report_to_observer, Violation, ViolationKind, ViolationObserver,
    ViolationSeverity,
};

/// A word-source engine together with the derived sampling layers.
///
/// `Generator` is single-threaded by construction: every operation takes `&mut self` and
/// there is no internal locking. Use one generator per thread, or wrap it in a
/// `SharedGenerator` (feature `tokio`).
///
/// # Example
///
/// ```
/// use prng_kit::engines::{SeedableRng, Xoshiro256StarStar};
/// use prng_kit::Generator;
///
/// let mut rng = Generator::new(Xoshiro256StarStar::seed_from_u64(2024));
/// assert_eq!(rng.to_string(), "Xoshiro 256**");
///
/// let roll = rng.bounded_u32(1, 7)?;
/// assert!((1..7).contains(&roll));
///
/// let mut deck: Vec<u32> = (0..52).collect();
/// rng.shuffle_in_place(&mut deck)?;
///
/// let hand = rng.sample(&deck, 5)?;
/// assert_eq!(hand.len(), 5);
/// # Ok::<(), prng_kit::RngError>(())
/// ```
pub struct Generator<S: WordSource> {
    source: S,
    config: GeneratorConfig,
    sampler: DistributionSampler,
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

/// Validates `config`, reporting a `Configuration` violation on failure.
fn validate_config(
    config: &GeneratorConfig,
    observer: Option<&dyn ViolationObserver>,
) -> Result<(), RngError> {
    if let Err(err) = config.validate() {
        let violation = Violation::new(
            ViolationSeverity::Error,
            ViolationKind::Configuration,
            format!("rejected generator config: {}", err),
            concat!(file!(), ":", line!()),
        )
        .with_context("warn_after", format!("{:?}", config.rejection.warn_after))
        .with_context("max_attempts", format!("{:?}", config.rejection.max_attempts));
        report_to_observer(observer, &violation);
        return Err(err);
    }
    Ok(())
}

fn rejection_context<'a>(
    config: &GeneratorConfig,
    observer: &'a Option<Arc<dyn ViolationObserver>>,
) -> RejectionContext<'a> {
    RejectionContext::new(config.rejection, observer_ref(observer))
}

impl<S: WordSource> Generator<S> {
    /// Wraps `source` with the default configuration.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: GeneratorConfig::default(),
            sampler: DistributionSampler::new(),
            violation_observer: None,
        }
    }

    /// Wraps `source` with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::InvalidArgument`] if `config` fails validation. The failure is
    /// also logged as a `Configuration` violation.
    pub fn with_config(source: S, config: GeneratorConfig) -> Result<Self, RngError> {
        validate_config(&config, None)?;
        Ok(Self {
            config,
            ..Self::new(source)
        })
    }

    /// Attaches a violation observer. Without one, violations are logged via `tracing`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.violation_observer = Some(observer);
        self
    }

    /// Returns the attached violation observer, if any.
    #[must_use]
    pub fn violation_observer(&self) -> Option<&Arc<dyn ViolationObserver>> {
        self.violation_observer.as_ref()
    }

    /// Replaces the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::InvalidArgument`] if `config` fails validation, after reporting
    /// a `Configuration` violation to the attached observer. The previous configuration
    /// stays active.
    pub fn set_config(&mut self, config: GeneratorConfig) -> Result<(), RngError> {
        validate_config(&config, observer_ref(&self.violation_observer))?;
        self.config = config;
        Ok(())
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The underlying engine.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the underlying engine.
    ///
    /// Drawing directly from the engine bypasses the Gaussian cache, which is left as is.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Unwraps the engine, dropping the sampler state.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.source
    }

    /// The engine's algorithm name.
    #[must_use]
    pub fn algorithm_name(&self) -> &'static str {
        self.source.algorithm_name()
    }

    // ------------------------------------------------------------------
    // Raw words
    // ------------------------------------------------------------------

    /// Returns the engine's next native word.
    pub fn next_word(&mut self) -> S::Word {
        self.source.next_word()
    }

    /// Returns the next 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    /// Returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    // ------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------

    /// Replaces the engine state and drops any cached Gaussian.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::InsufficientSeedMaterial`] if `seed` is shorter than the
    /// engine's state. Nothing changes in that case.
    ///
    /// A seed that leaves the engine in a degenerate state (such as all-zero xoshiro
    /// words) is accepted but reported as a `Critical` invariant violation.
    pub fn set_seed(&mut self, seed: &[S::Word]) -> Result<(), RngError> {
        self.source.set_seed(seed)?;
        report_invalid_state(
            &self.source,
            observer_ref(&self.violation_observer),
            "set_seed",
        );
        self.sampler.clear_spare();
        Ok(())
    }

    /// Reseeds from OS entropy and drops any cached Gaussian.
    ///
    /// This does not make the stream cryptographically secure. Failures are reported
    /// to the violation observer as `Seeding` errors before being returned.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::EntropyUnavailable`] if the OS facility cannot be read. The
    /// engine and the Gaussian cache are untouched in that case.
    pub fn reseed(&mut self) -> Result<(), RngError> {
        reseed_from_os(&mut self.source, observer_ref(&self.violation_observer))?;
        self.sampler.clear_spare();
        Ok(())
    }

    /// Zeroes the engine state and drops any cached Gaussian.
    pub fn clear(&mut self) {
        self.source.clear();
        self.sampler.clear_spare();
    }

    // ------------------------------------------------------------------
    // Bounded integers
    // ------------------------------------------------------------------

    /// Uniform `u32` in `[lower, upper)`. See [`bounded::bounded_u32`].
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] if `lower >= upper`; [`RngError::RejectionLimitExceeded`]
    /// under a capped policy.
    pub fn bounded_u32(&mut self, lower: u32, upper: u32) -> Result<u32, RngError> {
        let context = rejection_context(&self.config, &self.violation_observer);
        bounded::bounded_u32(&mut self.source, lower, upper, &context)
    }

    /// Uniform `u64` in `[lower, upper)`. See [`bounded::bounded_u64`].
    ///
    /// # Errors
    ///
    /// Same as [`Generator::bounded_u32`].
    pub fn bounded_u64(&mut self, lower: u64, upper: u64) -> Result<u64, RngError> {
        let context = rejection_context(&self.config, &self.violation_observer);
        bounded::bounded_u64(&mut self.source, lower, upper, &context)
    }

    /// Uniform `usize` in `[lower, upper)`.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::bounded_u32`].
    pub fn bounded_usize(&mut self, lower: usize, upper: usize) -> Result<usize, RngError> {
        let context = rejection_context(&self.config, &self.violation_observer);
        bounded::bounded_usize(&mut self.source, lower, upper, &context)
    }

    /// Uniform `u8` in `[lower, upper)`.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::bounded_u32`].
    pub fn bounded_u8(&mut self, lower: u8, upper: u8) -> Result<u8, RngError> {
        let context = rejection_context(&self.config, &self.violation_observer);
        bounded::bounded_u8(&mut self.source, lower, upper, &context)
    }

    // ------------------------------------------------------------------
    // Scalars
    // ------------------------------------------------------------------

    /// Uniform `f64` in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        distributions::next_f64(&mut self.source)
    }

    /// Uniform `f64` in `[lower, upper)`.
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] unless both bounds are finite and `lower < upper`.
    pub fn next_f64_in(&mut self, lower: f64, upper: f64) -> Result<f64, RngError> {
        distributions::next_f64_in(&mut self.source, lower, upper)
    }

    /// A fair coin from the top bit of a 32-bit draw.
    pub fn next_bool(&mut self) -> bool {
        distributions::next_bool(&mut self.source)
    }

    /// The top byte of a 32-bit draw.
    pub fn next_u8(&mut self) -> u8 {
        distributions::next_u8(&mut self.source)
    }

    // ------------------------------------------------------------------
    // Bytes
    // ------------------------------------------------------------------

    /// Fills `buffer` in the given byte order.
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] if `buffer` is empty.
    pub fn fill(&mut self, buffer: &mut [u8], order: Endianness) -> Result<(), RngError> {
        bytes::fill(&mut self.source, buffer, order)
    }

    /// Returns `length` bytes in the given byte order.
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] if `length` is zero.
    pub fn next_bytes(&mut self, length: usize, order: Endianness) -> Result<Vec<u8>, RngError> {
        bytes::next_bytes(&mut self.source, length, order)
    }

    /// Returns `length` bytes in the configured default byte order.
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] if `length` is zero.
    pub fn next_bytes_default(&mut self, length: usize) -> Result<Vec<u8>, RngError> {
        bytes::next_bytes(&mut self.source, length, self.config.default_endianness)
    }

    // ------------------------------------------------------------------
    // Sequences
    // ------------------------------------------------------------------

    /// One uniformly chosen element.
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] if `items` is empty.
    pub fn choice<'i, T>(&mut self, items: &'i [T]) -> Result<&'i T, RngError> {
        let context = rejection_context(&self.config, &self.violation_observer);
        seq::choice(&mut self.source, items, &context)
    }

    /// `select` independent picks with replacement. See [`seq::choose_multiple`].
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] if `items` is empty or `select` is outside `[1, n]`.
    pub fn choose_multiple<T: Clone>(
        &mut self,
        items: &[T],
        select: usize,
    ) -> Result<Vec<T>, RngError> {
        let context = rejection_context(&self.config, &self.violation_observer);
        seq::choose_multiple(&mut self.source, items, select, &context)
    }

    /// `k` picks without replacement. See [`seq::sample`].
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] if `items` is empty or `k` is outside `[1, n]`.
    pub fn sample<T: Clone>(&mut self, items: &[T], k: usize) -> Result<Vec<T>, RngError> {
        let context = rejection_context(&self.config, &self.violation_observer);
        seq::sample(&mut self.source, items, k, &context)
    }

    /// A shuffled copy of `items`.
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] if `items` is empty.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Result<Vec<T>, RngError> {
        let context = rejection_context(&self.config, &self.violation_observer);
        seq::shuffle(&mut self.source, items, &context)
    }

    /// Shuffles `items` in place.
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] if `items` is empty.
    pub fn shuffle_in_place<T>(&mut self, items: &mut [T]) -> Result<(), RngError> {
        let context = rejection_context(&self.config, &self.violation_observer);
        seq::shuffle_in_place(&mut self.source, items, &context)
    }

    // ------------------------------------------------------------------
    // Distributions
    // ------------------------------------------------------------------

    /// Samples `Normal(mean, std)`, using the cached Box-Muller spare when present.
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] if `mean` is NaN or `std` is negative or NaN.
    pub fn next_gaussian(&mut self, mean: f64, std: f64) -> Result<f64, RngError> {
        self.sampler.next_gaussian(&mut self.source, mean, std)
    }

    /// Samples `Gamma(alpha, beta)`. See [`distributions::gamma`].
    ///
    /// # Errors
    ///
    /// [`RngError::InvalidArgument`] unless both parameters are finite and positive;
    /// [`RngError::RejectionLimitExceeded`] under a capped policy.
    pub fn next_gamma(&mut self, alpha: f64, beta: f64) -> Result<f64, RngError> {
        let context = rejection_context(&self.config, &self.violation_observer);
        distributions::gamma(&mut self.source, alpha, beta, &context)
    }

    /// The cached standard normal from the last Box-Muller pair, if any.
    #[must_use]
    pub fn gaussian_spare(&self) -> Option<f64> {
        self.sampler.spare()
    }
}

impl<S: WordSource + Clone> Clone for Generator<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            config: self.config,
            sampler: self.sampler,
            violation_observer: self.violation_observer.clone(),
        }
    }
}

impl<S: WordSource + fmt::Debug> fmt::Debug for Generator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("source", &self.source)
            .field("config", &self.config)
            .field("sampler", &self.sampler)
            .field("has_violation_observer", &self.violation_observer.is_some())
            .finish()
    }
}

impl<S: WordSource> fmt::Display for Generator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source.algorithm_name())
    }
}

impl<S: WordSource> From<S> for Generator<S> {
    fn from(source: S) -> Self {
        Self::new(source)
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
    use crate::engines::{Pcg32, SeedableRng, Sfc64, SplitMix64, Xoshiro256StarStar};
    use crate::telemetry::{CollectingObserver, ViolationKind};
    use crate::test_config::ScriptedSource;

    #[test]
    fn test_display_is_algorithm_name() {
        let rng = Generator::new(Pcg32::seed_from_u64(0));
        assert_eq!(rng.to_string(), "PCG32");
        assert_eq!(rng.algorithm_name(), "PCG32");
    }

    #[test]
    fn test_with_config_validates() {
        let bad = GeneratorConfig {
            rejection: RejectionPolicy {
                warn_after: Some(10),
                max_attempts: Some(5),
            },
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            Generator::with_config(SplitMix64::new(0), bad),
            Err(RngError::InvalidArgument { .. })
        ));
        let ok = Generator::with_config(SplitMix64::new(0), GeneratorConfig::strict()).unwrap();
        assert_eq!(ok.config(), &GeneratorConfig::strict());
    }

    #[test]
    fn test_facade_matches_free_functions() {
        let mut rng = Generator::new(Sfc64::seed_from_u64(5));
        let mut raw = Sfc64::seed_from_u64(5);
        let ctx = RejectionContext::default();
        for _ in 0..50 {
            assert_eq!(
                rng.bounded_u32(3, 97).unwrap(),
                bounded::bounded_u32(&mut raw, 3, 97, &ctx).unwrap()
            );
        }
        assert_eq!(rng.source(), &raw);
    }

    #[test]
    fn test_set_seed_clears_spare() {
        let mut rng = Generator::new(Xoshiro256StarStar::seed_from_u64(1));
        let _ = rng.next_gaussian(0.0, 1.0).unwrap();
        assert!(rng.gaussian_spare().is_some());
        rng.set_seed(&[1, 2, 3, 4]).unwrap();
        assert!(rng.gaussian_spare().is_none());
    }

    #[test]
    fn test_failed_set_seed_keeps_spare() {
        let mut rng = Generator::new(Xoshiro256StarStar::seed_from_u64(1));
        let _ = rng.next_gaussian(0.0, 1.0).unwrap();
        assert!(rng.set_seed(&[1]).is_err());
        assert!(rng.gaussian_spare().is_some());
    }

    #[test]
    fn test_reseed_clears_spare_and_changes_stream() {
        let mut rng = Generator::new(Xoshiro256StarStar::seed_from_u64(1));
        let reference = rng.clone().next_u64();
        let _ = rng.next_gaussian(0.0, 1.0).unwrap();
        rng.reseed().unwrap();
        assert!(rng.gaussian_spare().is_none());
        assert_ne!(rng.next_u64(), reference);
    }

    #[test]
    fn test_clear_clears_spare() {
        let mut rng = Generator::new(Pcg32::seed_from_u64(3));
        let _ = rng.next_gaussian(1.0, 2.0).unwrap();
        rng.clear();
        assert!(rng.gaussian_spare().is_none());
    }

    #[test]
    fn test_observer_receives_rejection_warning() {
        let observer = Arc::new(CollectingObserver::new());
        let config = GeneratorConfig {
            rejection: RejectionPolicy {
                warn_after: Some(2),
                max_attempts: None,
            },
            ..GeneratorConfig::default()
        };
        // range 3: threshold is 1, so a zero word is always rejected.
        let source = ScriptedSource::new(vec![0_u32, 0, 0, 0x8000_0000]);
        let mut rng = Generator::with_config(source, config)
            .unwrap()
            .with_observer(observer.clone());
        assert_eq!(rng.bounded_u32(0, 3).unwrap(), 1);
        assert!(observer.has_violation(ViolationKind::Rejection));
        assert_eq!(observer.len(), 1);
    }

    #[test]
    fn test_strict_config_stops_stuck_source() {
        let source = ScriptedSource::new(vec![0_u64]);
        let mut rng = Generator::with_config(source, GeneratorConfig::strict()).unwrap();
        assert_eq!(
            rng.bounded_u64(0, 3),
            Err(RngError::RejectionLimitExceeded {
                operation: "bounded_u64",
                attempts: 4096
            })
        );
    }

    #[test]
    fn test_next_bytes_default_uses_config() {
        let config = GeneratorConfig {
            default_endianness: Endianness::Big,
            ..GeneratorConfig::default()
        };
        let mut rng = Generator::with_config(SplitMix64::new(9), config).unwrap();
        let mut reference = SplitMix64::new(9);
        let bytes = rng.next_bytes_default(8).unwrap();
        assert_eq!(bytes, reference.next_word().to_be_bytes());
    }

    #[test]
    fn test_zero_seed_reported_to_observer() {
        let observer = Arc::new(CollectingObserver::new());
        let mut rng = Generator::new(Xoshiro256StarStar::seed_from_u64(1))
            .with_observer(observer.clone());
        rng.set_seed(&[5, 6, 7, 8]).unwrap();
        assert!(observer.is_empty());

        rng.set_seed(&[0, 0, 0, 0]).unwrap();
        let violations = observer.violations_of_kind(ViolationKind::Invariant);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, ViolationSeverity::Critical);
        assert_eq!(violations[0].context["operation"], "set_seed");
    }

    #[test]
    fn test_engines_without_fixed_points_never_report() {
        let observer = Arc::new(CollectingObserver::new());
        let mut rng = Generator::new(Pcg32::seed_from_u64(1)).with_observer(observer.clone());
        rng.set_seed(&[0, 0, 0, 0]).unwrap();
        assert!(observer.is_empty());
    }

    #[test]
    fn test_set_config_reports_and_keeps_previous() {
        let observer = Arc::new(CollectingObserver::new());
        let mut rng = Generator::new(SplitMix64::new(0)).with_observer(observer.clone());
        let bad = GeneratorConfig {
            rejection: RejectionPolicy {
                warn_after: Some(0),
                max_attempts: None,
            },
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            rng.set_config(bad),
            Err(RngError::InvalidArgument { .. })
        ));
        assert_eq!(rng.config(), &GeneratorConfig::default());
        let violations = observer.violations_of_kind(ViolationKind::Configuration);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].context["warn_after"], "Some(0)");

        rng.set_config(GeneratorConfig::quiet()).unwrap();
        assert_eq!(rng.config(), &GeneratorConfig::quiet());
        assert_eq!(observer.len(), 1);
    }

    #[test]
    fn test_debug_hides_observer() {
        let rng = Generator::new(SplitMix64::new(0)).with_observer(Arc::new(CollectingObserver::new()));
        let debug = format!("{:?}", rng);
        assert!(debug.contains("has_violation_observer: true"));
    }
}
