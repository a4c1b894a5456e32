//! Generator configuration.
//!
//! The derived operations are fully determined by the word stream, so configuration only
//! covers ambient behavior: how rejection loops are supervised and which byte order
//! [`Generator::next_bytes_default`](crate::Generator::next_bytes_default) uses.

use crate::bytes::Endianness;
use crate::error::RngError;

/// Default number of consecutive rejections after which a warning is reported.
///
/// Lemire's bounded sampler rejects with probability below 1/2 per draw, so 1024
/// consecutive rejections indicate a broken word source rather than bad luck.
const DEFAULT_WARN_AFTER: u32 = 1024;

/// Attempt cap used by [`RejectionPolicy::strict`].
const STRICT_MAX_ATTEMPTS: u32 = 4096;

/// Supervision policy for rejection-sampling loops.
///
/// Bounded integer sampling and gamma sampling redraw until a candidate is accepted.
/// For a healthy word source the expected number of iterations is tiny, but the loops
/// are unbounded in principle. This policy decides what happens when a loop runs long.
///
/// # Example
///
/// ```
/// use prng_kit::RejectionPolicy;
///
/// // Default: never give up, but warn through telemetry after 1024 redraws.
/// let default = RejectionPolicy::default();
/// assert_eq!(default.warn_after, Some(1024));
/// assert_eq!(default.max_attempts, None);
///
/// // Strict: fail with RejectionLimitExceeded instead of spinning.
/// let strict = RejectionPolicy::strict();
/// assert!(strict.max_attempts.is_some());
/// assert!(strict.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[must_use = "RejectionPolicy has no effect unless placed in a GeneratorConfig"]
pub struct RejectionPolicy {
    /// Number of rejected candidates after which a `Warning` violation of kind
    /// `Rejection` is reported. Reported at most once per call.
    ///
    /// `None` disables the warning.
    ///
    /// Default: `Some(1024)`
    pub warn_after: Option<u32>,
    /// Maximum number of candidates drawn before the call fails with
    /// [`RngError::RejectionLimitExceeded`].
    ///
    /// `None` keeps the loop unbounded.
    ///
    /// Default: `None`
    pub max_attempts: Option<u32>,
}

impl Default for RejectionPolicy {
    fn default() -> Self {
        Self {
            warn_after: Some(DEFAULT_WARN_AFTER),
            max_attempts: None,
        }
    }
}

impl RejectionPolicy {
    /// Creates a new `RejectionPolicy` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unbounded loops with the default warning threshold.
    ///
    /// This is the same as [`RejectionPolicy::default`].
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Unbounded loops with no telemetry at all.
    pub fn quiet() -> Self {
        Self {
            warn_after: None,
            max_attempts: None,
        }
    }

    /// Finite loops: warn after 1024 rejections and fail after 4096 attempts.
    pub fn strict() -> Self {
        Self {
            warn_after: Some(DEFAULT_WARN_AFTER),
            max_attempts: Some(STRICT_MAX_ATTEMPTS),
        }
    }

    /// Validates the policy.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::InvalidArgument`] if either threshold is zero, or if
    /// `warn_after` is not below `max_attempts`.
    pub fn validate(&self) -> Result<(), RngError> {
        if self.warn_after == Some(0) {
            return Err(RngError::invalid("warn_after must be at least 1"));
        }
        if self.max_attempts == Some(0) {
            return Err(RngError::invalid("max_attempts must be at least 1"));
        }
        if let (Some(warn), Some(max)) = (self.warn_after, self.max_attempts) {
            if warn >= max {
                return Err(RngError::invalid(format!(
                    "warn_after ({}) must be below max_attempts ({})",
                    warn, max
                )));
            }
        }
        Ok(())
    }
}

/// Configuration carried by a [`Generator`](crate::Generator).
///
/// # Example
///
/// ```
/// use prng_kit::{Endianness, GeneratorConfig, RejectionPolicy};
///
/// let config = GeneratorConfig {
///     rejection: RejectionPolicy::strict(),
///     ..GeneratorConfig::default()
/// };
/// assert_eq!(config.default_endianness, Endianness::Little);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[must_use = "GeneratorConfig has no effect unless passed to Generator::with_config()"]
pub struct GeneratorConfig {
    /// Supervision of rejection-sampling loops.
    pub rejection: RejectionPolicy,
    /// Byte order used by the byte-extraction helpers that take no explicit order.
    ///
    /// Default: [`Endianness::Little`]
    pub default_endianness: Endianness,
}

impl GeneratorConfig {
    /// Creates a new `GeneratorConfig` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration preset that fails instead of spinning in rejection loops.
    pub fn strict() -> Self {
        Self {
            rejection: RejectionPolicy::strict(),
            ..Self::default()
        }
    }

    /// Configuration preset that emits no rejection telemetry.
    pub fn quiet() -> Self {
        Self {
            rejection: RejectionPolicy::quiet(),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::InvalidArgument`] if the rejection policy is invalid.
    pub fn validate(&self) -> Result<(), RngError> {
        self.rejection.validate()
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
    fn test_presets_validate() {
        assert!(RejectionPolicy::default().validate().is_ok());
        assert!(RejectionPolicy::unbounded().validate().is_ok());
        assert!(RejectionPolicy::quiet().validate().is_ok());
        assert!(RejectionPolicy::strict().validate().is_ok());
        assert!(GeneratorConfig::strict().validate().is_ok());
        assert!(GeneratorConfig::quiet().validate().is_ok());
    }

    #[test]
    fn test_unbounded_is_default() {
        assert_eq!(RejectionPolicy::unbounded(), RejectionPolicy::default());
        assert_eq!(RejectionPolicy::new(), RejectionPolicy::default());
    }

    #[test]
    fn test_zero_thresholds_rejected() {
        let zero_warn = RejectionPolicy {
            warn_after: Some(0),
            max_attempts: None,
        };
        assert!(matches!(
            zero_warn.validate(),
            Err(RngError::InvalidArgument { .. })
        ));

        let zero_max = RejectionPolicy {
            warn_after: None,
            max_attempts: Some(0),
        };
        assert!(zero_max.validate().is_err());
    }

    #[test]
    fn test_warn_after_must_be_below_max() {
        let inverted = RejectionPolicy {
            warn_after: Some(10),
            max_attempts: Some(10),
        };
        let err = inverted.validate().unwrap_err();
        assert!(err.to_string().contains("warn_after (10)"));
    }

    #[test]
    fn test_config_serde_roundtrip_preserves_policy() {
        let config = GeneratorConfig {
            rejection: RejectionPolicy::strict(),
            default_endianness: Endianness::Big,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: GeneratorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
