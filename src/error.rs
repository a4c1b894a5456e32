use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// This enum contains all error messages this library can return. Most fallible API functions
/// return a [`Result<T, RngError>`].
///
/// Validation is fail-fast: argument errors are returned before the generator state is touched,
/// so a failed call never consumes entropy.
///
/// [`Result<T, RngError>`]: std::result::Result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RngError {
    /// A parameter was outside its documented domain: an empty range, an empty collection,
    /// a selection count outside `[1, n]`, or an invalid distribution parameter.
    InvalidArgument {
        /// Further specifies why the argument was invalid.
        info: String,
    },
    /// An explicit seed slice was shorter than the engine's state.
    InsufficientSeedMaterial {
        /// The number of state words the engine requires.
        required: usize,
        /// The number of seed words that were supplied.
        provided: usize,
    },
    /// The operating system entropy facility could not be read during a reseed.
    ///
    /// The generator state is left untouched; there is no fallback to a weaker seed.
    EntropyUnavailable {
        /// A description of the underlying OS failure.
        context: String,
    },
    /// A rejection loop exceeded the attempt cap configured in [`RejectionPolicy`].
    ///
    /// Never returned with the default (unbounded) policy.
    ///
    /// [`RejectionPolicy`]: crate::RejectionPolicy
    RejectionLimitExceeded {
        /// The operation whose rejection loop gave up.
        operation: &'static str,
        /// The number of attempts made before giving up.
        attempts: u32,
    },
    /// An async operation was cancelled before it was dispatched.
    Cancelled,
    /// A worker task running an async operation panicked or was aborted.
    TaskFailed {
        /// A description of the task failure.
        context: String,
    },
}

impl RngError {
    /// Convenience constructor for [`RngError::InvalidArgument`].
    pub(crate) fn invalid(info: impl Into<String>) -> Self {
        Self::InvalidArgument { info: info.into() }
    }
}

impl Display for RngError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RngError::InvalidArgument { info } => {
                write!(f, "Invalid argument: {}", info)
            }
            RngError::InsufficientSeedMaterial { required, provided } => {
                write!(
                    f,
                    "Insufficient seed material: engine needs {} state words, got {}",
                    required, provided
                )
            }
            RngError::EntropyUnavailable { context } => {
                write!(f, "OS entropy source unavailable: {}", context)
            }
            RngError::RejectionLimitExceeded {
                operation,
                attempts,
            } => {
                write!(
                    f,
                    "Rejection loop in {} gave up after {} attempts",
                    operation, attempts
                )
            }
            RngError::Cancelled => {
                write!(f, "The operation was cancelled before dispatch.")
            }
            RngError::TaskFailed { context } => {
                write!(f, "Worker task failed: {}", context)
            }
        }
    }
}

impl Error for RngError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_argument() {
        let err = RngError::invalid("lower bound 5 must be below upper bound 5");
        assert_eq!(
            err.to_string(),
            "Invalid argument: lower bound 5 must be below upper bound 5"
        );
    }

    #[test]
    fn test_display_insufficient_seed_material() {
        let err = RngError::InsufficientSeedMaterial {
            required: 4,
            provided: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("4 state words"));
        assert!(msg.contains("got 2"));
    }

    #[test]
    fn test_display_rejection_limit() {
        let err = RngError::RejectionLimitExceeded {
            operation: "next_gamma",
            attempts: 64,
        };
        assert_eq!(
            err.to_string(),
            "Rejection loop in next_gamma gave up after 64 attempts"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&RngError::Cancelled);
    }
}
