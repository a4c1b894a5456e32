//! Supervision of rejection-sampling loops.
//!
//! Every loop that redraws until a candidate is accepted runs through a
//! [`RejectionTracker`], which applies the configured [`RejectionPolicy`].

use crate::config::RejectionPolicy;
use crate::error::RngError;
use crate::telemetry::{report_to_observer, Violation, ViolationKind, ViolationObserver, ViolationSeverity};

/// Policy and telemetry sink for one derived operation.
///
/// `Generator` builds one of these per call from its config. Callers of the free
/// functions in [`bounded`](crate::bounded) can use [`RejectionContext::default`],
/// which keeps loops unbounded and reports through `tracing`.
#[derive(Clone, Copy, Default)]
pub struct RejectionContext<'a> {
    /// The policy applied to each loop.
    pub policy: RejectionPolicy,
    /// Where warnings go. `None` falls back to [`TracingObserver`](crate::telemetry::TracingObserver).
    pub observer: Option<&'a dyn ViolationObserver>,
}

impl std::fmt::Debug for RejectionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RejectionContext")
            .field("policy", &self.policy)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl<'a> RejectionContext<'a> {
    /// Creates a context with the given policy and observer.
    #[must_use]
    pub fn new(policy: RejectionPolicy, observer: Option<&'a dyn ViolationObserver>) -> Self {
        Self { policy, observer }
    }

    /// Starts tracking a loop for `operation`.
    #[must_use]
    pub(crate) fn track(&self, operation: &'static str) -> RejectionTracker<'_, 'a> {
        RejectionTracker {
            context: self,
            operation,
            rejected: 0,
        }
    }
}

/// Counts rejected candidates for a single loop.
pub(crate) struct RejectionTracker<'c, 'a> {
    context: &'c RejectionContext<'a>,
    operation: &'static str,
    rejected: u32,
}

impl RejectionTracker<'_, '_> {
    /// Records one rejected candidate.
    ///
    /// Reports a warning the first time the count reaches `warn_after` and fails once
    /// it reaches `max_attempts`.
    pub(crate) fn reject(&mut self) -> Result<(), RngError> {
        self.rejected = self.rejected.saturating_add(1);
        let policy = &self.context.policy;

        if policy.warn_after == Some(self.rejected) {
            let violation = Violation::new(
                ViolationSeverity::Warning,
                ViolationKind::Rejection,
                format!(
                    "{} rejected {} consecutive candidates",
                    self.operation, self.rejected
                ),
                concat!(file!(), ":", line!()),
            )
            .with_context("operation", self.operation);
            report_to_observer(self.context.observer, &violation);
        }

        if let Some(max) = policy.max_attempts {
            if self.rejected >= max {
                return Err(RngError::RejectionLimitExceeded {
                    operation: self.operation,
                    attempts: self.rejected,
                });
            }
        }
        Ok(())
    }

    /// Number of candidates rejected so far.
    #[cfg(test)]
    pub(crate) fn rejected(&self) -> u32 {
        self.rejected
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
    use crate::telemetry::CollectingObserver;

    #[test]
    fn test_warns_once_at_threshold() {
        let observer = CollectingObserver::new();
        let context = RejectionContext::new(
            RejectionPolicy {
                warn_after: Some(3),
                max_attempts: None,
            },
            Some(&observer),
        );
        let mut tracker = context.track("bounded_u32");
        for _ in 0..10 {
            tracker.reject().unwrap();
        }
        assert_eq!(tracker.rejected(), 10);
        assert_eq!(observer.len(), 1);
        let violation = &observer.violations()[0];
        assert_eq!(violation.kind, ViolationKind::Rejection);
        assert_eq!(violation.severity, ViolationSeverity::Warning);
        assert_eq!(
            violation.context.get("operation").map(String::as_str),
            Some("bounded_u32")
        );
    }

    #[test]
    fn test_fails_at_cap() {
        let context = RejectionContext::new(
            RejectionPolicy {
                warn_after: None,
                max_attempts: Some(4),
            },
            None,
        );
        let mut tracker = context.track("next_gamma");
        for _ in 0..3 {
            tracker.reject().unwrap();
        }
        assert_eq!(
            tracker.reject(),
            Err(RngError::RejectionLimitExceeded {
                operation: "next_gamma",
                attempts: 4
            })
        );
    }

    #[test]
    fn test_quiet_policy_reports_nothing() {
        let observer = CollectingObserver::new();
        let context = RejectionContext::new(RejectionPolicy::quiet(), Some(&observer));
        let mut tracker = context.track("bounded_u64");
        for _ in 0..5000 {
            tracker.reject().unwrap();
        }
        assert!(observer.is_empty());
    }
}
