//! Structured telemetry for contract violations and anomalies.
//!
//! Derived operations never log through ad-hoc `tracing::warn!` calls. Instead they build a
//! [`Violation`] and hand it to a [`ViolationObserver`]; the default observer forwards to
//! `tracing`, while tests install a [`CollectingObserver`] to assert on what happened.
//!
//! Violations are reported for:
//!
//! - rejection loops that run far longer than their expected iteration count
//! - reseed attempts that fail to read OS entropy
//! - degenerate seeds (for example an all-zero xoshiro state)
//!
//! # Example
//!
//! ```
//! use prng_kit::telemetry::{CollectingObserver, ViolationKind};
//! use std::sync::Arc;
//!
//! let observer = Arc::new(CollectingObserver::new());
//! assert!(observer.violations().is_empty(), "unexpected violations");
//! assert!(!observer.has_violation(ViolationKind::Rejection));
//! ```

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Severity of a violation.
///
/// Severities are ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    /// Unexpected but recoverable; the operation continued.
    Warning,
    /// The operation failed or produced degraded output.
    Error,
    /// An internal invariant is broken and generator state may be unusable.
    Critical,
}

impl ViolationSeverity {
    /// Returns a string representation suitable for logging/metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories of violations.
///
/// # Forward Compatibility
///
/// This enum is marked `#[non_exhaustive]`. Always include a wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ViolationKind {
    /// Seeding or reseeding problem.
    ///
    /// Examples:
    /// - OS entropy facility unavailable
    /// - Seed that leaves the engine in a degenerate fixed point
    Seeding,
    /// A rejection loop (bounded sampling, gamma sampling) ran unusually long
    /// or hit its configured attempt cap.
    Rejection,
    /// A `GeneratorConfig` failed validation in `Generator::with_config` or
    /// `Generator::set_config`.
    Configuration,
    /// Runtime invariant check failed.
    ///
    /// Seeding through a `Generator` or `reseed` always checks; engine constructors
    /// only check in debug builds or when the `paranoid` feature is enabled.
    Invariant,
}

impl ViolationKind {
    /// Returns a string representation suitable for logging/metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Rejection => "rejection",
            Self::Configuration => "configuration",
            Self::Invariant => "invariant",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded violation.
///
/// # Example
///
/// ```
/// use prng_kit::telemetry::{Violation, ViolationKind, ViolationSeverity};
///
/// let violation = Violation::new(
///     ViolationSeverity::Warning,
///     ViolationKind::Rejection,
///     "bounded_u64 rejected 1024 draws",
///     "bounded.rs:42",
/// )
/// .with_algorithm("SplitMix64")
/// .with_context("range", "3");
///
/// assert_eq!(violation.algorithm, Some("SplitMix64"));
/// assert_eq!(violation.context.get("range").map(String::as_str), Some("3"));
/// ```
#[derive(Debug, Clone, serde::Serialize)]
pub struct Violation {
    /// The severity level of this violation.
    pub severity: ViolationSeverity,
    /// The category of the violation.
    pub kind: ViolationKind,
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Source location where the violation was detected (file:line).
    pub location: &'static str,
    /// The engine algorithm name, if the violation is tied to one.
    pub algorithm: Option<&'static str>,
    /// Additional structured context as key-value pairs.
    pub context: BTreeMap<String, String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        severity: ViolationSeverity,
        kind: ViolationKind,
        message: impl Into<String>,
        location: &'static str,
    ) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            location,
            algorithm: None,
            context: BTreeMap::new(),
        }
    }

    /// Tags the violation with the engine that produced it.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: &'static str) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Adds a context key-value pair.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Serializes this violation to a JSON string.
    ///
    /// Returns `None` if serialization fails.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Serializes this violation to a pretty-printed JSON string.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json_pretty(&self) -> Option<String> {
        serde_json::to_string_pretty(self).ok()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}/{}] {} (at {}",
            self.severity, self.kind, self.message, self.location
        )?;
        if let Some(algorithm) = self.algorithm {
            write!(f, ", algorithm={algorithm}")?;
        }
        if !self.context.is_empty() {
            write!(f, ", context={:?}", self.context)?;
        }
        write!(f, ")")
    }
}

/// Trait for observing violations.
///
/// When the `sync-send` feature is enabled, observers must be `Send + Sync`
/// so a generator carrying one can move across threads.
///
/// # Example
///
/// ```
/// use prng_kit::telemetry::{Violation, ViolationObserver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct CountingObserver(AtomicUsize);
///
/// impl ViolationObserver for CountingObserver {
///     fn on_violation(&self, _violation: &Violation) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
#[cfg(feature = "sync-send")]
pub trait ViolationObserver: Send + Sync {
    /// Called when a violation is detected.
    ///
    /// This may run inside a sampling loop, so keep it cheap.
    fn on_violation(&self, violation: &Violation);
}

#[cfg(not(feature = "sync-send"))]
/// Trait for observing violations.
pub trait ViolationObserver {
    /// Called when a violation is detected.
    fn on_violation(&self, violation: &Violation);
}

/// Built-in observer that logs violations via the `tracing` crate.
///
/// - `Warning` severity → `tracing::warn!`
/// - `Error` and `Critical` severity → `tracing::error!`
///
/// All fields are emitted as structured tracing fields.
#[derive(Debug, Default, Clone)]
pub struct TracingObserver;

impl TracingObserver {
    /// Creates a new tracing observer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn format_context(context: &BTreeMap<String, String>) -> String {
        if context.is_empty() {
            return "{}".to_owned();
        }
        let pairs: Vec<String> = context.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{{{}}}", pairs.join(", "))
    }
}

impl ViolationObserver for TracingObserver {
    fn on_violation(&self, violation: &Violation) {
        let severity = violation.severity.as_str();
        let kind = violation.kind.as_str();
        let location = violation.location;
        let algorithm = violation.algorithm.unwrap_or("none");
        let context_str = Self::format_context(&violation.context);

        match violation.severity {
            ViolationSeverity::Warning => {
                tracing::warn!(
                    severity,
                    kind,
                    location,
                    algorithm,
                    context = %context_str,
                    "{}",
                    violation.message
                );
            },
            ViolationSeverity::Error | ViolationSeverity::Critical => {
                tracing::error!(
                    severity,
                    kind,
                    location,
                    algorithm,
                    context = %context_str,
                    "{}",
                    violation.message
                );
            },
        }
    }
}

/// Built-in observer that collects violations for testing.
///
/// # Example
///
/// ```
/// use prng_kit::telemetry::{
///     CollectingObserver, Violation, ViolationKind, ViolationObserver, ViolationSeverity,
/// };
///
/// let observer = CollectingObserver::new();
/// observer.on_violation(&Violation::new(
///     ViolationSeverity::Warning,
///     ViolationKind::Seeding,
///     "all-zero seed",
///     "test.rs:1",
/// ));
///
/// assert_eq!(observer.len(), 1);
/// assert!(observer.has_violation(ViolationKind::Seeding));
/// ```
#[derive(Debug, Default)]
pub struct CollectingObserver {
    violations: Mutex<Vec<Violation>>,
}

impl CollectingObserver {
    /// Creates a new collecting observer with an empty violation list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            violations: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of all collected violations.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        self.violations.lock().clone()
    }

    /// Returns the number of collected violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.lock().len()
    }

    /// Returns true if no violations have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.lock().is_empty()
    }

    /// Checks if any violation of the specified kind has been collected.
    #[must_use]
    pub fn has_violation(&self, kind: ViolationKind) -> bool {
        self.violations.lock().iter().any(|v| v.kind == kind)
    }

    /// Checks if any violation with the specified severity has been collected.
    #[must_use]
    pub fn has_severity(&self, severity: ViolationSeverity) -> bool {
        self.violations
            .lock()
            .iter()
            .any(|v| v.severity == severity)
    }

    /// Returns all violations matching the specified kind.
    #[must_use]
    pub fn violations_of_kind(&self, kind: ViolationKind) -> Vec<Violation> {
        self.violations
            .lock()
            .iter()
            .filter(|v| v.kind == kind)
            .cloned()
            .collect()
    }

    /// Clears all collected violations.
    pub fn clear(&self) {
        self.violations.lock().clear();
    }
}

impl ViolationObserver for CollectingObserver {
    fn on_violation(&self, violation: &Violation) {
        self.violations.lock().push(violation.clone());
    }
}

/// Reports a violation to an optional observer, falling back to [`TracingObserver`] if `None`.
pub fn report_to_observer(observer: Option<&dyn ViolationObserver>, violation: &Violation) {
    match observer {
        Some(obs) => obs.on_violation(violation),
        None => TracingObserver.on_violation(violation),
    }
}

/// Convenience for handing an `Option<Arc<dyn ViolationObserver>>` to [`report_to_observer`].
#[must_use]
pub fn observer_ref(observer: &Option<Arc<dyn ViolationObserver>>) -> Option<&dyn ViolationObserver> {
    observer.as_deref()
}

/// Reports a violation with file/line tracking to the default [`TracingObserver`].
///
/// ```
/// use prng_kit::{report_violation, telemetry::{ViolationKind, ViolationSeverity}};
///
/// report_violation!(ViolationSeverity::Warning, ViolationKind::Configuration,
///     "warn_after={} exceeds max_attempts={}", 10, 5);
/// ```
#[macro_export]
macro_rules! report_violation {
    ($severity:expr, $kind:expr, $msg:literal) => {{
        use $crate::telemetry::ViolationObserver as _;
        let violation = $crate::telemetry::Violation::new(
            $severity,
            $kind,
            $msg,
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::TracingObserver.on_violation(&violation);
    }};

    ($severity:expr, $kind:expr, $fmt:literal, $($arg:tt)+) => {{
        use $crate::telemetry::ViolationObserver as _;
        let violation = $crate::telemetry::Violation::new(
            $severity,
            $kind,
            format!($fmt, $($arg)+),
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::TracingObserver.on_violation(&violation);
    }};
}

/// Reports a violation through an `Option<&dyn ViolationObserver>`, falling back to tracing.
///
/// ```
/// use prng_kit::{report_violation_to, telemetry::{CollectingObserver, ViolationKind, ViolationObserver, ViolationSeverity}};
///
/// let collector = CollectingObserver::new();
/// let observer: Option<&dyn ViolationObserver> = Some(&collector);
///
/// report_violation_to!(observer, ViolationSeverity::Warning, ViolationKind::Rejection,
///     "{} rejected {} draws", "bounded_u32", 1024);
/// assert_eq!(collector.len(), 1);
/// ```
#[macro_export]
macro_rules! report_violation_to {
    ($observer:expr, $severity:expr, $kind:expr, $msg:literal) => {{
        let violation = $crate::telemetry::Violation::new(
            $severity,
            $kind,
            $msg,
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::report_to_observer($observer, &violation);
    }};

    ($observer:expr, $severity:expr, $kind:expr, $fmt:literal, $($arg:tt)+) => {{
        let violation = $crate::telemetry::Violation::new(
            $severity,
            $kind,
            format!($fmt, $($arg)+),
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::report_to_observer($observer, &violation);
    }};
}

/// Asserts that no violations have been collected.
#[macro_export]
macro_rules! assert_no_violations {
    ($observer:expr) => {{
        let violations = $observer.violations();
        assert!(
            violations.is_empty(),
            "Expected no violations, but found {}:\n{:#?}",
            violations.len(),
            violations
        );
    }};
}

/// Asserts that a violation of the specified kind was collected.
#[macro_export]
macro_rules! assert_violation {
    ($observer:expr, $kind:expr) => {{
        assert!(
            $observer.has_violation($kind),
            "Expected violation of kind {:?}, but found: {:#?}",
            $kind,
            $observer.violations()
        );
    }};
}

// ==========================================
// Runtime Invariant Checking
// ==========================================

/// Result of an invariant check.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InvariantViolation {
    /// Name of the type whose invariant was violated.
    pub type_name: &'static str,
    /// Description of the violated invariant.
    pub invariant: String,
    /// Additional diagnostic context.
    pub details: Option<String>,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    #[must_use]
    pub fn new(type_name: &'static str, invariant: impl Into<String>) -> Self {
        Self {
            type_name,
            invariant: invariant.into(),
            details: None,
        }
    }

    /// Adds additional details to the violation.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.type_name, self.invariant)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Trait for types that maintain internal invariants.
///
/// Engines implement this to flag degenerate states (for example an all-zero
/// xoshiro state, which is a fixed point of the recurrence).
pub trait InvariantChecker {
    /// Returns `Ok(())` if all invariants hold, or the first broken invariant.
    fn check_invariants(&self) -> Result<(), InvariantViolation>;
}

/// Checks invariants in debug builds (or with the `paranoid` feature) and reports
/// failures as `Critical` violations.
#[macro_export]
#[cfg(any(debug_assertions, feature = "paranoid"))]
macro_rules! debug_check_invariants {
    ($expr:expr, $context:expr) => {{
        use $crate::telemetry::InvariantChecker as _;
        if let Err(violation) = $expr.check_invariants() {
            $crate::report_violation!(
                $crate::telemetry::ViolationSeverity::Critical,
                $crate::telemetry::ViolationKind::Invariant,
                "{} [context: {}]",
                violation,
                $context
            );
        }
    }};
}

/// No-op version for release builds without `paranoid` feature.
#[macro_export]
#[cfg(not(any(debug_assertions, feature = "paranoid")))]
macro_rules! debug_check_invariants {
    ($expr:expr, $context:expr) => {{}};
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

    fn sample_violation(kind: ViolationKind, severity: ViolationSeverity) -> Violation {
        Violation::new(severity, kind, "test", "test.rs:1")
    }

    #[test]
    fn test_violation_severity_ordering() {
        assert!(ViolationSeverity::Warning < ViolationSeverity::Error);
        assert!(ViolationSeverity::Error < ViolationSeverity::Critical);
    }

    #[test]
    fn test_violation_kind_as_str() {
        assert_eq!(ViolationKind::Seeding.as_str(), "seeding");
        assert_eq!(ViolationKind::Rejection.as_str(), "rejection");
        assert_eq!(ViolationKind::Configuration.as_str(), "configuration");
        assert_eq!(ViolationKind::Invariant.as_str(), "invariant");
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::new(
            ViolationSeverity::Error,
            ViolationKind::Seeding,
            "entropy read failed",
            "test.rs:10",
        )
        .with_algorithm("Xoshiro 256**");

        let display = violation.to_string();
        assert!(display.contains("error"));
        assert!(display.contains("seeding"));
        assert!(display.contains("entropy read failed"));
        assert!(display.contains("algorithm=Xoshiro 256**"));
    }

    #[test]
    fn test_collecting_observer_filters() {
        let observer = CollectingObserver::new();
        assert!(observer.is_empty());

        observer.on_violation(&sample_violation(
            ViolationKind::Rejection,
            ViolationSeverity::Warning,
        ));
        observer.on_violation(&sample_violation(
            ViolationKind::Seeding,
            ViolationSeverity::Error,
        ));
        observer.on_violation(&sample_violation(
            ViolationKind::Rejection,
            ViolationSeverity::Error,
        ));

        assert_eq!(observer.len(), 3);
        assert_eq!(
            observer.violations_of_kind(ViolationKind::Rejection).len(),
            2
        );
        assert!(observer.has_severity(ViolationSeverity::Error));
        assert!(!observer.has_severity(ViolationSeverity::Critical));

        observer.clear();
        assert!(observer.is_empty());
    }

    #[test]
    fn test_report_to_observer_with_some() {
        let observer = CollectingObserver::new();
        report_to_observer(
            Some(&observer),
            &sample_violation(ViolationKind::Configuration, ViolationSeverity::Warning),
        );
        assert_eq!(observer.len(), 1);
    }

    #[test]
    fn test_report_to_observer_with_none_does_not_panic() {
        report_to_observer(
            None,
            &sample_violation(ViolationKind::Configuration, ViolationSeverity::Warning),
        );
    }

    #[test]
    fn test_report_violation_to_macro_with_format() {
        let collector = CollectingObserver::new();
        let observer: Option<&dyn ViolationObserver> = Some(&collector);
        report_violation_to!(
            observer,
            ViolationSeverity::Warning,
            ViolationKind::Rejection,
            "{} rejected {} draws",
            "next_gamma",
            99
        );
        let violations = collector.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "next_gamma rejected 99 draws");
        assert!(violations[0].location.contains("telemetry.rs"));
    }

    #[test]
    fn test_observer_ref_from_arc() {
        let collector = Arc::new(CollectingObserver::new());
        let stored: Option<Arc<dyn ViolationObserver>> = Some(collector.clone());
        report_to_observer(
            observer_ref(&stored),
            &sample_violation(ViolationKind::Invariant, ViolationSeverity::Critical),
        );
        assert_violation!(collector, ViolationKind::Invariant);
    }

    #[test]
    fn test_invariant_violation_display_with_details() {
        let violation = InvariantViolation::new("Xoshiro256StarStar", "state must not be all zero")
            .with_details("seed=[0, 0, 0, 0]");
        assert_eq!(
            violation.to_string(),
            "Xoshiro256StarStar: state must not be all zero (seed=[0, 0, 0, 0])"
        );
    }

    #[test]
    fn test_violation_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ViolationKind::Rejection).unwrap(),
            r#""rejection""#
        );
        assert_eq!(
            serde_json::to_string(&ViolationSeverity::Critical).unwrap(),
            r#""critical""#
        );
    }

    #[test]
    fn test_violation_json_contains_fields() {
        let violation = sample_violation(ViolationKind::Seeding, ViolationSeverity::Error)
            .with_algorithm("SplitMix64")
            .with_context("required", "1");
        let json = serde_json::to_string(&violation).unwrap();
        assert!(json.contains(r#""kind":"seeding""#));
        assert!(json.contains(r#""algorithm":"SplitMix64""#));
        assert!(json.contains(r#""required":"1""#));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_to_json_pretty_is_multiline() {
        let violation = sample_violation(ViolationKind::Rejection, ViolationSeverity::Warning);
        let pretty = violation.to_json_pretty().unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&pretty).unwrap(),
            serde_json::from_str::<serde_json::Value>(&violation.to_json().unwrap()).unwrap()
        );
    }
}
