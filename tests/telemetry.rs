//! Telemetry wiring between generators and violation observers.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

#[path = "common/mod.rs"]
mod common;

use std::sync::Arc;

use prng_kit::engines::{RomuDuoJr, SeedableRng, SplitMix64, WyRng, Xoshiro256Plus};
use prng_kit::telemetry::{CollectingObserver, ViolationKind, ViolationSeverity};
use prng_kit::{
    assert_no_violations, assert_violation, Generator, GeneratorConfig, RejectionPolicy,
    RngError, WordSource,
};

/// A broken engine that always returns zero, forcing every bounded draw to reject.
#[derive(Debug, Clone)]
struct StuckAtZero;

impl WordSource for StuckAtZero {
    type Word = u64;
    const STATE_WORDS: usize = 1;

    fn algorithm_name(&self) -> &'static str {
        "StuckAtZero"
    }

    fn next_word(&mut self) -> u64 {
        0
    }

    fn set_seed(&mut self, _seed: &[u64]) -> Result<(), RngError> {
        Ok(())
    }

    fn clear(&mut self) {}
}

#[test]
fn test_healthy_generator_reports_nothing() {
    common::init_tracing();
    let observer = Arc::new(CollectingObserver::new());
    let mut rng = Generator::new(WyRng::seed_from_u64(1)).with_observer(observer.clone());
    for _ in 0..10_000 {
        let _ = rng.bounded_u32(0, 7).unwrap();
        let _ = rng.next_gamma(0.5, 1.0).unwrap();
    }
    rng.reseed().unwrap();
    assert_no_violations!(observer);
}

#[test]
fn test_stuck_source_warns_then_fails() {
    common::init_tracing();
    let observer = Arc::new(CollectingObserver::new());
    let config = GeneratorConfig {
        rejection: RejectionPolicy {
            warn_after: Some(8),
            max_attempts: Some(32),
        },
        ..GeneratorConfig::default()
    };
    let mut rng = Generator::with_config(StuckAtZero, config)
        .unwrap()
        .with_observer(observer.clone());

    assert_eq!(
        rng.bounded_u64(0, 3),
        Err(RngError::RejectionLimitExceeded {
            operation: "bounded_u64",
            attempts: 32
        })
    );
    assert_violation!(observer, ViolationKind::Rejection);
    assert!(observer.has_severity(ViolationSeverity::Warning));
    assert_eq!(observer.violations_of_kind(ViolationKind::Rejection).len(), 1);
}

#[test]
fn test_quiet_config_is_silent() {
    let observer = Arc::new(CollectingObserver::new());
    let config = GeneratorConfig {
        rejection: RejectionPolicy {
            max_attempts: Some(5000),
            ..RejectionPolicy::quiet()
        },
        ..GeneratorConfig::default()
    };
    let mut rng = Generator::with_config(StuckAtZero, config)
        .unwrap()
        .with_observer(observer.clone());
    assert!(rng.bounded_u32(0, 3).is_err());
    assert_no_violations!(observer);
}

#[test]
fn test_generator_exposes_observer() {
    let rng = Generator::new(SplitMix64::new(0));
    assert!(rng.violation_observer().is_none());
    let rng = rng.with_observer(Arc::new(CollectingObserver::new()));
    assert!(rng.violation_observer().is_some());
}

#[test]
fn test_degenerate_seed_reaches_attached_observer() {
    common::init_tracing();
    let observer = Arc::new(CollectingObserver::new());
    let mut rng = Generator::new(Xoshiro256Plus::seed_from_u64(3)).with_observer(observer.clone());
    rng.set_seed(&[0, 0, 0, 0]).unwrap();
    assert_violation!(observer, ViolationKind::Invariant);
    assert!(observer.has_severity(ViolationSeverity::Critical));
    assert_eq!(observer.violations()[0].algorithm, Some("Xoshiro 256+"));

    let observer = Arc::new(CollectingObserver::new());
    let mut rng = Generator::new(RomuDuoJr::seed_from_u64(3)).with_observer(observer.clone());
    rng.set_seed(&[0, 0]).unwrap();
    assert_eq!(observer.violations_of_kind(ViolationKind::Invariant).len(), 1);
}

#[test]
fn test_bad_config_reaches_attached_observer() {
    let observer = Arc::new(CollectingObserver::new());
    let mut rng = Generator::new(WyRng::seed_from_u64(4)).with_observer(observer.clone());
    let config = GeneratorConfig {
        rejection: RejectionPolicy {
            warn_after: Some(64),
            max_attempts: Some(64),
        },
        ..GeneratorConfig::default()
    };
    assert!(rng.set_config(config).is_err());
    assert_violation!(observer, ViolationKind::Configuration);
}

#[cfg(feature = "json")]
#[test]
fn test_rejection_violation_serializes() {
    let observer = Arc::new(CollectingObserver::new());
    let config = GeneratorConfig {
        rejection: RejectionPolicy {
            warn_after: Some(1),
            max_attempts: Some(2),
        },
        ..GeneratorConfig::default()
    };
    let mut rng = Generator::with_config(StuckAtZero, config)
        .unwrap()
        .with_observer(observer.clone());
    let _ = rng.bounded_u32(0, 3);
    let json = observer.violations()[0].to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["kind"], "rejection");
    assert_eq!(value["context"]["operation"], "bounded_u32");
}
