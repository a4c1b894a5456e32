//! Common test infrastructure shared across integration tests.
//!
//! - `stats`: chi-square and Kolmogorov-Smirnov helpers for distribution checks
//! - `init_tracing`: installs a `tracing-subscriber` writer captured by the test harness
//!
//! # Usage
//!
//! ```ignore
//! #[path = "common/mod.rs"]
//! mod common;
//! use common::stats::{chi_square, chi_square_limit};
//! ```

pub mod stats;

/// Installs a test-captured `tracing` subscriber once per test binary.
///
/// Safe to call from every test; later calls are no-ops.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Number of draws used by the statistical integration tests.
#[allow(dead_code)]
pub const SAMPLE_SIZE: usize = 100_000;
