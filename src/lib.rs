//! # prng-kit
//!
//! Interchangeable, non-cryptographic pseudo-random engines behind one small trait,
//! with a shared derived layer on top:
//!
//! - **Engines** ([`engines`]): SplitMix64, xoshiro256 and xoroshiro128 (`+`, `++`, `**`),
//!   PCG32, SFC, JSF, Romu and wyrand. Each implements [`WordSource`].
//! - **Bounded integers** ([`bounded`]): unbiased `[lower, upper)` sampling with Lemire's
//!   nearly-divisionless method.
//! - **Bytes** ([`bytes`]): fill buffers in little, big or native byte order.
//! - **Sequences** ([`seq`]): choice, choose-with-replacement, reservoir sampling and
//!   Fisher-Yates shuffling.
//! - **Distributions** ([`distributions`]): uniform doubles, Box-Muller Gaussians with a
//!   cached spare, and Gamma variates.
//!
//! [`Generator`] bundles one engine with all of the above. None of it is suitable for
//! cryptography, including after [`Generator::reseed`].
//!
//! ```
//! use prng_kit::engines::{Pcg32, SeedableRng};
//! use prng_kit::{Endianness, Generator};
//!
//! let mut rng = Generator::new(Pcg32::seed_from_u64(7));
//! let index = rng.bounded_usize(0, 10)?;
//! let bytes = rng.next_bytes(6, Endianness::Big)?;
//! let noise = rng.next_gaussian(0.0, 0.5)?;
//! # let _ = (index, bytes, noise);
//! # Ok::<(), prng_kit::RngError>(())
//! ```
//!
//! # Features
//!
//! - `sync-send`: require `Send + Sync` on violation observers.
//! - `tokio`: task-based wrappers for the sequence operations (`SharedGenerator`).
//! - `json`: JSON output for telemetry violations.
//! - `paranoid`: keep engine invariant checks in release builds.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use bytes::Endianness;
pub use config::{GeneratorConfig, RejectionPolicy};
pub use distributions::DistributionSampler;
pub use error::RngError;
pub use generator::Generator;
pub use rejection::RejectionContext;
pub use source::{Word, WordSource};

#[cfg(feature = "tokio")]
pub use async_ops::{CancellationFlag, SharedGenerator};

#[cfg(feature = "tokio")]
mod async_ops;
pub mod bounded;
pub mod bytes;
mod config;
pub mod distributions;
pub mod engines;
mod error;
mod generator;
pub mod prelude;
mod rejection;
pub mod seq;
mod source;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_config;
