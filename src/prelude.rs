//! Convenient re-exports for common usage.
//!
//! ```rust
//! use prng_kit::prelude::*;
//!
//! let mut rng = Generator::new(Xoshiro256PlusPlus::seed_from_u64(1));
//! let coin = rng.next_bool();
//! # let _ = coin;
//! ```
//!
//! # What's Included
//!
//! - **Facade**: [`Generator`], [`GeneratorConfig`], [`RejectionPolicy`]
//! - **Traits**: [`WordSource`], [`SeedableRng`]
//! - **Common engines**: [`Pcg32`], [`SplitMix64`], [`Xoshiro256PlusPlus`],
//!   [`Xoshiro256StarStar`], [`Sfc64`], [`WyRng`]
//! - **Errors**: [`RngError`]
//! - **Byte order**: [`Endianness`]

pub use crate::bytes::Endianness;
pub use crate::config::{GeneratorConfig, RejectionPolicy};
pub use crate::engines::{
    Pcg32, SeedableRng, Sfc64, SplitMix64, WyRng, Xoshiro256PlusPlus, Xoshiro256StarStar,
};
pub use crate::error::RngError;
pub use crate::generator::Generator;
pub use crate::source::WordSource;

#[cfg(feature = "tokio")]
pub use crate::async_ops::{CancellationFlag, SharedGenerator};
