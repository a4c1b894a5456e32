//! Fuzz target for generator configuration.
//!
//! # Safety Properties Tested
//! - Arbitrary rejection policies validate or fail without panicking
//! - A validated config always builds a generator
//! - Byte extraction honors the requested length for every byte order

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use prng_kit::engines::{Jsf64, SeedableRng};
use prng_kit::{Endianness, Generator, GeneratorConfig, RejectionPolicy};

#[derive(Debug, Arbitrary)]
struct FuzzConfig {
    seed: u64,
    warn_after: Option<u32>,
    max_attempts: Option<u32>,
    order: u8,
    length: u16,
}

fuzz_target!(|input: FuzzConfig| {
    let config = GeneratorConfig {
        rejection: RejectionPolicy {
            warn_after: input.warn_after,
            max_attempts: input.max_attempts,
        },
        default_endianness: match input.order % 3 {
            0 => Endianness::Little,
            1 => Endianness::Big,
            _ => Endianness::Native,
        },
    };

    let valid = config.validate().is_ok();
    let built = Generator::with_config(Jsf64::seed_from_u64(input.seed), config);
    assert_eq!(valid, built.is_ok());

    if let Ok(mut rng) = built {
        match rng.next_bytes_default(input.length as usize) {
            Ok(bytes) => assert_eq!(bytes.len(), input.length as usize),
            Err(_) => assert_eq!(input.length, 0),
        }
        if let Ok(value) = rng.bounded_u32(0, 3) {
            assert!(value < 3);
        }
    }
});
