//! Statistical checks for the Gaussian and Gamma samplers.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

#[path = "common/mod.rs"]
mod common;

use common::stats::{ks_limit, ks_statistic, mean_and_variance};
use common::SAMPLE_SIZE;
use prng_kit::engines::{Jsf64, Pcg32, SeedableRng, Sfc64, Xoshiro256StarStar};
use prng_kit::{Generator, RngError};

#[test]
fn test_gaussian_moments_converge() {
    let mut rng = Generator::new(Xoshiro256StarStar::seed_from_u64(1));
    let samples: Vec<f64> = (0..SAMPLE_SIZE)
        .map(|_| rng.next_gaussian(3.0, 2.0).unwrap())
        .collect();
    let (mean, variance) = mean_and_variance(&samples);
    assert!((mean - 3.0).abs() < 0.05, "mean {mean}");
    assert!((variance - 4.0).abs() < 0.1, "variance {variance}");
}

#[test]
fn test_gaussian_standard_normal_cdf() {
    let mut rng = Generator::new(Pcg32::seed_from_u64(2));
    let mut samples: Vec<f64> = (0..20_000)
        .map(|_| rng.next_gaussian(0.0, 1.0).unwrap())
        .collect();
    // Fraction within one standard deviation: 0.6827.
    let within = samples.iter().filter(|x| x.abs() < 1.0).count() as f64 / 20_000.0;
    assert!((within - 0.6827).abs() < 0.02, "within one sigma: {within}");
    samples.retain(|x| x.abs() > 4.5);
    assert!(samples.len() < 5);
}

#[test]
fn test_gaussian_second_call_uses_spare() {
    let mut rng = Generator::new(Sfc64::seed_from_u64(3));
    let first = rng.next_gaussian(10.0, 3.0).unwrap();
    let spare = rng.gaussian_spare().unwrap();
    let state = rng.source().clone();

    let second = rng.next_gaussian(-1.0, 0.5).unwrap();
    assert_eq!(second, -1.0 + 0.5 * spare);
    assert_eq!(rng.source(), &state, "spare path must not draw");
    assert!(rng.gaussian_spare().is_none());
    assert!(first.is_finite());
}

#[test]
fn test_gaussian_rejects_bad_parameters() {
    let mut rng = Generator::new(Sfc64::seed_from_u64(4));
    assert!(matches!(
        rng.next_gaussian(f64::NAN, 1.0),
        Err(RngError::InvalidArgument { .. })
    ));
    assert!(matches!(
        rng.next_gaussian(0.0, -0.1),
        Err(RngError::InvalidArgument { .. })
    ));
    assert_eq!(rng.next_gaussian(5.0, 0.0).unwrap(), 5.0);
}

#[test]
fn test_gamma_shape_one_is_exponential() {
    let beta = 2.5;
    let mut rng = Generator::new(Jsf64::seed_from_u64(5));
    let count = 20_000;
    let mut samples: Vec<f64> = (0..count)
        .map(|_| rng.next_gamma(1.0, beta).unwrap())
        .collect();
    let d = ks_statistic(&mut samples, |x| 1.0 - (-x / beta).exp());
    assert!(d < ks_limit(count), "KS statistic {d}");
}

#[test]
fn test_gamma_moments_for_each_branch() {
    let mut rng = Generator::new(Xoshiro256StarStar::seed_from_u64(6));
    for (alpha, beta) in [(0.3, 1.0), (0.8, 2.0), (1.0, 0.5), (2.5, 1.5), (9.0, 0.2)] {
        let samples: Vec<f64> = (0..SAMPLE_SIZE)
            .map(|_| rng.next_gamma(alpha, beta).unwrap())
            .collect();
        assert!(samples.iter().all(|&x| x >= 0.0 && x.is_finite()));
        let (mean, variance) = mean_and_variance(&samples);
        let expected_mean = alpha * beta;
        let expected_variance = alpha * beta * beta;
        assert!(
            (mean - expected_mean).abs() < 0.03 * expected_mean.max(1.0),
            "alpha={alpha} beta={beta}: mean {mean} vs {expected_mean}"
        );
        assert!(
            (variance - expected_variance).abs() < 0.1 * expected_variance.max(0.5),
            "alpha={alpha} beta={beta}: variance {variance} vs {expected_variance}"
        );
    }
}

#[test]
fn test_gamma_rejects_bad_parameters() {
    let mut rng = Generator::new(Pcg32::seed_from_u64(7));
    for (alpha, beta) in [
        (0.0, 1.0),
        (-1.0, 1.0),
        (1.0, 0.0),
        (f64::NAN, 1.0),
        (1.0, f64::NAN),
        (f64::INFINITY, 1.0),
    ] {
        assert!(
            matches!(
                rng.next_gamma(alpha, beta),
                Err(RngError::InvalidArgument { .. })
            ),
            "alpha={alpha} beta={beta}"
        );
    }
    assert_eq!(rng.source(), &Pcg32::seed_from_u64(7));
}

#[test]
fn test_uniform_doubles() {
    let mut rng = Generator::new(Pcg32::seed_from_u64(8));
    let samples: Vec<f64> = (0..SAMPLE_SIZE).map(|_| rng.next_f64()).collect();
    assert!(samples.iter().all(|&x| (0.0..1.0).contains(&x)));
    let (mean, variance) = mean_and_variance(&samples);
    assert!((mean - 0.5).abs() < 0.01);
    assert!((variance - 1.0 / 12.0).abs() < 0.005);

    for _ in 0..1000 {
        let x = rng.next_f64_in(-2.0, 3.0).unwrap();
        assert!((-2.0..3.0).contains(&x));
    }
    assert!(rng.next_f64_in(1.0, 1.0).is_err());
    assert!(rng.next_f64_in(0.0, f64::INFINITY).is_err());
}

#[test]
fn test_bool_is_fair() {
    let mut rng = Generator::new(Sfc64::seed_from_u64(9));
    let heads = (0..SAMPLE_SIZE).filter(|_| rng.next_bool()).count() as f64;
    assert!((heads / SAMPLE_SIZE as f64 - 0.5).abs() < 0.01);
}
