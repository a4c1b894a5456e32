//! Small goodness-of-fit helpers.
//!
//! Thresholds are deliberately loose (roughly six standard deviations) because every
//! test runs from a fixed seed: a failure means a real bias, not bad luck.

/// Pearson's chi-square statistic for `observed` counts against a uniform expectation.
#[allow(dead_code)]
pub fn chi_square(observed: &[u64]) -> f64 {
    let total: u64 = observed.iter().sum();
    let expected = total as f64 / observed.len() as f64;
    observed
        .iter()
        .map(|&count| {
            let diff = count as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Acceptance limit for a chi-square statistic with `buckets - 1` degrees of freedom.
///
/// Mean `k` plus six standard deviations `sqrt(2k)`.
#[allow(dead_code)]
pub fn chi_square_limit(buckets: usize) -> f64 {
    let k = (buckets - 1) as f64;
    k + 6.0 * (2.0 * k).sqrt()
}

/// Two-sided Kolmogorov-Smirnov statistic of `samples` against `cdf`.
///
/// Sorts `samples` in place.
#[allow(dead_code)]
pub fn ks_statistic(samples: &mut [f64], cdf: impl Fn(f64) -> f64) -> f64 {
    samples.sort_by(f64::total_cmp);
    let n = samples.len() as f64;
    samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            let above = (i + 1) as f64 / n - f;
            let below = f - i as f64 / n;
            above.max(below)
        })
        .fold(0.0, f64::max)
}

/// KS critical value at significance 0.001.
#[allow(dead_code)]
pub fn ks_limit(sample_count: usize) -> f64 {
    1.95 / (sample_count as f64).sqrt()
}

/// Sample mean and (population) variance.
#[allow(dead_code)]
pub fn mean_and_variance(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    (mean, variance)
}
