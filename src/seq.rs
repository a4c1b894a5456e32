//! Selection and permutation over slices.
//!
//! - [`choice`] / [`choose_multiple`]: independent picks **with replacement**; duplicates
//!   are possible in the output of `choose_multiple`.
//! - [`sample`]: `k` distinct-by-index picks **without replacement** (reservoir,
//!   Algorithm R). Each element is included with probability exactly `k / n`.
//! - [`shuffle`] / [`shuffle_in_place`]: Fisher-Yates. Every permutation is equally likely.
//!
//! All index draws go through [`bounded_usize`], so they inherit its unbiasedness and
//! its rejection supervision.

use crate::bounded::bounded_usize;
use crate::error::RngError;
use crate::rejection::RejectionContext;
use crate::source::WordSource;

fn ensure_non_empty<T>(items: &[T], operation: &str) -> Result<(), RngError> {
    if items.is_empty() {
        return Err(RngError::invalid(format!(
            "{} requires a non-empty collection",
            operation
        )));
    }
    Ok(())
}

fn ensure_count_in_range(count: usize, len: usize, operation: &str) -> Result<(), RngError> {
    if count == 0 || count > len {
        return Err(RngError::invalid(format!(
            "{} count {} must be within [1, {}]",
            operation, count, len
        )));
    }
    Ok(())
}

/// Returns a reference to one uniformly chosen element.
///
/// # Errors
///
/// Returns [`RngError::InvalidArgument`] if `items` is empty.
pub fn choice<'i, S: WordSource + ?Sized, T>(
    source: &mut S,
    items: &'i [T],
    context: &RejectionContext<'_>,
) -> Result<&'i T, RngError> {
    ensure_non_empty(items, "choice")?;
    let index = bounded_usize(source, 0, items.len(), context)?;
    items
        .get(index)
        .ok_or_else(|| RngError::invalid("bounded index fell outside the collection"))
}

/// Returns `select` elements drawn independently, with replacement.
///
/// The same element may appear more than once. Use [`sample`] for distinct picks.
///
/// # Errors
///
/// Returns [`RngError::InvalidArgument`] if `items` is empty or `select` is outside
/// `[1, items.len()]`.
pub fn choose_multiple<S: WordSource + ?Sized, T: Clone>(
    source: &mut S,
    items: &[T],
    select: usize,
    context: &RejectionContext<'_>,
) -> Result<Vec<T>, RngError> {
    ensure_non_empty(items, "choose_multiple")?;
    ensure_count_in_range(select, items.len(), "choose_multiple")?;
    let mut selected = Vec::with_capacity(select);
    for _ in 0..select {
        selected.push(choice(source, items, context)?.clone());
    }
    Ok(selected)
}

/// Returns `k` distinct-by-index elements using reservoir sampling (Algorithm R).
///
/// The reservoir starts as the first `k` items; item `i` (for `k <= i < n`) replaces
/// `reservoir[j]` when a uniform `j` in `[0, i]` lands below `k`. Output order follows the
/// overwrite order, not the input order. When `k == n` the input is returned as-is and
/// nothing is drawn.
///
/// # Errors
///
/// Returns [`RngError::InvalidArgument`] if `items` is empty or `k` is outside `[1, n]`.
///
/// # Example
///
/// ```
/// use prng_kit::{engines::Pcg32, seq, RejectionContext};
///
/// let mut engine = Pcg32::new(7, 11);
/// let picked = seq::sample(&mut engine, &[1, 2, 3, 4, 5], 3, &RejectionContext::default()).unwrap();
/// assert_eq!(picked.len(), 3);
/// ```
pub fn sample<S: WordSource + ?Sized, T: Clone>(
    source: &mut S,
    items: &[T],
    k: usize,
    context: &RejectionContext<'_>,
) -> Result<Vec<T>, RngError> {
    ensure_non_empty(items, "sample")?;
    ensure_count_in_range(k, items.len(), "sample")?;
    if k == items.len() {
        return Ok(items.to_vec());
    }

    let mut reservoir = items[..k].to_vec();
    for (i, item) in items.iter().enumerate().skip(k) {
        let j = bounded_usize(source, 0, i + 1, context)?;
        if let Some(slot) = reservoir.get_mut(j) {
            *slot = item.clone();
        }
    }
    Ok(reservoir)
}

/// Shuffles `items` in place with Fisher-Yates.
///
/// `i` runs from `n - 1` down to `1`; each step swaps `items[i]` with `items[j]` for a
/// uniform `j` in `[0, i]`. A single-element slice is left untouched and draws nothing.
///
/// # Errors
///
/// Returns [`RngError::InvalidArgument`] if `items` is empty.
pub fn shuffle_in_place<S: WordSource + ?Sized, T>(
    source: &mut S,
    items: &mut [T],
    context: &RejectionContext<'_>,
) -> Result<(), RngError> {
    ensure_non_empty(items, "shuffle")?;
    for i in (1..items.len()).rev() {
        let j = bounded_usize(source, 0, i + 1, context)?;
        items.swap(i, j);
    }
    Ok(())
}

/// Returns a shuffled copy of `items`, leaving the input untouched.
///
/// Consumes exactly the same draws as [`shuffle_in_place`] on the same input.
///
/// # Errors
///
/// Returns [`RngError::InvalidArgument`] if `items` is empty.
pub fn shuffle<S: WordSource + ?Sized, T: Clone>(
    source: &mut S,
    items: &[T],
    context: &RejectionContext<'_>,
) -> Result<Vec<T>, RngError> {
    ensure_non_empty(items, "shuffle")?;
    let mut copy = items.to_vec();
    shuffle_in_place(source, &mut copy, context)?;
    Ok(copy)
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
    use crate::engines::{Pcg32, SeedableRng, Xoshiro256PlusPlus};
    use crate::test_config::ScriptedSource;
    use std::collections::{BTreeMap, BTreeSet};

    fn ctx() -> RejectionContext<'static> {
        RejectionContext::default()
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let mut engine = Pcg32::seed_from_u64(1);
        let empty: [u8; 0] = [];
        assert!(choice(&mut engine, &empty, &ctx()).is_err());
        assert!(choose_multiple(&mut engine, &empty, 1, &ctx()).is_err());
        assert!(sample(&mut engine, &empty, 1, &ctx()).is_err());
        assert!(shuffle(&mut engine, &empty, &ctx()).is_err());
        assert!(shuffle_in_place(&mut engine, &mut [0u8; 0], &ctx()).is_err());
    }

    #[test]
    fn test_counts_outside_range_rejected() {
        let mut source = ScriptedSource::new(vec![1_u32]);
        let items = [1, 2, 3];
        assert!(matches!(
            sample(&mut source, &items, 0, &ctx()),
            Err(RngError::InvalidArgument { .. })
        ));
        assert!(sample(&mut source, &items, 4, &ctx()).is_err());
        assert!(choose_multiple(&mut source, &items, 0, &ctx()).is_err());
        assert!(choose_multiple(&mut source, &items, 4, &ctx()).is_err());
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_sample_full_size_draws_nothing() {
        let mut source = ScriptedSource::new(vec![1_u32]);
        let items = vec!["a", "b", "c", "d"];
        assert_eq!(sample(&mut source, &items, 4, &ctx()).unwrap(), items);
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_sample_entries_distinct_by_index() {
        let mut engine = Xoshiro256PlusPlus::seed_from_u64(9);
        let items: Vec<usize> = (0..50).collect();
        for k in [1, 5, 25, 49] {
            let picked = sample(&mut engine, &items, k, &ctx()).unwrap();
            let distinct: BTreeSet<_> = picked.iter().copied().collect();
            assert_eq!(picked.len(), k);
            assert_eq!(distinct.len(), k, "duplicates in {picked:?}");
        }
    }

    #[test]
    fn test_choose_multiple_allows_repeats() {
        // Every draw maps to index 0, so all picks coincide.
        let mut source = ScriptedSource::new(vec![1_u32]);
        let picked = choose_multiple(&mut source, &[10, 20, 30], 3, &ctx()).unwrap();
        assert_eq!(picked, vec![10, 10, 10]);
        assert_eq!(source.draws(), 3);
    }

    #[test]
    fn test_single_element_shuffle_draws_nothing() {
        let mut source = ScriptedSource::new(vec![1_u32]);
        let mut items = [42];
        shuffle_in_place(&mut source, &mut items, &ctx()).unwrap();
        assert_eq!(items, [42]);
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_shuffle_copy_matches_in_place() {
        let items: Vec<u32> = (0..20).collect();
        let copied = shuffle(&mut Pcg32::seed_from_u64(5), &items, &ctx()).unwrap();
        let mut in_place = items.clone();
        shuffle_in_place(&mut Pcg32::seed_from_u64(5), &mut in_place, &ctx()).unwrap();
        assert_eq!(copied, in_place);
        assert_eq!(items, (0..20).collect::<Vec<_>>(), "input untouched");
    }

    #[test]
    fn test_shuffle_three_permutations_uniform() {
        let mut engine = Xoshiro256PlusPlus::seed_from_u64(77);
        let trials = 60_000;
        let mut counts: BTreeMap<Vec<u8>, usize> = BTreeMap::new();
        for _ in 0..trials {
            let permuted = shuffle(&mut engine, &[0u8, 1, 2], &ctx()).unwrap();
            *counts.entry(permuted).or_default() += 1;
        }
        assert_eq!(counts.len(), 6, "all 3! permutations reachable");
        let expected = trials as f64 / 6.0;
        for (perm, &count) in &counts {
            let deviation = (count as f64 - expected).abs() / expected;
            assert!(deviation < 0.05, "{perm:?} seen {count} times");
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod property_tests {
    use super::*;
    use crate::engines::{SeedableRng, Sfc64};
    use crate::test_config::miri_case_count;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: miri_case_count(),
            ..ProptestConfig::default()
        })]

        /// Property: shuffling preserves the multiset of elements.
        #[test]
        fn prop_shuffle_is_permutation(seed in any::<u64>(), items in proptest::collection::vec(any::<u16>(), 1..64)) {
            let mut engine = Sfc64::seed_from_u64(seed);
            let mut shuffled = shuffle(&mut engine, &items, &RejectionContext::default()).unwrap();
            let mut original = items.clone();
            shuffled.sort_unstable();
            original.sort_unstable();
            prop_assert_eq!(shuffled, original);
        }

        /// Property: the same seed and input produce the same permutation.
        #[test]
        fn prop_shuffle_deterministic(seed in any::<u64>(), len in 1usize..64) {
            let items: Vec<usize> = (0..len).collect();
            let a = shuffle(&mut Sfc64::seed_from_u64(seed), &items, &RejectionContext::default()).unwrap();
            let b = shuffle(&mut Sfc64::seed_from_u64(seed), &items, &RejectionContext::default()).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: sample returns exactly k elements, each taken from the input.
        #[test]
        fn prop_sample_subset(seed in any::<u64>(), len in 1usize..64, k_frac in 0.0f64..1.0) {
            let items: Vec<usize> = (0..len).collect();
            let k = ((len as f64 * k_frac) as usize).clamp(1, len);
            let picked = sample(&mut Sfc64::seed_from_u64(seed), &items, k, &RejectionContext::default()).unwrap();
            prop_assert_eq!(picked.len(), k);
            let mut sorted = picked.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), k);
            prop_assert!(picked.iter().all(|v| *v < len));
        }

        /// Property: choice always returns an element of the input.
        #[test]
        fn prop_choice_member(seed in any::<u64>(), items in proptest::collection::vec(any::<i32>(), 1..32)) {
            let picked = choice(&mut Sfc64::seed_from_u64(seed), &items, &RejectionContext::default()).unwrap();
            prop_assert!(items.contains(picked));
        }
    }
}
