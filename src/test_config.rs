//! Shared test configuration for property-based and statistical tests.
//!
//! # Miri Support
//!
//! When running tests under Miri, we reduce both the number of proptest cases and
//! the sample sizes used by statistical checks so the suite stays tractable.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_config::miri_case_count;
//!
//! proptest! {
//!     #![proptest_config(ProptestConfig {
//!         cases: miri_case_count(),
//!         ..ProptestConfig::default()
//!     })]
//!     #[test]
//!     fn my_property_test(value in any::<u32>()) {
//!         // test body
//!     }
//! }
//! ```

use crate::error::RngError;
use crate::source::{require_seed_words, Word, WordSource};

/// Returns the number of test cases to run for property-based tests.
///
/// When running under Miri, returns a reduced count (5) for faster testing.
/// Otherwise, returns the standard count (256) for thorough coverage.
#[must_use]
pub const fn miri_case_count() -> u32 {
    if cfg!(miri) {
        5
    } else {
        256
    }
}

/// Returns the number of draws used by in-crate statistical checks.
///
/// Chi-square checks in unit tests use 100 000 draws natively and 2 000 under Miri.
/// Under Miri those checks only exercise the code path; their thresholds are skipped.
#[must_use]
pub const fn statistical_sample_size() -> usize {
    if cfg!(miri) {
        2_000
    } else {
        100_000
    }
}

/// Replays a fixed list of words, repeating the last one once the list runs out.
///
/// Lets unit tests drive rejection loops and width conversions with exact inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScriptedSource<W: Word> {
    words: Vec<W>,
    pos: usize,
}

impl<W: Word> ScriptedSource<W> {
    pub(crate) fn new(words: Vec<W>) -> Self {
        Self { words, pos: 0 }
    }

    /// Number of words drawn so far.
    pub(crate) fn draws(&self) -> usize {
        self.pos
    }
}

impl<W: Word> WordSource for ScriptedSource<W> {
    type Word = W;
    const STATE_WORDS: usize = 1;

    fn algorithm_name(&self) -> &'static str {
        "Scripted"
    }

    fn next_word(&mut self) -> W {
        let last = self.words.len().saturating_sub(1);
        let word = self.words.get(self.pos.min(last)).copied().unwrap_or_default();
        self.pos += 1;
        word
    }

    fn set_seed(&mut self, seed: &[W]) -> Result<(), RngError> {
        require_seed_words(seed, Self::STATE_WORDS)?;
        self.words = seed.to_vec();
        self.pos = 0;
        Ok(())
    }

    fn clear(&mut self) {
        self.words = vec![W::default()];
        self.pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miri_case_count_returns_expected_value() {
        let count = miri_case_count();

        if cfg!(miri) {
            assert_eq!(count, 5);
        } else {
            assert_eq!(count, 256);
        }
    }

    #[test]
    fn test_scripted_source_repeats_last_word() {
        let mut source = ScriptedSource::new(vec![1_u32, 2]);
        assert_eq!(source.next_word(), 1);
        assert_eq!(source.next_word(), 2);
        assert_eq!(source.next_word(), 2);
        assert_eq!(source.draws(), 3);
    }

    #[test]
    fn test_statistical_sample_size_is_large_natively() {
        if !cfg!(miri) {
            assert!(statistical_sample_size() >= 100_000);
        }
    }
}
