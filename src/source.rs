//! The [`WordSource`] contract every engine implements.
//!
//! An engine only has to produce its native word, accept seed material and clear its
//! state. Width conversion, OS reseeding and everything in the derived layer are
//! provided on top of that.

use std::fmt::Debug;

use crate::bytes::Endianness;
use crate::error::RngError;
use crate::telemetry::{
    report_to_observer, InvariantViolation, Violation, ViolationKind, ViolationObserver,
    ViolationSeverity,
};

mod private {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// A native engine word: `u32` or `u64`.
///
/// This trait is sealed. It carries the width-specific pieces of the derived layer so
/// the rest of the crate can stay generic over the engine's word size.
pub trait Word: private::Sealed + Copy + Debug + Default + Eq + Send + Sync + 'static {
    /// Width of the word in bits.
    const BITS: u32;
    /// Width of the word in bytes.
    const BYTES: usize;

    /// Draws a 32-bit value from a source producing this word type.
    ///
    /// A 64-bit source yields the high half of one draw.
    fn draw_u32<S: WordSource<Word = Self> + ?Sized>(source: &mut S) -> u32;

    /// Draws a 64-bit value from a source producing this word type.
    ///
    /// A 32-bit source concatenates two draws; the first becomes the high half.
    fn draw_u64<S: WordSource<Word = Self> + ?Sized>(source: &mut S) -> u64;

    /// Writes the leading `dest.len()` bytes of this word in the given byte order.
    ///
    /// `dest` must not be longer than [`Word::BYTES`]; extra bytes are left untouched.
    fn write_bytes(self, dest: &mut [u8], order: Endianness);

    /// Builds a word from little-endian bytes. Missing bytes are treated as zero.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

impl Word for u32 {
    const BITS: u32 = 32;
    const BYTES: usize = 4;

    #[inline]
    fn draw_u32<S: WordSource<Word = Self> + ?Sized>(source: &mut S) -> u32 {
        source.next_word()
    }

    #[inline]
    fn draw_u64<S: WordSource<Word = Self> + ?Sized>(source: &mut S) -> u64 {
        let high = u64::from(source.next_word());
        let low = u64::from(source.next_word());
        (high << 32) | low
    }

    #[inline]
    fn write_bytes(self, dest: &mut [u8], order: Endianness) {
        let bytes = match order.resolve() {
            Endianness::Big => self.to_be_bytes(),
            _ => self.to_le_bytes(),
        };
        for (slot, byte) in dest.iter_mut().zip(bytes) {
            *slot = byte;
        }
    }

    fn from_le_slice(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 4];
        for (slot, byte) in buf.iter_mut().zip(bytes) {
            *slot = *byte;
        }
        Self::from_le_bytes(buf)
    }
}

impl Word for u64 {
    const BITS: u32 = 64;
    const BYTES: usize = 8;

    #[inline]
    fn draw_u32<S: WordSource<Word = Self> + ?Sized>(source: &mut S) -> u32 {
        (source.next_word() >> 32) as u32
    }

    #[inline]
    fn draw_u64<S: WordSource<Word = Self> + ?Sized>(source: &mut S) -> u64 {
        source.next_word()
    }

    #[inline]
    fn write_bytes(self, dest: &mut [u8], order: Endianness) {
        let bytes = match order.resolve() {
            Endianness::Big => self.to_be_bytes(),
            _ => self.to_le_bytes(),
        };
        for (slot, byte) in dest.iter_mut().zip(bytes) {
            *slot = byte;
        }
    }

    fn from_le_slice(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 8];
        for (slot, byte) in buf.iter_mut().zip(bytes) {
            *slot = *byte;
        }
        Self::from_le_bytes(buf)
    }
}

/// A deterministic stream of fixed-width words driven by engine-specific state.
///
/// Implementors provide [`next_word`](WordSource::next_word),
/// [`set_seed`](WordSource::set_seed) and [`clear`](WordSource::clear); everything else
/// has a default. None of the engines in this crate are cryptographically secure,
/// and [`reseed`](WordSource::reseed) does not change that.
///
/// # Example
///
/// ```
/// use prng_kit::{engines::SplitMix64, WordSource};
///
/// let mut engine = SplitMix64::new(0);
/// assert_eq!(engine.algorithm_name(), "SplitMix64");
///
/// let word = engine.next_u64();
/// engine.set_seed(&[0]).unwrap();
/// assert_eq!(engine.next_u64(), word);
/// ```
pub trait WordSource {
    /// The engine's native output word.
    type Word: Word;

    /// Number of native words the engine consumes when seeded.
    const STATE_WORDS: usize;

    /// Human-readable algorithm name, e.g. `"Xoshiro 256**"`.
    fn algorithm_name(&self) -> &'static str;

    /// Advances the state and returns the next native word.
    fn next_word(&mut self) -> Self::Word;

    /// Replaces the state from explicit seed words.
    ///
    /// Only the first [`STATE_WORDS`](WordSource::STATE_WORDS) values are used.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::InsufficientSeedMaterial`] when fewer than `STATE_WORDS`
    /// values are supplied. The state is left untouched in that case.
    fn set_seed(&mut self, seed: &[Self::Word]) -> Result<(), RngError>;

    /// Zeroes the internal state.
    ///
    /// Many engines are stuck at zero after this; reseed before drawing again.
    fn clear(&mut self);

    /// Checks the state for degenerate values such as an all-zero fixed point.
    ///
    /// Engines without such states keep the default. Seeding through
    /// [`Generator`](crate::Generator) or [`reseed`](WordSource::reseed) reports failures
    /// as `Invariant` violations; the seed itself is still accepted.
    fn validate_state(&self) -> Result<(), InvariantViolation> {
        Ok(())
    }

    /// Returns the next 32-bit value.
    #[inline]
    fn next_u32(&mut self) -> u32 {
        <Self::Word as Word>::draw_u32(self)
    }

    /// Returns the next 64-bit value.
    #[inline]
    fn next_u64(&mut self) -> u64 {
        <Self::Word as Word>::draw_u64(self)
    }

    /// Reseeds from the operating system's secure random facility.
    ///
    /// The OS supplies seed material only; the output stream stays exactly as
    /// predictable as the engine itself.
    ///
    /// # Errors
    ///
    /// Returns [`RngError::EntropyUnavailable`] if the OS facility cannot be read. There
    /// is no fallback to a weaker seed and the state is left untouched.
    fn reseed(&mut self) -> Result<(), RngError> {
        reseed_from_os(self, None)
    }
}

/// Checks that `seed` carries at least `required` words.
pub(crate) fn require_seed_words<W>(seed: &[W], required: usize) -> Result<(), RngError> {
    if seed.len() < required {
        return Err(RngError::InsufficientSeedMaterial {
            required,
            provided: seed.len(),
        });
    }
    Ok(())
}

/// Reads `count` words of OS entropy.
pub(crate) fn entropy_words<W: Word>(count: usize) -> Result<Vec<W>, RngError> {
    let mut buf = vec![0u8; count * W::BYTES];
    getrandom::getrandom(&mut buf).map_err(|err| RngError::EntropyUnavailable {
        context: err.to_string(),
    })?;
    Ok(buf.chunks_exact(W::BYTES).map(W::from_le_slice).collect())
}

/// Reports a `Critical` invariant violation if `source` was left in a degenerate state.
pub(crate) fn report_invalid_state<S: WordSource + ?Sized>(
    source: &S,
    observer: Option<&dyn ViolationObserver>,
    operation: &'static str,
) {
    if let Err(invariant) = source.validate_state() {
        let violation = Violation::new(
            ViolationSeverity::Critical,
            ViolationKind::Invariant,
            format!("{} [context: {}]", invariant, operation),
            concat!(file!(), ":", line!()),
        )
        .with_algorithm(source.algorithm_name())
        .with_context("operation", operation);
        report_to_observer(observer, &violation);
    }
}

/// Reseeds `source` from OS entropy, reporting failures to `observer` (or tracing).
pub(crate) fn reseed_from_os<S: WordSource + ?Sized>(
    source: &mut S,
    observer: Option<&dyn ViolationObserver>,
) -> Result<(), RngError> {
    let seed = match entropy_words::<S::Word>(S::STATE_WORDS) {
        Ok(seed) => seed,
        Err(err) => {
            let violation = Violation::new(
                ViolationSeverity::Error,
                ViolationKind::Seeding,
                format!("reseed failed: {}", err),
                concat!(file!(), ":", line!()),
            )
            .with_algorithm(source.algorithm_name())
            .with_context("state_words", S::STATE_WORDS.to_string());
            report_to_observer(observer, &violation);
            return Err(err);
        },
    };
    source.set_seed(&seed)?;
    report_invalid_state(source, observer, "reseed");
    tracing::debug!(
        algorithm = source.algorithm_name(),
        state_words = S::STATE_WORDS,
        "reseeded from OS entropy"
    );
    Ok(())
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
    use crate::test_config::ScriptedSource;

    #[test]
    fn test_u32_source_concatenates_high_first() {
        let mut source = ScriptedSource::new(vec![0x0123_4567_u32, 0x89ab_cdef]);
        assert_eq!(source.next_u64(), 0x0123_4567_89ab_cdef);
    }

    #[test]
    fn test_u64_source_returns_high_half() {
        let mut source = ScriptedSource::new(vec![0x0123_4567_89ab_cdef_u64]);
        assert_eq!(source.next_u32(), 0x0123_4567);
    }

    #[test]
    fn test_set_seed_rejects_short_seed() {
        let mut source = ScriptedSource::new(vec![7_u64]);
        let err = source.set_seed(&[]).unwrap_err();
        assert_eq!(
            err,
            RngError::InsufficientSeedMaterial {
                required: 1,
                provided: 0
            }
        );
        assert_eq!(source.next_word(), 7, "state must be untouched on error");
    }

    #[test]
    fn test_write_bytes_partial_orders() {
        let word = 0x0102_0304_0506_0708_u64;
        let mut little = [0u8; 3];
        word.write_bytes(&mut little, Endianness::Little);
        assert_eq!(little, [0x08, 0x07, 0x06]);

        let mut big = [0u8; 3];
        word.write_bytes(&mut big, Endianness::Big);
        assert_eq!(big, [0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_from_le_slice_pads_with_zero() {
        assert_eq!(u32::from_le_slice(&[0x01, 0x02]), 0x0201);
        assert_eq!(u64::from_le_slice(&[0xff; 8]), u64::MAX);
    }

    #[test]
    fn test_entropy_words_count() {
        let words = entropy_words::<u64>(4).unwrap();
        assert_eq!(words.len(), 4);
        let words = entropy_words::<u32>(3).unwrap();
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn test_invalid_state_goes_to_observer() {
        use crate::engines::Xoshiro256StarStar;
        use crate::telemetry::CollectingObserver;

        let observer = CollectingObserver::new();
        let healthy = ScriptedSource::new(vec![0_u64]);
        report_invalid_state(&healthy, Some(&observer), "set_seed");
        assert!(observer.is_empty());

        let mut engine = Xoshiro256StarStar::new(1, 2, 3, 4);
        engine.set_seed(&[0, 0, 0, 0]).unwrap();
        report_invalid_state(&engine, Some(&observer), "set_seed");
        let violations = observer.violations_of_kind(ViolationKind::Invariant);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, ViolationSeverity::Critical);
        assert_eq!(violations[0].algorithm, Some("Xoshiro 256**"));
        assert_eq!(violations[0].context["operation"], "set_seed");
    }

    #[test]
    fn test_reseed_restarts_stream() {
        let mut source = ScriptedSource::new(vec![0_u64, 0, 0]);
        let _ = source.next_word();
        source.reseed().unwrap();
        assert_eq!(source.draws(), 0);
    }
}
