//! Task-based wrappers for the sequence operations (feature `tokio`).
//!
//! Each wrapper moves its input onto a tokio blocking worker, runs the synchronous
//! operation there under the generator's lock and hands the result back. The only
//! suspension point is the dispatch itself: the draw loop never yields, so an operation
//! that has started always runs to completion. A [`CancellationFlag`] is checked before
//! dispatch and once more when the worker picks the job up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::RngError;
use crate::generator::Generator;
use crate::source::WordSource;

/// Cooperative cancellation for the async wrappers.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    /// Creates a flag that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of operations that have not been dispatched yet.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        tracing::debug!("async sequence operation cancelled");
    }

    /// Whether [`cancel`](Self::cancel) has been called since the last reset.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clears the flag so it can be reused.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

fn check_cancelled(cancel: Option<&CancellationFlag>) -> Result<(), RngError> {
    match cancel {
        Some(flag) if flag.is_cancelled() => Err(RngError::Cancelled),
        _ => Ok(()),
    }
}

/// A [`Generator`] behind `Arc<parking_lot::Mutex<_>>`.
///
/// Every operation, sync or async, holds the lock for its full duration, so calls from
/// different threads or tasks are serialized and never interleave draws.
///
/// # Example
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), prng_kit::RngError> {
/// use prng_kit::engines::{SeedableRng, Sfc64};
/// use prng_kit::{Generator, SharedGenerator};
///
/// let shared = SharedGenerator::new(Generator::new(Sfc64::seed_from_u64(3)));
/// let shuffled = shared.shuffle_async((0..10).collect::<Vec<u32>>(), None).await?;
/// assert_eq!(shuffled.len(), 10);
/// # Ok(())
/// # }
/// ```
pub struct SharedGenerator<S: WordSource> {
    inner: Arc<Mutex<Generator<S>>>,
}

impl<S: WordSource> Clone for SharedGenerator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: WordSource> std::fmt::Debug for SharedGenerator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedGenerator")
            .field("algorithm", &self.inner.lock().algorithm_name())
            .finish_non_exhaustive()
    }
}

impl<S: WordSource> SharedGenerator<S> {
    /// Wraps `generator` for shared use.
    #[must_use]
    pub fn new(generator: Generator<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(generator)),
        }
    }

    /// Locks the generator for a batch of synchronous calls.
    pub fn lock(&self) -> MutexGuard<'_, Generator<S>> {
        self.inner.lock()
    }
}

impl<S> SharedGenerator<S>
where
    S: WordSource + Send + 'static,
{
    async fn dispatch<R, F>(
        &self,
        operation: &'static str,
        cancel: Option<&CancellationFlag>,
        job: F,
    ) -> Result<R, RngError>
    where
        R: Send + 'static,
        F: FnOnce(&mut Generator<S>) -> Result<R, RngError> + Send + 'static,
    {
        check_cancelled(cancel)?;
        let inner = Arc::clone(&self.inner);
        let flag = cancel.cloned();
        tracing::trace!(operation, "dispatching to blocking worker");

        let handle = tokio::task::spawn_blocking(move || {
            check_cancelled(flag.as_ref())?;
            let mut generator = inner.lock();
            job(&mut generator)
        });

        handle.await.map_err(|err| RngError::TaskFailed {
            context: format!("{} worker: {}", operation, err),
        })?
    }

    /// Async [`Generator::choose_multiple`]: `select` picks with replacement.
    ///
    /// # Errors
    ///
    /// Same as the synchronous call, plus [`RngError::Cancelled`] and
    /// [`RngError::TaskFailed`].
    pub async fn choose_multiple_async<T>(
        &self,
        items: Vec<T>,
        select: usize,
        cancel: Option<&CancellationFlag>,
    ) -> Result<Vec<T>, RngError>
    where
        T: Clone + Send + 'static,
    {
        self.dispatch("choose_multiple", cancel, move |generator| {
            generator.choose_multiple(&items, select)
        })
        .await
    }

    /// Async [`Generator::sample`]: `k` picks without replacement.
    ///
    /// # Errors
    ///
    /// Same as the synchronous call, plus [`RngError::Cancelled`] and
    /// [`RngError::TaskFailed`].
    pub async fn sample_async<T>(
        &self,
        items: Vec<T>,
        k: usize,
        cancel: Option<&CancellationFlag>,
    ) -> Result<Vec<T>, RngError>
    where
        T: Clone + Send + 'static,
    {
        self.dispatch("sample", cancel, move |generator| generator.sample(&items, k))
            .await
    }

    /// Async shuffle. Takes ownership of `items` and returns them permuted.
    ///
    /// # Errors
    ///
    /// Same as the synchronous call, plus [`RngError::Cancelled`] and
    /// [`RngError::TaskFailed`].
    pub async fn shuffle_async<T>(
        &self,
        mut items: Vec<T>,
        cancel: Option<&CancellationFlag>,
    ) -> Result<Vec<T>, RngError>
    where
        T: Send + 'static,
    {
        self.dispatch("shuffle", cancel, move |generator| {
            generator.shuffle_in_place(&mut items)?;
            Ok(items)
        })
        .await
    }
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

    #[test]
    fn test_flag_clones_share_state() {
        let flag = CancellationFlag::new();
        let other = flag.clone();
        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
        other.reset();
        assert!(!flag.is_cancelled());
    }

    #[test]
    fn test_check_cancelled() {
        assert!(check_cancelled(None).is_ok());
        let flag = CancellationFlag::new();
        assert!(check_cancelled(Some(&flag)).is_ok());
        flag.cancel();
        assert_eq!(check_cancelled(Some(&flag)), Err(RngError::Cancelled));
    }
}
