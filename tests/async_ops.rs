//! Async sequence wrappers (feature `tokio`).

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use std::collections::BTreeSet;

use prng_kit::engines::{Pcg32, SeedableRng, Sfc64, Xoshiro256StarStar};
use prng_kit::{CancellationFlag, Generator, RngError, SharedGenerator};

#[tokio::test]
async fn test_async_matches_sync_sequence() {
    let items: Vec<u32> = (0..40).collect();
    let shared = SharedGenerator::new(Generator::new(Sfc64::seed_from_u64(1)));
    let mut sync = Generator::new(Sfc64::seed_from_u64(1));

    let shuffled = shared.shuffle_async(items.clone(), None).await.unwrap();
    assert_eq!(shuffled, sync.shuffle(&items).unwrap());

    let sampled = shared.sample_async(items.clone(), 7, None).await.unwrap();
    assert_eq!(sampled, sync.sample(&items, 7).unwrap());

    let chosen = shared
        .choose_multiple_async(items.clone(), 5, None)
        .await
        .unwrap();
    assert_eq!(chosen, sync.choose_multiple(&items, 5).unwrap());

    assert_eq!(shared.lock().source(), sync.source());
}

#[tokio::test]
async fn test_cancelled_before_dispatch_draws_nothing() {
    let shared = SharedGenerator::new(Generator::new(Pcg32::seed_from_u64(2)));
    let flag = CancellationFlag::new();
    flag.cancel();

    let result = shared.shuffle_async(vec![1, 2, 3], Some(&flag)).await;
    assert_eq!(result, Err(RngError::Cancelled));
    assert_eq!(shared.lock().source(), &Pcg32::seed_from_u64(2));

    flag.reset();
    let result = shared.sample_async(vec![1, 2, 3], 2, Some(&flag)).await;
    assert_eq!(result.unwrap().len(), 2);
}

#[tokio::test]
async fn test_validation_errors_pass_through() {
    let shared = SharedGenerator::new(Generator::new(Pcg32::seed_from_u64(3)));
    let result = shared.sample_async(Vec::<u8>::new(), 1, None).await;
    assert!(matches!(result, Err(RngError::InvalidArgument { .. })));
    let result = shared.choose_multiple_async(vec![1, 2], 3, None).await;
    assert!(matches!(result, Err(RngError::InvalidArgument { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_are_serialized() {
    let shared = SharedGenerator::new(Generator::new(Xoshiro256StarStar::seed_from_u64(4)));
    let mut handles = Vec::new();
    for _ in 0..16 {
        let shared = shared.clone();
        handles.push(tokio::spawn(async move {
            shared
                .sample_async((0..100).collect::<Vec<u32>>(), 10, None)
                .await
        }));
    }
    for handle in handles {
        let picked = handle.await.unwrap().unwrap();
        let distinct: BTreeSet<_> = picked.iter().collect();
        assert_eq!(distinct.len(), 10);
    }
}
