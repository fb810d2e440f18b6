use core::future::Future;
use core::time::Duration;

use crate::{
    TimeSource, Turboflake, TurboflakeId,
    futures::{IdStream, SleepProvider},
};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;

impl SleepProvider for TokioSleep {
    type Sleep = tokio::time::Sleep;

    fn sleep_for(dur: Duration) -> Self::Sleep {
        tokio::time::sleep(dur)
    }
}

/// Extension trait for asynchronously claiming IDs on the
/// [`tokio`](https://docs.rs/tokio) runtime.
///
/// The methods mirror [`TurboflakeAsyncExt`](crate::TurboflakeAsyncExt) with [`TokioSleep`] pre-selected,
/// so no provider type parameter is needed at the call site.
///
/// # Example
/// ```
/// use turboflake::{Turboflake, TurboflakeAsyncTokioExt};
///
/// # #[tokio::main(flavor = "current_thread")] async fn main() {
/// let generator = Turboflake::new([0x1337, 0xCAFE]).unwrap();
///
/// let id = generator.next_id_async().await;
/// let batch = generator.next_ids_async(10).await;
/// assert_eq!(batch.len(), 10);
/// assert!(id < batch[0]);
/// # }
/// ```
pub trait TurboflakeAsyncTokioExt<T>
where
    T: TimeSource,
{
    /// Resolves to the next identifier using [`TokioSleep`].
    fn next_id_async(&self) -> impl Future<Output = TurboflakeId>;

    /// Resolves to `n` identifiers with exactly one suspension, using
    /// [`TokioSleep`].
    fn next_ids_async(&self, n: usize) -> impl Future<Output = Vec<TurboflakeId>>;

    /// An infinite stream of claims driven by [`TokioSleep`].
    fn id_stream(&self) -> IdStream<'_, T, TokioSleep>;
}

impl<T> TurboflakeAsyncTokioExt<T> for Turboflake<T>
where
    T: TimeSource,
{
    fn next_id_async(&self) -> impl Future<Output = TurboflakeId> {
        crate::futures::TurboflakeAsyncExt::next_id_async::<TokioSleep>(self)
    }

    fn next_ids_async(&self, n: usize) -> impl Future<Output = Vec<TurboflakeId>> {
        crate::futures::TurboflakeAsyncExt::next_ids_async::<TokioSleep>(self, n)
    }

    fn id_stream(&self) -> IdStream<'_, T, TokioSleep> {
        crate::futures::TurboflakeAsyncExt::id_stream::<TokioSleep>(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::StreamExt;
    use futures::future::join_all;

    use super::*;
    use crate::{Turboflake, TurboflakeId, futures::YieldSleep};

    fn assert_unique_and_strictly_increasing(ids: &[TurboflakeId]) {
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            assert!(seen.insert(id.to_raw()), "duplicate ID: {id:?}");
        }
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "not increasing: {:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn single_await_produces_an_id() {
        let generator = Turboflake::new([0x1337]).unwrap();
        let id = generator.next_id_async().await;
        assert_eq!(id.machine_id(), 0x1337);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn batch_await_matches_repeated_single_awaits() {
        let generator = Turboflake::new([1, 2]).unwrap();

        let mut ids = generator.next_ids_async(100).await;
        for _ in 0..100 {
            ids.push(generator.next_id_async().await);
        }
        assert_unique_and_strictly_increasing(&ids);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn many_tasks_share_one_engine_without_duplicates() {
        const TASKS: usize = 8;
        const IDS_PER_TASK: usize = 2000;

        let generator = Arc::new(Turboflake::new([0, 1, 2]).unwrap());

        let tasks: Vec<_> = (0..TASKS)
            .map(|_| {
                let generator = Arc::clone(&generator);
                tokio::spawn(async move {
                    let mut ids = Vec::with_capacity(IDS_PER_TASK);
                    for _ in 0..IDS_PER_TASK {
                        ids.push(generator.next_id_async().await);
                    }
                    ids
                })
            })
            .collect();

        let mut seen = HashSet::with_capacity(TASKS * IDS_PER_TASK);
        for task in tasks {
            let ids = task.await.unwrap();
            // Per-task claims arrive in strictly increasing order.
            assert_unique_and_strictly_increasing(&ids);
            for id in &ids {
                assert!(seen.insert(id.to_raw()), "duplicate across tasks");
            }
        }
        assert_eq!(seen.len(), TASKS * IDS_PER_TASK);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn stream_yields_unique_increasing_ids() {
        let generator = Turboflake::new([5, 9]).unwrap();
        let ids: Vec<TurboflakeId> = generator.id_stream().take(300).collect().await;
        assert_eq!(ids.len(), 300);
        assert_unique_and_strictly_increasing(&ids);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_streams_share_engine_state() {
        let generator = Arc::new(Turboflake::new([3]).unwrap());

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                tokio::spawn(async move {
                    generator.id_stream().take(250).collect::<Vec<_>>().await
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for task in join_all(tasks).await {
            for id in task.unwrap() {
                assert!(seen.insert(id.to_raw()), "duplicate across streams");
            }
        }
        assert_eq!(seen.len(), 4 * 250);
    }

    // All three async consumption shapes, interleaved with synchronous
    // claims on the same engine, must together satisfy uniqueness and
    // per-caller ordering.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn async_and_sync_surfaces_are_equivalent() {
        let generator = Turboflake::with_epoch([10, 20, 30], 1_749_081_600).unwrap();

        let mut ids = Vec::new();
        for _ in 0..100 {
            ids.push(generator.next_id_async().await);
        }
        ids.extend(generator.next_ids_async(100).await);
        ids.extend(generator.id_stream().take(100).collect::<Vec<_>>().await);
        ids.extend((0..100).map(|_| generator.next_id()));

        assert_unique_and_strictly_increasing(&ids);
    }

    /// Counts provider invocations; completes instantly.
    struct CountingSleep;

    static SLEEPS: AtomicUsize = AtomicUsize::new(0);

    impl SleepProvider for CountingSleep {
        type Sleep = core::future::Ready<()>;

        fn sleep_for(_dur: Duration) -> Self::Sleep {
            SLEEPS.fetch_add(1, Ordering::SeqCst);
            core::future::ready(())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn suspension_counts_per_shape() {
        let generator = Turboflake::new([4]).unwrap();

        // A zero-sized batch performs no suspension at all.
        let ids = crate::futures::TurboflakeAsyncExt::next_ids_async::<CountingSleep>(&generator, 0).await;
        assert!(ids.is_empty());
        assert_eq!(SLEEPS.load(Ordering::SeqCst), 0);

        // A single claim suspends exactly once, even with zero wait.
        crate::futures::TurboflakeAsyncExt::next_id_async::<CountingSleep>(&generator).await;
        assert_eq!(SLEEPS.load(Ordering::SeqCst), 1);

        // A batch spanning several tick rollovers still suspends exactly once.
        let ids = crate::futures::TurboflakeAsyncExt::next_ids_async::<CountingSleep>(&generator, 2000).await;
        assert_eq!(ids.len(), 2000);
        assert_eq!(SLEEPS.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn yield_provider_skips_timer_waits() {
        let generator = Turboflake::new([0]).unwrap();

        let mut ids = Vec::with_capacity(5000);
        for _ in 0..5000 {
            ids.push(crate::futures::TurboflakeAsyncExt::next_id_async::<YieldSleep>(&generator).await);
        }
        assert_unique_and_strictly_increasing(&ids);
    }
}
