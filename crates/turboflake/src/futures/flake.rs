use core::future::Future;

use crate::{
    Claimed, ClaimedBatch, TimeSource, Turboflake, TurboflakeId,
    futures::{IdStream, SleepProvider},
};

/// Extension trait for driving a [`Turboflake`] engine from asynchronous
/// callers, generic over the [`SleepProvider`].
///
/// Every method commits its claim synchronously *before* suspending, so a
/// cancelled suspension can only ever discard IDs that were already claimed;
/// engine state is never corrupted and the loss is not retried internally.
///
/// The runtime-specific extension traits pre-select a provider; import this
/// trait directly when you want to choose one per call:
///
/// ```
/// use turboflake::{Turboflake, TurboflakeAsyncExt, YieldSleep};
///
/// # #[tokio::main(flavor = "current_thread")] async fn main() {
/// let generator = Turboflake::new([0x0A0A]).unwrap();
/// let id = TurboflakeAsyncExt::next_id_async::<YieldSleep>(&generator).await;
/// assert_eq!(id.machine_id(), 0x0A0A);
/// # }
/// ```
pub trait TurboflakeAsyncExt<T>
where
    T: TimeSource,
{
    /// Resolves to the next identifier after honoring its overflow wait
    /// through the sleep provider.
    ///
    /// A zero wait still routes through the provider, so the caller's
    /// scheduler gets a chance to run other work on every claim.
    fn next_id_async<S>(&self) -> impl Future<Output = TurboflakeId>
    where
        S: SleepProvider;

    /// Resolves to `n` identifiers with exactly one suspension, however many
    /// tick rollovers the batch needed internally.
    ///
    /// `n = 0` resolves immediately with an empty vec and performs no
    /// suspension at all.
    fn next_ids_async<S>(&self, n: usize) -> impl Future<Output = Vec<TurboflakeId>>
    where
        S: SleepProvider;

    /// An infinite stream of single-ID claims, each with its own suspension.
    ///
    /// The stream borrows the engine; any number of concurrent streams (and
    /// other access paths) share the same atomic state and never observe a
    /// duplicate.
    fn id_stream<S>(&self) -> IdStream<'_, T, S>
    where
        S: SleepProvider;
}

impl<T> TurboflakeAsyncExt<T> for Turboflake<T>
where
    T: TimeSource,
{
    fn next_id_async<S>(&self) -> impl Future<Output = TurboflakeId>
    where
        S: SleepProvider,
    {
        async {
            let Claimed { id, wait } = self.claim();
            S::sleep_for(wait).await;
            id
        }
    }

    fn next_ids_async<S>(&self, n: usize) -> impl Future<Output = Vec<TurboflakeId>>
    where
        S: SleepProvider,
    {
        async move {
            if n == 0 {
                return Vec::new();
            }
            let ClaimedBatch { ids, wait } = self.claim_many(n);
            S::sleep_for(wait).await;
            ids
        }
    }

    fn id_stream<S>(&self) -> IdStream<'_, T, S>
    where
        S: SleepProvider,
    {
        IdStream::new(self)
    }
}
