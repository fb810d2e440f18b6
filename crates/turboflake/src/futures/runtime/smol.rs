use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use core::time::Duration;

use pin_project_lite::pin_project;

use crate::{
    TimeSource, Turboflake, TurboflakeId,
    futures::{IdStream, SleepProvider},
};

/// An implementation of [`SleepProvider`] using Smol's timer.
///
/// This is the default provider for use in async applications built on Smol.
pub struct SmolSleep;

impl SleepProvider for SmolSleep {
    type Sleep = SmolSleepFuture;

    fn sleep_for(dur: Duration) -> Self::Sleep {
        SmolSleepFuture {
            timer: smol::Timer::after(dur),
        }
    }
}

pin_project! {
    /// Adapts [`smol::Timer`] (which resolves to the fire instant) to the
    /// unit-output future the [`SleepProvider`] contract requires.
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct SmolSleepFuture {
        #[pin]
        timer: smol::Timer,
    }
}

impl Future for SmolSleepFuture {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.project().timer.poll(cx).map(|_| ())
    }
}

/// Extension trait for asynchronously claiming IDs on the
/// [`smol`](https://docs.rs/smol) runtime.
///
/// The methods mirror [`TurboflakeAsyncExt`](crate::TurboflakeAsyncExt) with
/// [`SmolSleep`] pre-selected, so no provider type parameter is needed at the
/// call site.
///
/// # Example
/// ```
/// use turboflake::{Turboflake, TurboflakeAsyncSmolExt};
///
/// smol::block_on(async {
///     let generator = Turboflake::new([0xCAFE]).unwrap();
///     let id = generator.next_id_async().await;
///     assert_eq!(id.machine_id(), 0xCAFE);
/// });
/// ```
pub trait TurboflakeAsyncSmolExt<T>
where
    T: TimeSource,
{
    /// Resolves to the next identifier using [`SmolSleep`].
    fn next_id_async(&self) -> impl Future<Output = TurboflakeId>;

    /// Resolves to `n` identifiers with exactly one suspension, using
    /// [`SmolSleep`].
    fn next_ids_async(&self, n: usize) -> impl Future<Output = Vec<TurboflakeId>>;

    /// An infinite stream of claims driven by [`SmolSleep`].
    fn id_stream(&self) -> IdStream<'_, T, SmolSleep>;
}

impl<T> TurboflakeAsyncSmolExt<T> for Turboflake<T>
where
    T: TimeSource,
{
    fn next_id_async(&self) -> impl Future<Output = TurboflakeId> {
        crate::futures::TurboflakeAsyncExt::next_id_async::<SmolSleep>(self)
    }

    fn next_ids_async(&self, n: usize) -> impl Future<Output = Vec<TurboflakeId>> {
        crate::futures::TurboflakeAsyncExt::next_ids_async::<SmolSleep>(self, n)
    }

    fn id_stream(&self) -> IdStream<'_, T, SmolSleep> {
        crate::futures::TurboflakeAsyncExt::id_stream::<SmolSleep>(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use futures::StreamExt;

    use super::*;
    use crate::{Turboflake, TurboflakeId};

    fn assert_unique_and_strictly_increasing(ids: &[TurboflakeId]) {
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            assert!(seen.insert(id.to_raw()), "duplicate ID: {id:?}");
        }
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "not increasing: {:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn single_await_produces_an_id() {
        smol::block_on(async {
            let generator = Turboflake::new([0xCAFE]).unwrap();
            let id = generator.next_id_async().await;
            assert_eq!(id.machine_id(), 0xCAFE);
        });
    }

    #[test]
    fn batch_and_stream_share_engine_state() {
        smol::block_on(async {
            let generator = Turboflake::new([1, 2]).unwrap();

            let mut ids = generator.next_ids_async(200).await;
            ids.extend(generator.id_stream().take(200).collect::<Vec<_>>().await);
            for _ in 0..100 {
                ids.push(generator.next_id_async().await);
            }

            assert_unique_and_strictly_increasing(&ids);
        });
    }
}
