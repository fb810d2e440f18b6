use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, ready};

use futures::Stream;
use pin_project_lite::pin_project;

use crate::{Claimed, TimeSource, Turboflake, TurboflakeId, futures::SleepProvider};

pin_project! {
    /// An infinite [`Stream`] of single-ID claims over a shared engine.
    ///
    /// Each item is claimed synchronously and committed before the stream
    /// suspends through `S`, so dropping the stream mid-suspension only
    /// discards the one already-claimed identifier. Zero-length waits are
    /// still routed through the provider.
    ///
    /// Created by [`TurboflakeAsyncExt::id_stream`] or a runtime convenience
    /// trait.
    ///
    /// [`TurboflakeAsyncExt::id_stream`]: crate::TurboflakeAsyncExt::id_stream
    #[must_use = "streams do nothing unless polled"]
    pub struct IdStream<'a, T, S>
    where
        T: TimeSource,
        S: SleepProvider,
    {
        generator: &'a Turboflake<T>,
        next: Option<TurboflakeId>,
        #[pin]
        sleep: Option<S::Sleep>,
    }
}

impl<'a, T, S> IdStream<'a, T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    pub(crate) fn new(generator: &'a Turboflake<T>) -> Self {
        Self {
            generator,
            next: None,
            sleep: None,
        }
    }
}

impl<T, S> Stream for IdStream<'_, T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    type Item = TurboflakeId;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<TurboflakeId>> {
        let mut this = self.project();
        loop {
            if let Some(sleep) = this.sleep.as_mut().as_pin_mut() {
                ready!(sleep.poll(cx));
                this.sleep.set(None);
                return Poll::Ready(this.next.take());
            }

            let Claimed { id, wait } = this.generator.claim();
            *this.next = Some(id);
            this.sleep.set(Some(S::sleep_for(wait)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
