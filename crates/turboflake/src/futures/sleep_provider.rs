use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use core::time::Duration;

/// A trait that abstracts over how to suspend for a given [`Duration`] in
/// async contexts.
///
/// This is the injected suspend capability of the async surface: the engine
/// decides *how long* a caller must pause, the provider decides *how* that
/// pause happens, which keeps the engine generic over runtimes like `tokio`
/// or `smol` (or a test double).
///
/// A provider is handed zero-length durations too: the async surface routes
/// every claim through the provider so cooperative schedulers get a chance to
/// run other work even when no wait is required.
pub trait SleepProvider {
    /// We require `Send` so that the future can be safely moved across
    /// threads.
    type Sleep: Future<Output = ()> + Send;

    fn sleep_for(dur: Duration) -> Self::Sleep;
}

/// A runtime-agnostic [`SleepProvider`] that ignores the duration and yields
/// to the scheduler exactly once.
///
/// This avoids timer-based delays entirely, which can improve latency when
/// overflow waits are rare. Under sustained overflow it degenerates into a
/// polling loop, so timer-backed providers are the better default for
/// high-throughput workloads.
pub struct YieldSleep;

impl SleepProvider for YieldSleep {
    type Sleep = YieldNow;

    fn sleep_for(_dur: Duration) -> Self::Sleep {
        YieldNow { yielded: false }
    }
}

/// A future that returns `Pending` once, waking itself immediately, and
/// completes on the next poll.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
