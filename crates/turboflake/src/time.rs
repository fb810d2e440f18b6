use core::time::Duration;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Default epoch: Monday, September 1, 2014 00:00:00 UTC, in Unix seconds.
///
/// Identifiers encode elapsed ticks relative to this origin unless a custom
/// epoch is configured at construction.
pub const DEFAULT_EPOCH: i64 = 1_409_529_600;

/// The fixed time quantum of the timestamp field.
///
/// One tick is 10 ms; with 39 timestamp bits the field lasts roughly 174
/// years past the configured epoch.
pub const TICK: Duration = Duration::from_millis(10);

pub(crate) const TICK_NANOS: u64 = TICK.as_nanos() as u64;

/// A source of elapsed time relative to a configured epoch.
///
/// This abstraction lets the engine run against the real clock, a monotonic
/// timer, or a mocked source in tests.
///
/// Implementations should not move backward between reads within one process.
/// The engine additionally clamps to its last observed tick, so even a
/// regressing source can never produce a regressing timestamp field.
///
/// # Example
/// ```
/// use turboflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn elapsed_nanos(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.elapsed_nanos(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the number of nanoseconds elapsed since the configured epoch.
    fn elapsed_nanos(&self) -> u64;
}

/// A monotonic time source measuring elapsed time since process start, offset
/// from a user-defined epoch.
///
/// The wall clock (`SystemTime`) is read exactly once, at construction, to
/// anchor a monotonic timer (`Instant`) to the epoch. Every subsequent read is
/// a pure `Instant` delta, so NTP steps or daylight-savings adjustments can
/// never move reported time backward within one process.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    origin: Instant,
    offset_nanos: u64,
    epoch_secs: i64,
}

impl Default for MonotonicClock {
    /// Constructs a monotonic clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock using a custom epoch as the origin
    /// (t = 0), specified in Unix seconds.
    ///
    /// # Panics
    ///
    /// Panics if the current system time is earlier than the given epoch, or
    /// earlier than the Unix epoch itself.
    ///
    /// # Example
    /// ```
    /// use turboflake::{MonotonicClock, TimeSource};
    ///
    /// let clock = MonotonicClock::with_epoch(1_749_081_600);
    /// assert!(clock.elapsed_nanos() > 0);
    /// assert_eq!(clock.epoch_secs(), 1_749_081_600);
    /// ```
    pub fn with_epoch(epoch_secs: i64) -> Self {
        let origin = Instant::now();
        let system_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System clock before UNIX_EPOCH");

        let offset = i128::from(system_now.as_nanos() as u64)
            - i128::from(epoch_secs) * 1_000_000_000;
        let offset_nanos = u64::try_from(offset).expect("System clock before configured epoch");

        Self {
            origin,
            offset_nanos,
            epoch_secs,
        }
    }

    /// The configured epoch, in Unix seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.epoch_secs
    }
}

impl TimeSource for MonotonicClock {
    fn elapsed_nanos(&self) -> u64 {
        self.offset_nanos + self.origin.elapsed().as_nanos() as u64
    }
}
