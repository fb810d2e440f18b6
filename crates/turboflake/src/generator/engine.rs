use core::fmt;
use core::time::Duration;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::time::TICK_NANOS;
use crate::{DEFAULT_EPOCH, MachineIdPool, MonotonicClock, Result, TimeSource, TurboflakeId};

/// Bits of engine state below the tick: lane index (16) plus sequence (8).
///
/// The packed state deliberately mirrors the identifier layout, except that
/// the middle field holds the *rotation index* of the lane rather than its
/// machine-id value; the index is resolved through the pool when an ID is
/// composed.
const COMBINED_BITS: u32 = TurboflakeId::MACHINE_ID_BITS + TurboflakeId::SEQUENCE_BITS;
const COMBINED_MASK: u64 = (1 << COMBINED_BITS) - 1;

/// One successfully claimed identifier.
///
/// The claim is already committed: the ID belongs to the caller even if the
/// accompanying `wait` is never honored. A non-zero `wait` means the ID was
/// taken from a tick that has not started yet (every lane's sequence for the
/// current tick was exhausted), and the caller should pause for that long
/// before handing the ID onward so issuance never outruns real time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claimed {
    /// The claimed identifier.
    pub id: TurboflakeId,
    /// How long the caller should pause before using the ID.
    pub wait: Duration,
}

/// The result of a batch claim: all requested identifiers plus a single
/// aggregated wait covering every tick borrowed while filling the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedBatch {
    /// The claimed identifiers, in claim order.
    pub ids: Vec<TurboflakeId>,
    /// Single wait to honor for the whole batch (zero when the batch never
    /// ran ahead of the clock).
    pub wait: Duration,
}

/// A lock-free multi-lane ID generator.
///
/// The engine packs its entire mutable state (current tick, lane rotation
/// index, and sequence) into one [`AtomicU64`] and mutates it exclusively
/// through a compare-and-swap retry loop. Claims from any number of threads
/// proceed without a mutex; contention costs only bounded CAS retries.
///
/// Within one tick, capacity is `lanes * 256` identifiers: when a lane's
/// 8-bit sequence is exhausted the engine rotates to the next lane (ascending
/// machine-id order) with a fresh sequence. Only when the last lane is also
/// exhausted does a claim borrow the *next* tick, and the claimer is told how
/// long to wait for that tick to begin.
///
/// ## Features
/// - ✅ Thread-safe, lock-free
/// - ✅ Per-thread claims are strictly increasing
/// - ✅ Globally unique per engine instance
///
/// # Example
/// ```
/// use turboflake::Turboflake;
///
/// let generator = Turboflake::new([0x1337]).unwrap();
/// let id = generator.next_id();
/// assert_eq!(id.machine_id(), 0x1337);
/// ```
#[derive(Debug)]
pub struct Turboflake<T: TimeSource = MonotonicClock> {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    pool: MachineIdPool,
    /// `lanes * (SEQUENCE_MAX + 1)`, the identifier capacity of one tick.
    capacity: u64,
    time: T,
}

impl Turboflake<MonotonicClock> {
    /// Creates an engine over the given machine IDs, with ticks counted from
    /// [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the machine-id set is empty, larger
    /// than the 65536-value space, out of range, or contains duplicates.
    pub fn new<I>(machine_ids: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        Self::with_epoch(machine_ids, DEFAULT_EPOCH)
    }

    /// Creates an engine with a custom epoch, given in Unix seconds.
    ///
    /// # Errors
    ///
    /// Returns a configuration error under the same conditions as
    /// [`Self::new`].
    ///
    /// # Example
    /// ```
    /// use turboflake::Turboflake;
    ///
    /// let generator = Turboflake::with_epoch([0x0000, 0x7F7F, 0xFFFF], 1_749_081_600).unwrap();
    /// assert_eq!(
    ///     generator.to_string(),
    ///     "Turboflake(0, 32639, 65535, start_time=1749081600)"
    /// );
    /// ```
    pub fn with_epoch<I>(machine_ids: I, start_time: i64) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        let pool = MachineIdPool::new(machine_ids)?;
        Ok(Self::from_parts(pool, MonotonicClock::with_epoch(start_time)))
    }
}

impl<T: TimeSource> Turboflake<T> {
    /// Assembles an engine from an already-validated pool and an explicit
    /// time source.
    ///
    /// This is the constructor to reach for in tests (inject a mock
    /// [`TimeSource`]) or when several engines should share one clock.
    pub fn from_parts(pool: MachineIdPool, time: T) -> Self {
        // Tick 0 is strictly before any tick the clock will report, so the
        // first claim always observes a newer tick and starts fresh at
        // sequence 0.
        let initial = Self::pack(0, 0);
        let capacity = pool.len() as u64 * (TurboflakeId::SEQUENCE_MASK + 1);
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(initial)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(initial),
            pool,
            capacity,
            time,
        }
    }

    /// The configured machine IDs, in lane rotation order.
    pub fn machine_ids(&self) -> &[u16] {
        self.pool.lanes()
    }

    /// Claims one identifier without pausing.
    ///
    /// The returned [`Claimed`] carries the committed ID plus the wait the
    /// caller should honor before releasing it (zero unless the current
    /// tick's capacity was exhausted). Claiming is total: it cannot fail.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn claim(&self) -> Claimed {
        let elapsed = self.time.elapsed_nanos();
        let now_tick = elapsed / TICK_NANOS;

        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let (next_tick, next_combined) = self.advance(current, now_tick);
            match self.state.compare_exchange_weak(
                current,
                Self::pack(next_tick, next_combined),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    // Borrowed a not-yet-started tick: every lane of the
                    // current tick was exhausted.
                    let wait = if next_combined == 0 && next_tick > now_tick {
                        Duration::from_nanos(
                            (next_tick * TICK_NANOS).saturating_sub(elapsed),
                        )
                    } else {
                        Duration::ZERO
                    };
                    return Claimed {
                        id: self.compose(next_tick, next_combined),
                        wait,
                    };
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Claims `n` identifiers with at most one aggregated wait.
    ///
    /// The time source is read once up front (and once more at the end if the
    /// batch borrowed more than one tick, since composing a large batch takes
    /// time itself). Ticks borrowed while filling the batch are folded into a
    /// single `wait`, so a caller pauses at most once per batch instead of
    /// once per overflow.
    ///
    /// `n = 0` returns an empty batch and zero wait without touching engine
    /// state or the clock.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn claim_many(&self, n: usize) -> ClaimedBatch {
        let mut ids = Vec::with_capacity(n);
        if n == 0 {
            return ClaimedBatch {
                ids,
                wait: Duration::ZERO,
            };
        }

        let elapsed = self.time.elapsed_nanos();
        let now_tick = elapsed / TICK_NANOS;
        let mut last_tick = now_tick;

        for _ in 0..n {
            let mut current = self.state.load(Ordering::Relaxed);
            loop {
                let (next_tick, next_combined) = self.advance(current, now_tick);
                match self.state.compare_exchange_weak(
                    current,
                    Self::pack(next_tick, next_combined),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        ids.push(self.compose(next_tick, next_combined));
                        last_tick = next_tick;
                        break;
                    }
                    Err(observed) => current = observed,
                }
            }
        }

        let ahead = last_tick - now_tick;
        let wait = if ahead == 0 {
            Duration::ZERO
        } else {
            let elapsed = if ahead > 1 {
                self.time.elapsed_nanos()
            } else {
                elapsed
            };
            Duration::from_nanos((last_tick * TICK_NANOS).saturating_sub(elapsed))
        };

        ClaimedBatch { ids, wait }
    }

    /// Claims one identifier, sleeping out any required wait inline.
    pub fn next_id(&self) -> TurboflakeId {
        let Claimed { id, wait } = self.claim();
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        id
    }

    /// Claims `n` identifiers, sleeping out the single aggregated wait
    /// inline.
    pub fn next_ids(&self, n: usize) -> Vec<TurboflakeId> {
        let ClaimedBatch { ids, wait } = self.claim_many(n);
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        ids
    }

    /// An infinite iterator of single-ID claims.
    ///
    /// The iterator holds no state of its own beyond a borrow of the engine:
    /// every access path on the same engine (other iterators, direct claims,
    /// async tasks) shares the same atomic state and never observes a
    /// duplicate.
    pub fn iter(&self) -> IdIter<'_, T> {
        IdIter { generator: self }
    }

    /// Computes the successor of `current` given the tick just read from the
    /// time source.
    ///
    /// Never moves the tick backward: a stale (regressed) `now_tick` simply
    /// fails the first arm and sequence allocation continues in the last
    /// observed tick.
    fn advance(&self, current: u64, now_tick: u64) -> (u64, u64) {
        let (tick, combined) = Self::unpack(current);
        if tick < now_tick {
            (now_tick, 0)
        } else {
            let combined = (combined + 1) % self.capacity;
            if combined == 0 {
                (tick + 1, 0)
            } else {
                (tick, combined)
            }
        }
    }

    fn compose(&self, tick: u64, combined: u64) -> TurboflakeId {
        let lane = (combined >> TurboflakeId::SEQUENCE_BITS) as usize;
        TurboflakeId::from(
            tick,
            u64::from(self.pool.machine_id(lane)),
            combined & TurboflakeId::SEQUENCE_MASK,
        )
    }

    fn pack(tick: u64, combined: u64) -> u64 {
        debug_assert!(tick <= TurboflakeId::TIMESTAMP_MASK, "tick overflow");
        debug_assert!(combined <= COMBINED_MASK, "combined overflow");
        (tick << COMBINED_BITS) | combined
    }

    fn unpack(state: u64) -> (u64, u64) {
        (state >> COMBINED_BITS, state & COMBINED_MASK)
    }
}

impl<'a, T: TimeSource> IntoIterator for &'a Turboflake<T> {
    type Item = TurboflakeId;
    type IntoIter = IdIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Infinite iterator over single-ID claims; see [`Turboflake::iter`].
///
/// Each `next()` sleeps out its own overflow wait inline, exactly like
/// [`Turboflake::next_id`].
pub struct IdIter<'a, T: TimeSource> {
    generator: &'a Turboflake<T>,
}

impl<T: TimeSource> Iterator for IdIter<'_, T> {
    type Item = TurboflakeId;

    fn next(&mut self) -> Option<TurboflakeId> {
        Some(self.generator.next_id())
    }
}

impl fmt::Display for Turboflake<MonotonicClock> {
    /// Renders the configured machine IDs (in lane order) and the epoch:
    /// `Turboflake(0, 32639, 65535, start_time=1749081600)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Turboflake(")?;
        for machine_id in self.pool.lanes() {
            write!(f, "{machine_id}, ")?;
        }
        write!(f, "start_time={})", self.time.epoch_secs())
    }
}
