use core::fmt;

use portable_atomic::{AtomicU32, Ordering};

/// Multiplier and increment of the 16-bit machine-id LCG.
///
/// With modulus 2^16 these satisfy the full-period conditions for
/// power-of-two moduli: the increment is odd and the multiplier is congruent
/// to 1 mod 4, so every seed yields a permutation of the whole space.
const LCG_MULTIPLIER: u32 = 32309;
const LCG_INCREMENT: u32 = 13799;

/// A full-period linear congruential generator over the 16-bit machine-id
/// space.
///
/// Starting from any seed, 65536 successive draws yield every value in
/// `[0, 65536)` exactly once, after which the sequence repeats. That makes the
/// generator a convenient source of duplicate-free pseudo-random machine IDs:
/// the first `n <= 65536` draws are guaranteed distinct and can be fed
/// straight into a [`Turboflake`] engine.
///
/// State advances through an atomic compare-and-swap, so a single shared
/// instance may be drawn from by many threads; no draw is ever observed
/// twice.
///
/// # Example
/// ```
/// use turboflake::{MachineIdLcg, Turboflake};
///
/// // Sixteen distinct, hard-to-guess machine IDs from one seed.
/// let lcg = MachineIdLcg::new(0xBEEF);
/// let generator = Turboflake::new(lcg.take(16)).unwrap();
/// let _id = generator.next_id();
/// ```
///
/// [`Turboflake`]: crate::Turboflake
#[derive(Debug)]
pub struct MachineIdLcg {
    state: AtomicU32,
}

impl MachineIdLcg {
    /// Creates a generator from an integer seed.
    ///
    /// Any seed is accepted; the produced sequence depends only on the seed
    /// modulo 2^16. Identical seeds produce identical sequences.
    pub const fn new(seed: u32) -> Self {
        Self {
            state: AtomicU32::new(seed),
        }
    }

    /// Draws the next machine ID, advancing the shared state atomically.
    pub fn next_id(&self) -> u16 {
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let next = u32::from(Self::step(current));
            match self.state.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next as u16,
                Err(observed) => current = observed,
            }
        }
    }

    /// One LCG step, reduced to the 16-bit output space.
    ///
    /// Multiplication wraps deliberately: `(a * x mod 2^32) mod 2^16` equals
    /// `a * x mod 2^16`, so seeds above 2^16 behave as their reduction.
    const fn step(x: u32) -> u16 {
        (LCG_MULTIPLIER.wrapping_mul(x).wrapping_add(LCG_INCREMENT) & 0xFFFF) as u16
    }
}

impl Iterator for MachineIdLcg {
    type Item = u16;

    /// Lazily yields the infinite machine-id sequence; each full period of
    /// 65536 draws is a permutation of `[0, 65536)`.
    fn next(&mut self) -> Option<u16> {
        Some(self.next_id())
    }
}

impl fmt::Display for MachineIdLcg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MachineIdLcg({})", self.state.load(Ordering::Relaxed))
    }
}
