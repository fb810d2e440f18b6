//! Lock-free Sonyflake-style ID generation over a pool of machine IDs.
//!
//! A [`Turboflake`] engine owns a validated set of machine identifiers
//! ("lanes") and hands out compact, time-ordered, 63-bit identifiers. When the
//! per-tick sequence of one lane is exhausted the engine rotates to the next
//! lane, multiplying per-tick throughput by the lane count before any caller
//! has to wait. All shared state lives in a single atomic word mutated only by
//! compare-and-swap, so generation never serializes unrelated threads behind a
//! lock.
//!
//! # Example
//! ```
//! use turboflake::Turboflake;
//!
//! let generator = Turboflake::new([0x1337, 0xCAFE]).unwrap();
//!
//! let a = generator.next_id();
//! let b = generator.next_id();
//! assert!(a < b);
//! ```
//!
//! Asynchronous callers layer a [`SleepProvider`] on top of the same engine;
//! see the `futures` module surface (enabled by default) and the
//! runtime-specific extension traits for `tokio` and `smol`.

mod error;
#[cfg(feature = "futures")]
mod futures;
mod generator;
mod id;
mod lcg;
mod pool;
mod time;

pub use crate::error::*;
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::lcg::*;
pub use crate::pool::*;
pub use crate::time::*;
