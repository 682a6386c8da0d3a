//! Concurrency layer for the transaction pool
//!
//! The pool's critical sections are short (a bounds check plus a bounded
//! memcpy), so contention is handled by busy-wait spinlocks rather than
//! blocking mutexes: a test-and-set `AtomicBool` with a CPU pause hint
//! between attempts, and a scoped guard that guarantees release on every
//! exit path.
//!
//! Lock ordering discipline is the callers' contract; this crate only
//! provides the primitive.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod spinlock;

pub use spinlock::{SpinLock, SpinLockGuard};
