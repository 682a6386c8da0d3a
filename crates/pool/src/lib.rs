//! Tick-indexed transaction pool
//!
//! Bounded-memory storage for transactions scheduled against the ticks of
//! the current epoch, plus a short retained tail of the previous epoch:
//!
//! - [`arena`]: the pre-allocated byte buffer records live in
//! - [`tables`]: tick-indexed offset, digest, and saved-count tables
//! - [`window`]: the two tick ranges backed by storage
//! - [`pool`]: the [`TxPool`] API (submit, reads, counts)
//! - [`epoch`]: seamless and cold epoch rotation
//! - [`audit`]: full-state consistency verification
//!
//! Submits and reads are thread-safe behind internal spinlocks; epoch
//! rotation requires `&mut TxPool`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arena;
pub mod audit;
pub mod epoch;
pub mod pool;
pub mod tables;
pub mod window;

pub use arena::TxArena;
pub use pool::TxPool;
pub use tables::{DigestTable, OffsetTable, SavedCounts};
pub use window::EpochWindow;
