//! Tickpool - bounded-memory transaction pool for tick-based ledgers
//!
//! Tickpool stores the transactions a node has accepted for the ticks of
//! the current epoch, indexed by `(tick, slot)`, in memory that is
//! allocated once and never grows. Across an epoch boundary it retains a
//! short tail of the outgoing epoch so late lookups keep working.
//!
//! # Quick Start
//!
//! ```ignore
//! use tickpool::{PoolConfig, TxPool};
//!
//! let mut pool = TxPool::new(PoolConfig::default())?;
//! pool.begin_epoch(1_000_000);
//!
//! let slot = pool.submit(&wire_bytes)?;
//! let tx = pool.get(1_000_123, slot);
//! ```
//!
//! # Architecture
//!
//! The workspace splits into three crates. `tickpool-core` holds the wire
//! format, configuration, validation and hashing seams; `tickpool-concurrency`
//! the spinlock the pool synchronizes with; `tickpool-pool` the arena,
//! tables, and the [`TxPool`] itself. This facade re-exports the public
//! API.

pub use tickpool_core::{
    Blake3Hasher, ConfigError, Digest, DigestHasher, Error, FrameError, PoolConfig, Result,
    SubmitError, Tick, Transaction, TransactionValidator, TxHeader, WireValidator,
};
pub use tickpool_pool::{EpochWindow, TxPool};
