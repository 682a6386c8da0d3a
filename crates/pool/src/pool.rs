//! The transaction pool
//!
//! `TxPool` owns the storage arena and its tick-indexed tables, validates
//! and stores incoming transactions, and serves reads for both the current
//! epoch and the retained previous-epoch tail.
//!
//! # Locking discipline
//!
//! Three spinlocks guard three resource groups, always acquired in this
//! order and released in reverse:
//!
//! 1. saved-count table
//! 2. digest table
//! 3. arena bytes + offset table (one critical section)
//!
//! Count-only accessors take only lock 1; data accessors take lock 1 to
//! check the count, release it, then take the lock their data lives under.
//! `begin_epoch` takes no lock at all: it requires `&mut self`, so the
//! borrow checker guarantees no concurrent access (see `epoch.rs`).

use tracing::{debug, info, trace, warn};

use tickpool_concurrency::SpinLock;
use tickpool_core::{
    Blake3Hasher, Digest, DigestHasher, Error, PoolConfig, SubmitError, Tick, Transaction,
    TransactionValidator, WireValidator,
};

use crate::arena::TxArena;
use crate::tables::{DigestTable, OffsetTable, SavedCounts};
use crate::window::EpochWindow;

/// Arena bytes and offset table, guarded as a single critical section.
#[derive(Debug)]
pub(crate) struct TxStore {
    pub(crate) arena: TxArena,
    pub(crate) offsets: OffsetTable,
}

/// Bounded-memory, tick-indexed transaction storage.
///
/// All buffers are allocated at construction and never grow. Multiple
/// threads may `submit` and read concurrently; epoch rotation requires
/// exclusive access (`&mut self`).
pub struct TxPool<V = WireValidator, H = Blake3Hasher> {
    config: PoolConfig,
    window: EpochWindow,
    counts: SpinLock<SavedCounts>,
    digests: SpinLock<DigestTable>,
    store: SpinLock<TxStore>,
    validator: V,
    hasher: H,
}

impl TxPool {
    /// Create a pool with the default wire validator and BLAKE3 hasher.
    pub fn new(config: PoolConfig) -> Result<TxPool, Error> {
        TxPool::with_parts(config, WireValidator::default(), Blake3Hasher)
    }
}

impl<V: TransactionValidator, H: DigestHasher> TxPool<V, H> {
    /// Create a pool with explicit collaborator implementations.
    ///
    /// Validates the configuration, then allocates and zeroes every buffer
    /// up front; allocation failure is returned, not panicked.
    pub fn with_parts(config: PoolConfig, validator: V, hasher: H) -> Result<TxPool<V, H>, Error> {
        config.validate()?;
        let rows = config.table_rows();
        let per_tick = config.max_txs_per_tick;
        let arena = TxArena::new(config.current_epoch_bytes(), config.previous_epoch_bytes())?;
        let offsets = OffsetTable::new(rows, per_tick)?;
        let digests = DigestTable::new(rows, per_tick)?;
        let counts = SavedCounts::new(rows)?;

        info!(
            target: "tickpool::pool",
            arena_bytes = arena.total_len(),
            rows,
            per_tick,
            "transaction pool allocated"
        );

        Ok(TxPool {
            window: EpochWindow::new(&config),
            config,
            counts: SpinLock::new(counts),
            digests: SpinLock::new(digests),
            store: SpinLock::new(TxStore { arena, offsets }),
            validator,
            hasher,
        })
    }

    /// The pool's sizing configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// The tick ranges currently backed by storage.
    pub fn window(&self) -> &EpochWindow {
        &self.window
    }

    /// Validate and store a transaction scheduled for a current-epoch tick.
    ///
    /// On success returns the slot index the record occupies within its
    /// tick. Rejections are all-or-nothing: no table is modified. The digest
    /// is computed over the caller's bytes before the copy; the stored copy
    /// is verbatim, so the two are bit-identical.
    pub fn submit(&self, bytes: &[u8]) -> Result<u32, SubmitError> {
        if !self.validator.is_valid(bytes) {
            debug!(target: "tickpool::pool", len = bytes.len(), "submit rejected: invalid");
            return Err(SubmitError::Invalid);
        }
        let size = self.validator.size_of(bytes).ok_or(SubmitError::Invalid)?;
        let tick = self.validator.tick_of(bytes).ok_or(SubmitError::Invalid)?;
        if !self.window.in_current(tick) {
            debug!(target: "tickpool::pool", tick, "submit rejected: outside current epoch");
            return Err(SubmitError::OutOfWindow {
                tick,
                begin: self.window.tick_begin(),
                end: self.window.tick_end(),
            });
        }
        let tick_index = self.window.index_current(tick);
        let record = bytes.get(..size).ok_or(SubmitError::Invalid)?;

        let mut counts = self.counts.lock();
        let mut digests = self.digests.lock();
        let mut store = self.store.lock();

        let slot = counts.get(tick_index) as usize;
        if slot >= self.config.max_txs_per_tick {
            return Err(SubmitError::TickFull {
                tick,
                max: self.config.max_txs_per_tick,
            });
        }
        let remaining = store.arena.remaining();
        if size > remaining {
            return Err(SubmitError::PoolFull {
                needed: size,
                remaining,
            });
        }

        let digest = self.hasher.digest(record);
        let offset = match store.arena.append(record) {
            Some(offset) => offset,
            None => {
                return Err(SubmitError::PoolFull {
                    needed: size,
                    remaining,
                })
            }
        };
        debug_assert_eq!(store.offsets.row(tick_index)[slot], 0);
        store.offsets.row_mut(tick_index)[slot] = offset;
        digests.row_mut(tick_index)[slot] = digest;
        counts.increment(tick_index);

        trace!(target: "tickpool::pool", tick, slot, size, "transaction stored");
        Ok(slot as u32)
    }

    /// Copy of the transaction stored at `(tick, index)`, if any.
    ///
    /// Resolves the tick against both windows. Offsets that fail the
    /// bounds check are treated as absent (fail closed), never followed.
    pub fn get(&self, tick: Tick, index: u32) -> Option<Transaction> {
        let tick_index = self.window.resolve(tick)?;
        if index as usize >= self.config.max_txs_per_tick {
            return None;
        }
        let saved = self.counts.lock().get(tick_index);
        if index >= saved {
            return None;
        }

        let store = self.store.lock();
        let offset = store.offsets.row(tick_index)[index as usize];
        if offset == 0 {
            warn!(target: "tickpool::pool", tick, index, "filled slot holds empty offset");
            return None;
        }
        let bytes = match store.arena.record(offset) {
            Some(bytes) => bytes.to_vec(),
            None => {
                warn!(target: "tickpool::pool", tick, index, offset, "offset fails bounds check");
                return None;
            }
        };
        drop(store);

        match Transaction::from_bytes(bytes) {
            Ok(tx) => Some(tx),
            Err(e) => {
                warn!(target: "tickpool::pool", tick, index, error = %e, "stored record unframeable");
                None
            }
        }
    }

    /// Digest of the transaction stored at `(tick, index)`, if any.
    pub fn digest(&self, tick: Tick, index: u32) -> Option<Digest> {
        let tick_index = self.window.resolve(tick)?;
        if index as usize >= self.config.max_txs_per_tick {
            return None;
        }
        let saved = self.counts.lock().get(tick_index);
        if index >= saved {
            return None;
        }
        let digests = self.digests.lock();
        Some(digests.row(tick_index)[index as usize])
    }

    /// Number of transactions stored for `tick`, `0` if the tick is not in
    /// either window.
    pub fn tick_tx_count(&self, tick: Tick) -> u32 {
        let counts = self.counts.lock();
        if self.window.in_previous(tick) {
            counts.get(self.window.index_previous(tick))
        } else if self.window.in_current(tick) {
            counts.get(self.window.index_current(tick))
        } else {
            0
        }
    }

    /// Number of stored transactions scheduled strictly later than `tick`,
    /// summed across both windows.
    pub fn pending_tx_count(&self, tick: Tick) -> u32 {
        let w = &self.window;
        let mut start = w.tick_end();
        let mut old_start = w.old_tick_end();

        if tick < w.old_tick_begin() || (w.old_tick_begin() == 0 && tick < w.tick_begin()) {
            // before everything tracked: count both windows in full
            start = w.tick_begin();
            old_start = w.old_tick_begin();
        } else if w.in_previous(tick) {
            start = w.tick_begin();
            old_start = tick + 1;
        } else if w.in_current(tick) {
            start = tick + 1;
        }

        let counts = self.counts.lock();
        let mut total = 0u32;
        for t in start..w.tick_end() {
            total += counts.get(w.index_current(t));
        }
        for t in old_start..w.old_tick_end() {
            total += counts.get(w.index_previous(t));
        }
        total
    }

    pub(crate) fn parts_mut(
        &mut self,
    ) -> (
        &mut EpochWindow,
        &mut SavedCounts,
        &mut DigestTable,
        &mut TxStore,
        &PoolConfig,
        &V,
    ) {
        (
            &mut self.window,
            self.counts.get_mut(),
            self.digests.get_mut(),
            self.store.get_mut(),
            &self.config,
            &self.validator,
        )
    }

    pub(crate) fn validator(&self) -> &V {
        &self.validator
    }

    pub(crate) fn locks(
        &self,
    ) -> (
        &SpinLock<SavedCounts>,
        &SpinLock<DigestTable>,
        &SpinLock<TxStore>,
    ) {
        (&self.counts, &self.digests, &self.store)
    }
}

impl<V: TransactionValidator, H: DigestHasher> std::fmt::Debug for TxPool<V, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxPool")
            .field("window", &self.window)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
