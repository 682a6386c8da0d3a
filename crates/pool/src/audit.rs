//! Full-state consistency audit
//!
//! [`TxPool::verify`] walks every table row and stored record and checks
//! the structural invariants the pool maintains. It is meant for tests and
//! for operational spot checks after a rotation; it takes all three locks
//! (in the usual order) and holds them for the whole walk, so it stalls
//! concurrent submitters while it runs.

use tickpool_core::{Error, Tick, TransactionValidator, FIRST_TX_OFFSET};

use crate::pool::TxPool;

impl<V: TransactionValidator, H: tickpool_core::DigestHasher> TxPool<V, H> {
    /// Check every structural invariant of the pool's state.
    ///
    /// Returns `Error::Corruption` naming the first violation found.
    pub fn verify(&self) -> Result<(), Error> {
        let window = self.window();
        let config = self.config();

        if window.tick_begin() != 0 {
            // the window saturates at u32::MAX instead of wrapping
            let expected = window
                .tick_begin()
                .saturating_add(config.max_ticks_per_epoch);
            if window.tick_end() != expected {
                return Err(corrupt(format!(
                    "current window ends at {}, expected {expected}",
                    window.tick_end()
                )));
            }
        } else if window.tick_end() != 0 {
            return Err(corrupt("tick_end set while tick_begin is zero".into()));
        }
        if window.old_tick_end() != 0 {
            if window.old_tick_end() != window.tick_begin() {
                return Err(corrupt(format!(
                    "previous window ends at {} but current begins at {}",
                    window.old_tick_end(),
                    window.tick_begin()
                )));
            }
            let retained = window.old_tick_end() - window.old_tick_begin();
            if retained > config.retention_ticks {
                return Err(corrupt(format!(
                    "{retained} retained ticks exceed the {} tick limit",
                    config.retention_ticks
                )));
            }
        } else if window.old_tick_begin() != 0 {
            return Err(corrupt("old_tick_begin set while old_tick_end is zero".into()));
        }

        let (counts_lock, digests_lock, store_lock) = self.locks();
        let counts = counts_lock.lock();
        let _digests = digests_lock.lock();
        let store = store_lock.lock();

        let cursor = store.arena.cursor() as usize;
        if cursor < FIRST_TX_OFFSET || cursor > store.arena.current_len() {
            return Err(corrupt(format!("cursor {cursor} outside current region")));
        }

        // rows not covered by either window must stay zeroed
        let max_rows = config.max_ticks_per_epoch as usize;
        let retained = (window.old_tick_end() - window.old_tick_begin()) as usize;
        let first_dead = if window.tick_begin() == 0 { 0 } else { max_rows + retained };
        for row in first_dead..config.table_rows() {
            let count = counts.get(row);
            if count != 0 {
                return Err(corrupt(format!("dead row {row} holds count {count}")));
            }
        }

        let mut max_current_end = FIRST_TX_OFFSET;
        for tick in window.tick_begin()..window.tick_end() {
            let row = window.index_current(tick);
            let end = self.verify_row(&counts, &store, row, tick, false)?;
            max_current_end = max_current_end.max(end);
        }
        if max_current_end != cursor {
            return Err(corrupt(format!(
                "records end at {max_current_end} but cursor is {cursor}"
            )));
        }
        for tick in window.old_tick_begin()..window.old_tick_end() {
            let row = window.index_previous(tick);
            self.verify_row(&counts, &store, row, tick, true)?;
        }

        Ok(())
    }

    fn verify_row(
        &self,
        counts: &crate::tables::SavedCounts,
        store: &crate::pool::TxStore,
        row: usize,
        tick: Tick,
        previous: bool,
    ) -> Result<usize, Error> {
        let count = counts.get(row) as usize;
        if count > self.config().max_txs_per_tick {
            return Err(corrupt(format!("tick {tick} count {count} exceeds row size")));
        }
        let offsets = store.offsets.row(row);
        let mut max_end = FIRST_TX_OFFSET;
        for (slot, &offset) in offsets.iter().enumerate() {
            if slot >= count {
                if offset != 0 {
                    return Err(corrupt(format!(
                        "tick {tick} slot {slot} filled past count {count}"
                    )));
                }
                continue;
            }
            if offset == 0 {
                return Err(corrupt(format!("tick {tick} slot {slot} empty below count")));
            }
            let offset_us = offset as usize;
            let in_previous_region = offset_us >= store.arena.current_len();
            if previous != in_previous_region {
                return Err(corrupt(format!(
                    "tick {tick} slot {slot} offset {offset} in the wrong arena region"
                )));
            }
            let record = store.arena.record(offset).ok_or_else(|| {
                corrupt(format!("tick {tick} slot {slot} offset {offset} unreadable"))
            })?;
            if !self.validator().is_valid(record) {
                return Err(corrupt(format!("tick {tick} slot {slot} record invalid")));
            }
            match self.validator().tick_of(record) {
                Some(t) if t == tick => {}
                other => {
                    return Err(corrupt(format!(
                        "tick {tick} slot {slot} record scheduled for {other:?}"
                    )));
                }
            }
            max_end = max_end.max(offset_us + record.len());
        }
        Ok(max_end)
    }
}

fn corrupt(detail: String) -> Error {
    Error::Corruption(detail)
}
