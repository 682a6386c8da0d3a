//! Epoch rotation
//!
//! `begin_epoch` moves the pool to a new epoch. When the new epoch starts
//! inside the outgoing one (the node kept running across the boundary), the
//! newest ticks are retained: their arena bytes are carried into the
//! previous-epoch region and their table rows are rewritten into the
//! previous-epoch rows, with offsets rebased and evicted entries compacted
//! out. Any other start (first epoch after boot, or a jump outside the
//! tracked range) wipes everything.
//!
//! Rotation takes `&mut self` and therefore holds no lock: exclusive access
//! is a compile-time fact, not a runtime protocol. Callers that share the
//! pool behind an `Arc` must rotate before sharing or through their own
//! exclusive reference (e.g. a `RwLock` write guard around the whole pool).

use tracing::{debug, info};

use tickpool_core::{Digest, DigestHasher, Tick, TransactionValidator};

use crate::pool::TxPool;

impl<V: TransactionValidator, H: DigestHasher> TxPool<V, H> {
    /// Start a new epoch whose first tick is `new_first_tick`.
    ///
    /// Seamless when the outgoing epoch tracked `new_first_tick` as a later
    /// tick of its own range; otherwise a cold start that drops all stored
    /// data.
    pub fn begin_epoch(&mut self, new_first_tick: Tick) {
        let seamless = self.window().tick_begin() != 0
            && self.window().tick_begin() < new_first_tick
            && self.window().in_current(new_first_tick);
        if seamless {
            self.rotate_seamless(new_first_tick);
        } else {
            self.rotate_cold(new_first_tick);
        }
    }

    fn rotate_seamless(&mut self, new_first_tick: Tick) {
        let (window, counts, digests, store, config, validator) = self.parts_mut();
        let max_rows = config.max_ticks_per_epoch as usize;
        let prev_rows = config.table_rows() - max_rows;
        let (retained_begin, retained_end) = window.candidate_retained(new_first_tick);

        // stale previous-epoch rows go first; retained rows overwrite some
        // of them below
        store.offsets.clear_rows(max_rows, prev_rows);
        digests.clear_rows(max_rows, prev_rows);
        counts.clear_range(max_rows, prev_rows);

        let (first_kept, shift) = store.arena.carry_suffix_to_previous();

        // previous-epoch row indices are relative to the retained begin
        window.set_retained(retained_begin, retained_end);
        let mut carried = 0u32;
        let mut evicted = 0u32;
        for tick in retained_begin..retained_end {
            let src = window.index_current(tick);
            let dst = window.index_previous(tick);
            store.offsets.rebase_into(src, dst, first_kept, shift);
            digests.copy_row(src, dst);
            counts.copy(src, dst);

            let count = counts.get(dst) as usize;
            let row = store.offsets.row(dst);
            // offsets in a row grow with submit order, so lost entries form
            // a prefix of zeros
            let gap = row[..count].iter().position(|&o| o != 0).unwrap_or(count);
            if gap > 0 {
                let kept = count - gap;
                let offsets_row = store.offsets.row_mut(dst);
                offsets_row.copy_within(gap..count, 0);
                offsets_row[kept..count].fill(0);
                let digests_row = digests.row_mut(dst);
                digests_row.copy_within(gap..count, 0);
                digests_row[kept..count].fill(Digest::ZERO);
                *counts.slot_mut(dst) = kept as u32;
            }

            for &offset in &store.offsets.row(dst)[..counts.get(dst) as usize] {
                debug_assert!(offset != 0);
                debug_assert!(store
                    .arena
                    .record(offset)
                    .and_then(|r| validator.tick_of(r))
                    .is_some_and(|t| t == tick));
            }
            carried += counts.get(dst);
            evicted += count as u32 - counts.get(dst);
        }

        store.arena.wipe_current();
        store.offsets.clear_rows(0, max_rows);
        digests.clear_rows(0, max_rows);
        counts.clear_range(0, max_rows);

        let old_end = window.tick_end();
        window.advance(new_first_tick);
        debug!(
            target: "tickpool::epoch",
            retained_begin,
            retained_end,
            carried,
            evicted,
            "previous-epoch tail retained"
        );
        info!(
            target: "tickpool::epoch",
            new_first_tick,
            old_end,
            "seamless epoch transition"
        );
    }

    fn rotate_cold(&mut self, new_first_tick: Tick) {
        let (window, counts, digests, store, _, _) = self.parts_mut();
        store.arena.wipe_all();
        store.offsets.clear_all();
        digests.clear_all();
        counts.clear_all();
        window.clear_retained();
        window.advance(new_first_tick);
        info!(target: "tickpool::epoch", new_first_tick, "cold epoch start");
    }
}
