//! Tick-indexed slot tables
//!
//! Three parallel tables addressed by tick index and slot:
//! - [`OffsetTable`]: byte offsets into the arena, `0` = empty slot
//! - [`DigestTable`]: digest per stored transaction
//! - [`SavedCounts`]: how many leading slots of each tick row are filled
//!
//! Rows `[0, max_ticks_per_epoch)` belong to the current epoch; rows from
//! `max_ticks_per_epoch` upward hold the retained previous-epoch ticks.
//! Slots in a row are always filled contiguously from index 0; the rotation
//! restores this invariant after evicting entries.

use tickpool_core::{Digest, Error};

/// Per-(tick, slot) byte offsets into the arena.
#[derive(Debug)]
pub struct OffsetTable {
    slots: Vec<u64>,
    per_tick: usize,
}

impl OffsetTable {
    /// Allocate a zeroed table of `rows * per_tick` slots.
    pub fn new(rows: usize, per_tick: usize) -> Result<OffsetTable, Error> {
        let slots = alloc_zeroed(rows * per_tick, 0u64, "offset table")?;
        Ok(OffsetTable { slots, per_tick })
    }

    /// Slots per tick row.
    #[inline]
    pub fn per_tick(&self) -> usize {
        self.per_tick
    }

    /// The slot row for a tick index.
    #[inline]
    pub fn row(&self, tick_index: usize) -> &[u64] {
        &self.slots[tick_index * self.per_tick..(tick_index + 1) * self.per_tick]
    }

    /// Mutable slot row for a tick index.
    #[inline]
    pub fn row_mut(&mut self, tick_index: usize) -> &mut [u64] {
        &mut self.slots[tick_index * self.per_tick..(tick_index + 1) * self.per_tick]
    }

    /// Rewrite the offsets of one retained tick into its previous-epoch row.
    ///
    /// Entries below `first_kept` reference bytes that were not carried over
    /// and become the empty sentinel; surviving entries move by `+shift`.
    /// `src_row` must be a current-epoch row and `dst_row` a previous-epoch
    /// row (so `src_row < dst_row`).
    pub fn rebase_into(&mut self, src_row: usize, dst_row: usize, first_kept: u64, shift: u64) {
        debug_assert!(src_row < dst_row);
        let (head, tail) = self.slots.split_at_mut(dst_row * self.per_tick);
        let src = &head[src_row * self.per_tick..(src_row + 1) * self.per_tick];
        let dst = &mut tail[..self.per_tick];
        for (dst_slot, &offset) in dst.iter_mut().zip(src.iter()) {
            *dst_slot = if offset == 0 || offset < first_kept {
                0
            } else {
                offset + shift
            };
        }
    }

    /// Zero `count` rows starting at `first_row`.
    pub fn clear_rows(&mut self, first_row: usize, count: usize) {
        self.slots[first_row * self.per_tick..(first_row + count) * self.per_tick].fill(0);
    }

    /// Zero the whole table.
    pub fn clear_all(&mut self) {
        self.slots.fill(0);
    }
}

/// Per-(tick, slot) transaction digests, parallel to [`OffsetTable`].
#[derive(Debug)]
pub struct DigestTable {
    slots: Vec<Digest>,
    per_tick: usize,
}

impl DigestTable {
    /// Allocate a zeroed table of `rows * per_tick` digests.
    pub fn new(rows: usize, per_tick: usize) -> Result<DigestTable, Error> {
        let slots = alloc_zeroed(rows * per_tick, Digest::ZERO, "digest table")?;
        Ok(DigestTable { slots, per_tick })
    }

    /// The digest row for a tick index.
    #[inline]
    pub fn row(&self, tick_index: usize) -> &[Digest] {
        &self.slots[tick_index * self.per_tick..(tick_index + 1) * self.per_tick]
    }

    /// Mutable digest row for a tick index.
    #[inline]
    pub fn row_mut(&mut self, tick_index: usize) -> &mut [Digest] {
        &mut self.slots[tick_index * self.per_tick..(tick_index + 1) * self.per_tick]
    }

    /// Copy a whole row; `src_row < dst_row` as in
    /// [`OffsetTable::rebase_into`].
    pub fn copy_row(&mut self, src_row: usize, dst_row: usize) {
        debug_assert!(src_row < dst_row);
        let (head, tail) = self.slots.split_at_mut(dst_row * self.per_tick);
        tail[..self.per_tick]
            .copy_from_slice(&head[src_row * self.per_tick..(src_row + 1) * self.per_tick]);
    }

    /// Zero `count` rows starting at `first_row`.
    pub fn clear_rows(&mut self, first_row: usize, count: usize) {
        self.slots[first_row * self.per_tick..(first_row + count) * self.per_tick]
            .fill(Digest::ZERO);
    }

    /// Zero the whole table.
    pub fn clear_all(&mut self) {
        self.slots.fill(Digest::ZERO);
    }
}

/// Number of leading filled slots per tick row.
#[derive(Debug)]
pub struct SavedCounts {
    counts: Vec<u32>,
}

impl SavedCounts {
    /// Allocate a zeroed count per tick row.
    pub fn new(rows: usize) -> Result<SavedCounts, Error> {
        let counts = alloc_zeroed(rows, 0u32, "saved-count table")?;
        Ok(SavedCounts { counts })
    }

    /// Count for a tick index.
    #[inline]
    pub fn get(&self, tick_index: usize) -> u32 {
        self.counts[tick_index]
    }

    /// Mutable count for a tick index.
    #[inline]
    pub fn slot_mut(&mut self, tick_index: usize) -> &mut u32 {
        &mut self.counts[tick_index]
    }

    /// Increment the count for a tick index.
    #[inline]
    pub fn increment(&mut self, tick_index: usize) {
        self.counts[tick_index] += 1;
    }

    /// Copy a single tick's count to another row.
    pub fn copy(&mut self, src_row: usize, dst_row: usize) {
        self.counts[dst_row] = self.counts[src_row];
    }

    /// Zero `count` rows starting at `first_row`.
    pub fn clear_range(&mut self, first_row: usize, count: usize) {
        self.counts[first_row..first_row + count].fill(0);
    }

    /// Zero all counts.
    pub fn clear_all(&mut self) {
        self.counts.fill(0);
    }
}

fn alloc_zeroed<T: Clone>(len: usize, zero: T, what: &'static str) -> Result<Vec<T>, Error> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| Error::Allocation {
        what,
        bytes: len * std::mem::size_of::<T>(),
    })?;
    v.resize(len, zero);
    Ok(v)
}
