//! Fixed-capacity transaction byte arena
//!
//! One contiguous, pre-allocated buffer split into a current-epoch region
//! (`[0, current_len)`) and a smaller previous-epoch region
//! (`[current_len, total)`). Records are appended at a monotone write cursor
//! inside the current region; the epoch rotation moves the newest written
//! suffix into the previous region and rewinds the cursor.
//!
//! All reads go through [`TxArena::record`], which bounds-checks the offset
//! and the record's announced length instead of trusting table contents.

use tickpool_core::transaction::total_size_of;
use tickpool_core::{Error, FIRST_TX_OFFSET};

/// Pre-allocated byte storage for transaction records.
#[derive(Debug)]
pub struct TxArena {
    bytes: Vec<u8>,
    current_len: usize,
    cursor: usize,
}

impl TxArena {
    /// Allocate a zeroed arena with the given region sizes.
    pub fn new(current_len: usize, previous_len: usize) -> Result<TxArena, Error> {
        let total = current_len + previous_len;
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(total).map_err(|_| Error::Allocation {
            what: "transaction arena",
            bytes: total,
        })?;
        bytes.resize(total, 0);
        Ok(TxArena {
            bytes,
            current_len,
            cursor: FIRST_TX_OFFSET,
        })
    }

    /// Byte capacity of the current-epoch region.
    #[inline]
    pub fn current_len(&self) -> usize {
        self.current_len
    }

    /// Byte capacity of the previous-epoch region.
    #[inline]
    pub fn previous_len(&self) -> usize {
        self.bytes.len() - self.current_len
    }

    /// Total arena size.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.bytes.len()
    }

    /// Next free byte offset in the current-epoch region.
    #[inline]
    pub fn cursor(&self) -> u64 {
        self.cursor as u64
    }

    /// Bytes left before the current-epoch capacity bound.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.current_len - self.cursor
    }

    /// Append a record at the cursor.
    ///
    /// Returns the record's starting offset, or `None` if it does not fit in
    /// the remaining current-epoch capacity. The arena stores the bytes
    /// verbatim.
    pub fn append(&mut self, record: &[u8]) -> Option<u64> {
        if record.len() > self.remaining() {
            return None;
        }
        let offset = self.cursor;
        self.bytes[offset..offset + record.len()].copy_from_slice(record);
        self.cursor += record.len();
        Some(offset as u64)
    }

    /// Bounds-checked view of the record starting at `offset`.
    ///
    /// Returns `None` for the zero sentinel region, offsets outside the
    /// arena, or a record whose announced length runs past the arena end.
    pub fn record(&self, offset: u64) -> Option<&[u8]> {
        let offset = usize::try_from(offset).ok()?;
        if offset < FIRST_TX_OFFSET || offset >= self.bytes.len() {
            return None;
        }
        let size = total_size_of(&self.bytes[offset..])?;
        let end = offset.checked_add(size)?;
        if end > self.bytes.len() {
            return None;
        }
        Some(&self.bytes[offset..end])
    }

    /// Move the newest written bytes that fit into the previous-epoch
    /// region, anchored at the arena's end.
    ///
    /// Returns `(first_kept, shift)`: records starting below `first_kept`
    /// are lost; surviving offsets must be rebased by `+shift`. The part of
    /// the previous region not covered by the carried suffix is zeroed.
    pub fn carry_suffix_to_previous(&mut self) -> (u64, u64) {
        let written = self.cursor - FIRST_TX_OFFSET;
        let kept = written.min(self.previous_len());
        let first_kept = self.cursor - kept;
        let dest = self.bytes.len() - kept;
        self.bytes[self.current_len..dest].fill(0);
        self.bytes.copy_within(first_kept..self.cursor, dest);
        (first_kept as u64, (self.bytes.len() - self.cursor) as u64)
    }

    /// Zero the current-epoch region and rewind the cursor.
    pub fn wipe_current(&mut self) {
        self.bytes[..self.current_len].fill(0);
        self.cursor = FIRST_TX_OFFSET;
    }

    /// Zero the whole arena and rewind the cursor.
    pub fn wipe_all(&mut self) {
        self.bytes.fill(0);
        self.cursor = FIRST_TX_OFFSET;
    }
}
