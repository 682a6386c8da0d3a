//! Epoch window arithmetic
//!
//! Tracks the two half-open tick ranges the pool stores data for: the
//! current epoch `[tick_begin, tick_end)` and the retained previous-epoch
//! tail `[old_tick_begin, old_tick_end)`, and maps ticks in either range to
//! table row indices. Previous-epoch rows start after the
//! `max_ticks_per_epoch` current-epoch rows.

use tickpool_core::{PoolConfig, Tick};

/// The tick ranges currently backed by storage.
#[derive(Debug, Clone)]
pub struct EpochWindow {
    tick_begin: Tick,
    tick_end: Tick,
    old_tick_begin: Tick,
    old_tick_end: Tick,
    max_ticks: u32,
    retention: u32,
}

impl EpochWindow {
    /// An empty window; no tick is in storage until the first epoch begins.
    pub fn new(config: &PoolConfig) -> EpochWindow {
        EpochWindow {
            tick_begin: 0,
            tick_end: 0,
            old_tick_begin: 0,
            old_tick_end: 0,
            max_ticks: config.max_ticks_per_epoch,
            retention: config.retention_ticks,
        }
    }

    /// First tick of the current epoch.
    #[inline]
    pub fn tick_begin(&self) -> Tick {
        self.tick_begin
    }

    /// One past the last tick of the current epoch.
    #[inline]
    pub fn tick_end(&self) -> Tick {
        self.tick_end
    }

    /// First retained tick of the previous epoch.
    #[inline]
    pub fn old_tick_begin(&self) -> Tick {
        self.old_tick_begin
    }

    /// One past the last retained tick of the previous epoch.
    #[inline]
    pub fn old_tick_end(&self) -> Tick {
        self.old_tick_end
    }

    /// Whether the tick is stored in the current-epoch region.
    #[inline]
    pub fn in_current(&self, tick: Tick) -> bool {
        tick >= self.tick_begin && tick < self.tick_end
    }

    /// Whether the tick is stored in the previous-epoch region.
    #[inline]
    pub fn in_previous(&self, tick: Tick) -> bool {
        self.old_tick_begin <= tick && tick < self.old_tick_end
    }

    /// Table row for a current-epoch tick (caller checks membership).
    #[inline]
    pub fn index_current(&self, tick: Tick) -> usize {
        (tick - self.tick_begin) as usize
    }

    /// Table row for a retained previous-epoch tick (caller checks
    /// membership).
    #[inline]
    pub fn index_previous(&self, tick: Tick) -> usize {
        (tick - self.old_tick_begin) as usize + self.max_ticks as usize
    }

    /// Resolve a tick to its table row, preferring the current epoch.
    pub fn resolve(&self, tick: Tick) -> Option<usize> {
        if self.in_current(tick) {
            Some(self.index_current(tick))
        } else if self.in_previous(tick) {
            Some(self.index_previous(tick))
        } else {
            None
        }
    }

    /// The retained window a seamless transition to `new_first_tick` would
    /// produce: at most `retention` ticks ending right before the new epoch,
    /// clamped to what the outgoing epoch actually tracked.
    pub fn candidate_retained(&self, new_first_tick: Tick) -> (Tick, Tick) {
        let begin = self
            .tick_begin
            .max(new_first_tick.saturating_sub(self.retention));
        (begin, new_first_tick)
    }

    /// Record the retained previous-epoch range.
    pub(crate) fn set_retained(&mut self, begin: Tick, end: Tick) {
        self.old_tick_begin = begin;
        self.old_tick_end = end;
    }

    /// Drop the previous-epoch range (cold start).
    pub(crate) fn clear_retained(&mut self) {
        self.old_tick_begin = 0;
        self.old_tick_end = 0;
    }

    /// Move the current epoch to start at `new_first_tick`.
    ///
    /// Near the top of the tick range the window is clamped to `u32::MAX`
    /// rather than wrapping; the final ticks of the epoch are then simply
    /// unreachable.
    pub(crate) fn advance(&mut self, new_first_tick: Tick) {
        self.tick_begin = new_first_tick;
        self.tick_end = new_first_tick.saturating_add(self.max_ticks);
    }
}
