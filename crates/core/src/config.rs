//! Pool sizing configuration
//!
//! All capacities of the transaction pool are fixed at construction time and
//! derived from this configuration. Violations of the sizing rules are
//! reported as `ConfigError` before any buffer is allocated.
//!
//! ## Contract
//!
//! The pool performs no allocation after construction; every limit here is a
//! hard bound for the lifetime of the pool instance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transaction::MIN_TX_LEN;

/// Reserved prefix of the current-epoch byte buffer.
///
/// Offset `0` is the empty-slot sentinel of the offset tables, so no
/// transaction may start there; the write cursor begins past this prefix.
pub const FIRST_TX_OFFSET: usize = 8;

/// Sizing configuration for a transaction pool instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum ticks tracked per epoch (default: 600_000).
    pub max_ticks_per_epoch: u32,

    /// Ticks of prior-epoch data kept after a rotation (default: 100).
    pub retention_ticks: u32,

    /// Maximum transactions stored per tick (default: 1024).
    pub max_txs_per_tick: usize,

    /// Maximum payload bytes per transaction (default: 1024).
    pub max_input_size: u16,

    /// Sparseness divisor for the current-epoch byte buffer (default: 4).
    ///
    /// The buffer is sized for `1/sparseness` of the worst case of every
    /// tick holding `max_txs_per_tick` maximum-size transactions; the
    /// write cursor enforces the reduced budget at runtime.
    pub sparseness: usize,

    /// Explicit size of the previous-epoch byte buffer.
    ///
    /// `None` derives `retention_ticks * max_txs_per_tick * max_tx_size /
    /// sparseness`. Must stay smaller than the current-epoch buffer.
    pub previous_epoch_bytes: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            max_ticks_per_epoch: 600_000,
            retention_ticks: 100,
            max_txs_per_tick: 1024,
            max_input_size: 1024,
            sparseness: 4,
            previous_epoch_bytes: None,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with small capacities for testing.
    ///
    /// Matches the geometry the rotation tests exercise: short epochs, a
    /// five-tick retention window and a deliberately tight byte budget.
    pub fn with_small_limits() -> Self {
        PoolConfig {
            max_ticks_per_epoch: 50,
            retention_ticks: 5,
            max_txs_per_tick: 256,
            max_input_size: 1024,
            sparseness: 4,
            previous_epoch_bytes: None,
        }
    }

    /// Maximum wire size of a single transaction under this configuration.
    #[inline]
    pub fn max_tx_size(&self) -> usize {
        MIN_TX_LEN + self.max_input_size as usize
    }

    /// Byte capacity of the current-epoch transaction buffer.
    #[inline]
    pub fn current_epoch_bytes(&self) -> usize {
        FIRST_TX_OFFSET
            + self.max_ticks_per_epoch as usize * self.max_txs_per_tick * self.max_tx_size()
                / self.sparseness
    }

    /// Byte capacity of the previous-epoch transaction buffer.
    #[inline]
    pub fn previous_epoch_bytes(&self) -> usize {
        self.previous_epoch_bytes.unwrap_or_else(|| {
            self.retention_ticks as usize * self.max_txs_per_tick * self.max_tx_size()
                / self.sparseness
        })
    }

    /// Number of tick rows in each table (current plus previous region).
    #[inline]
    pub fn table_rows(&self) -> usize {
        (self.max_ticks_per_epoch + self.retention_ticks) as usize
    }

    /// Validate the sizing rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_ticks_per_epoch == 0 {
            return Err(ConfigError::ZeroField("max_ticks_per_epoch"));
        }
        if self.max_txs_per_tick == 0 {
            return Err(ConfigError::ZeroField("max_txs_per_tick"));
        }
        if self.sparseness == 0 {
            return Err(ConfigError::ZeroField("sparseness"));
        }
        if self.retention_ticks > self.max_ticks_per_epoch {
            return Err(ConfigError::RetentionTooLong {
                retention: self.retention_ticks,
                max_ticks: self.max_ticks_per_epoch,
            });
        }
        let current = self.current_epoch_bytes();
        let previous = self.previous_epoch_bytes();
        if previous >= current {
            return Err(ConfigError::PreviousBufferTooLarge { previous, current });
        }
        if current <= FIRST_TX_OFFSET + self.max_tx_size() {
            return Err(ConfigError::CurrentBufferTooSmall {
                current,
                min_tx: self.max_tx_size(),
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A field that must be positive is zero.
    #[error("Configuration field must be positive: {0}")]
    ZeroField(&'static str),

    /// The retention window cannot exceed an epoch.
    #[error("Retention window too long: {retention} ticks exceeds epoch length {max_ticks}")]
    RetentionTooLong {
        /// Configured retention ticks.
        retention: u32,
        /// Configured epoch length.
        max_ticks: u32,
    },

    /// The previous-epoch buffer must be strictly smaller than the
    /// current-epoch buffer.
    #[error("Previous-epoch buffer too large: {previous} bytes >= current-epoch {current}")]
    PreviousBufferTooLarge {
        /// Previous-epoch buffer size.
        previous: usize,
        /// Current-epoch buffer size.
        current: usize,
    },

    /// The current-epoch buffer cannot hold even one maximum-size record.
    #[error("Current-epoch buffer too small: {current} bytes cannot hold a {min_tx}-byte transaction")]
    CurrentBufferTooSmall {
        /// Current-epoch buffer size.
        current: usize,
        /// Maximum transaction size.
        min_tx: usize,
    },
}
