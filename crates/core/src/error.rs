//! Error types for the transaction pool
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Rejected submissions are a normal, expected outcome and carry their cause
//! (`SubmitError`); fatal conditions (allocation failure, detected state
//! corruption) use `Error`.

use thiserror::Error;

use crate::config::ConfigError;
use crate::types::Tick;

/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error types for the transaction pool.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer allocation failed at construction.
    #[error("Failed to allocate pool memory: {bytes} bytes for {what}")]
    Allocation {
        /// Buffer that failed to allocate.
        what: &'static str,
        /// Requested size.
        bytes: usize,
    },

    /// Invalid sizing configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// A storage invariant was found violated.
    #[error("Pool state corruption: {0}")]
    Corruption(String),
}

/// Why a submission was rejected.
///
/// All variants are recoverable; the caller decides whether to resubmit in a
/// later, still-valid tick.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The validator rejected the transaction bytes.
    #[error("Transaction rejected by validator")]
    Invalid,

    /// The scheduled tick is outside the current-epoch window.
    #[error("Tick {tick} outside current epoch [{begin}, {end})")]
    OutOfWindow {
        /// Tick the transaction is scheduled for.
        tick: Tick,
        /// First tick of the current epoch window.
        begin: Tick,
        /// One past the last tick of the current epoch window.
        end: Tick,
    },

    /// The per-tick slot table is full.
    #[error("Tick {tick} already holds the maximum of {max} transactions")]
    TickFull {
        /// Tick whose slot table is exhausted.
        tick: Tick,
        /// Per-tick slot capacity.
        max: usize,
    },

    /// The current-epoch byte buffer cannot fit the record.
    #[error("Pool byte budget exhausted: need {needed} bytes, {remaining} remaining")]
    PoolFull {
        /// Bytes the record needs.
        needed: usize,
        /// Bytes left before the capacity bound.
        remaining: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_allocation() {
        let err = Error::Allocation {
            what: "transaction arena",
            bytes: 1 << 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("allocate"));
        assert!(msg.contains("transaction arena"));
    }

    #[test]
    fn test_error_display_corruption() {
        let err = Error::Corruption("offset out of bounds".to_string());
        assert!(err.to_string().contains("offset out of bounds"));
    }

    #[test]
    fn test_error_from_config_error() {
        let err: Error = ConfigError::ZeroField("sparseness").into();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("sparseness"));
    }

    #[test]
    fn test_submit_error_display() {
        let err = SubmitError::OutOfWindow {
            tick: 7,
            begin: 100,
            end: 150,
        };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains("[100, 150)"));

        let err = SubmitError::PoolFull {
            needed: 1168,
            remaining: 20,
        };
        assert!(err.to_string().contains("1168"));
    }

    #[test]
    fn test_submit_error_equality() {
        assert_eq!(SubmitError::Invalid, SubmitError::Invalid);
        assert_ne!(
            SubmitError::Invalid,
            SubmitError::TickFull { tick: 1, max: 8 }
        );
    }
}
