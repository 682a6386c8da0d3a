//! Core types and contracts for the tickpool transaction pool
//!
//! This crate defines the foundational pieces shared by the pool:
//! - Tick and Digest: the units everything is indexed and verified by
//! - Transaction wire format: 80-byte header, payload, 64-byte signature
//! - PoolConfig: fixed sizing of every buffer, validated up front
//! - Error / SubmitError: fatal conditions vs. expected rejections
//! - Traits: TransactionValidator and DigestHasher collaborator contracts

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod traits;
pub mod transaction;
pub mod types;

// Re-export commonly used types and traits
pub use config::{ConfigError, PoolConfig, FIRST_TX_OFFSET};
pub use error::{Error, Result, SubmitError};
pub use traits::{Blake3Hasher, DigestHasher, TransactionValidator, WireValidator};
pub use transaction::{
    FrameError, Transaction, TxHeader, HEADER_LEN, MIN_TX_LEN, SIGNATURE_LEN,
};
pub use types::{Digest, Tick, DIGEST_LEN};
