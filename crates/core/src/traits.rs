//! External collaborator contracts
//!
//! The pool consumes two narrow interfaces it does not own:
//! - `TransactionValidator`: syntactic acceptance, size and tick extraction
//! - `DigestHasher`: deterministic 32-byte digest of wire bytes
//!
//! Both must be pure from the pool's perspective: no side effects, stable
//! answers for identical input bytes. Default implementations are provided
//! (`WireValidator`, `Blake3Hasher`); consensus and execution layers can
//! substitute their own.

use crate::transaction::{tick_of, total_size_of, TxHeader};
use crate::types::{Digest, Tick};

/// Syntactic transaction validation and header field extraction.
pub trait TransactionValidator: Send + Sync {
    /// Whether the bytes form an acceptable transaction record.
    fn is_valid(&self, bytes: &[u8]) -> bool;

    /// Total wire size announced by the record's header, if one is present.
    fn size_of(&self, bytes: &[u8]) -> Option<usize>;

    /// Tick the record is scheduled for, if a header is present.
    fn tick_of(&self, bytes: &[u8]) -> Option<Tick>;
}

/// Deterministic digest over transaction wire bytes.
///
/// Must match the hash used by downstream consumers that re-verify digests.
pub trait DigestHasher: Send + Sync {
    /// Digest of exactly the given bytes.
    fn digest(&self, bytes: &[u8]) -> Digest;
}

/// Default validator enforcing the wire format and basic header sanity.
#[derive(Debug, Clone)]
pub struct WireValidator {
    /// Upper bound for the amount field.
    pub max_amount: i64,
    /// Upper bound for the payload length.
    pub max_input_size: u16,
}

impl Default for WireValidator {
    fn default() -> Self {
        WireValidator {
            max_amount: 1_000_000_000_000_000,
            max_input_size: 1024,
        }
    }
}

impl TransactionValidator for WireValidator {
    fn is_valid(&self, bytes: &[u8]) -> bool {
        let header = match TxHeader::parse(bytes) {
            Ok(header) => header,
            Err(_) => return false,
        };
        bytes.len() >= header.total_size()
            && header.amount >= 0
            && header.amount <= self.max_amount
            && header.input_size <= self.max_input_size
    }

    fn size_of(&self, bytes: &[u8]) -> Option<usize> {
        total_size_of(bytes)
    }

    fn tick_of(&self, bytes: &[u8]) -> Option<Tick> {
        tick_of(bytes)
    }
}

/// Default hasher producing BLAKE3 digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl DigestHasher for Blake3Hasher {
    fn digest(&self, bytes: &[u8]) -> Digest {
        Digest(*blake3::hash(bytes).as_bytes())
    }
}
