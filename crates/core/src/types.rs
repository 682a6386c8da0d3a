//! Small foundational types shared across the pool
//!
//! - `Tick`: ledger time unit transactions are scheduled for
//! - `Digest`: fixed-size cryptographic hash of a transaction's wire bytes

use std::fmt;

/// The smallest unit of ledger progress.
///
/// Every transaction carries the tick it is scheduled for; the pool indexes
/// all of its tables by tick.
pub type Tick = u32;

/// Byte length of a transaction digest.
pub const DIGEST_LEN: usize = 32;

/// Fixed-size cryptographic digest of a transaction's wire bytes.
///
/// The all-zero digest doubles as the cleared state of digest table slots;
/// it is never produced for stored transactions because a slot only holds a
/// digest while its parallel offset entry is non-zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Digest(pub [u8; DIGEST_LEN]);

impl Digest {
    /// The cleared table-slot value.
    pub const ZERO: Digest = Digest([0u8; DIGEST_LEN]);

    /// Raw digest bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_digest_is_default() {
        assert_eq!(Digest::default(), Digest::ZERO);
        assert_eq!(Digest::ZERO.as_bytes(), &[0u8; DIGEST_LEN]);
    }

    #[test]
    fn test_digest_from_bytes_roundtrip() {
        let bytes = [7u8; DIGEST_LEN];
        let digest = Digest::from(bytes);
        assert_eq!(digest.as_bytes(), &bytes);
    }

    #[test]
    fn test_digest_debug_is_truncated() {
        let digest = Digest([0xab; DIGEST_LEN]);
        let repr = format!("{:?}", digest);
        assert!(repr.starts_with("Digest(abababab"));
        assert!(repr.len() < 24);
    }
}
