//! Transaction wire format
//!
//! A transaction is an opaque, variable-length record: an 80-byte fixed
//! header followed by `input_size` payload bytes and a 64-byte signature.
//! All multi-byte header fields are little-endian.
//!
//! Layout:
//!
//! | offset | size | field                  |
//! |--------|------|------------------------|
//! | 0      | 32   | source public key      |
//! | 32     | 32   | destination public key |
//! | 64     | 8    | amount (i64)           |
//! | 72     | 4    | tick (u32)             |
//! | 76     | 2    | input type (u16)       |
//! | 78     | 2    | input size (u16)       |
//! | 80     | n    | payload                |
//! | 80+n   | 64   | signature              |
//!
//! The pool never interprets payload or signature; it stores the record
//! verbatim and only reads the header fields it needs for indexing and
//! consistency checks.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use crate::types::Tick;

/// Fixed header length in bytes.
pub const HEADER_LEN: usize = 80;

/// Signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Length of the shortest well-formed transaction (empty payload).
pub const MIN_TX_LEN: usize = HEADER_LEN + SIGNATURE_LEN;

/// Framing errors for transaction records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Buffer is shorter than the fixed header.
    #[error("Transaction truncated: {0} bytes, header needs {HEADER_LEN}")]
    HeaderTruncated(usize),

    /// Buffer does not match the length announced by the header.
    #[error("Transaction length mismatch: have {have} bytes, header announces {want}")]
    LengthMismatch {
        /// Bytes available.
        have: usize,
        /// Bytes announced by the header (`total_size`).
        want: usize,
    },
}

/// Parsed transaction header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxHeader {
    /// Source public key.
    pub source: [u8; 32],
    /// Destination public key.
    pub destination: [u8; 32],
    /// Transferred amount.
    pub amount: i64,
    /// Tick the transaction is scheduled for.
    pub tick: Tick,
    /// Input type tag, interpreted by the execution layer.
    pub input_type: u16,
    /// Payload length in bytes.
    pub input_size: u16,
}

impl TxHeader {
    /// Parse the fixed header from the front of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<TxHeader, FrameError> {
        if bytes.len() < HEADER_LEN {
            return Err(FrameError::HeaderTruncated(bytes.len()));
        }
        let mut source = [0u8; 32];
        let mut destination = [0u8; 32];
        source.copy_from_slice(&bytes[0..32]);
        destination.copy_from_slice(&bytes[32..64]);
        Ok(TxHeader {
            source,
            destination,
            amount: LittleEndian::read_i64(&bytes[64..72]),
            tick: LittleEndian::read_u32(&bytes[72..76]),
            input_type: LittleEndian::read_u16(&bytes[76..78]),
            input_size: LittleEndian::read_u16(&bytes[78..80]),
        })
    }

    /// Total record length announced by this header.
    #[inline]
    pub fn total_size(&self) -> usize {
        HEADER_LEN + self.input_size as usize + SIGNATURE_LEN
    }

    /// Encode the header into its 80-byte wire form.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..32].copy_from_slice(&self.source);
        out[32..64].copy_from_slice(&self.destination);
        LittleEndian::write_i64(&mut out[64..72], self.amount);
        LittleEndian::write_u32(&mut out[72..76], self.tick);
        LittleEndian::write_u16(&mut out[76..78], self.input_type);
        LittleEndian::write_u16(&mut out[78..80], self.input_size);
        out
    }
}

/// Read the total record length from a raw buffer without a full parse.
///
/// Returns `None` if the buffer is too short to hold a header.
#[inline]
pub fn total_size_of(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < HEADER_LEN {
        return None;
    }
    let input_size = LittleEndian::read_u16(&bytes[78..80]) as usize;
    Some(HEADER_LEN + input_size + SIGNATURE_LEN)
}

/// Read the scheduled tick from a raw buffer without a full parse.
#[inline]
pub fn tick_of(bytes: &[u8]) -> Option<Tick> {
    if bytes.len() < HEADER_LEN {
        return None;
    }
    Some(LittleEndian::read_u32(&bytes[72..76]))
}

/// An owned transaction record holding exactly its wire bytes.
///
/// Construction validates framing only (header present, buffer length equals
/// `total_size`). Semantic validity is the `TransactionValidator`'s concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    bytes: Vec<u8>,
}

impl Transaction {
    /// Take ownership of a wire-format record.
    ///
    /// Trailing bytes beyond `total_size` are rejected; the pool stores and
    /// returns exact records.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Transaction, FrameError> {
        let header = TxHeader::parse(&bytes)?;
        let want = header.total_size();
        if bytes.len() != want {
            return Err(FrameError::LengthMismatch {
                have: bytes.len(),
                want,
            });
        }
        Ok(Transaction { bytes })
    }

    /// Assemble a record from parts. `input_size` is taken from the payload
    /// length; the field in `header` is overwritten.
    pub fn assemble(mut header: TxHeader, payload: &[u8], signature: [u8; SIGNATURE_LEN]) -> Transaction {
        header.input_size = payload.len() as u16;
        let mut bytes = Vec::with_capacity(header.total_size());
        bytes.extend_from_slice(&header.encode());
        bytes.extend_from_slice(payload);
        bytes.extend_from_slice(&signature);
        Transaction { bytes }
    }

    /// The full wire bytes of the record.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Parsed header fields.
    #[inline]
    pub fn header(&self) -> TxHeader {
        // Framing was validated at construction.
        TxHeader::parse(&self.bytes).expect("framing validated at construction")
    }

    /// Tick the transaction is scheduled for.
    #[inline]
    pub fn tick(&self) -> Tick {
        LittleEndian::read_u32(&self.bytes[72..76])
    }

    /// Total record length.
    #[inline]
    pub fn total_size(&self) -> usize {
        self.bytes.len()
    }

    /// Payload bytes (between header and signature).
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..self.bytes.len() - SIGNATURE_LEN]
    }

    /// Signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.bytes[self.bytes.len() - SIGNATURE_LEN..]
    }
}
