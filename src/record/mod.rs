//! Record Module
//!
//! The durable unit of storage: one length-prefixed key/value pair.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Record 1                                                 │
//! │ ┌─────────────┬───────────────┬───────────┬────────────┐ │
//! │ │ KeyLen (8)  │ ValueLen (8)  │ Key       │ Value      │ │
//! │ └─────────────┴───────────────┴───────────┴────────────┘ │
//! ├──────────────────────────────────────────────────────────┤
//! │ Record 2                                                 │
//! │ ┌─────────────┬───────────────┬───────────┬────────────┐ │
//! │ │ KeyLen (8)  │ ValueLen (8)  │ Key       │ Value      │ │
//! │ └─────────────┴───────────────┴───────────┴────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Both lengths are little-endian u64. Records sit back-to-back with no file
//! header, separators, padding or checksums, so a record's size is always
//! `16 + key_len + value_len`.

mod codec;

pub use codec::{decode_at, encode, DecodedRecord};

/// Size of the two length prefixes: KeyLen (8) + ValueLen (8)
pub const RECORD_HEADER_SIZE: u64 = 16;

/// Total on-disk size of a record, or `None` if it does not fit in a u64
pub fn record_size(key_len: u64, value_len: u64) -> Option<u64> {
    RECORD_HEADER_SIZE.checked_add(key_len)?.checked_add(value_len)
}

/// A borrowed key/value pair about to be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub key: &'a [u8],
    pub value: &'a [u8],
}

impl<'a> Record<'a> {
    pub fn new(key: &'a [u8], value: &'a [u8]) -> Self {
        Self { key, value }
    }

    /// On-disk size of this record, or `None` if it does not fit in a u64
    pub fn size(&self) -> Option<u64> {
        record_size(self.key.len() as u64, self.value.len() as u64)
    }

    /// Serialize into the on-disk layout
    pub fn encode(&self) -> bytes::Bytes {
        encode(self.key, self.value)
    }
}
