//! Index Module
//!
//! In-memory map from key to the location of its newest record.
//!
//! ## Responsibilities
//! - Insert-or-replace on every write and every replayed record
//! - Report the entry a write shadowed (for replay statistics)
//! - Membership checks and key listing without I/O
//!
//! The index is never persisted; it is rebuilt from the data file on open.

use std::collections::HashMap;

use crate::record::RECORD_HEADER_SIZE;

/// Location and size of one record in the data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub key_len: u64,
    pub value_len: u64,
    /// Offset of the record's KeyLen field
    pub file_offset: u64,
    /// `16 + key_len + value_len`
    pub record_size: u64,
}

impl IndexEntry {
    pub fn new(file_offset: u64, key_len: u64, value_len: u64) -> Self {
        Self {
            key_len,
            value_len,
            file_offset,
            record_size: RECORD_HEADER_SIZE + key_len + value_len,
        }
    }

    /// Offset of the first value byte
    pub fn value_offset(&self) -> u64 {
        self.file_offset + RECORD_HEADER_SIZE + self.key_len
    }

    /// Offset immediately past this record
    pub fn end_offset(&self) -> u64 {
        self.file_offset + self.record_size
    }
}

/// Key → newest record location
#[derive(Debug, Default)]
pub struct KeyIndex {
    entries: HashMap<Vec<u8>, IndexEntry>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `key` at `entry`, returning the entry it shadowed, if any
    pub fn insert(&mut self, key: Vec<u8>, entry: IndexEntry) -> Option<IndexEntry> {
        self.entries.insert(key, entry)
    }

    pub fn get(&self, key: &[u8]) -> Option<&IndexEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// All live keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.keys().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
