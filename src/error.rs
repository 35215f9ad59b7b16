//! Error types for Voila
//!
//! Provides a unified error type for all engine operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using VoilaError
pub type Result<T> = std::result::Result<T, VoilaError>;

/// Unified error type for Voila operations
#[derive(Debug, Error)]
pub enum VoilaError {
    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    /// The backing file could not be created, opened or replayed
    #[error("could not open database file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Operation attempted before `open` succeeded or after `close`
    #[error("database not opened")]
    NotOpen,

    // -------------------------------------------------------------------------
    // Data Path Errors
    // -------------------------------------------------------------------------
    /// A positioned write (or its sync) did not complete; nothing was indexed
    #[error("failed to write record at offset {offset}: {source}")]
    Write {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    /// The key is not present in the index
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// An indexed value could not be read in full; the file is corrupt or truncated
    #[error("failed to read {expected} value bytes at offset {offset}: {source}")]
    Read {
        offset: u64,
        expected: u64,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Other I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl VoilaError {
    /// Build a `KeyNotFound` from raw key bytes (lossy for non-UTF-8 keys)
    pub(crate) fn key_not_found(key: &[u8]) -> Self {
        VoilaError::KeyNotFound(String::from_utf8_lossy(key).into_owned())
    }
}
