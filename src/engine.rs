//! Engine Module
//!
//! The storage engine: one data file, one index, one write cursor.
//!
//! ## Responsibilities
//! - Open/create the data file and replay it into the index
//! - Append records at the write cursor with explicit-offset writes
//! - Serve reads by seeking straight to the indexed value
//! - Keep index and cursor in step with what is actually on disk

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{Config, SyncStrategy};
use crate::error::{Result, VoilaError};
use crate::index::{IndexEntry, KeyIndex};
use crate::record::Record;
use crate::replay::{replay, ReplayStats};

/// The main storage engine
///
/// ## Ownership Model: Single Owner
///
/// Every operation runs synchronously on the caller's thread. Reads seek the
/// shared file handle and writes move the cursor, so `get` and `insert` both
/// take `&mut self`; the borrow checker enforces the single-owner rule. To share
/// an engine between threads wrap it in [`crate::SharedEngine`].
///
/// ## Write Ordering
///
/// A record is written (and synced, if the strategy asks for it) before the
/// index or cursor change. A failed write leaves both untouched and the file
/// is cut back to the cursor.
#[derive(Debug)]
pub struct StorageEngine {
    /// Engine configuration
    config: Config,

    /// Data file handle; `None` when closed
    file: Option<File>,

    /// Key → location of the newest record for that key
    index: KeyIndex,

    /// Offset where the next record will be written
    write_cursor: u64,

    /// Inserts since the last fsync
    unsynced_writes: usize,

    /// Outcome of the last replay
    replay_stats: ReplayStats,
}

impl StorageEngine {
    /// Create an engine that is not yet attached to a file
    ///
    /// Every data operation fails with [`VoilaError::NotOpen`]. The engine has
    /// no data file path, so [`StorageEngine::reopen`] fails with
    /// [`VoilaError::Config`]; use [`StorageEngine::open`] instead.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            file: None,
            index: KeyIndex::new(),
            write_cursor: 0,
            unsynced_writes: 0,
            replay_stats: ReplayStats::default(),
        }
    }

    /// Open or create the data file at `path` with default settings
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(Config::builder().path(path.as_ref()).build())
    }

    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Validate config
    /// 2. Open/create the data file read-write
    /// 3. Replay every complete record into the index
    /// 4. Place the write cursor after the last complete record
    pub fn open_with(config: Config) -> Result<Self> {
        let mut engine = Self::new();
        engine.config = config;
        engine.open_file()?;
        Ok(engine)
    }

    /// Open the configured data file again after `close`
    ///
    /// No-op if the engine is already open.
    pub fn reopen(&mut self) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }
        self.open_file()
    }

    fn open_file(&mut self) -> Result<()> {
        self.config.validate()?;

        let path = self.config.path.clone();
        let open_err = |source: io::Error| VoilaError::Open {
            path: path.clone(),
            source,
        };

        if self.config.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(open_err)?;
            }
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(open_err)?;
        let len = file.metadata().map_err(open_err)?.len();

        let mut index = KeyIndex::new();
        let mut stats = replay(&mut file, len, &mut index).map_err(open_err)?;

        if stats.has_torn_tail() {
            warn!(
                path = %path.display(),
                end_offset = stats.end_offset,
                trailing_bytes = stats.trailing_bytes,
                "data file ends in a partial record"
            );

            if self.config.truncate_torn_tail {
                file.set_len(stats.end_offset).map_err(open_err)?;
                file.sync_all().map_err(open_err)?;
                stats.was_truncated = true;
            }
        }

        info!(
            path = %path.display(),
            records = stats.records_replayed,
            keys = stats.keys_indexed,
            shadowed = stats.records_shadowed,
            write_cursor = stats.end_offset,
            "database opened"
        );

        self.file = Some(file);
        self.index = index;
        self.write_cursor = stats.end_offset;
        self.unsynced_writes = 0;
        self.replay_stats = stats;
        Ok(())
    }

    /// Append a key/value pair
    ///
    /// Steps:
    /// 1. Encode the record
    /// 2. Write it at the write cursor (explicit offset, never append mode)
    /// 3. Sync if the strategy calls for it
    /// 4. Point the index at the new record and advance the cursor
    ///
    /// An existing key is shadowed: its old record stays in the file but is no
    /// longer reachable.
    pub fn insert(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        let (key, value) = (key.as_ref(), value.as_ref());

        let sync = match self.config.sync_strategy {
            SyncStrategy::EveryWrite => true,
            SyncStrategy::EveryNWrites { count } => self.unsynced_writes + 1 >= count,
            SyncStrategy::OnClose => false,
        };
        let file = self.file.as_mut().ok_or(VoilaError::NotOpen)?;

        let record = Record::new(key, value);
        let offset = self.write_cursor;
        let end = record
            .size()
            .and_then(|size| offset.checked_add(size))
            .ok_or_else(|| VoilaError::Write {
                offset,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "record would extend the data file past u64::MAX",
                ),
            })?;

        if let Err(source) = write_at(file, offset, &record.encode(), sync) {
            // Drop whatever part of the record made it to disk.
            if let Err(e) = file.set_len(offset) {
                warn!(offset, error = %e, "failed to roll back partial record");
            }
            return Err(VoilaError::Write { offset, source });
        }

        self.index.insert(
            key.to_vec(),
            IndexEntry::new(offset, key.len() as u64, value.len() as u64),
        );
        self.write_cursor = end;
        self.unsynced_writes = if sync { 0 } else { self.unsynced_writes + 1 };

        Ok(())
    }

    /// Get the value stored under `key`
    ///
    /// Returns:
    /// - `Ok(value)` — the newest value for the key
    /// - `Err(KeyNotFound)` — the key was never inserted
    /// - `Err(Read)` — the index points at bytes the file no longer holds
    pub fn get(&mut self, key: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let key = key.as_ref();
        let file = self.file.as_mut().ok_or(VoilaError::NotOpen)?;
        let entry = *self
            .index
            .get(key)
            .ok_or_else(|| VoilaError::key_not_found(key))?;

        let offset = entry.value_offset();
        let read_err = |source: io::Error| VoilaError::Read {
            offset,
            expected: entry.value_len,
            source,
        };

        let len = usize::try_from(entry.value_len).map_err(|_| {
            read_err(io::Error::new(
                io::ErrorKind::InvalidData,
                "value does not fit in memory on this platform",
            ))
        })?;

        let mut value = vec![0u8; len];
        read_at(file, offset, &mut value).map_err(read_err)?;
        Ok(value)
    }

    /// Check whether `key` is in the index (no I/O)
    pub fn exists(&self, key: impl AsRef<[u8]>) -> bool {
        self.index.contains(key.as_ref())
    }

    /// All live keys, in no particular order (no I/O)
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.index.keys().map(<[u8]>::to_vec).collect()
    }

    /// Force pending writes to disk
    pub fn sync(&mut self) -> Result<()> {
        let file = self.file.as_mut().ok_or(VoilaError::NotOpen)?;
        file.sync_data()?;
        self.unsynced_writes = 0;
        Ok(())
    }

    /// Close the engine
    ///
    /// Syncs pending writes, releases the file handle and discards the index.
    /// Closing a closed engine is a no-op. The handle is released even if the
    /// final sync fails.
    pub fn close(&mut self) -> Result<()> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };

        let pending = std::mem::take(&mut self.unsynced_writes);
        self.index.clear();
        self.write_cursor = 0;

        debug!(path = %self.config.path.display(), pending, "closing database");

        if pending > 0 {
            file.sync_data()?;
        }
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Get the data file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Offset where the next record will be written
    pub fn write_cursor(&self) -> u64 {
        self.write_cursor
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Index entry for `key`, if present
    pub fn entry(&self, key: impl AsRef<[u8]>) -> Option<IndexEntry> {
        self.index.get(key.as_ref()).copied()
    }

    /// Statistics from the replay performed by the last open
    pub fn replay_stats(&self) -> ReplayStats {
        self.replay_stats
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for StorageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StorageEngine {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(path = %self.config.path.display(), error = %e, "failed to close database cleanly");
        }
    }
}

// =============================================================================
// Positioned I/O
// =============================================================================

fn write_at(file: &mut File, offset: u64, buf: &[u8], sync: bool) -> io::Result<()> {
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(buf)?;
    if sync {
        file.sync_data()?;
    }
    Ok(())
}

fn read_at(file: &mut File, offset: u64, buf: &mut [u8]) -> io::Result<()> {
    file.seek(SeekFrom::Start(offset))?;
    file.read_exact(buf)
}
