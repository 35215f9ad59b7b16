//! Shared engine handle
//!
//! `StorageEngine` assumes a single owner. When several threads need the same
//! database, every operation must be serialized around the whole
//! (index, file, cursor) triple; `SharedEngine` does that with one mutex.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::engine::StorageEngine;
use crate::error::Result;

/// Cloneable, thread-safe handle to one engine
///
/// ## Concurrency:
/// - One `parking_lot::Mutex` guards the engine
/// - Each method holds the lock for the full operation, so an insert can never
///   move the cursor or index under a concurrent read
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<StorageEngine>>,
}

impl SharedEngine {
    pub fn new(engine: StorageEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Open or create the data file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        StorageEngine::open(path).map(Self::new)
    }

    /// Open or create an engine with the given config
    pub fn open_with(config: Config) -> Result<Self> {
        StorageEngine::open_with(config).map(Self::new)
    }

    pub fn insert(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        self.inner.lock().insert(key, value)
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        self.inner.lock().get(key)
    }

    pub fn exists(&self, key: impl AsRef<[u8]>) -> bool {
        self.inner.lock().exists(key)
    }

    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.inner.lock().keys()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn sync(&self) -> Result<()> {
        self.inner.lock().sync()
    }

    /// Close the underlying engine for every handle
    pub fn close(&self) -> Result<()> {
        self.inner.lock().close()
    }

    /// Run `f` with exclusive access to the engine
    ///
    /// Use this to make several operations atomic with respect to other handles.
    pub fn with<R>(&self, f: impl FnOnce(&mut StorageEngine) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
