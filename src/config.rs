//! Configuration for Voila
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, VoilaError};

/// Main configuration for a Voila engine instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single append-only data file; must be set before opening
    pub path: PathBuf,

    /// Create missing parent directories of `path` on open
    pub create_dirs: bool,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: how often to fsync the data file
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Recovery Configuration
    // -------------------------------------------------------------------------
    /// Cut off a partially written trailing record found during replay
    pub truncate_torn_tail: bool,
}

/// Data file sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every insert (safest, slowest)
    EveryWrite,

    /// fsync after N unsynced inserts
    EveryNWrites { count: usize },

    /// Leave syncing to the OS until `sync()` or `close()`
    OnClose,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            create_dirs: false,
            sync_strategy: SyncStrategy::OnClose,
            truncate_torn_tail: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(VoilaError::Config("data file path is empty".to_string()));
        }
        if let SyncStrategy::EveryNWrites { count: 0 } = self.sync_strategy {
            return Err(VoilaError::Config(
                "EveryNWrites count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Create missing parent directories on open
    pub fn create_dirs(mut self, create: bool) -> Self {
        self.config.create_dirs = create;
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Truncate a torn trailing record on open
    pub fn truncate_torn_tail(mut self, truncate: bool) -> Self {
        self.config.truncate_torn_tail = truncate;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
