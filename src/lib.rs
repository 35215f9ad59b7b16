//! # Voila
//!
//! A minimal embedded key-value store backed by a single append-only file:
//! - Length-prefixed records appended at an explicit write cursor
//! - In-memory index from key to record location
//! - Startup replay that rebuilds the index from the file
//! - Torn trailing writes detected and cut off on open
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       StorageEngine                         │
//! │          insert / get / exists / keys / close               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Data File  │  replay  │  KeyIndex   │
//!   │  (Append)   │ ───────▶ │  (HashMap)  │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use voila::StorageEngine;
//!
//! let mut db = StorageEngine::open("example.db")?;
//! db.insert("name", b"Voila Database")?;
//! assert_eq!(db.get("name")?, b"Voila Database");
//! db.close()?;
//! # Ok::<(), voila::VoilaError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod index;
pub mod replay;
pub mod engine;
pub mod shared;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{VoilaError, Result};
pub use config::{Config, SyncStrategy};
pub use engine::StorageEngine;
pub use index::IndexEntry;
pub use replay::ReplayStats;
pub use shared::SharedEngine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Voila
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
