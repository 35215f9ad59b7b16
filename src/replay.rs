//! Replay
//!
//! Rebuilds the index on startup by scanning the data file from offset 0.
//!
//! Records are decoded strictly oldest → newest so that a later record for a
//! key replaces the earlier index entry. The scan ends at the first record that
//! is not fully present; that is the normal end-of-data signal, not an error.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use tracing::trace;

use crate::error::{Result, VoilaError};
use crate::index::{IndexEntry, KeyIndex};
use crate::record::decode_at;

/// Outcome of a replay pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Complete records decoded
    pub records_replayed: u64,

    /// Distinct keys left in the index
    pub keys_indexed: u64,

    /// Records whose key was later written again
    pub records_shadowed: u64,

    /// Offset just past the last complete record
    pub end_offset: u64,

    /// Bytes after `end_offset` that do not form a complete record
    pub trailing_bytes: u64,

    /// Whether those trailing bytes were cut from the file
    pub was_truncated: bool,
}

impl ReplayStats {
    pub fn has_torn_tail(&self) -> bool {
        self.trailing_bytes > 0
    }
}

/// Replay every complete record in `source` into `index`
///
/// `len` is the number of bytes of data in the source.
pub fn replay<S>(source: &mut S, len: u64, index: &mut KeyIndex) -> std::io::Result<ReplayStats>
where
    S: Read + Seek + ?Sized,
{
    let mut stats = ReplayStats::default();
    let mut offset = 0u64;

    while let Some(record) = decode_at(source, offset, len)? {
        trace!(
            offset = record.offset,
            key_len = record.key_len(),
            value_len = record.value_len,
            "replayed record"
        );

        let entry = IndexEntry::new(record.offset, record.key_len(), record.value_len);
        if index.insert(record.key, entry).is_some() {
            stats.records_shadowed += 1;
        }

        stats.records_replayed += 1;
        offset = record.next_offset;
    }

    stats.keys_indexed = index.len() as u64;
    stats.end_offset = offset;
    stats.trailing_bytes = len - offset;
    Ok(stats)
}

/// Scan a data file without modifying it
///
/// Useful for inspecting a file that another process may own.
pub fn verify(path: &Path) -> Result<ReplayStats> {
    let open_err = |source: std::io::Error| VoilaError::Open {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(open_err)?;
    let len = file.metadata().map_err(open_err)?.len();

    let mut index = KeyIndex::new();
    replay(&mut file, len, &mut index).map_err(open_err)
}
