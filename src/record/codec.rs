//! Record codec
//!
//! Encoding and decoding of single records.

use std::io::{self, Read, Seek, SeekFrom};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{record_size, RECORD_HEADER_SIZE};

/// Encode a key/value pair into its on-disk layout
///
/// Format: key_len (8, LE) + value_len (8, LE) + key + value
pub fn encode(key: &[u8], value: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(RECORD_HEADER_SIZE as usize + key.len() + value.len());
    buf.put_u64_le(key.len() as u64);
    buf.put_u64_le(value.len() as u64);
    buf.put_slice(key);
    buf.put_slice(value);
    buf.freeze()
}

/// A record located by `decode_at`. The value bytes are not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub key: Vec<u8>,
    pub value_len: u64,
    /// Offset of the record's KeyLen field
    pub offset: u64,
    /// Offset of the first value byte
    pub value_offset: u64,
    /// Offset immediately past the value, where the next record starts
    pub next_offset: u64,
}

impl DecodedRecord {
    pub fn key_len(&self) -> u64 {
        self.key.len() as u64
    }

    pub fn record_size(&self) -> u64 {
        self.next_offset - self.offset
    }
}

/// Decode the record starting at `offset` in a source whose valid data ends at `end`
///
/// Returns:
/// - `Ok(Some(record))` — header, key and value region are all present
/// - `Ok(None)` — the record is cut short (end of data or a torn write)
/// - `Err(e)` — the source itself failed
///
/// Length fields that point past `end` are reported as truncation before any
/// key buffer is allocated, so garbage lengths cannot trigger huge allocations.
pub fn decode_at<S>(source: &mut S, offset: u64, end: u64) -> io::Result<Option<DecodedRecord>>
where
    S: Read + Seek + ?Sized,
{
    if end.saturating_sub(offset) < RECORD_HEADER_SIZE {
        return Ok(None);
    }

    source.seek(SeekFrom::Start(offset))?;

    let mut header = [0u8; RECORD_HEADER_SIZE as usize];
    if !read_full(source, &mut header)? {
        return Ok(None);
    }
    let mut fields = &header[..];
    let key_len = fields.get_u64_le();
    let value_len = fields.get_u64_le();

    let next_offset = match record_size(key_len, value_len).and_then(|size| offset.checked_add(size)) {
        Some(next) if next <= end => next,
        _ => return Ok(None),
    };
    let Ok(key_len) = usize::try_from(key_len) else {
        return Ok(None);
    };

    let mut key = vec![0u8; key_len];
    if !read_full(source, &mut key)? {
        return Ok(None);
    }

    Ok(Some(DecodedRecord {
        key,
        value_len,
        offset,
        value_offset: offset + RECORD_HEADER_SIZE + key_len as u64,
        next_offset,
    }))
}

/// `read_exact` that reports a short read as `false` instead of an error
fn read_full<S: Read + ?Sized>(source: &mut S, buf: &mut [u8]) -> io::Result<bool> {
    match source.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}
