//! Tests for the record codec
//!
//! These tests verify:
//! - The exact on-disk byte layout
//! - Decoding headers and keys without loading values
//! - Truncated records reported as end-of-data, not errors
//! - Garbage length fields rejected before allocation

use std::io::Cursor;

use voila::record::{decode_at, encode, record_size, Record, RECORD_HEADER_SIZE};

// =============================================================================
// Helper Functions
// =============================================================================

fn concat(records: &[(&[u8], &[u8])]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (key, value) in records {
        bytes.extend_from_slice(&encode(key, value));
    }
    bytes
}

fn decode_all(bytes: Vec<u8>) -> Vec<(Vec<u8>, u64)> {
    let len = bytes.len() as u64;
    let mut cursor = Cursor::new(bytes);
    let mut offset = 0;
    let mut out = Vec::new();
    while let Some(record) = decode_at(&mut cursor, offset, len).unwrap() {
        offset = record.next_offset;
        out.push((record.key, record.value_len));
    }
    out
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_layout() {
    let bytes = encode(b"ab", b"xyz");

    let mut expected = Vec::new();
    expected.extend_from_slice(&2u64.to_le_bytes());
    expected.extend_from_slice(&3u64.to_le_bytes());
    expected.extend_from_slice(b"ab");
    expected.extend_from_slice(b"xyz");

    assert_eq!(&bytes[..], expected.as_slice());
}

#[test]
fn test_encode_empty_key_and_value() {
    let bytes = encode(b"", b"");

    assert_eq!(bytes.len(), 16);
    assert!(bytes.iter().all(|&b| b == 0));
}

#[test]
fn test_encode_is_deterministic() {
    assert_eq!(encode(b"key", b"value"), encode(b"key", b"value"));
}

#[test]
fn test_record_size_matches_encoded_len() {
    let record = Record::new(b"hello", b"world!");

    assert_eq!(record.size(), Some(16 + 5 + 6));
    assert_eq!(Some(record.encode().len() as u64), record.size());
    assert_eq!(record_size(5, 6), record.size());
}

#[test]
fn test_record_size_overflow() {
    assert_eq!(record_size(u64::MAX, 0), None);
    assert_eq!(record_size(u64::MAX - RECORD_HEADER_SIZE, 1), None);
    assert_eq!(record_size(0, 0), Some(RECORD_HEADER_SIZE));
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_single_record() {
    let bytes = encode(b"name", b"Voila Database").to_vec();
    let len = bytes.len() as u64;
    let mut cursor = Cursor::new(bytes);

    let record = decode_at(&mut cursor, 0, len).unwrap().unwrap();

    assert_eq!(record.key, b"name");
    assert_eq!(record.key_len(), 4);
    assert_eq!(record.value_len, 14);
    assert_eq!(record.offset, 0);
    assert_eq!(record.value_offset, 20);
    assert_eq!(record.next_offset, len);
    assert_eq!(record.record_size(), len);
}

#[test]
fn test_decode_at_nonzero_offset() {
    let bytes = concat(&[(b"a", b"1"), (b"bb", b"22")]);
    let len = bytes.len() as u64;
    let mut cursor = Cursor::new(bytes);

    let record = decode_at(&mut cursor, 18, len).unwrap().unwrap();

    assert_eq!(record.key, b"bb");
    assert_eq!(record.offset, 18);
    assert_eq!(record.value_offset, 18 + 16 + 2);
    assert_eq!(record.next_offset, len);
}

#[test]
fn test_decode_consecutive_records() {
    let bytes = concat(&[(b"k1", b"v1"), (b"", b"empty key"), (b"k3", b"")]);

    let decoded = decode_all(bytes);

    assert_eq!(
        decoded,
        vec![(b"k1".to_vec(), 2), (Vec::new(), 9), (b"k3".to_vec(), 0)]
    );
}

#[test]
fn test_decode_empty_source() {
    let mut cursor = Cursor::new(Vec::new());

    assert!(decode_at(&mut cursor, 0, 0).unwrap().is_none());
}

#[test]
fn test_decode_offset_at_end() {
    let bytes = encode(b"k", b"v").to_vec();
    let len = bytes.len() as u64;
    let mut cursor = Cursor::new(bytes);

    assert!(decode_at(&mut cursor, len, len).unwrap().is_none());
    assert!(decode_at(&mut cursor, len + 100, len).unwrap().is_none());
}

// =============================================================================
// Truncation Tests
// =============================================================================

#[test]
fn test_decode_truncated_header() {
    let mut bytes = encode(b"key", b"value").to_vec();
    bytes.truncate(10);

    assert!(decode_all(bytes).is_empty());
}

#[test]
fn test_decode_truncated_key() {
    let mut bytes = encode(b"a-long-key", b"value").to_vec();
    bytes.truncate(16 + 4);

    assert!(decode_all(bytes).is_empty());
}

#[test]
fn test_decode_value_region_must_be_present() {
    let mut bytes = encode(b"key", b"value").to_vec();
    bytes.pop();

    assert!(decode_all(bytes).is_empty());
}

#[test]
fn test_decode_stops_at_torn_second_record() {
    let mut bytes = concat(&[(b"k1", b"v1"), (b"k2", b"v2")]);
    bytes.truncate(bytes.len() - 1);

    let decoded = decode_all(bytes);

    assert_eq!(decoded, vec![(b"k1".to_vec(), 2)]);
}

#[test]
fn test_decode_respects_end_bound() {
    // Bytes beyond `end` are not considered part of the data.
    let bytes = encode(b"key", b"value").to_vec();
    let len = bytes.len() as u64;
    let mut cursor = Cursor::new(bytes);

    assert!(decode_at(&mut cursor, 0, len - 1).unwrap().is_none());
}

#[test]
fn test_decode_absurd_lengths() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&u64::MAX.to_le_bytes());
    bytes.extend_from_slice(&1u64.to_le_bytes());
    bytes.extend_from_slice(b"junk");
    assert!(decode_all(bytes).is_empty());

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&8u64.to_le_bytes());
    bytes.extend_from_slice(&(u64::MAX - 4).to_le_bytes());
    bytes.extend_from_slice(b"junkjunk");
    assert!(decode_all(bytes).is_empty());
}
