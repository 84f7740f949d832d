//! Identifier-keyed blob streams and point lookup.
//!
//! Serializes a mapping from [`Identifier`] to blob, one keyed record per
//! entry: 4 identifier bytes, an 8-byte big-endian length, then the payload.
//! Records appear in ascending identifier order because that is how
//! `BTreeMap` iterates, but decoders must not rely on it; the contract is
//! pair-set equality.
//!
//! [`lookup`] walks the same records and stops at the first matching
//! identifier. A recipient uses it to pull its own wrapped key out of an
//! envelope without copying anyone else's.

use std::collections::{BTreeMap, btree_map::Entry};

use bytes::{BufMut, Bytes};

use crate::{
    DecodeLimits, Identifier,
    errors::{FramingError, Result},
    record::{KEYED_HEADER_SIZE, KeyedHeader, KeyedRecords},
};

/// Decoded keyed mapping.
pub type KeyedBlobs = BTreeMap<Identifier, Bytes>;

/// Encode a mapping into a new buffer.
pub fn encode_keyed<B: AsRef<[u8]>>(mapping: &BTreeMap<Identifier, B>) -> Vec<u8> {
    let len = mapping.values().map(|blob| KEYED_HEADER_SIZE + blob.as_ref().len()).sum();
    let mut buf = Vec::with_capacity(len);
    encode_keyed_into(mapping, &mut buf);
    buf
}

/// Encode a mapping, appending to `dst`.
///
/// Duplicate identifiers are impossible here: the map type holds at most one
/// blob per identifier.
pub fn encode_keyed_into<B: AsRef<[u8]>>(
    mapping: &BTreeMap<Identifier, B>,
    dst: &mut impl BufMut,
) {
    for (identifier, blob) in mapping {
        let blob = blob.as_ref();
        KeyedHeader::put(*identifier, blob.len(), dst);
        dst.put_slice(blob);
    }
}

/// Decode a keyed stream into a mapping.
///
/// # Errors
///
/// - `FramingError::HeaderTruncated` if fewer than 12 bytes remain where a
///   record should start
/// - `FramingError::PayloadTruncated` if a declared length exceeds the bytes
///   that remain
/// - `FramingError::DuplicateIdentifier` if the stream names an identifier
///   twice. [`encode_keyed`] never produces such a stream; one that does was
///   built by something else and has no single meaning.
pub fn decode_keyed(input: &[u8]) -> Result<KeyedBlobs> {
    decode_keyed_with(input, &DecodeLimits::default())
}

/// [`decode_keyed`] under explicit limits.
///
/// # Errors
///
/// As [`decode_keyed`], plus `FramingError::TooManyRecords` and
/// `FramingError::BlobTooLarge` when a limit is exceeded.
pub fn decode_keyed_with(input: &[u8], limits: &DecodeLimits) -> Result<KeyedBlobs> {
    collect_keyed(KeyedRecords::new(input).with_limits(*limits)).inspect_err(|err| {
        tracing::debug!(%err, input_len = input.len(), "rejected malformed keyed stream");
    })
}

fn collect_keyed(records: KeyedRecords<'_>) -> Result<KeyedBlobs> {
    let mut mapping = BTreeMap::new();

    for record in records {
        let (identifier, payload) = record?;
        match mapping.entry(identifier) {
            Entry::Occupied(_) => return Err(FramingError::DuplicateIdentifier(identifier)),
            Entry::Vacant(slot) => {
                slot.insert(Bytes::copy_from_slice(payload));
            },
        }
    }

    Ok(mapping)
}

/// Find the blob stored under `target` without decoding the whole stream.
///
/// Returns `Ok(None)` when the stream is well-formed up to its end and never
/// names `target`. The returned slice borrows from `input`.
///
/// Records after the match are not inspected, so a stream that is malformed
/// only past the match still yields the match. On every stream that
/// [`decode_keyed`] accepts, the result equals
/// `decode_keyed(input)?.get(&target)`.
///
/// # Errors
///
/// - `FramingError::HeaderTruncated` / `FramingError::PayloadTruncated` if a
///   record before the match (or before the end, on a miss) is malformed
pub fn lookup(target: Identifier, input: &[u8]) -> Result<Option<&[u8]>> {
    lookup_with(target, input, &DecodeLimits::default())
}

/// [`lookup`] under explicit limits.
///
/// # Errors
///
/// As [`lookup`], plus `FramingError::TooManyRecords` and
/// `FramingError::BlobTooLarge` for records scanned before the match.
pub fn lookup_with<'a>(
    target: Identifier,
    input: &'a [u8],
    limits: &DecodeLimits,
) -> Result<Option<&'a [u8]>> {
    let mut records = KeyedRecords::new(input).with_limits(*limits);

    let found = records
        .find_map(|record| match record {
            Ok((identifier, payload)) if identifier == target => Some(Ok(payload)),
            Ok(_) => None,
            Err(err) => Some(Err(err)),
        })
        .transpose();

    match &found {
        Ok(hit) => {
            tracing::trace!(%target, hit = hit.is_some(), scanned = records.offset(), "lookup");
        },
        Err(err) => {
            tracing::debug!(%err, %target, scanned = records.offset(), "lookup hit malformed record");
        },
    }

    found
}
