//! Record headers and zero-copy record cursors.
//!
//! A stream is a bare concatenation of records with no stream-level length or
//! terminator, so end of input is the only end-of-stream marker:
//!
//! ```text
//! plain record:  [length: u64 BE][payload: length bytes]
//! keyed record:  [identifier: 4 bytes][length: u64 BE][payload: length bytes]
//! ```
//!
//! Headers are cast directly from the input with `zerocopy`, and payloads are
//! returned as subslices of the input. Walking a stream therefore never
//! allocates, which is what lets a recipient find its own wrapped key without
//! materializing everyone else's.

use std::{iter::FusedIterator, marker::PhantomData};

use bytes::BufMut;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    DecodeLimits, Identifier,
    errors::{FramingError, Result},
};

/// Size of a plain record header (the length field)
pub const PLAIN_HEADER_SIZE: usize = 8;

/// Size of a keyed record header (identifier + length field)
pub const KEYED_HEADER_SIZE: usize = Identifier::SIZE + PLAIN_HEADER_SIZE;

/// Header of a plain record.
#[repr(C)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable)]
pub(crate) struct PlainHeader {
    len: [u8; 8],
}

/// Header of a keyed record.
#[repr(C)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable)]
pub(crate) struct KeyedHeader {
    identifier: [u8; Identifier::SIZE],
    len: [u8; 8],
}

const _: () = assert!(size_of::<PlainHeader>() == PLAIN_HEADER_SIZE);
const _: () = assert!(size_of::<KeyedHeader>() == KEYED_HEADER_SIZE);

/// Fixed-layout header that prefixes every record of one kind.
pub(crate) trait RecordHeader: FromBytes + KnownLayout + Immutable + 'static {
    /// Serialized header size
    const SIZE: usize;

    /// Payload length as declared on the wire.
    fn payload_len(&self) -> u64;
}

impl RecordHeader for PlainHeader {
    const SIZE: usize = PLAIN_HEADER_SIZE;

    fn payload_len(&self) -> u64 {
        u64::from_be_bytes(self.len)
    }
}

impl RecordHeader for KeyedHeader {
    const SIZE: usize = KEYED_HEADER_SIZE;

    fn payload_len(&self) -> u64 {
        u64::from_be_bytes(self.len)
    }
}

impl PlainHeader {
    /// Write the header for a payload of `len` bytes.
    pub(crate) fn put(len: usize, dst: &mut impl BufMut) {
        // usize is at most 64 bits on every supported target
        let header = Self { len: (len as u64).to_be_bytes() };
        dst.put_slice(header.as_bytes());
    }
}

impl KeyedHeader {
    /// Write the header for `identifier` owning a payload of `len` bytes.
    pub(crate) fn put(identifier: Identifier, len: usize, dst: &mut impl BufMut) {
        let header = Self { identifier: *identifier.as_bytes(), len: (len as u64).to_be_bytes() };
        dst.put_slice(header.as_bytes());
    }

    fn identifier(&self) -> Identifier {
        Identifier::new(self.identifier)
    }
}

/// Shared walking logic for both record kinds.
///
/// # Invariants
///
/// - `offset <= input.len()` at all times; it only advances past a fully
///   validated record.
/// - Once a record fails to parse the cursor is fused and yields nothing
///   further, so callers never observe records after a framing error.
struct Cursor<'a, H> {
    input: &'a [u8],
    offset: usize,
    records: usize,
    limits: DecodeLimits,
    fused: bool,
    _header: PhantomData<H>,
}

impl<'a, H: RecordHeader> Cursor<'a, H> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            records: 0,
            limits: DecodeLimits::default(),
            fused: false,
            _header: PhantomData,
        }
    }

    fn next_record(&mut self) -> Option<Result<(&'a H, &'a [u8])>> {
        if self.fused {
            return None;
        }

        let remaining = self.input.get(self.offset..).unwrap_or_default();
        if remaining.is_empty() {
            return None;
        }

        let record = self.read(remaining);
        if record.is_err() {
            self.fused = true;
        }
        Some(record)
    }

    fn read(&mut self, remaining: &'a [u8]) -> Result<(&'a H, &'a [u8])> {
        if self.records >= self.limits.max_records {
            return Err(FramingError::TooManyRecords { max: self.limits.max_records });
        }

        let (header, body) = H::ref_from_prefix(remaining).map_err(|_| {
            FramingError::HeaderTruncated {
                offset: self.offset,
                expected: H::SIZE,
                actual: remaining.len(),
            }
        })?;

        let declared = header.payload_len();
        if declared > self.limits.max_blob_len {
            return Err(FramingError::BlobTooLarge {
                offset: self.offset,
                declared,
                max: self.limits.max_blob_len,
            });
        }

        // A length that does not fit in usize cannot fit in the input either
        let payload = usize::try_from(declared).ok().and_then(|len| body.get(..len)).ok_or(
            FramingError::PayloadTruncated { offset: self.offset, declared, remaining: body.len() },
        )?;

        self.offset += H::SIZE + payload.len();
        self.records += 1;

        debug_assert!(self.offset <= self.input.len());

        Ok((header, payload))
    }
}

/// Iterator over the payloads of a plain record stream.
///
/// Yields each payload as a subslice of the input. The first malformed record
/// yields an error and ends iteration.
///
/// ```
/// use polyseal_proto::{Records, encode_blobs};
///
/// let stream = encode_blobs([&b"abc"[..], b""]);
/// let payloads: Vec<&[u8]> = Records::new(&stream).collect::<Result<_, _>>().unwrap();
/// assert_eq!(payloads, [&b"abc"[..], b""]);
/// ```
pub struct Records<'a> {
    cursor: Cursor<'a, PlainHeader>,
}

impl<'a> Records<'a> {
    /// Walk `input` as a plain record stream with unbounded limits.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(input) }
    }

    /// Apply decode limits to this walk.
    #[must_use]
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.cursor.limits = limits;
        self
    }

    /// Bytes consumed by the records yielded so far.
    pub fn offset(&self) -> usize {
        self.cursor.offset
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_record().map(|record| record.map(|(_, payload)| payload))
    }
}

impl FusedIterator for Records<'_> {}

/// Iterator over `(identifier, payload)` pairs of a keyed record stream.
///
/// Same contract as [`Records`], with the 12-byte keyed header.
pub struct KeyedRecords<'a> {
    cursor: Cursor<'a, KeyedHeader>,
}

impl<'a> KeyedRecords<'a> {
    /// Walk `input` as a keyed record stream with unbounded limits.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(input) }
    }

    /// Apply decode limits to this walk.
    #[must_use]
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.cursor.limits = limits;
        self
    }

    /// Bytes consumed by the records yielded so far.
    pub fn offset(&self) -> usize {
        self.cursor.offset
    }
}

impl<'a> Iterator for KeyedRecords<'a> {
    type Item = Result<(Identifier, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor
            .next_record()
            .map(|record| record.map(|(header, payload)| (header.identifier(), payload)))
    }
}

impl FusedIterator for KeyedRecords<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(payloads: &[&[u8]]) -> Vec<u8> {
        let mut buf = Vec::new();
        for payload in payloads {
            PlainHeader::put(payload.len(), &mut buf);
            buf.put_slice(payload);
        }
        buf
    }

    #[test]
    fn empty_input_has_no_records() {
        assert_eq!(Records::new(&[]).count(), 0);
        assert_eq!(KeyedRecords::new(&[]).count(), 0);
    }

    #[test]
    fn plain_header_is_big_endian_length() {
        let mut buf = Vec::new();
        PlainHeader::put(0x0102, &mut buf);
        assert_eq!(buf, [0, 0, 0, 0, 0, 0, 0x01, 0x02]);
    }

    #[test]
    fn keyed_header_puts_identifier_first() {
        let mut buf = Vec::new();
        KeyedHeader::put(Identifier::from_u32(0xAABB_CCDD), 5, &mut buf);
        assert_eq!(buf, [0xAA, 0xBB, 0xCC, 0xDD, 0, 0, 0, 0, 0, 0, 0, 5]);
    }

    #[test]
    fn offset_tracks_consumed_bytes() {
        let stream = plain(&[b"ab", b"", b"cde"]);
        let mut records = Records::new(&stream);

        assert_eq!(records.next(), Some(Ok(&b"ab"[..])));
        assert_eq!(records.offset(), 10);
        assert_eq!(records.next(), Some(Ok(&b""[..])));
        assert_eq!(records.offset(), 18);
        assert_eq!(records.next(), Some(Ok(&b"cde"[..])));
        assert_eq!(records.offset(), stream.len());
        assert_eq!(records.next(), None);
    }

    #[test]
    fn short_header_reports_offset_and_sizes() {
        let mut stream = plain(&[b"ok"]);
        stream.extend_from_slice(&[0, 0, 0]);

        let results: Vec<_> = Records::new(&stream).collect();
        assert_eq!(
            results,
            vec![
                Ok(&b"ok"[..]),
                Err(FramingError::HeaderTruncated { offset: 10, expected: 8, actual: 3 }),
            ]
        );
    }

    #[test]
    fn oversized_length_is_payload_truncation() {
        let mut stream = Vec::new();
        stream.put_u64(u64::MAX);
        stream.put_slice(b"tail");

        let mut records = Records::new(&stream);
        assert_eq!(
            records.next(),
            Some(Err(FramingError::PayloadTruncated {
                offset: 0,
                declared: u64::MAX,
                remaining: 4,
            }))
        );
    }

    #[test]
    fn cursor_is_fused_after_error() {
        let mut stream = Vec::new();
        stream.put_u64(100);
        stream.extend(plain(&[b"never reached"]));

        let mut records = Records::new(&stream);
        assert!(matches!(records.next(), Some(Err(FramingError::PayloadTruncated { .. }))));
        assert_eq!(records.next(), None);
        assert_eq!(records.offset(), 0);
    }

    #[test]
    fn keyed_short_header_expects_twelve_bytes() {
        let stream = [0u8; 11];
        let mut records = KeyedRecords::new(&stream);
        assert_eq!(
            records.next(),
            Some(Err(FramingError::HeaderTruncated { offset: 0, expected: 12, actual: 11 }))
        );
    }

    #[test]
    fn record_limit_stops_before_parsing_excess_record() {
        let stream = plain(&[b"a", b"b", b"c"]);
        let limits = DecodeLimits::default().with_max_records(2);

        let results: Vec<_> = Records::new(&stream).with_limits(limits).collect();
        assert_eq!(results.len(), 3);
        assert_eq!(results[2], Err(FramingError::TooManyRecords { max: 2 }));
    }

    #[test]
    fn blob_limit_checks_declared_length_before_payload() {
        let mut stream = Vec::new();
        KeyedHeader::put(Identifier::from_u32(1), 1 << 40, &mut stream);

        let limits = DecodeLimits::default().with_max_blob_len(64);
        let mut records = KeyedRecords::new(&stream).with_limits(limits);
        assert_eq!(
            records.next(),
            Some(Err(FramingError::BlobTooLarge { offset: 0, declared: 1 << 40, max: 64 }))
        );
    }
}
