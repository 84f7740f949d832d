//! Plain blob streams.
//!
//! Merges an ordered sequence of opaque blobs into one reversible byte stream
//! and splits it back. Each blob becomes a record of an 8-byte big-endian
//! length followed by the raw bytes. Zero-length blobs and the empty sequence
//! are both representable: an empty blob is a bare `0` length field, and no
//! blobs at all is an empty stream.
//!
//! # Invariants
//!
//! `decode_blobs(&encode_blobs(xs)) == xs` for every finite sequence `xs`,
//! preserving order, count and bytes.

use bytes::{BufMut, Bytes};

use crate::{
    DecodeLimits,
    errors::Result,
    record::{PLAIN_HEADER_SIZE, PlainHeader, Records},
};

/// Exact size of the stream [`encode_blobs`] produces for blobs of these
/// lengths.
pub fn encoded_len<I>(blob_lens: I) -> usize
where
    I: IntoIterator<Item = usize>,
{
    blob_lens.into_iter().fold(0, |total, len| total + PLAIN_HEADER_SIZE + len)
}

/// Encode blobs into a new buffer.
///
/// Deterministic: the output depends only on the ordered input.
pub fn encode_blobs<I, B>(blobs: I) -> Vec<u8>
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let mut buf = Vec::new();
    encode_blobs_into(blobs, &mut buf);
    buf
}

/// Encode blobs, appending to `dst`.
pub fn encode_blobs_into<I, B>(blobs: I, dst: &mut impl BufMut)
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    for blob in blobs {
        let blob = blob.as_ref();
        PlainHeader::put(blob.len(), dst);
        dst.put_slice(blob);
    }
}

/// Split a plain stream back into its blobs.
///
/// # Errors
///
/// - `FramingError::HeaderTruncated` if fewer than 8 bytes remain where a
///   length field should start
/// - `FramingError::PayloadTruncated` if a declared length exceeds the bytes
///   that remain
///
/// No partial result is returned on error.
pub fn decode_blobs(input: &[u8]) -> Result<Vec<Bytes>> {
    decode_blobs_with(input, &DecodeLimits::default())
}

/// [`decode_blobs`] under explicit limits.
///
/// # Errors
///
/// As [`decode_blobs`], plus `FramingError::TooManyRecords` and
/// `FramingError::BlobTooLarge` when a limit is exceeded.
pub fn decode_blobs_with(input: &[u8], limits: &DecodeLimits) -> Result<Vec<Bytes>> {
    Records::new(input)
        .with_limits(*limits)
        .map(|record| record.map(Bytes::copy_from_slice))
        .collect::<Result<Vec<_>>>()
        .inspect_err(|err| {
            tracing::debug!(%err, input_len = input.len(), "rejected malformed blob stream");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FramingError;

    #[test]
    fn empty_sequence_encodes_to_nothing() {
        let encoded = encode_blobs(Vec::<Vec<u8>>::new());
        assert!(encoded.is_empty());
        assert_eq!(decode_blobs(&encoded).unwrap(), Vec::<Bytes>::new());
    }

    #[test]
    fn zero_length_blob_is_a_bare_length_field() {
        let encoded = encode_blobs([b""]);
        assert_eq!(encoded, [0u8; 8]);
        assert_eq!(decode_blobs(&encoded).unwrap(), vec![Bytes::new()]);
    }

    #[test]
    fn mixed_sizes_round_trip_in_order() {
        let large = vec![0u8; 1_000_000];
        let blobs: [&[u8]; 3] = [b"", b"abc", &large];

        let encoded = encode_blobs(&blobs);
        assert_eq!(encoded.len(), 3 * 8 + 3 + 1_000_000);
        assert_eq!(encoded.len(), encoded_len(blobs.iter().map(|b| b.len())));

        let decoded = decode_blobs(&encoded).unwrap();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0], b""[..]);
        assert_eq!(decoded[1], b"abc"[..]);
        assert_eq!(decoded[2], large);
    }

    #[test]
    fn encode_into_appends() {
        let mut buf = vec![0xFF];
        encode_blobs_into([b"x"], &mut buf);
        assert_eq!(buf, [0xFF, 0, 0, 0, 0, 0, 0, 0, 1, b'x']);
    }

    #[test]
    fn truncated_final_byte_fails() {
        let mut encoded = encode_blobs([&b"hello"[..], b"world"]);
        encoded.pop();

        assert_eq!(
            decode_blobs(&encoded),
            Err(FramingError::PayloadTruncated { offset: 13, declared: 5, remaining: 4 })
        );
    }

    #[test]
    fn trailing_garbage_fails() {
        let mut encoded = encode_blobs([b"abc"]);
        encoded.extend_from_slice(&[1, 2]);

        let err = decode_blobs(&encoded).unwrap_err();
        assert_eq!(err, FramingError::HeaderTruncated { offset: 11, expected: 8, actual: 2 });
    }

    #[test]
    fn same_input_same_error() {
        let garbage = [0u8, 0, 0, 0, 0, 0, 1, 0, 9, 9];
        assert_eq!(decode_blobs(&garbage), decode_blobs(&garbage));
    }

    #[test]
    fn limits_reject_long_streams() {
        let encoded = encode_blobs([b"a", b"b", b"c"]);
        let limits = DecodeLimits::default().with_max_records(2);

        assert_eq!(
            decode_blobs_with(&encoded, &limits),
            Err(FramingError::TooManyRecords { max: 2 })
        );
        assert!(decode_blobs_with(&encoded, &limits.with_max_records(3)).is_ok());
    }
}
