//! Decode-time resource limits.
//!
//! The wire format allows payloads up to `u64::MAX` bytes and any number of
//! records, so the defaults are unbounded. Services that decode envelopes from
//! untrusted peers can tighten them to fail fast on hostile length fields
//! before any payload is copied.

use serde::{Deserialize, Serialize};

/// Limits applied while walking a framed stream.
///
/// Limits never change what a successful decode returns; they only turn
/// oversized input into [`FramingError::TooManyRecords`] or
/// [`FramingError::BlobTooLarge`].
///
/// [`FramingError::TooManyRecords`]: crate::FramingError::TooManyRecords
/// [`FramingError::BlobTooLarge`]: crate::FramingError::BlobTooLarge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// Maximum number of records in one stream
    pub max_records: usize,
    /// Maximum declared payload length of a single record
    pub max_blob_len: u64,
}

impl DecodeLimits {
    /// No limits beyond what the input itself contains.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_records: usize::MAX, max_blob_len: u64::MAX }
    }

    /// Replace the record-count limit.
    #[must_use]
    pub const fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    /// Replace the per-record payload limit.
    #[must_use]
    pub const fn with_max_blob_len(mut self, max_blob_len: u64) -> Self {
        self.max_blob_len = max_blob_len;
        self
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unbounded() {
        let limits = DecodeLimits::default();
        assert_eq!(limits.max_records, usize::MAX);
        assert_eq!(limits.max_blob_len, u64::MAX);
    }

    #[test]
    fn builders_only_touch_their_field() {
        let limits = DecodeLimits::default().with_max_records(16);
        assert_eq!(limits.max_records, 16);
        assert_eq!(limits.max_blob_len, u64::MAX);

        let limits = DecodeLimits { max_blob_len: 1024, ..Default::default() };
        assert_eq!(limits.max_records, usize::MAX);
        assert_eq!(limits.max_blob_len, 1024);
    }

    #[test]
    fn missing_config_fields_fall_back_to_unbounded() {
        #[derive(Serialize)]
        struct Partial {
            max_records: usize,
        }

        let mut buf = Vec::new();
        ciborium::ser::into_writer(&Partial { max_records: 8 }, &mut buf).unwrap();

        let limits: DecodeLimits = ciborium::de::from_reader(buf.as_slice()).unwrap();
        assert_eq!(limits, DecodeLimits::unbounded().with_max_records(8));
    }
}
