//! Error types for stream framing.
//!
//! Every variant describes malformed or over-limit input. Decoding is
//! deterministic: the same bytes under the same limits always produce the same
//! variant with the same fields. A missing identifier is never an error; point
//! lookups report absence as `Ok(None)`.

use thiserror::Error;

use crate::Identifier;

/// Result alias used throughout the framing layer.
pub type Result<T> = std::result::Result<T, FramingError>;

/// Errors produced while decoding framed streams.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// Fewer bytes remain than a record header needs
    #[error("record header truncated at offset {offset}: expected {expected} bytes, got {actual}")]
    HeaderTruncated {
        /// Stream offset where the record starts
        offset: usize,
        /// Header size for this record kind
        expected: usize,
        /// Bytes left in the stream
        actual: usize,
    },

    /// Declared payload length runs past the end of input
    #[error(
        "record payload truncated at offset {offset}: declared {declared} bytes, {remaining} remain"
    )]
    PayloadTruncated {
        /// Stream offset where the record starts
        offset: usize,
        /// Length field as read from the wire
        declared: u64,
        /// Bytes left after the header
        remaining: usize,
    },

    /// Stream holds more records than the configured limit
    #[error("stream exceeds {max} records")]
    TooManyRecords {
        /// Configured record limit
        max: usize,
    },

    /// A record declares a payload larger than the configured limit
    #[error("record at offset {offset} declares {declared} bytes, limit is {max}")]
    BlobTooLarge {
        /// Stream offset where the record starts
        offset: usize,
        /// Length field as read from the wire
        declared: u64,
        /// Configured per-record limit
        max: u64,
    },

    /// A keyed stream repeats an identifier
    #[error("identifier {0} appears more than once")]
    DuplicateIdentifier(Identifier),

    /// An envelope does not split into the expected number of components
    #[error("envelope has {actual} components, expected {expected}")]
    ComponentCount {
        /// Components an envelope carries
        expected: usize,
        /// Components found
        actual: usize,
    },
}

impl FramingError {
    /// Returns true if the input ended before a record was complete.
    ///
    /// Truncation usually means a short read upstream. The other variants mean
    /// the bytes were produced by a broken or hostile encoder, or exceed local
    /// policy.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::HeaderTruncated { .. } | Self::PayloadTruncated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_variants_are_truncated() {
        assert!(FramingError::HeaderTruncated { offset: 0, expected: 8, actual: 3 }.is_truncated());
        assert!(
            FramingError::PayloadTruncated { offset: 8, declared: 10, remaining: 2 }.is_truncated()
        );
    }

    #[test]
    fn policy_and_structure_errors_are_not_truncated() {
        assert!(!FramingError::TooManyRecords { max: 4 }.is_truncated());
        assert!(!FramingError::BlobTooLarge { offset: 0, declared: 99, max: 10 }.is_truncated());
        assert!(!FramingError::DuplicateIdentifier(Identifier::from_u32(7)).is_truncated());
        assert!(!FramingError::ComponentCount { expected: 3, actual: 2 }.is_truncated());
    }

    #[test]
    fn display_names_the_identifier_in_hex() {
        let err = FramingError::DuplicateIdentifier(Identifier::from_u32(0xDEAD_BEEF));
        assert_eq!(err.to_string(), "identifier deadbeef appears more than once");
    }
}
