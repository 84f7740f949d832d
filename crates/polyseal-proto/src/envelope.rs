//! Multi-recipient envelope framing.
//!
//! An envelope is a plain stream of exactly three records:
//!
//! ```text
//! [ciphertext][wrapped keys: keyed stream][signature]
//! ```
//!
//! The sender encrypts the payload once, wraps the content key once per
//! recipient, frames the wrapped keys with the keyed codec, and signs. This
//! module only does the framing. Producing the ciphertext, wrapping keys, and
//! signing or verifying are the caller's job, and nothing here authenticates
//! the bytes.

use std::collections::BTreeMap;

use bytes::{BufMut, Bytes};

use crate::{
    DecodeLimits, Identifier,
    errors::{FramingError, Result},
    keyed::{KeyedBlobs, decode_keyed, encode_keyed, lookup},
    record::{KeyedRecords, Records},
    stream::{encode_blobs_into, encoded_len},
};

/// Framed multi-recipient envelope.
///
/// # Invariants
///
/// - A value returned by [`Envelope::decode`] has a `wrapped_keys` component
///   that is a structurally valid keyed stream under the limits it was decoded
///   with. Values built with [`Envelope::new`] satisfy this by construction.
///   [`Envelope::from_parts`] trusts the caller.
///
/// # Security
///
/// Provides structural validity only. The signature component is carried, not
/// checked. Verify it before trusting the ciphertext or any wrapped key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Payload encrypted under the content key
    pub ciphertext: Bytes,
    /// Keyed stream of per-recipient wrapped content keys
    pub wrapped_keys: Bytes,
    /// Sender signature over whatever the caller chose to sign
    pub signature: Bytes,
}

impl Envelope {
    /// Number of components in an envelope.
    pub const COMPONENTS: usize = 3;

    /// Build an envelope, framing `wrapped_keys` with the keyed codec.
    pub fn new<B: AsRef<[u8]>>(
        ciphertext: impl Into<Bytes>,
        wrapped_keys: &BTreeMap<Identifier, B>,
        signature: impl Into<Bytes>,
    ) -> Self {
        Self::from_parts(ciphertext, encode_keyed(wrapped_keys), signature)
    }

    /// Build an envelope from an already-encoded wrapped-key stream.
    pub fn from_parts(
        ciphertext: impl Into<Bytes>,
        wrapped_keys: impl Into<Bytes>,
        signature: impl Into<Bytes>,
    ) -> Self {
        Self {
            ciphertext: ciphertext.into(),
            wrapped_keys: wrapped_keys.into(),
            signature: signature.into(),
        }
    }

    /// Size of [`Envelope::encode`] output.
    pub fn encoded_len(&self) -> usize {
        encoded_len([self.ciphertext.len(), self.wrapped_keys.len(), self.signature.len()])
    }

    /// Frame the three components into a new buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }

    /// Frame the three components, appending to `dst`.
    pub fn encode_into(&self, dst: &mut impl BufMut) {
        tracing::trace!(
            ciphertext = self.ciphertext.len(),
            wrapped_keys = self.wrapped_keys.len(),
            signature = self.signature.len(),
            "encoding envelope"
        );
        encode_blobs_into([&self.ciphertext, &self.wrapped_keys, &self.signature], dst);
    }

    /// Split an envelope into its components.
    ///
    /// # Errors
    ///
    /// - Any framing error from the outer stream
    /// - `FramingError::ComponentCount` if the stream does not hold exactly
    ///   three records
    /// - Any framing error from the wrapped-key stream, which is walked once
    ///   here so that later lookups cannot hit malformed records
    pub fn decode(input: &[u8]) -> Result<Self> {
        Self::decode_with(input, &DecodeLimits::default())
    }

    /// [`Envelope::decode`] under explicit limits.
    ///
    /// `max_records` caps the number of wrapped keys. The outer stream always
    /// holds exactly three components and is never subject to it.
    /// `max_blob_len` applies to every component and every wrapped key.
    ///
    /// # Errors
    ///
    /// As [`Envelope::decode`], plus `FramingError::TooManyRecords` for too
    /// many recipients and `FramingError::BlobTooLarge` for an oversized
    /// component or wrapped key.
    pub fn decode_with(input: &[u8], limits: &DecodeLimits) -> Result<Self> {
        Self::split(input, limits).inspect_err(|err| {
            tracing::debug!(%err, input_len = input.len(), "rejected malformed envelope");
        })
    }

    fn split(input: &[u8], limits: &DecodeLimits) -> Result<Self> {
        // One copy of the input; components are views into it
        let shared = Bytes::copy_from_slice(input);

        let outer = DecodeLimits { max_records: usize::MAX, ..*limits };
        let mut parts = Vec::with_capacity(Self::COMPONENTS);
        let mut count = 0;
        for record in Records::new(&shared).with_limits(outer) {
            let payload = record?;
            count += 1;
            if parts.len() < Self::COMPONENTS {
                parts.push(shared.slice_ref(payload));
            }
        }

        let component_count =
            FramingError::ComponentCount { expected: Self::COMPONENTS, actual: count };
        if count != Self::COMPONENTS {
            return Err(component_count);
        }
        let [ciphertext, wrapped_keys, signature]: [Bytes; Self::COMPONENTS] =
            parts.try_into().map_err(|_| component_count)?;

        for record in KeyedRecords::new(&wrapped_keys).with_limits(*limits) {
            record?;
        }

        Ok(Self { ciphertext, wrapped_keys, signature })
    }

    /// Wrapped key for `recipient`, or `None` if the envelope has no slot for
    /// it.
    ///
    /// Scans the wrapped-key stream up to the match without copying.
    ///
    /// # Errors
    ///
    /// - Framing errors from the wrapped-key stream. Unreachable for envelopes
    ///   from [`Envelope::new`] or [`Envelope::decode`].
    pub fn wrapped_key(&self, recipient: Identifier) -> Result<Option<&[u8]>> {
        lookup(recipient, &self.wrapped_keys)
    }

    /// Decode every wrapped key.
    ///
    /// # Errors
    ///
    /// - Framing errors from the wrapped-key stream
    /// - `FramingError::DuplicateIdentifier` if a foreign encoder repeated a
    ///   recipient
    pub fn wrapped_keys(&self) -> Result<KeyedBlobs> {
        decode_keyed(&self.wrapped_keys)
    }

    /// Recipient identifiers in wire order, without copying wrapped keys.
    ///
    /// # Errors
    ///
    /// - Framing errors from the wrapped-key stream
    pub fn recipients(&self) -> Result<Vec<Identifier>> {
        KeyedRecords::new(&self.wrapped_keys)
            .map(|record| record.map(|(identifier, _)| identifier))
            .collect()
    }
}
