//! Key material encoding
//!
//! Converts the four key kinds an envelope needs to and from bytes:
//!
//! - Private encryption ([`StaticSecret`]): raw 32 bytes
//! - Public encryption ([`PublicKey`]): raw 32-byte u-coordinate
//! - Private signing ([`SigningKey`]): PKCS#8 v2 DER
//! - Public signing ([`VerifyingKey`]): `SubjectPublicKeyInfo` DER
//!
//! Validity and equality are whatever the cryptography crates say they are.
//! This module only moves bytes and turns their failures into
//! [`KeyMaterialError`].
//!
//! # Security
//!
//! Private encodings come back in [`Zeroizing`] buffers and intermediate seed
//! copies are wiped. Key bytes never appear in errors or log events.

use ed25519_dalek::{
    SigningKey, VerifyingKey,
    pkcs8::{DecodePrivateKey, DecodePublicKey, Document, EncodePrivateKey, EncodePublicKey},
};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::error::{KeyKind, KeyMaterialError};

/// Length of raw X25519 keys
pub const X25519_KEY_SIZE: usize = 32;

/// A key kind with a canonical byte encoding.
pub trait KeyMaterial: Sized {
    /// Kind reported in errors and log events
    const KIND: KeyKind;

    /// Encoded form, zeroizing for private keys
    type Encoded: AsRef<[u8]>;

    /// Marshal the key.
    ///
    /// # Errors
    ///
    /// `KeyMaterialError::Encoding` if the cryptography layer reports failure.
    fn encode_key(&self) -> Result<Self::Encoded, KeyMaterialError>;

    /// Parse a key from its encoding.
    ///
    /// # Errors
    ///
    /// `KeyMaterialError::InvalidLength` or `KeyMaterialError::Decoding` if the
    /// bytes are not a valid encoding of this kind.
    fn decode_key(bytes: &[u8]) -> Result<Self, KeyMaterialError>;
}

fn raw_x25519(
    kind: KeyKind,
    bytes: &[u8],
) -> Result<Zeroizing<[u8; X25519_KEY_SIZE]>, KeyMaterialError> {
    if bytes.len() != X25519_KEY_SIZE {
        return Err(KeyMaterialError::InvalidLength {
            kind,
            expected: X25519_KEY_SIZE,
            actual: bytes.len(),
        });
    }

    let mut raw = Zeroizing::new([0u8; X25519_KEY_SIZE]);
    raw.copy_from_slice(bytes);
    Ok(raw)
}

impl KeyMaterial for StaticSecret {
    const KIND: KeyKind = KeyKind::PrivateEncryption;
    type Encoded = Zeroizing<Vec<u8>>;

    fn encode_key(&self) -> Result<Self::Encoded, KeyMaterialError> {
        Ok(Zeroizing::new(self.as_bytes().to_vec()))
    }

    fn decode_key(bytes: &[u8]) -> Result<Self, KeyMaterialError> {
        raw_x25519(Self::KIND, bytes).map(|raw| Self::from(*raw))
    }
}

impl KeyMaterial for PublicKey {
    const KIND: KeyKind = KeyKind::PublicEncryption;
    type Encoded = [u8; X25519_KEY_SIZE];

    fn encode_key(&self) -> Result<Self::Encoded, KeyMaterialError> {
        Ok(self.to_bytes())
    }

    fn decode_key(bytes: &[u8]) -> Result<Self, KeyMaterialError> {
        // Every 32-byte string is a valid Montgomery u-coordinate
        raw_x25519(Self::KIND, bytes).map(|raw| Self::from(*raw))
    }
}

impl KeyMaterial for SigningKey {
    const KIND: KeyKind = KeyKind::PrivateSigning;
    type Encoded = Zeroizing<Vec<u8>>;

    fn encode_key(&self) -> Result<Self::Encoded, KeyMaterialError> {
        self.to_pkcs8_der()
            .map(|document| document.to_bytes())
            .map_err(|err| KeyMaterialError::Encoding { kind: Self::KIND, reason: err.to_string() })
    }

    fn decode_key(bytes: &[u8]) -> Result<Self, KeyMaterialError> {
        // Rejects documents whose embedded public key does not match the seed
        Self::from_pkcs8_der(bytes)
            .map_err(|err| KeyMaterialError::Decoding { kind: Self::KIND, reason: err.to_string() })
    }
}

impl KeyMaterial for VerifyingKey {
    const KIND: KeyKind = KeyKind::PublicSigning;
    type Encoded = Vec<u8>;

    fn encode_key(&self) -> Result<Self::Encoded, KeyMaterialError> {
        self.to_public_key_der()
            .map(Document::into_vec)
            .map_err(|err| KeyMaterialError::Encoding { kind: Self::KIND, reason: err.to_string() })
    }

    fn decode_key(bytes: &[u8]) -> Result<Self, KeyMaterialError> {
        // Fails when the encoded point does not decompress
        Self::from_public_key_der(bytes)
            .map_err(|err| KeyMaterialError::Decoding { kind: Self::KIND, reason: err.to_string() })
    }
}

fn encode<K: KeyMaterial>(key: &K) -> Result<K::Encoded, KeyMaterialError> {
    key.encode_key().inspect_err(|err| {
        tracing::warn!(kind = %K::KIND, %err, "key encoding failed");
    })
}

fn decode<K: KeyMaterial>(bytes: &[u8]) -> Result<K, KeyMaterialError> {
    K::decode_key(bytes).inspect_err(|err| {
        tracing::debug!(kind = %K::KIND, %err, input_len = bytes.len(), "rejected key material");
    })
}

/// Encode an X25519 static secret as its raw 32 bytes.
pub fn encode_private_encryption_key(
    key: &StaticSecret,
) -> Result<Zeroizing<Vec<u8>>, KeyMaterialError> {
    encode(key)
}

/// Decode an X25519 static secret from raw 32 bytes.
pub fn decode_private_encryption_key(bytes: &[u8]) -> Result<StaticSecret, KeyMaterialError> {
    decode(bytes)
}

/// Encode an X25519 public key as its raw 32 bytes.
pub fn encode_public_encryption_key(
    key: &PublicKey,
) -> Result<[u8; X25519_KEY_SIZE], KeyMaterialError> {
    encode(key)
}

/// Decode an X25519 public key from raw 32 bytes.
pub fn decode_public_encryption_key(bytes: &[u8]) -> Result<PublicKey, KeyMaterialError> {
    decode(bytes)
}

/// Encode an Ed25519 signing key as PKCS#8 DER.
pub fn encode_private_signing_key(
    key: &SigningKey,
) -> Result<Zeroizing<Vec<u8>>, KeyMaterialError> {
    encode(key)
}

/// Decode an Ed25519 signing key from PKCS#8 DER.
pub fn decode_private_signing_key(bytes: &[u8]) -> Result<SigningKey, KeyMaterialError> {
    decode(bytes)
}

/// Encode an Ed25519 verifying key as `SubjectPublicKeyInfo` DER.
pub fn encode_public_signing_key(key: &VerifyingKey) -> Result<Vec<u8>, KeyMaterialError> {
    encode(key)
}

/// Decode an Ed25519 verifying key from `SubjectPublicKeyInfo` DER.
pub fn decode_public_signing_key(bytes: &[u8]) -> Result<VerifyingKey, KeyMaterialError> {
    decode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x25519_secret_encoding_is_raw_bytes() {
        let secret = StaticSecret::from([7u8; 32]);
        let encoded = encode_private_encryption_key(&secret).unwrap();
        assert_eq!(encoded.as_slice(), &[7u8; 32]);

        let decoded = decode_private_encryption_key(&encoded).unwrap();
        assert_eq!(decoded.to_bytes(), secret.to_bytes());
    }

    #[test]
    fn x25519_wrong_length_is_invalid_length() {
        for len in [0, 31, 33] {
            let err = decode_public_encryption_key(&vec![1u8; len]).unwrap_err();
            assert_eq!(
                err,
                KeyMaterialError::InvalidLength {
                    kind: KeyKind::PublicEncryption,
                    expected: 32,
                    actual: len,
                }
            );
        }
        assert!(matches!(
            decode_private_encryption_key(&[0u8; 16]),
            Err(KeyMaterialError::InvalidLength { kind: KeyKind::PrivateEncryption, .. })
        ));
    }

    #[test]
    fn ed25519_der_has_expected_sizes() {
        let signing = SigningKey::from_bytes(&[3u8; 32]);

        // SPKI: 12-byte prefix + 32-byte point
        let public = encode_public_signing_key(&signing.verifying_key()).unwrap();
        assert_eq!(public.len(), 44);
        assert_eq!(hex::encode(&public[..12]), "302a300506032b6570032100");
        assert_eq!(&public[12..], signing.verifying_key().as_bytes());

        let private = encode_private_signing_key(&signing).unwrap();
        assert_eq!(decode_private_signing_key(&private).unwrap(), signing);
    }

    #[test]
    fn garbage_der_is_decoding_error() {
        let err = decode_private_signing_key(b"not a der document").unwrap_err();
        assert!(matches!(err, KeyMaterialError::Decoding { kind: KeyKind::PrivateSigning, .. }));

        let err = decode_public_signing_key(&[]).unwrap_err();
        assert_eq!(err.kind(), KeyKind::PublicSigning);
    }
}
