//! Key material and key generation errors

use std::fmt;

use thiserror::Error;

/// Which of the four key kinds an operation was handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// X25519 static secret
    PrivateEncryption,
    /// X25519 public key
    PublicEncryption,
    /// Ed25519 signing key
    PrivateSigning,
    /// Ed25519 verifying key
    PublicSigning,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PrivateEncryption => "private encryption key",
            Self::PublicEncryption => "public encryption key",
            Self::PrivateSigning => "private signing key",
            Self::PublicSigning => "public signing key",
        };
        f.write_str(name)
    }
}

/// Errors from encoding or decoding key material.
///
/// Reasons carry the cryptography layer's message but never key bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterialError {
    /// The cryptography layer failed to marshal a key
    #[error("failed to encode {kind}: {reason}")]
    Encoding {
        /// Key being encoded
        kind: KeyKind,
        /// Failure reported by the marshal routine
        reason: String,
    },

    /// Bytes are not a valid representation of the key kind
    #[error("failed to decode {kind}: {reason}")]
    Decoding {
        /// Key being decoded
        kind: KeyKind,
        /// Failure reported by the parse routine
        reason: String,
    },

    /// Fixed-size key bytes have the wrong length
    #[error("invalid {kind} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Key being decoded
        kind: KeyKind,
        /// Required length
        expected: usize,
        /// Length supplied
        actual: usize,
    },
}

impl KeyMaterialError {
    /// Key kind the failed operation was handling.
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Encoding { kind, .. }
            | Self::Decoding { kind, .. }
            | Self::InvalidLength { kind, .. } => *kind,
        }
    }
}

/// Errors from key pair generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The OS entropy source could not supply a seed
    #[error("entropy source failed: {0}")]
    Entropy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_key_kind() {
        let err = KeyMaterialError::InvalidLength {
            kind: KeyKind::PublicEncryption,
            expected: 32,
            actual: 31,
        };
        assert_eq!(err.to_string(), "invalid public encryption key length: expected 32 bytes, got 31");
        assert_eq!(err.kind(), KeyKind::PublicEncryption);
    }
}
