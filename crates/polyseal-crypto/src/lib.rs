//! Polyseal Key Material
//!
//! Key handling around the envelope framing in [`polyseal_proto`]. Encryption
//! keys are X25519, signing keys are Ed25519.
//!
//! # Components
//!
//! - [`KeyMaterial`]: uniform encode/decode over the four key kinds, with
//!   `encode_*`/`decode_*` free functions per kind
//! - [`generate_encryption_pair`] / [`generate_signing_pair`]: OS-seeded key
//!   pairs
//! - [`recipient_identifier`]: envelope slot identifier for a recipient key
//!
//! Wrapping content keys and producing signatures stay with the caller; this
//! crate only gets keys into and out of bytes.
//!
//! # Security
//!
//! - Private key encodings are returned in zeroizing buffers
//! - Generation seeds are wiped after derivation
//! - Errors and log events never include key bytes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod identifier;
mod keygen;
mod keys;

pub use error::{GenerationError, KeyKind, KeyMaterialError};
pub use identifier::recipient_identifier;
pub use keygen::{generate_encryption_pair, generate_signing_pair};
pub use keys::{
    KeyMaterial, X25519_KEY_SIZE, decode_private_encryption_key, decode_private_signing_key,
    decode_public_encryption_key, decode_public_signing_key, encode_private_encryption_key,
    encode_private_signing_key, encode_public_encryption_key, encode_public_signing_key,
};
