//! Fuzz target for key material decoding
//!
//! # Invariants
//!
//! - No decoder panics on arbitrary bytes
//! - Any key that decodes re-encodes and decodes to an equal key

#![no_main]

use libfuzzer_sys::fuzz_target;
use polyseal_crypto::{
    decode_private_signing_key, decode_public_encryption_key, decode_public_signing_key,
    encode_private_signing_key, encode_public_encryption_key, encode_public_signing_key,
};

fuzz_target!(|data: &[u8]| {
    if let Ok(key) = decode_public_encryption_key(data) {
        let encoded = encode_public_encryption_key(&key).expect("encoding a decoded key");
        assert_eq!(encoded.as_slice(), data);
    }

    if let Ok(key) = decode_private_signing_key(data) {
        let encoded = encode_private_signing_key(&key).expect("encoding a decoded key");
        assert_eq!(decode_private_signing_key(&encoded), Ok(key));
    }

    if let Ok(key) = decode_public_signing_key(data) {
        let encoded = encode_public_signing_key(&key).expect("encoding a decoded key");
        assert_eq!(decode_public_signing_key(&encoded), Ok(key));
    }
});
