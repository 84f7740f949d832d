//! Fuzz target for plain stream decoding
//!
//! # Invariants
//!
//! - `decode_blobs` never panics on arbitrary bytes
//! - Accepted input re-encodes to exactly the same bytes
//! - The record cursor agrees with the decoder on every input

#![no_main]

use libfuzzer_sys::fuzz_target;
use polyseal_proto::{Records, decode_blobs, encode_blobs};

fuzz_target!(|data: &[u8]| {
    let decoded = decode_blobs(data);
    let walked: Result<Vec<&[u8]>, _> = Records::new(data).collect();

    match (decoded, walked) {
        (Ok(blobs), Ok(payloads)) => {
            assert_eq!(blobs.len(), payloads.len());
            assert_eq!(encode_blobs(&blobs), data, "stream framing is canonical");
        },
        (Err(a), Err(b)) => assert_eq!(a, b),
        (decoded, walked) => panic!("decoder and cursor disagree: {decoded:?} vs {walked:?}"),
    }
});
