//! Fuzz target for envelope decoding
//!
//! # Invariants
//!
//! - `Envelope::decode` never panics
//! - A decoded envelope re-encodes to the input
//! - Every listed recipient resolves to a wrapped key

#![no_main]

use libfuzzer_sys::fuzz_target;
use polyseal_proto::Envelope;

fuzz_target!(|data: &[u8]| {
    let Ok(envelope) = Envelope::decode(data) else {
        return;
    };

    assert_eq!(envelope.encode(), data);

    let recipients = envelope.recipients().expect("decode validated the wrapped keys");
    for recipient in recipients {
        let key = envelope.wrapped_key(recipient).expect("decode validated the wrapped keys");
        assert!(key.is_some(), "listed recipient {recipient} has no key");
    }
});
