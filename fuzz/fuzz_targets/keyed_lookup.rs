//! Fuzz target for keyed stream decoding and point lookup
//!
//! # Strategy
//!
//! Either raw bytes or a well-formed stream built from an arbitrary mapping,
//! so both the rejection paths and the agreement property get coverage.
//!
//! # Invariants
//!
//! - Neither `decode_keyed` nor `lookup` panics
//! - Whenever `decode_keyed` accepts, `lookup` returns exactly the decoded
//!   blob (or `None`) for every probed identifier

#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use polyseal_proto::{Identifier, decode_keyed, encode_keyed, lookup};

#[derive(Debug, Arbitrary)]
enum Input {
    Raw(Vec<u8>),
    Mapping(BTreeMap<u32, Vec<u8>>),
}

#[derive(Debug, Arbitrary)]
struct Case {
    input: Input,
    probes: Vec<u32>,
}

fuzz_target!(|case: Case| {
    let stream = match case.input {
        Input::Raw(bytes) => bytes,
        Input::Mapping(mapping) => {
            let mapping: BTreeMap<Identifier, Vec<u8>> =
                mapping.into_iter().map(|(id, blob)| (Identifier::from_u32(id), blob)).collect();
            encode_keyed(&mapping)
        },
    };

    let Ok(decoded) = decode_keyed(&stream) else {
        // Lookups on rejected streams must still not panic
        for probe in case.probes {
            let _ = lookup(Identifier::from_u32(probe), &stream);
        }
        return;
    };

    let probes = case.probes.into_iter().map(Identifier::from_u32).chain(decoded.keys().copied());
    for target in probes {
        let found = lookup(target, &stream).expect("lookup must accept a decodable stream");
        assert_eq!(found, decoded.get(&target).map(|blob| &blob[..]));
    }
});
