//! Polyseal Wire Framing
//!
//! Length-prefixed binary framing for multi-recipient envelopes. A sender
//! encrypts a payload once, wraps the content key for every recipient, and
//! ships a single buffer. This crate turns the pieces of that buffer into
//! bytes and back.
//!
//! # Wire Format
//!
//! ```text
//! plain record:  [length: u64 BE][payload]
//! keyed record:  [identifier: 4 bytes][length: u64 BE][payload]
//! stream:        record*          (no stream header, no terminator)
//! envelope:      plain stream of [ciphertext][keyed wrapped keys][signature]
//! ```
//!
//! # Components
//!
//! - [`encode_blobs`] / [`decode_blobs`]: ordered blob sequences
//! - [`encode_keyed`] / [`decode_keyed`]: identifier-keyed mappings
//! - [`lookup`]: single-identifier scan that borrows from the input
//! - [`Records`] / [`KeyedRecords`]: zero-copy record cursors
//! - [`Envelope`]: three-component envelope built from both codecs
//! - [`DecodeLimits`]: optional bounds for untrusted input
//!
//! # Security
//!
//! Framing is not authentication. A decoded envelope is structurally valid and
//! nothing more; verify its signature before acting on its contents.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod envelope;
pub mod errors;
mod identifier;
pub mod keyed;
mod limits;
pub mod record;
pub mod stream;

pub use envelope::Envelope;
pub use errors::{FramingError, Result};
pub use identifier::Identifier;
pub use keyed::{
    KeyedBlobs, decode_keyed, decode_keyed_with, encode_keyed, encode_keyed_into, lookup, lookup_with,
};
pub use limits::DecodeLimits;
pub use record::{KEYED_HEADER_SIZE, KeyedRecords, PLAIN_HEADER_SIZE, Records};
pub use stream::{decode_blobs, decode_blobs_with, encode_blobs, encode_blobs_into, encoded_len};
