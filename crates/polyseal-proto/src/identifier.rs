//! Fixed-size recipient identifiers.

use std::fmt;

/// 4-byte identifier naming one recipient slot inside an envelope.
///
/// Identifiers are opaque to the framing layer. Callers usually derive them
/// from the recipient's public key; the codec only copies the four bytes onto
/// the wire verbatim and compares them byte-for-byte during lookup.
///
/// Ordering is lexicographic over the raw bytes, which equals numeric ordering
/// of the big-endian `u32` view.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier([u8; Identifier::SIZE]);

impl Identifier {
    /// Size of an identifier on the wire (4 bytes)
    pub const SIZE: usize = 4;

    /// Wrap raw identifier bytes.
    #[must_use]
    pub const fn new(bytes: [u8; Self::SIZE]) -> Self {
        Self(bytes)
    }

    /// Identifier whose wire bytes are the big-endian encoding of `value`.
    #[must_use]
    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    /// Big-endian `u32` view of the wire bytes.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Raw wire bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }
}

impl From<[u8; Identifier::SIZE]> for Identifier {
    fn from(bytes: [u8; Identifier::SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Identifier> for [u8; Identifier::SIZE] {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl From<u32> for Identifier {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.to_u32())
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({self})")
    }
}
