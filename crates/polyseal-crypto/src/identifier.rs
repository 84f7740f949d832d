//! Recipient identifier derivation

use polyseal_proto::Identifier;
use sha2::{Digest, Sha256};
use x25519_dalek::PublicKey;

/// Domain separation label for identifier derivation
const IDENTIFIER_LABEL: &[u8] = b"polysealRecipientV1";

/// Derive the envelope slot identifier for a recipient's encryption key.
///
/// Takes the first four bytes of `SHA-256(label || public_key)`. Two distinct
/// keys collide with probability 2^-32; senders building a wrapped-key map
/// see a collision as an occupied entry and must resolve it themselves.
pub fn recipient_identifier(public_key: &PublicKey) -> Identifier {
    let digest = Sha256::new()
        .chain_update(IDENTIFIER_LABEL)
        .chain_update(public_key.as_bytes())
        .finalize();

    let mut bytes = [0u8; Identifier::SIZE];
    bytes.copy_from_slice(&digest[..Identifier::SIZE]);
    Identifier::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_is_deterministic() {
        let public = PublicKey::from([9u8; 32]);
        assert_eq!(recipient_identifier(&public), recipient_identifier(&public));
    }

    #[test]
    fn identifier_depends_on_key() {
        let a = recipient_identifier(&PublicKey::from([1u8; 32]));
        let b = recipient_identifier(&PublicKey::from([2u8; 32]));
        assert_ne!(a, b);
    }

    #[test]
    fn identifier_is_label_prefixed_hash() {
        let public = PublicKey::from([0u8; 32]);
        let mut hasher = Sha256::new();
        hasher.update(b"polysealRecipientV1");
        hasher.update([0u8; 32]);
        let expected = hasher.finalize();

        assert_eq!(recipient_identifier(&public).as_bytes(), &expected[..4]);
    }
}
