//! Key pair generation from OS entropy

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::{RngCore, rngs::OsRng};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::error::GenerationError;

/// Size of the seed both key kinds are derived from
const SEED_SIZE: usize = 32;

/// Draw a seed from the OS, wiping it once the key has been derived.
fn random_seed() -> Result<Zeroizing<[u8; SEED_SIZE]>, GenerationError> {
    let mut seed = Zeroizing::new([0u8; SEED_SIZE]);
    OsRng.try_fill_bytes(seed.as_mut_slice()).map_err(|err| {
        tracing::error!(%err, "OS entropy source failed");
        GenerationError::Entropy(err.to_string())
    })?;
    Ok(seed)
}

/// Generate an X25519 key pair for receiving wrapped content keys.
///
/// # Errors
///
/// `GenerationError::Entropy` if the OS cannot supply randomness.
pub fn generate_encryption_pair() -> Result<(StaticSecret, PublicKey), GenerationError> {
    let seed = random_seed()?;
    let secret = StaticSecret::from(*seed);
    let public = PublicKey::from(&secret);
    Ok((secret, public))
}

/// Generate an Ed25519 key pair for signing envelopes.
///
/// # Errors
///
/// `GenerationError::Entropy` if the OS cannot supply randomness.
pub fn generate_signing_pair() -> Result<(SigningKey, VerifyingKey), GenerationError> {
    let seed = random_seed()?;
    let signing = SigningKey::from_bytes(&seed);
    let verifying = signing.verifying_key();
    Ok((signing, verifying))
}
