//! Key material: account keys, keypairs, and their transport encoding.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use rand_core::OsRng;
use x25519_dalek::StaticSecret;
use zeroize::Zeroize;

use super::{EnvelopeError, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE};

/// Symmetric key derived from a member's password.
///
/// Exists only in client memory between login and lock; never transmitted
/// or stored. Zeroized on drop.
#[derive(Clone)]
pub struct AccountKey {
    key: [u8; 32],
}

impl AccountKey {
    pub(crate) fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    pub(crate) fn bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl Drop for AccountKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccountKey(..)")
    }
}

/// X25519 public key, shared openly so anyone can seal notes to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_SIZE],
}

impl PublicKey {
    /// Wrap raw public key bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Raw public key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.bytes
    }

    /// Encode for transport (HTTP JSON fields, storage).
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.bytes)
    }

    /// Decode from transport encoding.
    ///
    /// # Errors
    ///
    /// `MalformedEnvelope` if the text is not base64 or not exactly 32
    /// bytes once decoded.
    pub fn from_base64(encoded: &str) -> Result<Self, EnvelopeError> {
        let decoded = BASE64.decode(encoded).map_err(|_| EnvelopeError::MalformedEnvelope {
            reason: "public key is not valid base64".to_string(),
        })?;
        let bytes: [u8; PUBLIC_KEY_SIZE] =
            decoded.try_into().map_err(|bad: Vec<u8>| EnvelopeError::MalformedEnvelope {
                reason: format!("public key must be {PUBLIC_KEY_SIZE} bytes, got {}", bad.len()),
            })?;
        Ok(Self { bytes })
    }
}

impl From<x25519_dalek::PublicKey> for PublicKey {
    fn from(key: x25519_dalek::PublicKey) -> Self {
        Self { bytes: key.to_bytes() }
    }
}

impl From<&PublicKey> for x25519_dalek::PublicKey {
    fn from(key: &PublicKey) -> Self {
        x25519_dalek::PublicKey::from(key.bytes)
    }
}

/// X25519 secret key.
///
/// Lives only transiently in client memory (a login session) and in
/// wrapped form at rest. The inner secret zeroizes on drop.
#[derive(Clone)]
pub struct SecretKey {
    secret: StaticSecret,
}

impl SecretKey {
    /// Reconstruct from raw bytes, e.g. after unwrapping.
    pub fn from_bytes(bytes: [u8; SECRET_KEY_SIZE]) -> Self {
        Self { secret: StaticSecret::from(bytes) }
    }

    /// Raw secret key bytes, e.g. for wrapping.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        self.secret.to_bytes()
    }

    /// The matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(x25519_dalek::PublicKey::from(&self.secret))
    }

    pub(crate) fn inner(&self) -> &StaticSecret {
        &self.secret
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Asymmetric keypair generated once per member at activation.
#[derive(Debug, Clone)]
pub struct Keypair {
    /// Public half, published to the server for senders to fetch.
    pub public: PublicKey,
    /// Secret half, wrapped under the account key before leaving the client.
    pub secret: SecretKey,
}

impl Keypair {
    /// Generate a fresh keypair from OS randomness.
    pub fn generate() -> Self {
        let secret = SecretKey { secret: StaticSecret::random_from_rng(OsRng) };
        Self { public: secret.public_key(), secret }
    }
}
