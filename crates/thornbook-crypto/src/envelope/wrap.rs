//! Secret-key wrapping under the password-derived account key.
//!
//! Wrapping happens once at activation; unwrapping happens at every login.
//! A failed unwrap is the wrong-password signal: there is no separate
//! password check on the client side.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use zeroize::Zeroize;

use super::{
    EnvelopeError, NONCE_SIZE, SECRET_KEY_SIZE, TAG_SIZE,
    keys::{AccountKey, SecretKey},
};

/// A secret key at rest: `nonce(24) || ciphertext`.
///
/// Produced once at activation, stored by the server, fetched and unwrapped
/// at every login. The nonce is freshly random per wrap; it is never reused
/// under the same account key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedSecretKey {
    bytes: Vec<u8>,
}

impl WrappedSecretKey {
    /// Minimum parseable length: nonce plus authentication tag.
    pub const MIN_SIZE: usize = NONCE_SIZE + TAG_SIZE;

    /// Validate a byte sequence as a wrapped secret key.
    ///
    /// # Errors
    ///
    /// `MalformedEnvelope` if the bytes are too short to split into a
    /// nonce prefix and an authenticated ciphertext.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, EnvelopeError> {
        if bytes.len() < Self::MIN_SIZE {
            return Err(EnvelopeError::too_short("wrapped secret key", Self::MIN_SIZE, bytes.len()));
        }
        Ok(Self { bytes })
    }

    /// The raw `nonce || ciphertext` layout.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encode for transport.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Decode from transport encoding, validating length.
    pub fn from_base64(encoded: &str) -> Result<Self, EnvelopeError> {
        let bytes = BASE64.decode(encoded).map_err(|_| EnvelopeError::MalformedEnvelope {
            reason: "wrapped secret key is not valid base64".to_string(),
        })?;
        Self::from_bytes(bytes)
    }

    fn nonce(&self) -> &[u8] {
        &self.bytes[..NONCE_SIZE]
    }

    fn ciphertext(&self) -> &[u8] {
        &self.bytes[NONCE_SIZE..]
    }
}

/// Wrap a secret key under the account key.
///
/// Generates a fresh random nonce, encrypts with XChaCha20-Poly1305, and
/// returns `nonce || ciphertext`. Pure computation; the caller persists the
/// result through the record store.
pub fn wrap_secret_key(secret: &SecretKey, account_key: &AccountKey) -> WrappedSecretKey {
    let cipher = XChaCha20Poly1305::new(account_key.bytes().into());
    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

    let mut plaintext = secret.to_bytes();
    let Ok(ciphertext) = cipher.encrypt(&nonce, plaintext.as_slice()) else {
        unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };
    plaintext.zeroize();

    let mut bytes = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    bytes.extend_from_slice(&nonce);
    bytes.extend_from_slice(&ciphertext);

    WrappedSecretKey { bytes }
}

/// Unwrap a secret key with the account key.
///
/// # Errors
///
/// - `DecryptionFailed`: wrong password (wrong derived key) or tampered
///   bytes. The authentication tag check rejects both instead of returning
///   garbage, and the error does not say which happened.
/// - `MalformedEnvelope`: the ciphertext authenticated but did not contain
///   exactly one secret key.
pub fn unwrap_secret_key(
    wrapped: &WrappedSecretKey,
    account_key: &AccountKey,
) -> Result<SecretKey, EnvelopeError> {
    let cipher = XChaCha20Poly1305::new(account_key.bytes().into());
    let nonce = XNonce::from_slice(wrapped.nonce());

    let mut plaintext = cipher
        .decrypt(nonce, wrapped.ciphertext())
        .map_err(|_| EnvelopeError::DecryptionFailed)?;

    if plaintext.len() != SECRET_KEY_SIZE {
        plaintext.zeroize();
        return Err(EnvelopeError::MalformedEnvelope {
            reason: format!("unwrapped payload is not a {SECRET_KEY_SIZE}-byte secret key"),
        });
    }

    let mut key_bytes = [0u8; SECRET_KEY_SIZE];
    key_bytes.copy_from_slice(&plaintext);
    plaintext.zeroize();

    let secret = SecretKey::from_bytes(key_bytes);
    key_bytes.zeroize();

    Ok(secret)
}
