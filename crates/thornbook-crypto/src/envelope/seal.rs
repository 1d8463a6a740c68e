//! Sealed messages: public-key encryption of guestbook notes.
//!
//! Any visitor holding only the recipient's public key can seal; only the
//! holder of the matching secret key can open. Each seal generates a
//! one-time ephemeral X25519 keypair whose public half travels with the
//! message, so no sender identity is needed to complete the shared-secret
//! computation on the receiving side.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use hkdf::Hkdf;
use sha2::Sha256;
use x25519_dalek::{EphemeralSecret, SharedSecret};
use zeroize::Zeroize;

use super::{
    EnvelopeError, NONCE_SIZE, PUBLIC_KEY_SIZE, TAG_SIZE,
    keys::{PublicKey, SecretKey},
};

/// Domain label binding derived message keys to this scheme.
const SEAL_LABEL: &[u8] = b"thornbookSealV1";

/// A sealed note: `ephemeral_public_key(32) || nonce(24) || ciphertext`.
///
/// Created once per post, stored indefinitely, opened only by the owner of
/// the recipient secret key. The ephemeral key and nonce are fresh per
/// message; neither is ever reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    bytes: Vec<u8>,
}

impl SealedMessage {
    /// Minimum parseable length: ephemeral key, nonce, authentication tag.
    pub const MIN_SIZE: usize = PUBLIC_KEY_SIZE + NONCE_SIZE + TAG_SIZE;

    /// Validate a byte sequence as a sealed message.
    ///
    /// # Errors
    ///
    /// `MalformedEnvelope` if the bytes are too short to split into the
    /// three fixed-boundary fields.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, EnvelopeError> {
        if bytes.len() < Self::MIN_SIZE {
            return Err(EnvelopeError::too_short("sealed message", Self::MIN_SIZE, bytes.len()));
        }
        Ok(Self { bytes })
    }

    /// The raw `ephemeral_public_key || nonce || ciphertext` layout.
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
            reason: "sealed message is not valid base64".to_string(),
        })?;
        Self::from_bytes(bytes)
    }

    fn ephemeral_public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let mut key = [0u8; PUBLIC_KEY_SIZE];
        key.copy_from_slice(&self.bytes[..PUBLIC_KEY_SIZE]);
        key
    }

    fn nonce(&self) -> &[u8] {
        &self.bytes[PUBLIC_KEY_SIZE..PUBLIC_KEY_SIZE + NONCE_SIZE]
    }

    fn ciphertext(&self) -> &[u8] {
        &self.bytes[PUBLIC_KEY_SIZE + NONCE_SIZE..]
    }
}

/// Seal a plaintext note to a recipient's public key.
///
/// Generates a fresh ephemeral keypair and a fresh random nonce inside the
/// call, computes the X25519 shared secret against the recipient key,
/// expands it into a one-time message key, and encrypts. Empty plaintext
/// is valid and produces a tag-only ciphertext.
pub fn seal(plaintext: &[u8], recipient: &PublicKey) -> SealedMessage {
    let ephemeral = EphemeralSecret::random_from_rng(OsRng);
    let ephemeral_public = x25519_dalek::PublicKey::from(&ephemeral);
    let shared = ephemeral.diffie_hellman(&recipient.into());

    let mut key = message_key(&shared, ephemeral_public.as_bytes(), recipient.as_bytes());
    let cipher = XChaCha20Poly1305::new((&key).into());
    key.zeroize();

    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
    let Ok(ciphertext) = cipher.encrypt(&nonce, plaintext) else {
        unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    let mut bytes = Vec::with_capacity(PUBLIC_KEY_SIZE + NONCE_SIZE + ciphertext.len());
    bytes.extend_from_slice(ephemeral_public.as_bytes());
    bytes.extend_from_slice(&nonce);
    bytes.extend_from_slice(&ciphertext);

    SealedMessage { bytes }
}

/// Open a sealed note with the recipient's secret key.
///
/// Recomputes the shared secret from the secret key and the embedded
/// ephemeral public key, then attempts authenticated decryption with the
/// embedded nonce.
///
/// # Errors
///
/// `DecryptionFailed` when the secret key does not match the public key the
/// note was sealed to, or when any byte was corrupted or tampered with. A
/// note for a different recipient never yields wrong plaintext.
pub fn open(sealed: &SealedMessage, recipient_secret: &SecretKey) -> Result<Vec<u8>, EnvelopeError> {
    let ephemeral_public = x25519_dalek::PublicKey::from(sealed.ephemeral_public_key());
    let shared = recipient_secret.inner().diffie_hellman(&ephemeral_public);
    let recipient_public = recipient_secret.public_key();

    let mut key = message_key(&shared, ephemeral_public.as_bytes(), recipient_public.as_bytes());
    let cipher = XChaCha20Poly1305::new((&key).into());
    key.zeroize();

    cipher
        .decrypt(XNonce::from_slice(sealed.nonce()), sealed.ciphertext())
        .map_err(|_| EnvelopeError::DecryptionFailed)
}

/// Expand the raw DH shared secret into a one-time AEAD key.
///
/// The info parameter binds the key to both public halves of the exchange,
/// so a ciphertext cannot be replayed against a different recipient key
/// even if the DH output were to collide.
fn message_key(
    shared: &SharedSecret,
    ephemeral_public: &[u8; PUBLIC_KEY_SIZE],
    recipient_public: &[u8; PUBLIC_KEY_SIZE],
) -> [u8; 32] {
    let hkdf = Hkdf::<Sha256>::new(None, shared.as_bytes());

    // Capacity: 15 (label) + 32 + 32
    let mut info = Vec::with_capacity(79);
    info.extend_from_slice(SEAL_LABEL);
    info.extend_from_slice(ephemeral_public);
    info.extend_from_slice(recipient_public);

    let mut key = [0u8; 32];
    let Ok(()) = hkdf.expand(&info, &mut key) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };

    key
}

#[cfg(test)]
mod tests {
    use super::{super::Keypair, *};

    #[test]
    fn seal_open_roundtrip() {
        let keypair = Keypair::generate();
        let sealed = seal(b"Happy birthday!", &keypair.public);
        let opened = open(&sealed, &keypair.secret).unwrap();
        assert_eq!(opened, b"Happy birthday!");
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let keypair = Keypair::generate();
        let sealed = seal(b"", &keypair.public);

        // Tag-only ciphertext: no payload bytes beyond the fixed fields.
        assert_eq!(sealed.as_bytes().len(), SealedMessage::MIN_SIZE);
        assert_eq!(open(&sealed, &keypair.secret).unwrap(), b"");
    }

    #[test]
    fn wrong_recipient_fails_open() {
        let intended = Keypair::generate();
        let other = Keypair::generate();

        let sealed = seal(b"for your eyes only", &intended.public);

        let result = open(&sealed, &other.secret);
        assert_eq!(result.unwrap_err(), EnvelopeError::DecryptionFailed);
    }

    #[test]
    fn sealing_twice_produces_different_bytes() {
        let keypair = Keypair::generate();

        let first = seal(b"same note", &keypair.public);
        let second = seal(b"same note", &keypair.public);

        // Fresh ephemeral keypair and nonce every call.
        assert_ne!(first, second);
        assert_ne!(
            &first.as_bytes()[..PUBLIC_KEY_SIZE],
            &second.as_bytes()[..PUBLIC_KEY_SIZE],
            "ephemeral keys must differ"
        );
        assert_ne!(
            &first.as_bytes()[PUBLIC_KEY_SIZE..PUBLIC_KEY_SIZE + NONCE_SIZE],
            &second.as_bytes()[PUBLIC_KEY_SIZE..PUBLIC_KEY_SIZE + NONCE_SIZE],
            "nonces must differ"
        );
    }

    #[test]
    fn any_flipped_ciphertext_byte_fails_open() {
        let keypair = Keypair::generate();
        let sealed = seal(b"tamper target", &keypair.public);

        for index in PUBLIC_KEY_SIZE + NONCE_SIZE..sealed.as_bytes().len() {
            let mut bytes = sealed.as_bytes().to_vec();
            bytes[index] ^= 0x01;
            let tampered = SealedMessage::from_bytes(bytes).unwrap();

            assert_eq!(
                open(&tampered, &keypair.secret).unwrap_err(),
                EnvelopeError::DecryptionFailed,
                "flip at byte {index} must be rejected"
            );
        }
    }

    #[test]
    fn tampered_ephemeral_key_fails_open() {
        let keypair = Keypair::generate();
        let sealed = seal(b"note", &keypair.public);

        let mut bytes = sealed.as_bytes().to_vec();
        bytes[0] ^= 0x01;
        let tampered = SealedMessage::from_bytes(bytes).unwrap();

        assert!(open(&tampered, &keypair.secret).is_err());
    }

    #[test]
    fn truncated_bytes_are_malformed() {
        let result = SealedMessage::from_bytes(vec![0u8; SealedMessage::MIN_SIZE - 1]);
        assert!(matches!(result, Err(EnvelopeError::MalformedEnvelope { .. })));

        let result = SealedMessage::from_bytes(Vec::new());
        assert!(matches!(result, Err(EnvelopeError::MalformedEnvelope { .. })));
    }

    #[test]
    fn base64_roundtrip() {
        let keypair = Keypair::generate();
        let sealed = seal(b"over the wire", &keypair.public);

        let restored = SealedMessage::from_base64(&sealed.to_base64()).unwrap();
        assert_eq!(restored, sealed);
        assert_eq!(open(&restored, &keypair.secret).unwrap(), b"over the wire");
    }

    #[test]
    fn large_note_roundtrips() {
        let keypair = Keypair::generate();
        let plaintext = vec![0x42u8; 64 * 1024];

        let sealed = seal(&plaintext, &keypair.public);
        assert_eq!(open(&sealed, &keypair.secret).unwrap(), plaintext);
    }
}
