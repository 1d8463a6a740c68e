//! The envelope scheme: derivation, secret-key wrapping, sealed messages.
//!
//! Binary layouts (all lengths fixed by the cipher suite, documented on the
//! constants below):
//!
//! ```text
//! WrappedSecretKey = nonce(24) || ciphertext
//! SealedMessage    = ephemeral_public_key(32) || nonce(24) || ciphertext
//! ```
//!
//! Both layouts travel base64-encoded over HTTP; the containers in this
//! module validate length and encoding at the boundary so the cryptographic
//! functions can slice at fixed offsets without panicking.

mod derivation;
mod error;
mod keys;
mod seal;
mod wrap;

pub use derivation::derive_account_key;
pub use error::EnvelopeError;
pub use keys::{AccountKey, Keypair, PublicKey, SecretKey};
pub use seal::{SealedMessage, open, seal};
pub use wrap::{WrappedSecretKey, unwrap_secret_key, wrap_secret_key};

/// X25519 public key length in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// X25519 secret key length in bytes.
pub const SECRET_KEY_SIZE: usize = 32;

/// XChaCha20-Poly1305 extended nonce length in bytes.
pub const NONCE_SIZE: usize = 24;

/// Poly1305 authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;
