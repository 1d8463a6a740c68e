//! Thornbook Envelope Cryptography
//!
//! End-to-end encryption building blocks for the Thornbook guestbook. Every
//! operation is synchronous and pure with respect to its inputs apart from
//! drawing fresh randomness from the operating system; callers supply byte
//! buffers and get new buffers back, so concurrent use needs no coordination.
//!
//! # Key Lifecycle
//!
//! At activation a member generates an X25519 keypair. The secret key is
//! wrapped (symmetrically encrypted) under a key derived from the member's
//! password and only the wrapped form ever reaches the server. At login the
//! client re-derives the password key and unwraps the secret key into memory.
//!
//! ```text
//! Password
//!    │
//!    ▼
//! SHA-512[0..32] → AccountKey (per login, never stored)
//!    │
//!    ▼
//! XChaCha20-Poly1305 ⇄ WrappedSecretKey (at rest on the server)
//!
//! Visitor plaintext
//!    │
//!    ▼
//! Ephemeral X25519 + HKDF-SHA256 → message key
//!    │
//!    ▼
//! XChaCha20-Poly1305 → SealedMessage (opaque to the server)
//! ```
//!
//! # Security
//!
//! Confidentiality:
//! - The server stores only public keys, wrapped secret keys, and sealed
//!   messages; no plaintext or unwrapped key ever leaves the client
//! - Each sealed message uses a one-time ephemeral keypair and a fresh
//!   random nonce, both generated inside [`seal`] so reuse cannot happen
//!
//! Authenticity:
//! - XChaCha20-Poly1305 AEAD rejects tampered or forged bytes
//! - A failed tag check surfaces as [`EnvelopeError::DecryptionFailed`]
//!   with no distinction between wrong key and corruption
//!
//! Known weakness (kept deliberately, see DESIGN.md): the password
//! derivation uses a single fast hash with no per-user salt. Two members
//! with the same password derive the same [`AccountKey`], and offline
//! brute-force against a stolen wrapped key is comparatively cheap. The
//! deterministic `derive(password)` interface is the compatibility
//! contract; strengthening it means adding a stored salt parameter.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod envelope;

pub use envelope::{
    AccountKey, EnvelopeError, Keypair, NONCE_SIZE, PUBLIC_KEY_SIZE, PublicKey, SECRET_KEY_SIZE,
    SealedMessage, SecretKey, TAG_SIZE, WrappedSecretKey, derive_account_key, open, seal,
    unwrap_secret_key, wrap_secret_key,
};
