//! Thornbook Client Flows
//!
//! The four client-side operations around the envelope scheme:
//!
//! - **Activation**: generate a keypair, wrap the secret key under the
//!   password, hand both halves to the server ([`activate_account`]).
//! - **Login**: re-derive the password key and unwrap the secret key into
//!   an in-memory [`Session`] ([`Session::unlock`]).
//! - **Posting**: seal a note to a recipient's public key, no account
//!   needed ([`compose_note`]).
//! - **Reading**: open a batch of sealed messages with the session's
//!   secret key, tolerating undecryptable entries ([`Session::read_messages`]).
//!
//! The secret key exists unwrapped only inside a [`Session`]; locking or
//! dropping the session discards it. Nothing here talks to the network —
//! callers move the byte containers over whatever transport they have.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod activation;
mod error;
mod session;

pub use activation::{ActivationKeys, activate_account, compose_note};
pub use error::ClientError;
pub use session::{Note, NoteBody, Session};
