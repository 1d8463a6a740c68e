//! Error types for client flows

use thiserror::Error;
use thornbook_crypto::EnvelopeError;

/// Errors from client-side flows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// An envelope operation failed. `DecryptionFailed` during unlock means
    /// "incorrect password"; during reading it means "cannot read this
    /// message".
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// A note decrypted correctly but its payload is not UTF-8 text.
    #[error("note payload is not valid UTF-8")]
    NotText,

    /// The session was locked before the operation.
    #[error("session is locked")]
    SessionLocked,
}
