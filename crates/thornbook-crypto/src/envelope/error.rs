//! Error types for envelope operations

use thiserror::Error;

/// Errors from envelope construction and opening.
///
/// Both variants are values the caller recovers from: activation and login
/// surface [`EnvelopeError::DecryptionFailed`] as "incorrect password", and
/// message reading surfaces it per message without aborting the batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Byte sequence shorter than the fixed field lengths, or undecodable
    /// base64 at the transport boundary. The envelope cannot even be split
    /// into its nonce/key/ciphertext parts.
    #[error("malformed envelope: {reason}")]
    MalformedEnvelope {
        /// What made the bytes unparseable
        reason: String,
    },

    /// Authentication tag mismatch. Carries no cause on purpose: a wrong
    /// key and tampered bytes must be indistinguishable to the caller.
    #[error("decryption failed")]
    DecryptionFailed,
}

impl EnvelopeError {
    pub(crate) fn too_short(what: &str, expected: usize, actual: usize) -> Self {
        Self::MalformedEnvelope {
            reason: format!("{what} needs at least {expected} bytes, got {actual}"),
        }
    }
}
