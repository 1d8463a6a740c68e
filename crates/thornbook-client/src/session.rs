//! Login sessions holding the unwrapped secret key.

use thornbook_core::record::MessageRecord;
use thornbook_crypto::{
    SealedMessage, SecretKey, WrappedSecretKey, derive_account_key, open, unwrap_secret_key,
};

use crate::error::ClientError;

/// A member's login session.
///
/// The only place an unwrapped secret key lives. Created by
/// [`Session::unlock`] after a successful login, emptied by
/// [`Session::lock`] on logout or token expiry. An explicit object passed
/// to every operation that decrypts — never process-global state. The key
/// material zeroizes when discarded.
pub struct Session {
    user_id: String,
    secret_key: Option<SecretKey>,
}

/// A guestbook note as presented to the member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// The underlying message record id.
    pub id: String,
    /// Sender-chosen label.
    pub author_label: String,
    /// Unix timestamp (seconds) when the note was posted.
    pub created_at_secs: u64,
    /// Decrypted text, or a marker that this note could not be read.
    pub body: NoteBody,
}

/// Outcome of decrypting one note.
///
/// One corrupted or foreign message never hides the rest of the guestbook,
/// so unreadability is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteBody {
    /// The note decrypted to this text.
    Text(String),
    /// Wrong recipient, tampered bytes, malformed envelope, or a payload
    /// that is not text. Indistinguishable by design.
    Undecryptable,
}

impl Session {
    /// Unlock a session by unwrapping the secret key with the password.
    ///
    /// This is the wrong-password check: there is no separate verification
    /// step on the client.
    ///
    /// # Errors
    ///
    /// `DecryptionFailed` (surfaced as "incorrect password") when the
    /// password does not match the one the key was wrapped under. The
    /// account state is unchanged by a failed unlock.
    pub fn unlock(
        user_id: impl Into<String>,
        wrapped: &WrappedSecretKey,
        password: &str,
    ) -> Result<Self, ClientError> {
        let account_key = derive_account_key(password);
        let secret_key = unwrap_secret_key(wrapped, &account_key)?;

        Ok(Self { user_id: user_id.into(), secret_key: Some(secret_key) })
    }

    /// The member this session belongs to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether the secret key is still in memory.
    pub fn is_unlocked(&self) -> bool {
        self.secret_key.is_some()
    }

    /// Discard the secret key. The session stays addressable but every
    /// decryption after this fails with [`ClientError::SessionLocked`].
    pub fn lock(&mut self) {
        // SecretKey zeroizes on drop.
        self.secret_key = None;
    }

    /// Open a single sealed note into its text.
    ///
    /// # Errors
    ///
    /// - `SessionLocked` after [`Session::lock`]
    /// - `DecryptionFailed` for notes sealed to someone else or tampered with
    /// - `NotText` when the plaintext is not UTF-8
    pub fn open_note(&self, sealed: &SealedMessage) -> Result<String, ClientError> {
        let secret_key = self.secret_key.as_ref().ok_or(ClientError::SessionLocked)?;

        let plaintext = open(sealed, secret_key)?;
        String::from_utf8(plaintext).map_err(|_| ClientError::NotText)
    }

    /// Decrypt a batch of fetched message records for display.
    ///
    /// Per-message failure tolerance: an entry that is malformed, sealed to
    /// a different key, or otherwise unreadable becomes
    /// [`NoteBody::Undecryptable`] and the rest of the batch is unaffected.
    ///
    /// # Errors
    ///
    /// `SessionLocked` if the key was already discarded; that is the only
    /// whole-batch failure.
    pub fn read_messages(&self, records: &[MessageRecord]) -> Result<Vec<Note>, ClientError> {
        if self.secret_key.is_none() {
            return Err(ClientError::SessionLocked);
        }

        Ok(records
            .iter()
            .map(|record| {
                let body = SealedMessage::from_base64(&record.sealed)
                    .map_err(ClientError::from)
                    .and_then(|sealed| self.open_note(&sealed))
                    .map_or(NoteBody::Undecryptable, NoteBody::Text);

                Note {
                    id: record.id.clone(),
                    author_label: record.author_label.clone(),
                    created_at_secs: record.created_at_secs,
                    body,
                }
            })
            .collect())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("unlocked", &self.is_unlocked())
            .finish()
    }
}
