//! Record store abstraction for the guestbook.
//!
//! Trait-based abstraction over the flat user/group/message collections.
//! The trait is synchronous (no async) to keep the API clean; async I/O
//! belongs to the HTTP layer above it.

mod error;
mod memory;

pub use error::StorageError;
pub use memory::MemoryStore;

use crate::record::{GroupRecord, MessageRecord, UserRecord, UserSummary};

/// Record store abstraction for users, groups, and sealed messages.
///
/// Must be Clone (shared across request handlers), Send + Sync, and
/// synchronous. Implementations typically share internal state via Arc, so
/// clones access the same underlying records.
///
/// The store holds only ciphertext key material: base64 public keys,
/// wrapped secret keys, and sealed messages. Nothing here can decrypt.
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// Insert or replace a user record.
    fn put_user(&self, user: &UserRecord) -> Result<(), StorageError>;

    /// Look up a user by record id.
    fn user_by_id(&self, user_id: &str) -> Result<UserRecord, StorageError>;

    /// Look up a user by display name.
    fn user_by_name(&self, name: &str) -> Result<UserRecord, StorageError>;

    /// Look up a user by their one-shot activation token.
    ///
    /// Only matches users that still carry the token (not yet activated).
    fn user_by_activation_token(&self, token: &str) -> Result<UserRecord, StorageError>;

    /// Directory of activated members (id and name only).
    fn list_activated_users(&self) -> Result<Vec<UserSummary>, StorageError>;

    /// An activated member's base64 public key, for senders to seal to.
    fn get_public_key(&self, user_id: &str) -> Result<String, StorageError>;

    /// An activated member's base64 wrapped secret key, fetched at login.
    fn get_wrapped_secret_key(&self, user_id: &str) -> Result<String, StorageError>;

    /// Complete activation: store the wrapped secret key, public key, and
    /// password hash, mark the user activated, and clear the token.
    ///
    /// # Invariants
    ///
    /// - Pre: the user exists and is not yet activated
    /// - Post: the activation token can never match again
    fn put_activation_keys(
        &self,
        user_id: &str,
        wrapped_secret_key: &str,
        public_key: &str,
        password_hash: &str,
    ) -> Result<(), StorageError>;

    /// Append a sealed message to a member's guestbook.
    ///
    /// Assigns the record id and timestamp; returns the stored record.
    fn append_sealed_message(
        &self,
        recipient_id: &str,
        sealed: &str,
        author_label: &str,
    ) -> Result<MessageRecord, StorageError>;

    /// All sealed messages for a member, newest first.
    fn list_sealed_messages(&self, recipient_id: &str) -> Result<Vec<MessageRecord>, StorageError>;

    /// Insert or replace a group record.
    fn put_group(&self, group: &GroupRecord) -> Result<(), StorageError>;

    /// Look up a group by record id.
    fn group_by_id(&self, group_id: &str) -> Result<GroupRecord, StorageError>;
}
