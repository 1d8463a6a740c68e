#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

use uuid::Uuid;

use super::{RecordStore, StorageError};
use crate::record::{GroupRecord, MessageRecord, UserRecord, UserSummary};

/// In-memory record store.
///
/// The shipped implementation (durability is out of scope). All state is
/// wrapped in Arc<Mutex<>> to allow Clone and concurrent access from
/// request handlers. Uses `lock().expect()` which will panic if the mutex
/// is poisoned - acceptable for an in-memory store.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

struct MemoryStoreInner {
    /// User records in insertion order
    users: Vec<UserRecord>,

    /// Group records in insertion order
    groups: Vec<GroupRecord>,

    /// Sealed messages in posting order, across all recipients
    messages: Vec<MessageRecord>,
}

impl MemoryStore {
    /// Create a new empty `MemoryStore`.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStoreInner {
                users: Vec::new(),
                groups: Vec::new(),
                messages: Vec::new(),
            })),
        }
    }

    /// Total number of stored sealed messages.
    ///
    /// Useful for debugging and testing.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a thread panicked while
    /// holding the lock).
    #[allow(clippy::expect_used)]
    pub fn message_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").messages.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

impl RecordStore for MemoryStore {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn put_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        if let Some(existing) = inner.users.iter_mut().find(|u| u.id == user.id) {
            *existing = user.clone();
        } else {
            inner.users.push(user.clone());
        }

        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn user_by_id(&self, user_id: &str) -> Result<UserRecord, StorageError> {
        let inner = self.inner.lock().expect("Mutex poisoned");

        inner.users.iter().find(|u| u.id == user_id).cloned().ok_or(StorageError::UserNotFound)
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn user_by_name(&self, name: &str) -> Result<UserRecord, StorageError> {
        let inner = self.inner.lock().expect("Mutex poisoned");

        inner.users.iter().find(|u| u.name == name).cloned().ok_or(StorageError::UserNotFound)
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn user_by_activation_token(&self, token: &str) -> Result<UserRecord, StorageError> {
        let inner = self.inner.lock().expect("Mutex poisoned");

        inner
            .users
            .iter()
            .find(|u| u.activation_token.as_deref() == Some(token))
            .cloned()
            .ok_or(StorageError::UserNotFound)
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn list_activated_users(&self) -> Result<Vec<UserSummary>, StorageError> {
        let inner = self.inner.lock().expect("Mutex poisoned");

        Ok(inner
            .users
            .iter()
            .filter(|u| u.activated)
            .map(|u| UserSummary { id: u.id.clone(), name: u.name.clone() })
            .collect())
    }

    fn get_public_key(&self, user_id: &str) -> Result<String, StorageError> {
        let user = self.user_by_id(user_id)?;
        user.public_key.ok_or(StorageError::NotActivated { user_id: user_id.to_string() })
    }

    fn get_wrapped_secret_key(&self, user_id: &str) -> Result<String, StorageError> {
        let user = self.user_by_id(user_id)?;
        user.wrapped_secret_key.ok_or(StorageError::NotActivated { user_id: user_id.to_string() })
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn put_activation_keys(
        &self,
        user_id: &str,
        wrapped_secret_key: &str,
        public_key: &str,
        password_hash: &str,
    ) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StorageError::UserNotFound)?;

        if user.activated {
            return Err(StorageError::AlreadyActivated { user_id: user_id.to_string() });
        }

        user.wrapped_secret_key = Some(wrapped_secret_key.to_string());
        user.public_key = Some(public_key.to_string());
        user.password_hash = Some(password_hash.to_string());
        user.activated = true;
        user.activation_token = None;

        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn append_sealed_message(
        &self,
        recipient_id: &str,
        sealed: &str,
        author_label: &str,
    ) -> Result<MessageRecord, StorageError> {
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        if !inner.users.iter().any(|u| u.id == recipient_id && u.activated) {
            return Err(StorageError::UserNotFound);
        }

        let record = MessageRecord {
            id: Uuid::new_v4().to_string(),
            recipient_id: recipient_id.to_string(),
            sealed: sealed.to_string(),
            author_label: author_label.to_string(),
            created_at_secs: unix_now_secs(),
        };
        inner.messages.push(record.clone());

        Ok(record)
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn list_sealed_messages(&self, recipient_id: &str) -> Result<Vec<MessageRecord>, StorageError> {
        let inner = self.inner.lock().expect("Mutex poisoned");

        // Reverse insertion order, then stable sort: newest first, and
        // posts within the same second stay newest-first too.
        let mut messages: Vec<MessageRecord> = inner
            .messages
            .iter()
            .rev()
            .filter(|m| m.recipient_id == recipient_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.created_at_secs.cmp(&a.created_at_secs));

        Ok(messages)
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn put_group(&self, group: &GroupRecord) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        if let Some(existing) = inner.groups.iter_mut().find(|g| g.id == group.id) {
            *existing = group.clone();
        } else {
            inner.groups.push(group.clone());
        }

        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn group_by_id(&self, group_id: &str) -> Result<GroupRecord, StorageError> {
        let inner = self.inner.lock().expect("Mutex poisoned");

        inner
            .groups
            .iter()
            .find(|g| g.id == group_id)
            .cloned()
            .ok_or(StorageError::GroupNotFound { group_id: group_id.to_string() })
    }
}
