//! Error types for record store operations

use thiserror::Error;

/// Errors from record store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    /// No user record matched the lookup.
    #[error("user not found")]
    UserNotFound,

    /// No group record matched the lookup.
    #[error("group not found: {group_id}")]
    GroupNotFound {
        /// The group id that was not found
        group_id: String,
    },

    /// Activation was attempted on an already activated account.
    #[error("account already activated: {user_id}")]
    AlreadyActivated {
        /// The user whose activation was repeated
        user_id: String,
    },

    /// Key material was requested for an account that has none yet.
    #[error("account not activated: {user_id}")]
    NotActivated {
        /// The user who has not activated
        user_id: String,
    },
}
