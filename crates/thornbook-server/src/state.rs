//! Shared application state for request handlers.

use thornbook_core::RecordStore;

use crate::auth::TokenService;

/// State shared across all request handlers.
///
/// Cheap to clone: the store shares its records internally and the token
/// service holds only key material.
#[derive(Debug, Clone)]
pub struct AppState<S: RecordStore> {
    /// The record store (users, groups, sealed messages).
    pub store: S,
    /// Session token issuance and verification.
    pub tokens: TokenService,
}

impl<S: RecordStore> AppState<S> {
    /// Bundle a store and token service into handler state.
    pub fn new(store: S, tokens: TokenService) -> Self {
        Self { store, tokens }
    }
}
