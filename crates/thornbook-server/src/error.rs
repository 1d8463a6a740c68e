//! API error type and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use thornbook_core::StorageError;
use thornbook_crypto::EnvelopeError;

use crate::auth::AuthError;

/// Errors surfaced to API clients.
///
/// Every variant is a value returned to the caller; nothing here aborts
/// the process.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The referenced record does not exist (or is not activated, which
    /// callers cannot distinguish).
    #[error("not found")]
    NotFound,

    /// Login or token verification failed.
    #[error("invalid credentials")]
    Unauthorized,

    /// Activation was attempted twice for the same account.
    #[error("account already activated")]
    AlreadyActivated,

    /// The request body carried an unusable envelope or field.
    #[error("bad request: {reason}")]
    BadRequest {
        /// What was wrong with the request
        reason: String,
    },

    /// Unexpected server-side failure.
    #[error("internal error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AlreadyActivated => StatusCode::CONFLICT,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {self}");
        }
        (status, Json(ErrorBody { message: self.to_string() })).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UserNotFound
            | StorageError::GroupNotFound { .. }
            | StorageError::NotActivated { .. } => Self::NotFound,
            StorageError::AlreadyActivated { .. } => Self::AlreadyActivated,
        }
    }
}

impl From<EnvelopeError> for ApiError {
    fn from(err: EnvelopeError) -> Self {
        // The server only ever parses envelopes, never decrypts them, so
        // any envelope error at this layer is a bad request.
        Self::BadRequest { reason: err.to_string() }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken => Self::Unauthorized,
            AuthError::Hashing { .. } => Self::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_statuses() {
        assert_eq!(ApiError::from(StorageError::UserNotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(StorageError::AlreadyActivated { user_id: "u1".into() }).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn envelope_errors_are_bad_requests() {
        let err = ApiError::from(EnvelopeError::DecryptionFailed);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        assert_eq!(ApiError::from(AuthError::InvalidCredentials).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::InvalidToken).status(), StatusCode::UNAUTHORIZED);
    }
}
