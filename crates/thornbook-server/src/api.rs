//! Route table, request handlers, and the session-token extractor.

use axum::{
    Json, Router, async_trait,
    extract::{FromRequestParts, Path, State},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use thornbook_core::{MessageRecord, RecordStore, UserSummary};
use thornbook_crypto::{PublicKey, SealedMessage, WrappedSecretKey};

use crate::{auth, error::ApiError, state::AppState};

/// Build the API router over the given state.
pub fn router<S: RecordStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/activate", post(activate))
        .route("/api/login", post(login))
        .route("/api/users", get(list_users))
        .route("/api/users/:user_id/key", get(user_key))
        .route("/api/users/:user_id/messages", post(post_message))
        .route("/api/messages", get(list_messages))
        .with_state(state)
}

/// The authenticated caller, extracted from a Bearer session token.
pub struct AuthUser(pub String);

#[async_trait]
impl<S: RecordStore> FromRequestParts<AppState<S>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;
        let user_id = state.tokens.verify(token)?;

        Ok(Self(user_id))
    }
}

async fn health() -> &'static str {
    "Thornbook server is running"
}

#[derive(Deserialize)]
struct ActivateRequest {
    token: String,
    password: String,
    public_key: String,
    wrapped_secret_key: String,
}

#[derive(Serialize)]
struct OkMessage {
    message: &'static str,
}

/// Finish an invitation: store the member's key material and password hash.
///
/// The client generated the keypair and wrapped the secret key; the server
/// only checks that the fields parse as envelopes before storing them.
async fn activate<S: RecordStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<ActivateRequest>,
) -> Result<Json<OkMessage>, ApiError> {
    let user = state.store.user_by_activation_token(&request.token)?;

    PublicKey::from_base64(&request.public_key)?;
    WrappedSecretKey::from_base64(&request.wrapped_secret_key)?;

    let password_hash = auth::hash_password(&request.password)?;
    state.store.put_activation_keys(
        &user.id,
        &request.wrapped_secret_key,
        &request.public_key,
        &password_hash,
    )?;

    tracing::info!(user_id = %user.id, "account activated");
    Ok(Json(OkMessage { message: "Account activated successfully" }))
}

#[derive(Deserialize)]
struct LoginRequest {
    name: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    user: LoginUser,
}

#[derive(Serialize)]
struct LoginUser {
    id: String,
    name: String,
    public_key: String,
    wrapped_secret_key: String,
}

/// Verify credentials and hand back a session token plus the wrapped key.
///
/// Unwrapping the key happens client-side; a successful response proves
/// nothing about the password's ability to unwrap (they are checked
/// against independent derivations of the same password).
async fn login<S: RecordStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Any lookup failure is "invalid credentials": responses must not
    // reveal which names exist.
    let user = state.store.user_by_name(&request.name).map_err(|_| ApiError::Unauthorized)?;
    if !user.activated {
        return Err(ApiError::Unauthorized);
    }
    let (Some(password_hash), Some(public_key), Some(wrapped_secret_key)) =
        (user.password_hash, user.public_key, user.wrapped_secret_key)
    else {
        return Err(ApiError::Unauthorized);
    };

    auth::verify_password(&request.password, &password_hash)?;
    let token = state.tokens.issue(&user.id)?;

    tracing::info!(user_id = %user.id, "login");
    Ok(Json(LoginResponse {
        token,
        user: LoginUser { id: user.id, name: user.name, public_key, wrapped_secret_key },
    }))
}

/// Directory of activated members.
async fn list_users<S: RecordStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    Ok(Json(state.store.list_activated_users()?))
}

#[derive(Serialize)]
struct PublicKeyResponse {
    public_key: String,
}

/// A member's public key, for anyone who wants to seal a note to them.
async fn user_key<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicKeyResponse>, ApiError> {
    let public_key = state.store.get_public_key(&user_id)?;
    Ok(Json(PublicKeyResponse { public_key }))
}

#[derive(Deserialize)]
struct PostMessageRequest {
    sealed: String,
    author_label: Option<String>,
}

/// Post a sealed note to a member's guestbook. No authentication: sealing
/// requires only the public key, and the server cannot read the result.
async fn post_message<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<String>,
    Json(request): Json<PostMessageRequest>,
) -> Result<Json<MessageRecord>, ApiError> {
    // Reject byte sequences that could never be opened before they are
    // stored forever.
    SealedMessage::from_base64(&request.sealed)?;

    let author_label = match request.author_label {
        Some(label) if !label.trim().is_empty() => label,
        _ => "Anonymous".to_string(),
    };

    let record = state.store.append_sealed_message(&user_id, &request.sealed, &author_label)?;

    tracing::info!(recipient_id = %user_id, "sealed message posted");
    Ok(Json(record))
}

/// The caller's own sealed messages, newest first. Returns ciphertext;
/// decryption is the client's job.
async fn list_messages<S: RecordStore>(
    State(state): State<AppState<S>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MessageRecord>>, ApiError> {
    let messages = state.store.list_sealed_messages(&user_id)?;

    tracing::info!(user_id = %user_id, count = messages.len(), "messages fetched");
    Ok(Json(messages))
}
