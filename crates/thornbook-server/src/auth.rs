//! Login authentication: argon2 password hashes and JWT session tokens.
//!
//! Orthogonal to the envelope scheme. The password hash lets the server
//! refuse logins; it does not and cannot unwrap the secret key — that
//! happens client-side with the password itself, which the server forgets
//! immediately after verification.

use std::time::{SystemTime, UNIX_EPOCH};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown name, wrong password, or unactivated account. One variant
    /// for all three so responses cannot be used to enumerate members.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, expired, or forged session token.
    #[error("invalid session token")]
    InvalidToken,

    /// Password hashing failed (malformed stored hash, parameter error).
    #[error("password hashing failed: {reason}")]
    Hashing {
        /// Underlying hasher error
        reason: String,
    },
}

/// Hash a password with argon2id and a fresh random salt.
///
/// Stored on the user record at activation; verified at every login.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hashing { reason: err.to_string() })
}

/// Verify a password against a stored argon2 hash.
///
/// # Errors
///
/// `InvalidCredentials` on mismatch; `Hashing` if the stored hash cannot
/// be parsed at all.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|err| AuthError::Hashing { reason: err.to_string() })?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The authenticated user's record id.
    sub: String,
    /// Expiry, unix seconds.
    exp: u64,
}

/// Issues and verifies session tokens.
///
/// Tokens carry only the user id and an expiry. Expiry is the server-side
/// half of session locking: the client discards the unwrapped secret key,
/// the server stops honouring the token.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenService {
    /// Create a service signing with the given secret.
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    /// Issue a session token for a user.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
        let claims = Claims { sub: user_id.to_string(), exp: now + self.ttl_secs };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Verify a session token and return the user id it was issued to.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|_| AuthError::InvalidToken)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("ttl_secs", &self.ttl_secs).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("correct horse battery horse").unwrap();
        assert!(verify_password("correct horse battery horse", &hash).is_ok());
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let hash = hash_password("correct horse battery horse").unwrap();
        let result = verify_password("wrong password", &hash);
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_stored_hash_is_a_hashing_error() {
        let result = verify_password("pw", "not a phc string");
        assert!(matches!(result, Err(AuthError::Hashing { .. })));
    }

    #[test]
    fn token_roundtrip() {
        let tokens = TokenService::new(b"test secret", 3600);
        let token = tokens.issue("u1").unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), "u1");
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issuer = TokenService::new(b"secret a", 3600);
        let verifier = TokenService::new(b"secret b", 3600);

        let token = issuer.issue("u1").unwrap();
        assert!(matches!(verifier.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let tokens = TokenService::new(b"test secret", 3600);
        let mut token = tokens.issue("u1").unwrap();
        token.push('x');
        assert!(matches!(tokens.verify(&token), Err(AuthError::InvalidToken)));
    }
}
