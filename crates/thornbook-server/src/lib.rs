//! Thornbook Guestbook Server
//!
//! The HTTP face of the guestbook. Conventional CRUD plumbing around the
//! envelope scheme: it stores and serves opaque base64 key material and
//! sealed messages, checks argon2 password hashes at login, and gates the
//! owner's message list behind a JWT session token. It can never decrypt
//! anything it stores.
//!
//! Endpoints (all JSON):
//!
//! | Method | Path | Auth | Purpose |
//! |---|---|---|---|
//! | POST | `/api/activate` | token in body | finish an invitation |
//! | POST | `/api/login` | credentials | issue a session token |
//! | GET | `/api/users` | none | directory of activated members |
//! | GET | `/api/users/:id/key` | none | public key for sealing |
//! | POST | `/api/users/:id/messages` | none | post a sealed note |
//! | GET | `/api/messages` | Bearer | the caller's sealed notes |

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod api;
pub mod auth;
pub mod error;
pub mod state;

pub use api::router;
pub use auth::{AuthError, TokenService, hash_password, verify_password};
pub use error::ApiError;
pub use state::AppState;
