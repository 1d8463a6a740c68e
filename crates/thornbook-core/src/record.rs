//! Record types stored by the guestbook.
//!
//! Every field is required unless explicitly optional; wire parsing rejects
//! records with missing fields instead of defaulting them, so a malformed
//! message can never masquerade as a readable one.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use thornbook_crypto::SealedMessage;

/// Errors from record parsing and validation.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A record arrived without all required fields, or with fields that
    /// fail validation (e.g. a sealed payload that is not an envelope).
    #[error("malformed record: {reason}")]
    MalformedRecord {
        /// What made the record unusable
        reason: String,
    },
}

/// A group member.
///
/// Created in the invited state (activation token set, no keys) and
/// transitioned exactly once to activated, at which point the token is
/// cleared and the key material is filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable record identifier.
    pub id: String,
    /// Display name, unique within the guestbook for login purposes.
    pub name: String,
    /// Group this member belongs to.
    pub group_id: String,
    /// One-shot invitation token; `None` once the account is activated.
    pub activation_token: Option<String>,
    /// Whether activation has completed.
    pub activated: bool,
    /// Base64 X25519 public key; set at activation.
    pub public_key: Option<String>,
    /// Base64 wrapped secret key (`nonce || ciphertext`); set at activation.
    pub wrapped_secret_key: Option<String>,
    /// Argon2 password hash for login; set at activation. Unrelated to the
    /// envelope scheme — the server checks it, the client never sees it.
    pub password_hash: Option<String>,
}

impl UserRecord {
    /// Create a freshly invited member with a one-shot activation token.
    pub fn invited(id: String, name: String, group_id: String, activation_token: String) -> Self {
        Self {
            id,
            name,
            group_id,
            activation_token: Some(activation_token),
            activated: false,
            public_key: None,
            wrapped_secret_key: None,
            password_hash: None,
        }
    }
}

/// Public directory entry for an activated member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Stable record identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A guestbook group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Stable record identifier.
    pub id: String,
    /// Group display name.
    pub name: String,
}

/// A sealed note addressed to one member.
///
/// Created once per post, never mutated. The `sealed` field is the base64
/// envelope; the server stores and serves it without ever decrypting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageRecord {
    /// Stable record identifier.
    pub id: String,
    /// The member whose guestbook this note belongs to.
    pub recipient_id: String,
    /// Base64 sealed message (`ephemeral_public_key || nonce || ciphertext`).
    pub sealed: String,
    /// Sender-chosen label; "Anonymous" when none was given.
    pub author_label: String,
    /// Unix timestamp (seconds) when the note was posted.
    pub created_at_secs: u64,
}

impl MessageRecord {
    /// Parse a record from its JSON wire form.
    ///
    /// # Errors
    ///
    /// `MalformedRecord` when any required field is missing, unknown fields
    /// are present, or the sealed payload does not parse as an envelope.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let record: Self = serde_json::from_str(json)
            .map_err(|err| RecordError::MalformedRecord { reason: err.to_string() })?;
        record.validate()?;
        Ok(record)
    }

    /// Check field contents beyond mere presence.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.id.is_empty() || self.recipient_id.is_empty() {
            return Err(RecordError::MalformedRecord {
                reason: "record identifiers must be non-empty".to_string(),
            });
        }
        SealedMessage::from_base64(&self.sealed)
            .map_err(|err| RecordError::MalformedRecord { reason: err.to_string() })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use thornbook_crypto::{Keypair, seal};

    use super::*;

    fn sealed_b64() -> String {
        let keypair = Keypair::generate();
        seal(b"note", &keypair.public).to_base64()
    }

    #[test]
    fn message_record_json_roundtrip() {
        let record = MessageRecord {
            id: "m1".to_string(),
            recipient_id: "u1".to_string(),
            sealed: sealed_b64(),
            author_label: "Anonymous".to_string(),
            created_at_secs: 1_700_000_000,
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed = MessageRecord::from_json(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn missing_field_is_malformed() {
        // No author_label.
        let json = format!(
            r#"{{"id":"m1","recipient_id":"u1","sealed":"{}","created_at_secs":0}}"#,
            sealed_b64()
        );
        let result = MessageRecord::from_json(&json);
        assert!(matches!(result, Err(RecordError::MalformedRecord { .. })));
    }

    #[test]
    fn unknown_field_is_malformed() {
        let json = format!(
            r#"{{"id":"m1","recipient_id":"u1","sealed":"{}","author_label":"a","created_at_secs":0,"extra":1}}"#,
            sealed_b64()
        );
        let result = MessageRecord::from_json(&json);
        assert!(matches!(result, Err(RecordError::MalformedRecord { .. })));
    }

    #[test]
    fn non_envelope_payload_is_malformed() {
        let json = r#"{"id":"m1","recipient_id":"u1","sealed":"AAAA","author_label":"a","created_at_secs":0}"#;
        let result = MessageRecord::from_json(json);
        assert!(matches!(result, Err(RecordError::MalformedRecord { .. })));
    }

    #[test]
    fn empty_identifiers_are_malformed() {
        let record = MessageRecord {
            id: String::new(),
            recipient_id: "u1".to_string(),
            sealed: sealed_b64(),
            author_label: "a".to_string(),
            created_at_secs: 0,
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn invited_user_starts_without_keys() {
        let user = UserRecord::invited(
            "u1".to_string(),
            "maria".to_string(),
            "g1".to_string(),
            "token".to_string(),
        );
        assert!(!user.activated);
        assert!(user.public_key.is_none());
        assert!(user.wrapped_secret_key.is_none());
        assert!(user.password_hash.is_none());
        assert_eq!(user.activation_token.as_deref(), Some("token"));
    }
}
