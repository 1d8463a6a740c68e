//! Account activation and anonymous note composition.

use thornbook_crypto::{
    Keypair, PublicKey, SealedMessage, WrappedSecretKey, derive_account_key, seal,
    wrap_secret_key,
};

/// The two artifacts activation publishes to the server.
///
/// The secret key itself never appears here: it is generated, wrapped, and
/// discarded within [`activate_account`]. A later login recovers it from
/// `wrapped_secret_key` with the same password.
#[derive(Debug, Clone)]
pub struct ActivationKeys {
    /// Public key, served openly so visitors can seal notes.
    pub public_key: PublicKey,
    /// Secret key encrypted under the password-derived key.
    pub wrapped_secret_key: WrappedSecretKey,
}

/// Activate an account: generate a keypair and wrap its secret key.
///
/// Infallible: key generation draws from OS randomness and wrapping cannot
/// fail. The caller persists both halves via the record store and the
/// account moves from unactivated to activated.
pub fn activate_account(password: &str) -> ActivationKeys {
    let keypair = Keypair::generate();
    let account_key = derive_account_key(password);
    let wrapped_secret_key = wrap_secret_key(&keypair.secret, &account_key);

    ActivationKeys { public_key: keypair.public, wrapped_secret_key }
}

/// Seal a guestbook note to a member's public key.
///
/// Callable by anyone — named or anonymous — holding only the recipient's
/// public key. The author label travels alongside the sealed bytes in the
/// message record, not inside the envelope.
pub fn compose_note(text: &str, recipient: &PublicKey) -> SealedMessage {
    seal(text.as_bytes(), recipient)
}

#[cfg(test)]
mod tests {
    use thornbook_crypto::{derive_account_key, open, unwrap_secret_key};

    use super::*;

    #[test]
    fn activation_keys_match() {
        let keys = activate_account("correct horse battery horse");

        let secret = unwrap_secret_key(
            &keys.wrapped_secret_key,
            &derive_account_key("correct horse battery horse"),
        )
        .unwrap();

        assert_eq!(secret.public_key(), keys.public_key);
    }

    #[test]
    fn two_activations_are_independent() {
        let first = activate_account("same password");
        let second = activate_account("same password");

        // Fresh keypair per activation, even under identical passwords.
        assert_ne!(first.public_key, second.public_key);
    }

    #[test]
    fn composed_note_opens_for_the_recipient() {
        let keys = activate_account("pw");
        let secret =
            unwrap_secret_key(&keys.wrapped_secret_key, &derive_account_key("pw")).unwrap();

        let sealed = compose_note("Happy birthday!", &keys.public_key);
        assert_eq!(open(&sealed, &secret).unwrap(), b"Happy birthday!");
    }
}
