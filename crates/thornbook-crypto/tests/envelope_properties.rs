//! Property-based tests for the envelope scheme
//!
//! These tests verify the fundamental invariants of the envelope system:
//!
//! 1. **Determinism**: derive(p) == derive(p) for all passwords
//! 2. **Round-trip**: unwrap(wrap(s, k), k) == s and open(seal(m, pub), sec) == m
//! 3. **Rejection**: wrong passwords and wrong recipients fail, never
//!    returning garbage
//! 4. **Freshness**: repeated seals and wraps of identical inputs differ

use proptest::prelude::*;
use thornbook_crypto::{
    EnvelopeError, Keypair, SealedMessage, WrappedSecretKey, derive_account_key, open, seal,
    unwrap_secret_key, wrap_secret_key,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_derivation_deterministic(password in ".{0,64}") {
        let first = derive_account_key(&password);
        let second = derive_account_key(&password);

        // Compare through the only safe observer: wrapping the same key.
        let keypair = Keypair::generate();
        let wrapped = wrap_secret_key(&keypair.secret, &first);
        let unwrapped = unwrap_secret_key(&wrapped, &second).unwrap();

        prop_assert_eq!(unwrapped.to_bytes(), keypair.secret.to_bytes());
    }

    #[test]
    fn prop_wrap_unwrap_roundtrip(password in ".{0,64}") {
        let keypair = Keypair::generate();
        let account_key = derive_account_key(&password);

        let wrapped = wrap_secret_key(&keypair.secret, &account_key);
        let unwrapped = unwrap_secret_key(&wrapped, &account_key).unwrap();

        prop_assert_eq!(unwrapped.to_bytes(), keypair.secret.to_bytes());
    }

    #[test]
    fn prop_wrong_password_rejected(
        good in "[a-z]{1,32}",
        bad in "[A-Z0-9]{1,32}",
    ) {
        let keypair = Keypair::generate();
        let wrapped = wrap_secret_key(&keypair.secret, &derive_account_key(&good));

        let result = unwrap_secret_key(&wrapped, &derive_account_key(&bad));
        prop_assert_eq!(result.unwrap_err(), EnvelopeError::DecryptionFailed);
    }

    #[test]
    fn prop_seal_open_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 0..2000)) {
        let keypair = Keypair::generate();

        let sealed = seal(&plaintext, &keypair.public);
        let opened = open(&sealed, &keypair.secret).unwrap();

        prop_assert_eq!(opened, plaintext);
    }

    #[test]
    fn prop_cross_recipient_rejected(plaintext in prop::collection::vec(any::<u8>(), 0..500)) {
        let intended = Keypair::generate();
        let other = Keypair::generate();

        let sealed = seal(&plaintext, &intended.public);

        let result = open(&sealed, &other.secret);
        prop_assert_eq!(result.unwrap_err(), EnvelopeError::DecryptionFailed);
    }

    #[test]
    fn prop_seal_never_repeats(plaintext in prop::collection::vec(any::<u8>(), 0..500)) {
        let keypair = Keypair::generate();

        let first = seal(&plaintext, &keypair.public);
        let second = seal(&plaintext, &keypair.public);

        prop_assert_ne!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn prop_single_byte_flip_rejected(
        plaintext in prop::collection::vec(any::<u8>(), 1..500),
        flip_offset in any::<prop::sample::Index>(),
    ) {
        let keypair = Keypair::generate();
        let sealed = seal(&plaintext, &keypair.public);

        let mut bytes = sealed.as_bytes().to_vec();
        let index = flip_offset.index(bytes.len());
        bytes[index] ^= 0x01;
        let tampered = SealedMessage::from_bytes(bytes).unwrap();

        prop_assert!(open(&tampered, &keypair.secret).is_err());
    }

    #[test]
    fn prop_truncation_is_malformed_not_a_crash(
        len in 0usize..SealedMessage::MIN_SIZE,
    ) {
        let result = SealedMessage::from_bytes(vec![0u8; len]);
        let is_malformed = matches!(result, Err(EnvelopeError::MalformedEnvelope { .. }));
        prop_assert!(is_malformed);
    }

    #[test]
    fn prop_wrapped_truncation_is_malformed(
        len in 0usize..WrappedSecretKey::MIN_SIZE,
    ) {
        let result = WrappedSecretKey::from_bytes(vec![0u8; len]);
        let is_malformed = matches!(result, Err(EnvelopeError::MalformedEnvelope { .. }));
        prop_assert!(is_malformed);
    }
}

/// The concrete scenario from the envelope contract, end to end.
#[test]
fn scenario_activation_login_and_birthday_note() {
    // Activation: derive, generate, wrap.
    let account_key = derive_account_key("correct horse battery horse");
    let keypair = Keypair::generate();
    let wrapped = wrap_secret_key(&keypair.secret, &account_key);

    // Login with the same password recovers identical secret key bytes.
    let relogin_key = derive_account_key("correct horse battery horse");
    let unwrapped = unwrap_secret_key(&wrapped, &relogin_key).unwrap();
    assert_eq!(unwrapped.to_bytes(), keypair.secret.to_bytes());

    // Login with the wrong password is rejected.
    let wrong = unwrap_secret_key(&wrapped, &derive_account_key("wrong password"));
    assert_eq!(wrong.unwrap_err(), EnvelopeError::DecryptionFailed);

    // A visitor seals a note; the owner reads exactly what was written.
    let sealed = seal(b"Happy birthday!", &keypair.public);
    assert_eq!(open(&sealed, &unwrapped).unwrap(), b"Happy birthday!");

    // An unrelated secret key cannot read it.
    let stranger = Keypair::generate();
    assert_eq!(open(&sealed, &stranger.secret).unwrap_err(), EnvelopeError::DecryptionFailed);
}
