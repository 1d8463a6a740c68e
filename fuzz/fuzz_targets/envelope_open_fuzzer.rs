//! Fuzz target for opening attacker-controlled envelopes
//!
//! Any byte sequence that parses as an envelope must either decrypt
//! (cryptographically impossible for random input) or fail cleanly with
//! DecryptionFailed. No panic, no garbage plaintext.

#![no_main]

use libfuzzer_sys::fuzz_target;
use thornbook_crypto::{
    SealedMessage, SecretKey, WrappedSecretKey, derive_account_key, open, unwrap_secret_key,
};

fuzz_target!(|data: &[u8]| {
    let secret = SecretKey::from_bytes([7u8; 32]);
    if let Ok(sealed) = SealedMessage::from_bytes(data.to_vec()) {
        let _ = open(&sealed, &secret);
    }

    let account_key = derive_account_key("fuzz password");
    if let Ok(wrapped) = WrappedSecretKey::from_bytes(data.to_vec()) {
        let _ = unwrap_secret_key(&wrapped, &account_key);
    }
});
