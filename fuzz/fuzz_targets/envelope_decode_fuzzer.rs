//! Fuzz target for envelope container parsing
//!
//! Feeds arbitrary byte sequences to the envelope constructors to find:
//! - Parser crashes or panics
//! - Length-check bypasses in the fixed-boundary field split
//!
//! The fuzzer should NEVER panic. All invalid inputs should return
//! MalformedEnvelope.

#![no_main]

use libfuzzer_sys::fuzz_target;
use thornbook_crypto::{SealedMessage, WrappedSecretKey};

fuzz_target!(|data: &[u8]| {
    let _ = SealedMessage::from_bytes(data.to_vec());
    let _ = WrappedSecretKey::from_bytes(data.to_vec());

    // The base64 boundary must be equally crash-free.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = SealedMessage::from_base64(text);
        let _ = WrappedSecretKey::from_base64(text);
    }
});
