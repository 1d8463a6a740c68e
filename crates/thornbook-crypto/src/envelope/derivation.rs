//! Password-based account key derivation.

use sha2::{Digest, Sha512};

use super::keys::AccountKey;

/// Derive the symmetric account key from a member's password.
///
/// SHA-512 of the UTF-8 password, truncated to 32 bytes. Deterministic and
/// infallible: the same password always yields the same key, so the client
/// can re-derive it at every login with nothing stored server-side. Any
/// string works, including the empty one.
///
/// # Security
///
/// Unsalted and fast by compatibility contract (see the crate docs): this
/// is how existing wrapped keys were produced, and changing the derivation
/// would lock every member out. A stronger scheme needs a stored per-user
/// salt and a memory-hard KDF, which is an interface change.
pub fn derive_account_key(password: &str) -> AccountKey {
    let digest = Sha512::digest(password.as_bytes());

    let mut key = [0u8; 32];
    key.copy_from_slice(&digest[..32]);

    AccountKey::new(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let first = derive_account_key("correct horse battery horse");
        let second = derive_account_key("correct horse battery horse");
        assert_eq!(first.bytes(), second.bytes());
    }

    #[test]
    fn different_passwords_produce_different_keys() {
        let first = derive_account_key("correct horse battery horse");
        let second = derive_account_key("wrong password");
        assert_ne!(first.bytes(), second.bytes());
    }

    #[test]
    fn empty_password_derives_a_key() {
        // No error path: any string must produce a key.
        let key = derive_account_key("");
        assert_eq!(key.bytes().len(), 32);
    }

    #[test]
    fn derivation_matches_sha512_prefix() {
        // Pins the contract: first 32 bytes of SHA-512("abc").
        let key = derive_account_key("abc");
        let expected =
            hex::decode("ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a")
                .unwrap();
        assert_eq!(key.bytes().as_slice(), expected.as_slice());
    }

    #[test]
    fn unicode_passwords_use_utf8_bytes() {
        let precomposed = derive_account_key("caf\u{e9}");
        let decomposed = derive_account_key("cafe\u{301}");
        // Different UTF-8 byte sequences, different keys.
        assert_ne!(precomposed.bytes(), decomposed.bytes());
    }
}
