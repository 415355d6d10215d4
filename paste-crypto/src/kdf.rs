//! Password-based key derivation.

use paste_types::KEY_SIZE;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::SymmetricKey;

/// PBKDF2 iteration count shared implicitly by every sender and receiver.
///
/// Low by modern standards. Changing it breaks decryption of anything a peer
/// encrypted with the old value, so both ends must move together.
pub const PBKDF2_ITERATIONS: u32 = 100;

/// PBKDF2-HMAC-SHA256 with a fixed iteration count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordKdf {
    iterations: u32,
}

impl Default for PasswordKdf {
    fn default() -> Self {
        Self::new(PBKDF2_ITERATIONS)
    }
}

impl PasswordKdf {
    /// Create a KDF with an explicit iteration count.
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Iteration count in use.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Stretch `password` and `salt` into a 32-byte key. Deterministic.
    pub fn derive(&self, password: &[u8], salt: &[u8]) -> SymmetricKey {
        let mut out = [0u8; KEY_SIZE];
        pbkdf2_hmac::<Sha256>(password, salt, self.iterations, &mut out);
        let key = SymmetricKey::from_bytes(out);
        zeroize::Zeroize::zeroize(&mut out);
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CryptoError, SymmetricCipher};

    #[test]
    fn derivation_is_deterministic() {
        let kdf = PasswordKdf::default();
        let a = kdf.derive(b"password", b"salt");
        let b = kdf.derive(b"password", b"salt");
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn different_salts_give_different_keys() {
        let kdf = PasswordKdf::default();
        let a = kdf.derive(b"password", b"salt-one");
        let b = kdf.derive(b"password", b"salt-two");
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn iteration_count_changes_output() {
        let a = PasswordKdf::new(100).derive(b"password", b"salt");
        let b = PasswordKdf::new(101).derive(b"password", b"salt");
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn default_uses_documented_iterations() {
        assert_eq!(PasswordKdf::default().iterations(), 100);
    }

    #[test]
    fn password_scenario() {
        let kdf = PasswordKdf::default();
        let cipher = SymmetricCipher::default();

        let ciphertext = cipher
            .encrypt(&kdf.derive(b"password", b"salt"), b"data")
            .unwrap();

        let plaintext = cipher
            .decrypt(&kdf.derive(b"password", b"salt"), &ciphertext)
            .unwrap();
        assert_eq!(plaintext, b"data");

        assert!(matches!(
            cipher.decrypt(&kdf.derive(b"wrong-password", b"salt"), &ciphertext),
            Err(CryptoError::AuthenticationError)
        ));
    }
}
