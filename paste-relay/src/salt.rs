//! Password salt rotation.
//!
//! The relay holds one salt for the whole deployment. A PUT on `/salt`
//! replaces it with fresh random bytes and returns them; a GET reads it
//! without changing it.
//!
//! Because the slot is global, two senders that rotate back to back race:
//! whichever rotated first can no longer be decrypted once the second
//! rotation lands. Clients depend on this single-slot behavior.

use std::sync::Arc;

use paste_crypto::RandomSource;
use paste_types::{StoreKey, SALT_SIZE};

use crate::error::Result;
use crate::storage::{RelayStore, StoreValue};

/// Salt alphabet. Salts travel as raw HTTP bodies, so they stay printable.
const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Largest multiple of the alphabet size below 256. Bytes at or above it are
/// rejected so every symbol is equally likely.
const REJECT_FROM: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Generates salts and keeps the current one in the store.
#[derive(Clone)]
pub struct SaltRotator {
    store: Arc<RelayStore>,
    rng: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for SaltRotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaltRotator").finish_non_exhaustive()
    }
}

impl SaltRotator {
    /// Create a rotator writing to `store` and drawing from `rng`.
    pub fn new(store: Arc<RelayStore>, rng: Arc<dyn RandomSource>) -> Self {
        Self { store, rng }
    }

    fn generate(&self) -> Result<Vec<u8>> {
        let mut salt = Vec::with_capacity(SALT_SIZE);
        let mut raw = [0u8; SALT_SIZE];

        while salt.len() < SALT_SIZE {
            self.rng.fill_bytes(&mut raw)?;
            let accepted = raw
                .iter()
                .filter(|b| **b < REJECT_FROM)
                .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()]);
            salt.extend(accepted.take(SALT_SIZE - salt.len()));
        }
        Ok(salt)
    }

    /// Replace the current salt with a fresh one and return it.
    ///
    /// Not idempotent: every call invalidates payloads encrypted under the
    /// previous salt.
    pub fn rotate(&self) -> Result<Vec<u8>> {
        let salt = self.generate()?;
        self.store
            .put(StoreKey::Salt, StoreValue::Bytes(salt.clone()))?;
        tracing::debug!("Salt rotated");
        Ok(salt)
    }

    /// The current salt. `StoreError::NotFound` if none was ever set or it
    /// expired.
    pub fn current(&self) -> Result<Vec<u8>> {
        let value = self.store.get(&StoreKey::Salt)?;
        Ok(value.into_bytes(StoreKey::Salt)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RelayError, StoreError};
    use paste_crypto::{CryptoError, OsRandom};
    use std::sync::Mutex;

    /// Replays a fixed byte script, then repeats its last byte.
    struct ScriptedRandom(Mutex<Vec<u8>>);

    impl RandomSource for ScriptedRandom {
        fn fill_bytes(&self, dest: &mut [u8]) -> std::result::Result<(), CryptoError> {
            let mut script = self.0.lock().unwrap();
            for byte in dest.iter_mut() {
                *byte = if script.len() > 1 {
                    script.remove(0)
                } else {
                    script[0]
                };
            }
            Ok(())
        }
    }

    fn rotator() -> SaltRotator {
        SaltRotator::new(Arc::new(RelayStore::new()), Arc::new(OsRandom))
    }

    #[test]
    fn no_salt_before_first_rotation() {
        let err = rotator().current().unwrap_err();
        assert!(matches!(
            err,
            RelayError::Store(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn rotation_produces_alphanumeric_salt() {
        let salt = rotator().rotate().unwrap();
        assert_eq!(salt.len(), SALT_SIZE);
        assert!(salt.iter().all(u8::is_ascii_alphanumeric));
    }

    #[test]
    fn consecutive_rotations_differ() {
        let rotator = rotator();
        let first = rotator.rotate().unwrap();
        let second = rotator.rotate().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn current_returns_latest_rotation() {
        let rotator = rotator();
        rotator.rotate().unwrap();
        let latest = rotator.rotate().unwrap();

        assert_eq!(rotator.current().unwrap(), latest);
        assert_eq!(rotator.current().unwrap(), latest, "reads do not rotate");
    }

    #[test]
    fn biased_bytes_are_rejected() {
        // 248..=255 would skew the distribution; they must be skipped.
        let mut script = vec![255u8, 248, 0];
        script.push(1);
        let rng = ScriptedRandom(Mutex::new(script));
        let rotator = SaltRotator::new(Arc::new(RelayStore::new()), Arc::new(rng));

        let salt = rotator.rotate().unwrap();

        assert_eq!(salt[0], b'A');
        assert!(salt[1..].iter().all(|b| *b == b'B'));
    }

    #[test]
    fn single_slot_race_invalidates_earlier_sender() {
        let rotator = rotator();

        let alice_salt = rotator.rotate().unwrap();
        let bob_salt = rotator.rotate().unwrap();

        // Alice's receiver now sees Bob's salt and derives the wrong key.
        let seen = rotator.current().unwrap();
        assert_eq!(seen, bob_salt);
        assert_ne!(seen, alice_salt);
    }
}
