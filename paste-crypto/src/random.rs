//! Injectable randomness.
//!
//! Nonces, session keys and salts all come from a [`RandomSource`] handed to
//! the component at construction, so tests can pin them without touching
//! process-wide state.

use crate::CryptoError;

/// A source of cryptographically secure random bytes.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CryptoError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::getrandom(dest).map_err(|e| CryptoError::Random(e.to_string()))
    }
}
