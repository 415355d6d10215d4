//! Error types for paste-crypto.

use thiserror::Error;

/// Errors raised while resolving or parsing key material.
///
/// These are fatal: the user has to fix the invocation or the key file.
#[derive(Error, Debug)]
pub enum KeyError {
    /// Two mutually exclusive key sources were supplied for the same mode.
    #[error("conflicting options: {0}")]
    ConflictingOptions(String),

    /// A key file could not be read, or its configured path is empty.
    #[error("key not found: {location}: {reason}")]
    KeyNotFound {
        /// Path or environment variable that was consulted.
        location: String,
        /// Why the key could not be loaded.
        reason: String,
    },

    /// The key bytes are neither DER nor PEM in PKCS#1 or PKIX/PKCS#8 form.
    #[error("unsupported key format: expected PKCS#1 or PKIX/PKCS#8 in DER or PEM encoding")]
    UnsupportedKeyFormat,

    /// The key parsed, but it is not an RSA key.
    #[error("given key is not an RSA key")]
    NotAnRsaKey,

    /// The private key is encrypted and no key password was supplied.
    #[error("private key is password-protected; supply a private-key password file")]
    PasswordRequired,

    /// The private key password did not unlock the key.
    #[error("failed to unlock private key: {0}")]
    UnlockFailed(String),

    /// A symmetric key has the wrong length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
}

/// Errors raised by encryption and decryption.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Encryption operation failed.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// AEAD tag mismatch or truncated ciphertext.
    /// No details provided to prevent oracle attacks.
    #[error("decryption failed: authentication error")]
    AuthenticationError,

    /// The randomness source failed.
    #[error("random source failed: {0}")]
    Random(String),

    /// Wrapping the session key for the recipient failed.
    #[error("failed to encrypt the session key: {0}")]
    KeyWrapFailed(String),

    /// Unwrapping the session key failed.
    #[error("failed to decrypt the session key: {0}")]
    KeyUnwrapFailed(String),

    /// The external asymmetric agent exited unsuccessfully.
    #[error("failed to run {executable}: stderr: {stderr}: {reason}")]
    AgentFailed {
        /// Agent executable.
        executable: String,
        /// Everything the agent wrote to its error stream.
        stderr: String,
        /// Exit status or spawn error.
        reason: String,
    },

    /// Key material problem.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Envelope encoding problem.
    #[error(transparent)]
    Envelope(#[from] paste_types::PasteError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_error_includes_stderr() {
        let err = CryptoError::AgentFailed {
            executable: "gpg".to_string(),
            stderr: "gpg: alice: skipped: No public key".to_string(),
            reason: "exit status: 2".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("No public key"));
        assert!(msg.contains("exit status: 2"));
    }

    #[test]
    fn key_errors_surface_verbatim() {
        let err: CryptoError = KeyError::NotAnRsaKey.into();
        assert_eq!(err.to_string(), "given key is not an RSA key");
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CryptoError>();
        assert_send_sync::<KeyError>();
    }
}
