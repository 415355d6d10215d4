//! # paste-crypto
//!
//! Encryption pipeline for pastebox.
//!
//! This crate provides:
//! - [`SymmetricCipher`]: AES-256-GCM with a fresh random nonce per message
//! - [`PasswordKdf`]: PBKDF2-HMAC-SHA256 key stretching with a fixed iteration count
//! - [`EnvelopeCipher`]: hybrid encryption (random session key wrapped with
//!   RSA-OAEP or by an external OpenPGP agent)
//! - [`resolve`]: picks one key-acquisition mode from user options
//!
//! # Security Notes
//!
//! - Nonces are never reused: every `encrypt` draws 12 fresh bytes
//! - Key material is zeroized on drop and redacted in `Debug` output
//! - When no key source is configured, payloads pass through unencrypted.
//!   This is deliberate and callers must surface it to the user.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod agent;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod random;
pub mod resolver;
pub mod rsa_keys;
pub mod symmetric;

pub use agent::{AsymmetricAgent, GpgAgent, DEFAULT_GPG_EXECUTABLE};
pub use envelope::EnvelopeCipher;
pub use error::{CryptoError, KeyError};
pub use kdf::{PasswordKdf, PBKDF2_ITERATIONS};
pub use random::{OsRandom, RandomSource};
pub use resolver::{resolve, HybridKey, KeyMode, KeyOptions};
pub use rsa_keys::{parse_private_key, parse_public_key};
pub use symmetric::{SymmetricCipher, SymmetricKey, NONCE_SIZE, TAG_SIZE};
