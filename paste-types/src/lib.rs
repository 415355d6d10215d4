//! # paste-types
//!
//! Wire format types shared by the pastebox relay and its clients.
//!
//! This crate provides the foundational types used across all pastebox crates:
//! - [`CipherEnvelope`] - Hybrid-encryption payload (`encryptedData` + `encryptedSessionKey`)
//! - [`Resource`] - The relay's HTTP resources and the store slots behind them
//! - [`ByteSize`] - Human-readable data sizes (`500mb`, `1 KB`)
//! - [`PasteError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod datasize;
mod envelope;
mod error;
mod resource;

pub use datasize::ByteSize;
pub use envelope::CipherEnvelope;
pub use error::PasteError;
pub use resource::{Resource, StoreKey};

/// Size of every symmetric key in the system (AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of the relay-held password salt in bytes.
pub const SALT_SIZE: usize = 128;

/// Environment variable holding the relay address for client commands.
pub const SERVER_ENV: &str = "PASTEBOX_SERVER";

/// Environment variable holding a fallback symmetric-key file path.
pub const SYMMETRIC_KEY_FILE_ENV: &str = "PASTEBOX_SYMMETRIC_KEY_FILE";

/// Body returned with every 401 response.
pub const UNAUTHORIZED_BODY: &str = "Unauthorized.\n";
