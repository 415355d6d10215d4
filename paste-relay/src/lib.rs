//! # paste-relay
//!
//! Ephemeral relay server for pastebox.
//!
//! This crate implements a relay that:
//! - Holds one payload, one salt and one timestamp in memory
//! - Expires entries after a configurable TTL
//! - Rotates the password-derivation salt on request
//! - Never sees plaintext unless the sender chose not to encrypt
//!
//! ## Architecture
//!
//! ```text
//! pastebox copy ──PUT /──┐          ┌──GET /── pastebox paste
//!                        ▼          │
//!        ┌──────────────────────────┴──┐
//!        │        paste-relay          │
//!        │  ┌───────────────────────┐  │
//!        │  │ EphemeralStore (TTL)  │  │
//!        │  └───────────────────────┘  │
//!        └─────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cleanup;
pub mod config;
pub mod error;
pub mod http;
pub mod salt;
pub mod server;
pub mod storage;

pub use config::Config;
pub use error::{RelayError, StoreError};
pub use server::{run, serve, shutdown_signal, PasteRelay};
