//! # paste-client
//!
//! Client library for the pastebox relay.
//!
//! ## Features
//!
//! - **Every key mode**: password (with salt rotation), symmetric key,
//!   hybrid RSA or agent envelopes, plaintext pass-through
//! - **Transport Abstraction**: pluggable transport layer (HTTP, mock)
//! - **Bounded I/O**: inputs and responses never exceed a configured size
//!
//! ## Example
//!
//! ```ignore
//! use paste_client::{HttpTransport, HttpTransportConfig, PasteClient};
//! use paste_crypto::{resolve, KeyOptions};
//!
//! let transport = HttpTransport::new(HttpTransportConfig::new("http://relay:9090"))?;
//! let client = PasteClient::new(transport);
//! let mode = resolve(&KeyOptions::default().with_env())?;
//!
//! client.copy(b"my data", &mode).await?;
//! let data = client.paste(&mode).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod io;
pub mod transport;

pub use client::{ClientError, PasteClient};
pub use io::read_no_more_than;
pub use transport::{
    HttpTransport, HttpTransportConfig, MockTransport, RelayTransport, TransportError,
    DEFAULT_TIMEOUT,
};
