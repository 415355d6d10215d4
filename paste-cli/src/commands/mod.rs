//! CLI command implementations.

pub mod copy;
pub mod last_updated;
pub mod paste;
pub mod serve;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use paste_client::{HttpTransport, HttpTransportConfig, PasteClient};
use paste_crypto::{resolve, GpgAgent, KeyMode, KeyOptions, DEFAULT_GPG_EXECUTABLE};
use paste_types::{ByteSize, SERVER_ENV};

pub use last_updated::LastUpdatedArgs;
pub use serve::ServeArgs;

/// Relay connection flags shared by the client commands.
#[derive(Args)]
pub struct RelayArgs {
    /// Relay address, e.g. http://192.168.11.5:9090
    #[arg(long, env = SERVER_ENV)]
    pub server: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub timeout_secs: u64,

    /// Basic auth credentials as username:password
    #[arg(long)]
    pub basic_auth: Option<String>,

    /// Largest payload to read, e.g. 500mb, 1gb
    #[arg(long, default_value = "500mb")]
    pub max_size: ByteSize,
}

impl std::fmt::Debug for RelayArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayArgs")
            .field("server", &self.server)
            .field("timeout_secs", &self.timeout_secs)
            .field("basic_auth", &self.basic_auth.as_ref().map(|_| "[REDACTED]"))
            .field("max_size", &self.max_size)
            .finish()
    }
}

impl RelayArgs {
    fn transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            address: self.server.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            basic_auth: self.basic_auth.clone(),
            max_response_size: self.max_size,
        }
    }
}

/// Key flags shared by `copy` and `paste`.
#[derive(Args)]
pub struct KeyArgs {
    /// Password to derive the encryption key from
    #[arg(short, long)]
    pub password: Option<String>,

    /// File holding a 32-byte symmetric key
    /// (falls back to $PASTEBOX_SYMMETRIC_KEY_FILE)
    #[arg(short = 'k', long)]
    pub symmetric_key_file: Option<PathBuf>,

    /// OpenPGP user ID to encrypt for or decrypt as
    #[arg(long)]
    pub gpg_user_id: Option<String>,

    /// gpg executable
    #[arg(long, default_value = DEFAULT_GPG_EXECUTABLE)]
    pub gpg_path: String,
}

impl std::fmt::Debug for KeyArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyArgs")
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("symmetric_key_file", &self.symmetric_key_file)
            .field("gpg_user_id", &self.gpg_user_id)
            .field("gpg_path", &self.gpg_path)
            .finish()
    }
}

impl KeyArgs {
    fn options(
        &self,
        asymmetric_key_file: Option<PathBuf>,
        private_key_password_file: Option<PathBuf>,
    ) -> KeyOptions {
        KeyOptions {
            password: self.password.clone(),
            symmetric_key_file: self.symmetric_key_file.clone(),
            symmetric_key_file_env: None,
            asymmetric_key_file,
            private_key_password_file,
            agent_identity: self.gpg_user_id.clone(),
        }
        .with_env()
    }
}

/// Arguments for `copy`.
#[derive(Args, Debug)]
pub struct CopyArgs {
    #[command(flatten)]
    pub relay: RelayArgs,

    #[command(flatten)]
    pub key: KeyArgs,

    /// Recipient's RSA public key (DER or PEM)
    #[arg(long)]
    pub public_key_file: Option<PathBuf>,
}

/// Arguments for `paste`.
#[derive(Args, Debug)]
pub struct PasteArgs {
    #[command(flatten)]
    pub relay: RelayArgs,

    #[command(flatten)]
    pub key: KeyArgs,

    /// Own RSA private key (DER or PEM)
    #[arg(long)]
    pub private_key_file: Option<PathBuf>,

    /// File holding the password of an encrypted private key
    /// (encrypted PKCS#8 only; legacy Proc-Type PEM encryption is not supported)
    #[arg(long)]
    pub private_key_password_file: Option<PathBuf>,
}

/// Pick the key mode, warning when nothing will be encrypted.
fn key_mode(options: &KeyOptions) -> Result<KeyMode> {
    let mode = resolve(options).context("Failed to resolve key")?;
    if matches!(mode, KeyMode::Plaintext) {
        tracing::warn!("No key configured, the payload travels unencrypted");
    }
    tracing::debug!(mode = mode.name(), "Key resolved");
    Ok(mode)
}

fn transport(relay: &RelayArgs) -> Result<HttpTransport> {
    HttpTransport::new(relay.transport_config()).context("Invalid relay address")
}

fn connect(relay: &RelayArgs, key: &KeyArgs) -> Result<PasteClient<HttpTransport>> {
    let agent = Arc::new(GpgAgent::new(key.gpg_path.clone()));
    Ok(PasteClient::new(transport(relay)?).with_agent(agent))
}
