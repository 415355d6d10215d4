//! Serve command - run a relay until Ctrl-C.

use anyhow::{Context, Result};
use clap::Args;
use paste_relay::{run as run_relay, shutdown_signal, Config};
use std::path::PathBuf;

/// Arguments for `serve`.
#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (all interfaces)
    #[arg(long)]
    pub port: Option<u16>,

    /// Seconds an entry lives; 0 keeps entries until shutdown
    #[arg(long)]
    pub ttl_secs: Option<u64>,

    /// Require basic auth credentials as username:password
    #[arg(long)]
    pub basic_auth: Option<String>,

    /// Relay configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl std::fmt::Debug for ServeArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServeArgs")
            .field("port", &self.port)
            .field("ttl_secs", &self.ttl_secs)
            .field("basic_auth", &self.basic_auth.as_ref().map(|_| "[REDACTED]"))
            .field("config", &self.config)
            .finish()
    }
}

/// Run the serve command.
pub async fn run(args: ServeArgs) -> Result<()> {
    let config = build_config(&args)?;
    run_relay(config, shutdown_signal())
        .await
        .context("Relay failed")
}

fn build_config(args: &ServeArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(port) = args.port {
        config.server.bind_address = format!("0.0.0.0:{port}");
    }
    if let Some(ttl) = args.ttl_secs {
        config.store.ttl_secs = ttl;
    }
    if let Some(credentials) = &args.basic_auth {
        config.auth.basic_auth = Some(credentials.clone());
    }
    Ok(config)
}
