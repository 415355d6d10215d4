//! pastebox-relay binary entry point.
//!
//! Usage:
//! ```bash
//! pastebox-relay --config relay.toml
//! pastebox-relay --help
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pastebox_relay::{run, shutdown_signal, Config};
use tracing_subscriber::EnvFilter;

/// Ephemeral relay server for pastebox.
#[derive(Parser, Debug)]
#[command(name = "pastebox-relay")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file. Defaults apply when omitted and `relay.toml` does
    /// not exist.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config)?;

    run(config, shutdown_signal())
        .await
        .context("Relay failed")
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = match path {
        Some(path) => path,
        None => {
            let default = PathBuf::from("relay.toml");
            if !default.exists() {
                tracing::info!("No relay.toml found, using defaults");
                return Ok(Config::default());
            }
            default
        }
    };
    Config::from_file(&path).with_context(|| format!("Failed to load {}", path.display()))
}
