//! # pastebox
//!
//! Copy on one machine, paste on another, through an ephemeral relay.
//!
//! ## Commands
//!
//! - `copy`: Encrypt stdin and upload it
//! - `paste`: Download, decrypt and write to stdout
//! - `last-updated`: Print when the relay last received a payload
//! - `serve`: Run a relay
//! - `version`: Print the version
//!
//! ## Example
//!
//! ```bash
//! # On the relay host
//! pastebox serve --port 9090 --ttl-secs 600
//!
//! # On machine A
//! export PASTEBOX_SERVER=http://192.168.11.5:9090
//! echo hello | pastebox copy -p mypassword
//!
//! # On machine B
//! export PASTEBOX_SERVER=http://192.168.11.5:9090
//! pastebox paste -p mypassword
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{copy, last_updated, paste, serve, CopyArgs, LastUpdatedArgs, PasteArgs, ServeArgs};

/// Encrypted copy/paste through a pastebox relay.
#[derive(Parser, Debug)]
#[command(name = "pastebox")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read stdin, encrypt it and upload it to the relay
    Copy(CopyArgs),

    /// Download from the relay, decrypt and write to stdout
    Paste(PasteArgs),

    /// Print the unix nanoseconds of the relay's last upload
    LastUpdated(LastUpdatedArgs),

    /// Run a relay server
    Serve(ServeArgs),

    /// Print the version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries paste output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Copy(args) => copy::run(args).await?,
        Commands::Paste(args) => paste::run(args).await?,
        Commands::LastUpdated(args) => last_updated::run(args).await?,
        Commands::Serve(args) => serve::run(args).await?,
        Commands::Version => println!("pastebox {}", env!("CARGO_PKG_VERSION")),
    }

    Ok(())
}
