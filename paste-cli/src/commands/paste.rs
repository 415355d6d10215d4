//! Paste from the relay to stdout.

use anyhow::{Context, Result};
use paste_client::{PasteClient, RelayTransport};
use paste_crypto::KeyMode;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{connect, key_mode, PasteArgs};

/// Run the paste command.
pub async fn run(args: PasteArgs) -> Result<()> {
    let mode = key_mode(&args.key.options(
        args.private_key_file.clone(),
        args.private_key_password_file.clone(),
    ))?;
    let client = connect(&args.relay, &args.key)?;

    paste_to(&client, tokio::io::stdout(), &mode).await
}

/// Download, decrypt and write the payload to `output`.
///
/// Nothing is written unless decryption succeeds.
pub async fn paste_to<T, W>(client: &PasteClient<T>, mut output: W, mode: &KeyMode) -> Result<()>
where
    T: RelayTransport,
    W: AsyncWrite + Unpin,
{
    let data = client.paste(mode).await.context("Failed to paste")?;

    output
        .write_all(&data)
        .await
        .context("Failed to write output")?;
    output.flush().await.context("Failed to write output")?;
    Ok(())
}
