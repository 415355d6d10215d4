//! Copy stdin to the relay.

use anyhow::{Context, Result};
use paste_client::{read_no_more_than, PasteClient, RelayTransport};
use paste_crypto::KeyMode;
use paste_types::ByteSize;
use tokio::io::AsyncRead;

use super::{connect, key_mode, CopyArgs};

/// Run the copy command.
pub async fn run(args: CopyArgs) -> Result<()> {
    let mode = key_mode(&args.key.options(args.public_key_file.clone(), None))?;
    let client = connect(&args.relay, &args.key)?;

    copy_from(&client, tokio::io::stdin(), args.relay.max_size, &mode).await
}

/// Read `input` (bounded by `max_size`), encrypt it and upload it.
pub async fn copy_from<T, R>(
    client: &PasteClient<T>,
    input: R,
    max_size: ByteSize,
    mode: &KeyMode,
) -> Result<()>
where
    T: RelayTransport,
    R: AsyncRead + Unpin,
{
    let data = read_no_more_than(input, max_size.bytes())
        .await
        .context("Failed to read input")?;

    client.copy(&data, mode).await.context("Failed to copy")?;

    tracing::debug!(bytes = data.len(), "Copied");
    Ok(())
}
