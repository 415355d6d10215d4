//! Last-updated command - print when the relay last received a payload.

use anyhow::{Context, Result};
use clap::Args;
use paste_client::{PasteClient, RelayTransport};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{transport, RelayArgs};

/// Arguments for `last-updated`.
#[derive(Args, Debug)]
pub struct LastUpdatedArgs {
    #[command(flatten)]
    pub relay: RelayArgs,
}

/// Run the last-updated command.
pub async fn run(args: LastUpdatedArgs) -> Result<()> {
    let client = PasteClient::new(transport(&args.relay)?);
    print_last_updated(&client, tokio::io::stdout()).await
}

/// Write the relay's last-upload timestamp (unix nanoseconds) as one line.
pub async fn print_last_updated<T, W>(client: &PasteClient<T>, mut output: W) -> Result<()>
where
    T: RelayTransport,
    W: AsyncWrite + Unpin,
{
    let nanos = client
        .last_updated()
        .await
        .context("Failed to read last update")?;

    output
        .write_all(format!("{nanos}\n").as_bytes())
        .await
        .context("Failed to write output")?;
    output.flush().await.context("Failed to write output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use paste_client::MockTransport;
    use paste_crypto::KeyMode;

    #[tokio::test]
    async fn prints_timestamp_after_copy() {
        let mock = MockTransport::new();
        let client = PasteClient::new(mock.clone());
        client.copy(b"data", &KeyMode::Plaintext).await.unwrap();

        let mut out = Vec::new();
        print_last_updated(&client, &mut out).await.unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.ends_with('\n'));
        assert!(line.trim_end().parse::<i64>().unwrap() > 0);
    }

    #[tokio::test]
    async fn nothing_copied_yet_fails() {
        let client = PasteClient::new(MockTransport::new());

        let mut out = Vec::new();
        let err = print_last_updated(&client, &mut out).await.unwrap_err();

        assert!(format!("{err:#}").starts_with("Failed to read last update"));
        assert!(out.is_empty());
    }
}
