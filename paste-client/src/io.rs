//! Bounded reads from byte streams.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::ClientError;

/// Read all of `reader`, failing if it holds more than `max` bytes.
///
/// Reads at most `max + 1` bytes, so an endless stream is cut off as soon
/// as it crosses the limit. Nothing is returned on failure.
pub async fn read_no_more_than<R>(reader: R, max: u64) -> Result<Vec<u8>, ClientError>
where
    R: AsyncRead + Unpin,
{
    let mut data = Vec::new();
    reader
        .take(max.saturating_add(1))
        .read_to_end(&mut data)
        .await?;

    if data.len() as u64 > max {
        return Err(ClientError::SizeLimitExceeded { limit: max });
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_input_under_limit() {
        let data = read_no_more_than(&b"clipboard"[..], 100).await.unwrap();
        assert_eq!(data, b"clipboard");
    }

    #[tokio::test]
    async fn input_exactly_at_limit_is_accepted() {
        let data = read_no_more_than(&b"12345"[..], 5).await.unwrap();
        assert_eq!(data, b"12345");
    }

    #[tokio::test]
    async fn input_over_limit_fails() {
        let err = read_no_more_than(&b"123456"[..], 5).await.unwrap_err();
        assert!(matches!(err, ClientError::SizeLimitExceeded { limit: 5 }));
    }

    #[tokio::test]
    async fn endless_input_is_cut_off() {
        let endless = tokio::io::repeat(b'x');
        let err = read_no_more_than(endless, 1024).await.unwrap_err();
        assert!(matches!(err, ClientError::SizeLimitExceeded { limit: 1024 }));
    }

    #[tokio::test]
    async fn empty_input() {
        assert!(read_no_more_than(tokio::io::empty(), 0).await.unwrap().is_empty());
    }
}
