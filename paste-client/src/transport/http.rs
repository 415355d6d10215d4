//! HTTP transport over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use paste_types::{ByteSize, Resource};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};

use super::{RelayTransport, TransportError};

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP transport configuration.
#[derive(Clone)]
pub struct HttpTransportConfig {
    /// Relay base URL, e.g. `http://192.168.11.5:9090`.
    pub address: String,
    /// Bound on each whole request, body included.
    pub timeout: Duration,
    /// `username:password` sent as a basic-auth header.
    pub basic_auth: Option<String>,
    /// Largest response body accepted.
    pub max_response_size: ByteSize,
}

impl HttpTransportConfig {
    /// Configuration with default timeout and size limit.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: DEFAULT_TIMEOUT,
            basic_auth: None,
            max_response_size: ByteSize::from_bytes(500 * ByteSize::MB.bytes()),
        }
    }
}

impl std::fmt::Debug for HttpTransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportConfig")
            .field("address", &self.address)
            .field("timeout", &self.timeout)
            .field("basic_auth", &self.basic_auth.as_ref().map(|_| "[REDACTED]"))
            .field("max_response_size", &self.max_response_size)
            .finish()
    }
}

/// Talks to a relay over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth_header: Option<String>,
    max_response_size: u64,
}

impl HttpTransport {
    /// Build a transport for `config`.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let invalid = |reason: String| TransportError::InvalidAddress {
            address: config.address.clone(),
            reason,
        };

        let url = reqwest::Url::parse(&config.address).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.address.trim_end_matches('/').to_string(),
            auth_header: config
                .basic_auth
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(|creds| format!("Basic {}", STANDARD.encode(creds))),
            max_response_size: config.max_response_size.bytes(),
        })
    }

    fn url(&self, resource: Resource) -> String {
        format!("{}{}", self.base_url, resource.path())
    }

    async fn request(
        &self,
        method: Method,
        resource: Resource,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, TransportError> {
        let verb = if method == Method::PUT { "PUT" } else { "GET" };
        let failed = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout {
                    method: verb,
                    resource,
                }
            } else {
                TransportError::RequestFailed {
                    method: verb,
                    resource,
                    reason: e.to_string(),
                }
            }
        };

        tracing::debug!(method = verb, %resource, "Relay request");

        let mut request = self.client.request(method, self.url(resource));
        if let Some(header) = &self.auth_header {
            request = request.header(AUTHORIZATION, header);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let mut response = request.send().await.map_err(failed)?;
        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(TransportError::NotFound { resource }),
            status => {
                return Err(TransportError::Status {
                    method: verb,
                    resource,
                    status: status.as_u16(),
                })
            }
        }

        let mut data = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(failed)? {
            if (data.len() + chunk.len()) as u64 > self.max_response_size {
                return Err(TransportError::SizeLimitExceeded {
                    method: verb,
                    resource,
                    limit: self.max_response_size,
                });
            }
            data.extend_from_slice(&chunk);
        }
        Ok(data)
    }
}

#[async_trait]
impl RelayTransport for HttpTransport {
    async fn get(&self, resource: Resource) -> Result<Vec<u8>, TransportError> {
        self.request(Method::GET, resource, None).await
    }

    async fn put(&self, resource: Resource, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.request(Method::PUT, resource, Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paste_relay::{serve, Config, PasteRelay};
    use paste_types::SALT_SIZE;
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// A relay on an ephemeral port. Stops when the sender is dropped.
    async fn start_relay(config: Config) -> (String, oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let relay = Arc::new(PasteRelay::new(config));
        tokio::spawn(serve(relay, listener, async move {
            let _ = stop_rx.await;
        }));
        (address, stop_tx)
    }

    fn transport(address: &str) -> HttpTransport {
        HttpTransport::new(HttpTransportConfig::new(address)).unwrap()
    }

    #[test]
    fn rejects_non_http_addresses() {
        for address in ["", "relay:9090/x y", "ftp://relay"] {
            assert!(matches!(
                HttpTransport::new(HttpTransportConfig::new(address)),
                Err(TransportError::InvalidAddress { .. })
            ));
        }
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let transport = transport("http://relay:9090/");
        assert_eq!(transport.url(Resource::Root), "http://relay:9090/");
        assert_eq!(transport.url(Resource::Salt), "http://relay:9090/salt");
    }

    #[test]
    fn debug_hides_credentials() {
        let mut config = HttpTransportConfig::new("http://relay");
        config.basic_auth = Some("user:secret".to_string());
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[tokio::test]
    async fn put_then_get_against_relay() {
        let (address, _stop) = start_relay(Config::default()).await;
        let transport = transport(&address);

        transport
            .put(Resource::Root, b"clipboardValue".to_vec())
            .await
            .unwrap();

        assert_eq!(transport.get(Resource::Root).await.unwrap(), b"clipboardValue");
    }

    #[tokio::test]
    async fn missing_data_is_not_found() {
        let (address, _stop) = start_relay(Config::default()).await;

        let err = transport(&address).get(Resource::Root).await.unwrap_err();

        assert!(matches!(err, TransportError::NotFound { resource: Resource::Root }));
    }

    #[tokio::test]
    async fn salt_rotation_returns_new_salt() {
        let (address, _stop) = start_relay(Config::default()).await;
        let transport = transport(&address);

        let salt = transport.put(Resource::Salt, Vec::new()).await.unwrap();

        assert_eq!(salt.len(), SALT_SIZE);
        assert_eq!(transport.get(Resource::Salt).await.unwrap(), salt);
    }

    #[tokio::test]
    async fn basic_auth_header_is_sent() {
        let mut config = Config::default();
        config.auth.basic_auth = Some("testUser:testPass".to_string());
        let (address, _stop) = start_relay(config).await;

        let mut good = HttpTransportConfig::new(&address);
        good.basic_auth = Some("testUser:testPass".to_string());
        HttpTransport::new(good)
            .unwrap()
            .put(Resource::Root, b"x".to_vec())
            .await
            .unwrap();

        let mut bad = HttpTransportConfig::new(&address);
        bad.basic_auth = Some("testUser:invalidPass".to_string());
        let err = HttpTransport::new(bad)
            .unwrap()
            .get(Resource::Root)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn oversized_response_is_rejected() {
        let (address, _stop) = start_relay(Config::default()).await;
        transport(&address)
            .put(Resource::Root, vec![b'x'; 64])
            .await
            .unwrap();

        let mut config = HttpTransportConfig::new(&address);
        config.max_response_size = ByteSize::from_bytes(63);
        let err = HttpTransport::new(config)
            .unwrap()
            .get(Resource::Root)
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::SizeLimitExceeded { limit: 63, .. }));
    }

    #[tokio::test]
    async fn silent_relay_times_out() {
        // Accepts connections and never answers.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let mut config = HttpTransportConfig::new(&address);
        config.timeout = Duration::from_millis(200);
        let err = HttpTransport::new(config)
            .unwrap()
            .get(Resource::Root)
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Timeout { method: "GET", .. }));
        assert!(err.is_retryable());
    }
}
