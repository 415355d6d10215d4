//! Copy and paste pipelines.
//!
//! A [`PasteClient`] turns a resolved [`KeyMode`] into the request sequence
//! the relay expects:
//!
//! | mode | copy | paste |
//! |---|---|---|
//! | password | `PUT /salt`, derive, encrypt, `PUT /` | `GET /`, `GET /salt`, derive, decrypt |
//! | symmetric | encrypt, `PUT /` | `GET /`, decrypt |
//! | hybrid | seal envelope, `PUT /` | `GET /`, open envelope |
//! | plaintext | `PUT /` | `GET /` |
//!
//! Requests are strictly sequential and never retried here.

use std::sync::Arc;

use paste_crypto::{
    parse_private_key, parse_public_key, AsymmetricAgent, CryptoError, EnvelopeCipher, GpgAgent,
    HybridKey, KeyError, KeyMode, PasswordKdf, RandomSource, SymmetricCipher, SymmetricKey,
};
use paste_types::{CipherEnvelope, PasteError, Resource};
use thiserror::Error;
use tracing::debug;

use crate::transport::{RelayTransport, TransportError};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport error
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Encryption or decryption failed
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Key material could not be loaded
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// Relay data is not a valid envelope
    #[error("invalid envelope: {0}")]
    Envelope(#[from] PasteError),

    /// Input is larger than the configured maximum
    #[error("input exceeds set limit {limit} bytes")]
    SizeLimitExceeded {
        /// Maximum accepted size.
        limit: u64,
    },

    /// Local I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The relay answered with something unparseable
    #[error("invalid relay response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Whether the failed operation could succeed if run again unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(e) if e.is_retryable())
    }
}

/// Encrypts, uploads, downloads and decrypts clipboard payloads.
pub struct PasteClient<T: RelayTransport> {
    transport: T,
    envelope: EnvelopeCipher,
    symmetric: SymmetricCipher,
    kdf: PasswordKdf,
    agent: Arc<dyn AsymmetricAgent>,
}

impl<T: RelayTransport> PasteClient<T> {
    /// Create a client with OS randomness and the `gpg` agent.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            envelope: EnvelopeCipher::default(),
            symmetric: SymmetricCipher::default(),
            kdf: PasswordKdf::default(),
            agent: Arc::new(GpgAgent::default()),
        }
    }

    /// Use `agent` for identity-addressed hybrid mode.
    pub fn with_agent(mut self, agent: Arc<dyn AsymmetricAgent>) -> Self {
        self.agent = agent;
        self
    }

    /// Draw nonces and session keys from `rng`.
    pub fn with_random(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.envelope = EnvelopeCipher::new(rng.clone());
        self.symmetric = SymmetricCipher::new(rng);
        self
    }

    /// Use `kdf` for password mode.
    pub fn with_kdf(mut self, kdf: PasswordKdf) -> Self {
        self.kdf = kdf;
        self
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encrypt `plaintext` under `mode` and upload it.
    ///
    /// In password mode the salt is rotated first, which invalidates any
    /// password-protected payload already on the relay.
    pub async fn copy(&self, plaintext: &[u8], mode: &KeyMode) -> Result<(), ClientError> {
        debug!(mode = mode.name(), size = plaintext.len(), "Copying payload");

        let payload = self.seal(plaintext, mode).await?;
        self.transport.put(Resource::Root, payload).await?;
        Ok(())
    }

    /// Download the current payload and decrypt it under `mode`.
    pub async fn paste(&self, mode: &KeyMode) -> Result<Vec<u8>, ClientError> {
        debug!(mode = mode.name(), "Pasting payload");

        let data = self.transport.get(Resource::Root).await?;
        self.open(&data, mode).await
    }

    /// Unix nanoseconds of the last upload.
    pub async fn last_updated(&self) -> Result<i64, ClientError> {
        let body = self.transport.get(Resource::LastUpdated).await?;
        std::str::from_utf8(&body)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| {
                ClientError::InvalidResponse(format!(
                    "{} is not a timestamp: {:?}",
                    Resource::LastUpdated,
                    String::from_utf8_lossy(&body)
                ))
            })
    }

    async fn seal(&self, plaintext: &[u8], mode: &KeyMode) -> Result<Vec<u8>, ClientError> {
        let sealed = match mode {
            KeyMode::Hybrid(HybridKey::KeyFile { key, .. }) => {
                let recipient = parse_public_key(key)?;
                self.envelope.seal_for_key(plaintext, &recipient)?.to_bytes()?
            }
            KeyMode::Hybrid(HybridKey::Agent { identity }) => self
                .envelope
                .seal_for_identity(plaintext, identity, self.agent.as_ref())
                .await?
                .to_bytes()?,
            KeyMode::Password(password) => {
                let salt = self.transport.put(Resource::Salt, Vec::new()).await?;
                let key = self.derive(password, &salt)?;
                self.symmetric.encrypt(&key, plaintext)?
            }
            KeyMode::Symmetric(key) => self.symmetric.encrypt(key, plaintext)?,
            KeyMode::Plaintext => plaintext.to_vec(),
        };
        Ok(sealed)
    }

    async fn open(&self, data: &[u8], mode: &KeyMode) -> Result<Vec<u8>, ClientError> {
        let opened = match mode {
            KeyMode::Hybrid(HybridKey::KeyFile { key, password }) => {
                let private_key = parse_private_key(key, password.as_deref().map(String::as_str))?;
                let envelope = CipherEnvelope::from_bytes(data)?;
                self.envelope.open_with_key(&envelope, &private_key)?
            }
            KeyMode::Hybrid(HybridKey::Agent { identity }) => {
                let envelope = CipherEnvelope::from_bytes(data)?;
                self.envelope
                    .open_for_identity(&envelope, identity, self.agent.as_ref())
                    .await?
            }
            KeyMode::Password(password) => {
                let salt = self.transport.get(Resource::Salt).await?;
                let key = self.derive(password, &salt)?;
                self.symmetric.decrypt(&key, data)?
            }
            KeyMode::Symmetric(key) => self.symmetric.decrypt(key, data)?,
            KeyMode::Plaintext => data.to_vec(),
        };
        Ok(opened)
    }

    fn derive(&self, password: &str, salt: &[u8]) -> Result<SymmetricKey, ClientError> {
        if salt.is_empty() {
            return Err(ClientError::InvalidResponse(format!(
                "{} returned an empty salt",
                Resource::Salt
            )));
        }
        Ok(self.kdf.derive(password.as_bytes(), salt))
    }
}
