//! Hybrid (envelope) encryption.
//!
//! The payload is sealed under a one-time session key with
//! [`SymmetricCipher`]; only the 32-byte session key is encrypted
//! asymmetrically, either with RSA-OAEP(SHA-256) or by an
//! [`AsymmetricAgent`].

use std::sync::Arc;

use paste_types::{CipherEnvelope, KEY_SIZE};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::random::{OsRandom, RandomSource};
use crate::{AsymmetricAgent, CryptoError, SymmetricCipher, SymmetricKey};

/// Seals and opens [`CipherEnvelope`]s.
#[derive(Clone)]
pub struct EnvelopeCipher {
    symmetric: SymmetricCipher,
    rng: Arc<dyn RandomSource>,
}

impl Default for EnvelopeCipher {
    fn default() -> Self {
        Self::new(Arc::new(OsRandom))
    }
}

impl std::fmt::Debug for EnvelopeCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeCipher").finish_non_exhaustive()
    }
}

impl EnvelopeCipher {
    /// Create a cipher drawing session keys and nonces from `rng`.
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self {
            symmetric: SymmetricCipher::new(rng.clone()),
            rng,
        }
    }

    fn session_key(&self) -> Result<SymmetricKey, CryptoError> {
        let mut bytes = Zeroizing::new([0u8; KEY_SIZE]);
        self.rng.fill_bytes(bytes.as_mut())?;
        Ok(SymmetricKey::from_bytes(*bytes))
    }

    fn unwrapped(bytes: &[u8]) -> Result<SymmetricKey, CryptoError> {
        SymmetricKey::try_from_slice(bytes).map_err(|e| CryptoError::KeyUnwrapFailed(e.to_string()))
    }

    /// Encrypt `plaintext` for the holder of `recipient`'s private key.
    pub fn seal_for_key(
        &self,
        plaintext: &[u8],
        recipient: &RsaPublicKey,
    ) -> Result<CipherEnvelope, CryptoError> {
        let session_key = self.session_key()?;
        let encrypted_data = self.symmetric.encrypt(&session_key, plaintext)?;
        let encrypted_session_key = recipient
            .encrypt(
                &mut rand::rngs::OsRng,
                Oaep::new::<Sha256>(),
                session_key.as_bytes(),
            )
            .map_err(|e| CryptoError::KeyWrapFailed(e.to_string()))?;

        Ok(CipherEnvelope::new(encrypted_data, encrypted_session_key))
    }

    /// Open an envelope sealed with [`seal_for_key`](Self::seal_for_key).
    pub fn open_with_key(
        &self,
        envelope: &CipherEnvelope,
        private_key: &RsaPrivateKey,
    ) -> Result<Vec<u8>, CryptoError> {
        let raw = Zeroizing::new(
            private_key
                .decrypt(Oaep::new::<Sha256>(), &envelope.encrypted_session_key)
                .map_err(|e| CryptoError::KeyUnwrapFailed(e.to_string()))?,
        );
        let session_key = Self::unwrapped(&raw)?;
        self.symmetric.decrypt(&session_key, &envelope.encrypted_data)
    }

    /// Encrypt `plaintext` for `identity`, letting `agent` wrap the session key.
    pub async fn seal_for_identity(
        &self,
        plaintext: &[u8],
        identity: &str,
        agent: &dyn AsymmetricAgent,
    ) -> Result<CipherEnvelope, CryptoError> {
        let session_key = self.session_key()?;
        let encrypted_data = self.symmetric.encrypt(&session_key, plaintext)?;
        let encrypted_session_key = agent.encrypt_for(identity, session_key.as_bytes()).await?;

        Ok(CipherEnvelope::new(encrypted_data, encrypted_session_key))
    }

    /// Open an envelope sealed with [`seal_for_identity`](Self::seal_for_identity).
    pub async fn open_for_identity(
        &self,
        envelope: &CipherEnvelope,
        identity: &str,
        agent: &dyn AsymmetricAgent,
    ) -> Result<Vec<u8>, CryptoError> {
        let raw = Zeroizing::new(
            agent
                .decrypt_for(identity, &envelope.encrypted_session_key)
                .await?,
        );
        let session_key = Self::unwrapped(&raw)?;
        self.symmetric.decrypt(&session_key, &envelope.encrypted_data)
    }
}
