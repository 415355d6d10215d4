//! CipherEnvelope - the wire format for hybrid-encrypted payloads.

use serde::{Deserialize, Serialize};

use crate::PasteError;

/// A payload encrypted under a one-time session key, plus that session key
/// wrapped for the recipient.
///
/// This is what the relay stores when the sender used a public key or an
/// OpenPGP recipient. The relay cannot open either field.
///
/// Serialized as JSON with base64 byte fields:
///
/// ```text
/// {"encryptedData":"<base64>","encryptedSessionKey":"<base64>"}
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CipherEnvelope {
    /// `nonce || AES-256-GCM(session_key, plaintext)`.
    #[serde(with = "base64_bytes")]
    pub encrypted_data: Vec<u8>,
    /// The session key wrapped with RSA-OAEP or by the asymmetric agent.
    #[serde(with = "base64_bytes")]
    pub encrypted_session_key: Vec<u8>,
}

impl CipherEnvelope {
    /// Create an envelope from its two parts.
    pub fn new(encrypted_data: Vec<u8>, encrypted_session_key: Vec<u8>) -> Self {
        Self {
            encrypted_data,
            encrypted_session_key,
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PasteError> {
        serde_json::to_vec(self).map_err(PasteError::Serialization)
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PasteError> {
        serde_json::from_slice(bytes).map_err(PasteError::Deserialization)
    }
}

impl std::fmt::Debug for CipherEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherEnvelope")
            .field("encrypted_data", &format!("[{} bytes]", self.encrypted_data.len()))
            .field(
                "encrypted_session_key",
                &format!("[{} bytes]", self.encrypted_session_key.len()),
            )
            .finish()
    }
}

/// Byte arrays as standard (padded) base64 strings.
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
