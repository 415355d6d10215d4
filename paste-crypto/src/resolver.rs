//! Key resolution.
//!
//! Turns the user's key options into exactly one [`KeyMode`]. Priority, first
//! match wins:
//!
//! 1. hybrid: an asymmetric key file or an agent identity
//! 2. password (the key is derived later, once the salt is known)
//! 3. symmetric key file, from the flag and then the environment
//! 4. plaintext pass-through
//!
//! Falling through to plaintext is not an error. Callers should tell the user
//! the payload travels unencrypted.

use std::path::{Path, PathBuf};

use paste_types::SYMMETRIC_KEY_FILE_ENV;
use zeroize::Zeroizing;

use crate::{KeyError, SymmetricKey};

/// Raw key options as the user supplied them.
///
/// Empty strings are treated as "not given", matching how unset CLI flags
/// arrive.
#[derive(Clone, Default)]
pub struct KeyOptions {
    /// Password for PBKDF2 derivation.
    pub password: Option<String>,
    /// Symmetric key file from the command line.
    pub symmetric_key_file: Option<PathBuf>,
    /// Symmetric key file from the environment. `Some("")` means the variable
    /// is set but empty.
    pub symmetric_key_file_env: Option<String>,
    /// RSA public key (for sealing) or private key (for opening).
    pub asymmetric_key_file: Option<PathBuf>,
    /// File holding the password of an encrypted private key.
    pub private_key_password_file: Option<PathBuf>,
    /// Recipient identity for the asymmetric agent.
    pub agent_identity: Option<String>,
}

impl KeyOptions {
    /// Fill [`symmetric_key_file_env`](Self::symmetric_key_file_env) from the
    /// process environment.
    pub fn with_env(mut self) -> Self {
        self.symmetric_key_file_env = std::env::var(SYMMETRIC_KEY_FILE_ENV).ok();
        self
    }
}

impl std::fmt::Debug for KeyOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyOptions")
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("symmetric_key_file", &self.symmetric_key_file)
            .field("symmetric_key_file_env", &self.symmetric_key_file_env)
            .field("asymmetric_key_file", &self.asymmetric_key_file)
            .field("private_key_password_file", &self.private_key_password_file)
            .field("agent_identity", &self.agent_identity)
            .finish()
    }
}

/// Key material for hybrid mode.
pub enum HybridKey {
    /// Contents of an RSA key file, plus the trimmed key password if any.
    KeyFile {
        /// Raw DER or PEM bytes.
        key: Zeroizing<Vec<u8>>,
        /// Password for an encrypted private key.
        password: Option<Zeroizing<String>>,
    },
    /// Session key is wrapped by the asymmetric agent.
    Agent {
        /// Recipient identity passed to the agent.
        identity: String,
    },
}

impl std::fmt::Debug for HybridKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyFile { key, password } => f
                .debug_struct("KeyFile")
                .field("key", &format!("[{} bytes]", key.len()))
                .field("password", &password.as_ref().map(|_| "[REDACTED]"))
                .finish(),
            Self::Agent { identity } => {
                f.debug_struct("Agent").field("identity", identity).finish()
            }
        }
    }
}

/// The single key-acquisition path chosen for one invocation.
pub enum KeyMode {
    /// Envelope encryption.
    Hybrid(HybridKey),
    /// Derive the key from this password and the relay's salt.
    Password(Zeroizing<String>),
    /// Use this key verbatim.
    Symmetric(SymmetricKey),
    /// No key source configured.
    Plaintext,
}

impl KeyMode {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hybrid(HybridKey::KeyFile { .. }) => "hybrid-rsa",
            Self::Hybrid(HybridKey::Agent { .. }) => "hybrid-agent",
            Self::Password(_) => "password",
            Self::Symmetric(_) => "symmetric-key",
            Self::Plaintext => "plaintext",
        }
    }
}

impl std::fmt::Debug for KeyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hybrid(key) => f.debug_tuple("Hybrid").field(key).finish(),
            Self::Password(_) => write!(f, "Password([REDACTED])"),
            Self::Symmetric(key) => f.debug_tuple("Symmetric").field(key).finish(),
            Self::Plaintext => write!(f, "Plaintext"),
        }
    }
}

fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn given_path(value: &Option<PathBuf>) -> Option<&Path> {
    value.as_deref().filter(|p| !p.as_os_str().is_empty())
}

fn read_file(path: &Path) -> Result<Zeroizing<Vec<u8>>, KeyError> {
    std::fs::read(path)
        .map(Zeroizing::new)
        .map_err(|e| KeyError::KeyNotFound {
            location: path.display().to_string(),
            reason: e.to_string(),
        })
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Resolve `options` into one [`KeyMode`], reading any key files involved.
pub fn resolve(options: &KeyOptions) -> Result<KeyMode, KeyError> {
    let identity = given(&options.agent_identity);
    let key_file = given_path(&options.asymmetric_key_file);

    match (identity, key_file) {
        (Some(_), Some(_)) => {
            return Err(KeyError::ConflictingOptions(
                "can't specify both an agent identity and an asymmetric key file".to_string(),
            ))
        }
        (Some(identity), None) => {
            return Ok(KeyMode::Hybrid(HybridKey::Agent {
                identity: identity.to_string(),
            }))
        }
        (None, Some(path)) => {
            let key = read_file(path)?;
            let password = match given_path(&options.private_key_password_file) {
                Some(path) => {
                    let raw = read_file(path)?;
                    let trimmed = String::from_utf8_lossy(trim_ascii(&raw)).into_owned();
                    Some(Zeroizing::new(trimmed))
                }
                None => None,
            };
            return Ok(KeyMode::Hybrid(HybridKey::KeyFile { key, password }));
        }
        (None, None) => {}
    }

    let flag_file = given_path(&options.symmetric_key_file);
    let env_file = given(&options.symmetric_key_file_env);

    if let Some(password) = given(&options.password) {
        if flag_file.is_some() || env_file.is_some() {
            return Err(KeyError::ConflictingOptions(
                "can't specify both a password and a symmetric key file".to_string(),
            ));
        }
        return Ok(KeyMode::Password(Zeroizing::new(password.to_string())));
    }

    let path = match (flag_file, options.symmetric_key_file_env.as_deref()) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some("")) => {
            return Err(KeyError::KeyNotFound {
                location: SYMMETRIC_KEY_FILE_ENV.to_string(),
                reason: "environment variable is set but empty".to_string(),
            })
        }
        (None, Some(env)) => PathBuf::from(env),
        (None, None) => return Ok(KeyMode::Plaintext),
    };

    let raw = read_file(&path)?;
    let key = SymmetricKey::try_from_slice(trim_ascii(&raw))?;
    Ok(KeyMode::Symmetric(key))
}
