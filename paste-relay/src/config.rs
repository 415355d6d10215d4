//! Configuration loading for paste-relay.
//!
//! Configuration is loaded from a TOML file (default: `relay.toml`). Every
//! section and field is optional.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on the sweep period.
pub const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Root configuration for paste-relay.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Basic authentication.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener (default: 0.0.0.0:9090).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// How long in-flight requests may run after shutdown starts (default: 5).
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
    /// Maximum PUT body in bytes (default: 500 MiB).
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

/// Store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Entry lifetime in seconds (default: 24h). 0 disables expiry.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Sweep interval in seconds. Defaults to the TTL, capped at 24h.
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,
}

/// Basic authentication configuration.
#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Required credentials as `username:password`. Unset or empty disables
    /// authentication.
    #[serde(default)]
    pub basic_auth: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("enabled", &self.credentials().is_some())
            .finish()
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0:9090".to_string()
}

fn default_shutdown_grace_secs() -> u64 {
    5
}

fn default_max_body_size() -> usize {
    500 * 1024 * 1024 // 500MB
}

fn default_ttl_secs() -> u64 {
    24 * 60 * 60 // 24 hours
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
            max_body_size: default_max_body_size(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: None,
        }
    }
}

impl AuthConfig {
    /// Configured credentials, if authentication is enabled.
    pub fn credentials(&self) -> Option<&str> {
        self.basic_auth.as_deref().filter(|s| !s.is_empty())
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Entry lifetime, or `None` when expiry is disabled.
    pub fn ttl(&self) -> Option<Duration> {
        (self.store.ttl_secs > 0).then(|| Duration::from_secs(self.store.ttl_secs))
    }

    /// Sweep interval, or `None` when expiry is disabled. A zero interval
    /// falls back to the TTL. Never longer than [`MAX_SWEEP_INTERVAL`].
    pub fn sweep_interval(&self) -> Option<Duration> {
        let ttl = self.ttl()?;
        Some(
            self.store
                .sweep_interval_secs
                .filter(|secs| *secs > 0)
                .map_or(ttl, Duration::from_secs)
                .min(MAX_SWEEP_INTERVAL),
        )
    }

    /// Grace period for in-flight requests at shutdown.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_grace_secs)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:9090");
        assert_eq!(config.server.max_body_size, 500 * 1024 * 1024);
        assert_eq!(config.ttl(), Some(Duration::from_secs(86400)));
        assert_eq!(config.sweep_interval(), config.ttl());
        assert!(config.auth.credentials().is_none());
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[server]
bind_address = "127.0.0.1:5000"
shutdown_grace_secs = 2
max_body_size = 1048576

[store]
ttl_secs = 600
sweep_interval_secs = 30

[auth]
basic_auth = "testUser:testPass"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:5000");
        assert_eq!(config.shutdown_grace(), Duration::from_secs(2));
        assert_eq!(config.server.max_body_size, 1048576);
        assert_eq!(config.ttl(), Some(Duration::from_secs(600)));
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(30)));
        assert_eq!(config.auth.credentials(), Some("testUser:testPass"));
    }

    #[test]
    fn config_missing_sections_use_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.shutdown_grace_secs, 5);
        assert_eq!(config.store.ttl_secs, 24 * 60 * 60);
    }

    #[test]
    fn zero_ttl_disables_expiry() {
        let config: Config = toml::from_str("[store]\nttl_secs = 0\n").unwrap();
        assert_eq!(config.ttl(), None);
        assert_eq!(config.sweep_interval(), None);
    }

    #[test]
    fn zero_sweep_interval_falls_back_to_ttl() {
        let config: Config =
            toml::from_str("[store]\nttl_secs = 60\nsweep_interval_secs = 0\n").unwrap();
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn huge_ttl_caps_sweep_interval() {
        let config: Config =
            toml::from_str(&format!("[store]\nttl_secs = {}\n", i64::MAX)).unwrap();
        assert_eq!(config.ttl(), Some(Duration::from_secs(i64::MAX as u64)));
        assert_eq!(config.sweep_interval(), Some(MAX_SWEEP_INTERVAL));
    }

    #[test]
    fn empty_basic_auth_disables_auth() {
        let config: Config = toml::from_str("[auth]\nbasic_auth = \"\"\n").unwrap();
        assert!(config.auth.credentials().is_none());
    }

    #[test]
    fn debug_hides_credentials() {
        let config: Config = toml::from_str("[auth]\nbasic_auth = \"u:secret\"\n").unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::from_file(&dir.path().join("relay.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn from_file_reports_bad_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("relay.toml");
        std::fs::write(&path, "[store]\nttl_secs = \"soon\"\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
