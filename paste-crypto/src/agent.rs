//! External asymmetric-crypto agents.
//!
//! The envelope cipher never talks to OpenPGP directly; it asks an
//! [`AsymmetricAgent`] to wrap or unwrap the session key for a recipient
//! identity. [`GpgAgent`] is the production adapter and shells out to a
//! `gpg`-compatible binary.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::CryptoError;

/// Executable used when no agent path is configured.
pub const DEFAULT_GPG_EXECUTABLE: &str = "gpg";

/// Encrypts and decrypts small payloads for a recipient identity.
#[async_trait]
pub trait AsymmetricAgent: Send + Sync {
    /// Encrypt `plaintext` so only `identity` can read it.
    async fn encrypt_for(&self, identity: &str, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt `ciphertext` with the secret key belonging to `identity`.
    async fn decrypt_for(&self, identity: &str, ciphertext: &[u8])
        -> Result<Vec<u8>, CryptoError>;
}

/// Runs a `gpg`-compatible executable as a subprocess.
///
/// Input goes in on stdin, output comes back on stdout. Success is decided by
/// the exit status alone: gpg prints progress to stderr even when it works.
#[derive(Debug, Clone)]
pub struct GpgAgent {
    executable: String,
}

impl Default for GpgAgent {
    fn default() -> Self {
        Self::new(DEFAULT_GPG_EXECUTABLE)
    }
}

impl GpgAgent {
    /// Create an agent that runs `executable`.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// The configured executable.
    pub fn executable(&self) -> &str {
        &self.executable
    }

    fn failure(&self, stderr: impl Into<String>, reason: impl ToString) -> CryptoError {
        CryptoError::AgentFailed {
            executable: self.executable.clone(),
            stderr: stderr.into(),
            reason: reason.to_string(),
        }
    }

    async fn run(&self, args: &[&str], input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        debug!(executable = %self.executable, ?args, "Running asymmetric agent");

        let mut child = Command::new(&self.executable)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.failure("", e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.failure("", "stdin was not captured"))?;

        // Feed stdin while stdout drains so a large payload cannot deadlock on
        // a full pipe.
        let input = input.to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.failure("", e))?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(self.failure(stderr, output.status));
        }

        match writer.await {
            Ok(Ok(())) => Ok(output.stdout),
            Ok(Err(e)) => Err(self.failure(stderr, e)),
            Err(e) => Err(self.failure(stderr, e)),
        }
    }
}

#[async_trait]
impl AsymmetricAgent for GpgAgent {
    async fn encrypt_for(&self, identity: &str, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.run(&["--encrypt", "-r", identity], plaintext).await
    }

    async fn decrypt_for(
        &self,
        identity: &str,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.run(&["--decrypt", "-r", identity], ciphertext).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn script(dir: &Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn passes_input_through_stdin() {
        let dir = TempDir::new().unwrap();
        let agent = GpgAgent::new(script(dir.path(), "agent", "cat"));

        let out = agent.encrypt_for("alice", b"session key").await.unwrap();

        assert_eq!(out, b"session key");
    }

    #[tokio::test]
    async fn passes_identity_as_recipient() {
        let dir = TempDir::new().unwrap();
        let agent = GpgAgent::new(script(dir.path(), "agent", "cat >/dev/null\necho \"$@\""));

        let enc = agent.encrypt_for("alice@example.com", b"x").await.unwrap();
        let dec = agent.decrypt_for("alice@example.com", b"x").await.unwrap();

        assert_eq!(enc, b"--encrypt -r alice@example.com\n");
        assert_eq!(dec, b"--decrypt -r alice@example.com\n");
    }

    #[tokio::test]
    async fn stderr_alone_is_not_a_failure() {
        let dir = TempDir::new().unwrap();
        let agent = GpgAgent::new(script(
            dir.path(),
            "agent",
            "cat\necho 'gpg: encrypted with 2048-bit RSA key' >&2",
        ));

        let out = agent.decrypt_for("alice", b"payload").await.unwrap();

        assert_eq!(out, b"payload");
    }

    #[tokio::test]
    async fn non_zero_exit_includes_stderr() {
        let dir = TempDir::new().unwrap();
        let agent = GpgAgent::new(script(
            dir.path(),
            "agent",
            "echo 'gpg: bob: skipped: No public key' >&2\nexit 2",
        ));

        let err = agent.encrypt_for("bob", b"payload").await.unwrap_err();

        match err {
            CryptoError::AgentFailed { stderr, .. } => {
                assert_eq!(stderr, "gpg: bob: skipped: No public key");
            }
            other => panic!("expected AgentFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_executable_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-gpg");
        let agent = GpgAgent::new(missing.to_string_lossy());

        assert!(matches!(
            agent.encrypt_for("alice", b"x").await,
            Err(CryptoError::AgentFailed { .. })
        ));
    }

    #[tokio::test]
    async fn large_payload_does_not_deadlock() {
        let dir = TempDir::new().unwrap();
        let agent = GpgAgent::new(script(dir.path(), "agent", "cat"));
        let payload = vec![0x42u8; 1 << 20];

        let out = agent.encrypt_for("alice", &payload).await.unwrap();

        assert_eq!(out.len(), payload.len());
    }
}
