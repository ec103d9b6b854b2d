use std::fmt;

use tokio::process::Command;
use tracker_logging::{tracker_debug, tracker_warn};

use crate::SyncError;

const NO_TOKEN: &str = "No token received";

/// Opaque bearer credential for the Sheets API.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token, rejecting blank ones.
    pub fn new(raw: impl Into<String>) -> Result<Self, SyncError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SyncError::Auth(NO_TOKEN.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Identity provider seam: yields a bearer token, prompting the user if the
/// provider needs consent.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<AuthToken, SyncError>;
}

/// A token supplied up front (config file or environment).
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    raw: String,
}

impl StaticTokenProvider {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var).ok().map(Self::new)
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<AuthToken, SyncError> {
        AuthToken::new(self.raw.clone())
    }
}

/// Runs an external command (for example `gcloud auth print-access-token`)
/// and uses its trimmed stdout as the token. The command owns the interactive
/// consent flow.
#[derive(Debug, Clone)]
pub struct CommandTokenProvider {
    program: String,
    args: Vec<String>,
}

impl CommandTokenProvider {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a command line on whitespace. Returns `None` for a blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(ToOwned::to_owned);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

#[async_trait::async_trait]
impl TokenProvider for CommandTokenProvider {
    async fn token(&self) -> Result<AuthToken, SyncError> {
        tracker_debug!("Requesting token via {}", self.program);
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|err| SyncError::Auth(format!("failed to run {}: {err}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracker_warn!("Token command exited with {}: {}", output.status, stderr);
            let message = if stderr.is_empty() {
                "Auth failed".to_string()
            } else {
                stderr
            };
            return Err(SyncError::Auth(message));
        }

        AuthToken::new(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
