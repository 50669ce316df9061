//! Configuration loading and validation for the `sealer` binary.
//!
//! Values come from `SEALER_*` environment variables; command-line flags
//! override the key paths per invocation.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated `sealer` configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Tracing log level (e.g. `"info"`, `"debug"`). `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines; otherwise human-readable text.
    #[serde(default = "default_log_json")]
    pub log_json: bool,

    /// PEM file holding the recipient private key, used by `open` and `public-key`.
    #[serde(default = "default_private_key_path")]
    pub private_key_path: String,

    /// PEM file holding the peer public key, used by `seal`.
    #[serde(default = "default_peer_public_key_path")]
    pub peer_public_key_path: String,
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_json() -> bool {
    true
}
fn default_private_key_path() -> String {
    "prime256v1_private_key.pem".into()
}
fn default_peer_public_key_path() -> String {
    "recipient_public_key.pem".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: default_log_json(),
            private_key_path: default_private_key_path(),
            peer_public_key_path: default_peer_public_key_path(),
        }
    }
}

impl Config {
    /// Load and validate configuration from `SEALER_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("SEALER"))
            .build()
            .context("failed to read SEALER_* environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("invalid SEALER_* value")?;

        c.validate()?;
        Ok(c)
    }

    /// Reject blank settings; the first offending variable is named in the error.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.log_level, "SEALER_LOG_LEVEL")?;
        ensure_non_empty(&self.private_key_path, "SEALER_PRIVATE_KEY_PATH")?;
        ensure_non_empty(&self.peer_public_key_path, "SEALER_PEER_PUBLIC_KEY_PATH")?;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty");
    }
    Ok(())
}
