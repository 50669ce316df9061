//! Structured logging for the `sealer` binary.
//!
//! Logs go to stderr so that stdout carries only the envelope or plaintext.
//!
//! # Telemetry invariants
//!
//! - **No plaintext or key material** may appear in any log field. Public-key
//!   fingerprints and lengths are fine.
//! - Log level is configurable via `SEALER_LOG_LEVEL` (default: `info`);
//!   `RUST_LOG` overrides it.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a subscriber has already been set.
pub fn init(log_level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
