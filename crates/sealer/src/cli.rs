//! Command-line surface: `seal`, `open` and `public-key`.
//!
//! Each command returns the text destined for stdout. Failures are turned
//! into an [`ErrorReport`] by [`error_report`]; nothing is printed to stdout
//! in that case.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::{Envelope, EnvelopeError, ErrorReport};
use sealer::{open, RecipientKey, Sealer, SystemRandom};
use tracing::debug;

use crate::config::Config;

/// Exit code for configuration and I/O failures that are not envelope errors.
pub const GENERIC_EXIT_CODE: u8 = 1;

/// Ephemeral P-256 ECDH + AES-256-GCM envelopes for text-only channels.
#[derive(Debug, Parser)]
#[command(name = "sealer", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encrypt a message for the holder of a P-256 public key.
    Seal {
        /// PEM file with the peer public key [default: $SEALER_PEER_PUBLIC_KEY_PATH].
        #[arg(long)]
        peer_key: Option<PathBuf>,
        /// Message to encrypt; read from stdin when omitted.
        message: Option<String>,
    },
    /// Decrypt an envelope with the recipient private key.
    Open {
        /// PEM file with the recipient private key [default: $SEALER_PRIVATE_KEY_PATH].
        #[arg(long)]
        private_key: Option<PathBuf>,
        /// Envelope JSON file; read from stdin when omitted.
        #[arg(long)]
        envelope: Option<PathBuf>,
    },
    /// Print the public key PEM matching a recipient private key.
    PublicKey {
        /// PEM file with the recipient private key [default: $SEALER_PRIVATE_KEY_PATH].
        #[arg(long)]
        private_key: Option<PathBuf>,
    },
}

impl Command {
    /// Subcommand name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Seal { .. } => "seal",
            Command::Open { .. } => "open",
            Command::PublicKey { .. } => "public-key",
        }
    }
}

/// Execute `command`, returning everything that should go to stdout.
///
/// # Errors
///
/// Envelope failures surface as [`EnvelopeError`] inside the returned
/// [`anyhow::Error`]; file and stdin problems carry I/O context instead.
pub fn run(command: Command, cfg: &Config, stdin: impl Read) -> Result<String> {
    match command {
        Command::Seal { peer_key, message } => {
            let path = peer_key.unwrap_or_else(|| PathBuf::from(&cfg.peer_public_key_path));
            let peer_pem = read_file(&path)?;
            let message = match message {
                Some(m) => m,
                None => read_message(stdin)?,
            };

            let envelope = Sealer::new(SystemRandom).seal(&message, &peer_pem)?;
            let mut out = serde_json::to_string_pretty(&envelope)?;
            out.push('\n');
            Ok(out)
        }
        Command::Open {
            private_key,
            envelope,
        } => {
            let recipient = load_recipient(private_key, cfg)?;
            let json = match envelope {
                Some(path) => read_file(&path)?,
                None => read_all(stdin)?,
            };
            let envelope: Envelope = serde_json::from_str(&json).map_err(|e| {
                EnvelopeError::InvalidEncoding(format!("envelope is not valid JSON: {e}"))
            })?;

            let mut plaintext = open(&envelope, &recipient)?;
            plaintext.push('\n');
            Ok(plaintext)
        }
        Command::PublicKey { private_key } => {
            let recipient = load_recipient(private_key, cfg)?;
            Ok(recipient
                .public_key()
                .to_pem()
                .map_err(EnvelopeError::from)?)
        }
    }
}

/// Render a failure as JSON for stderr, with the matching exit code.
pub fn error_report(e: &anyhow::Error) -> (String, u8) {
    let (report, code) = match e.downcast_ref::<EnvelopeError>() {
        Some(err) => (ErrorReport::from(err), err.exit_code()),
        None => (ErrorReport::new("io_error", format!("{e:#}")), GENERIC_EXIT_CODE),
    };
    let text = serde_json::to_string(&report)
        .unwrap_or_else(|_| format!("{}: {}", report.code, report.message));
    (text, code)
}

fn load_recipient(path: Option<PathBuf>, cfg: &Config) -> Result<RecipientKey> {
    let path = path.unwrap_or_else(|| PathBuf::from(&cfg.private_key_path));
    let pem = read_file(&path)?;
    let key = RecipientKey::from_pem(&pem).map_err(EnvelopeError::from)?;
    debug!(fingerprint = %key.public_key().fingerprint(), "recipient key loaded");
    Ok(key)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_all(mut stdin: impl Read) -> Result<String> {
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("failed to read stdin")?;
    Ok(text)
}

/// Read the message from stdin, dropping the single line ending a shell adds.
fn read_message(stdin: impl Read) -> Result<String> {
    let mut text = read_all(stdin)?;
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}
