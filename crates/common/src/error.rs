//! Common error types shared across crates.

use thiserror::Error;

/// Top-level error for a single seal or open invocation.
///
/// Every variant is terminal for the invocation that raised it: no partial
/// [`crate::Envelope`] is ever produced. Messages never contain key material
/// or plaintext.
///
/// Variants map to process exit codes reported by the `sealer` binary:
/// - input problems (encoding, PEM, keys, version) → 2
/// - [`EnvelopeError::AuthenticationFailure`] → 3
/// - [`EnvelopeError::KeyGenerationFailure`] / [`EnvelopeError::EncryptionFailure`] → 1
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// A base64 / base64url field could not be decoded, or decoded to the wrong size.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// PEM header/footer markers are missing or the PEM body is not valid base64.
    #[error("malformed PEM: {0}")]
    MalformedPem(String),

    /// The peer (or sender) public key is not a valid P-256 SPKI record.
    #[error("invalid peer public key: {0}")]
    InvalidPeerKey(String),

    /// The recipient private key could not be parsed as a P-256 key.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The secure random source was unavailable or key sampling failed.
    #[error("key generation failure: {0}")]
    KeyGenerationFailure(String),

    /// The AEAD engine failed while encrypting.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// The AES-GCM tag did not verify: wrong key, or tampered IV / ciphertext / sender key.
    #[error("authentication failure: ciphertext could not be verified")]
    AuthenticationFailure,

    /// The envelope carries a format version this build does not understand.
    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(String),
}

impl EnvelopeError {
    /// Short machine-readable code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            EnvelopeError::InvalidEncoding(_) => "invalid_encoding",
            EnvelopeError::MalformedPem(_) => "malformed_pem",
            EnvelopeError::InvalidPeerKey(_) => "invalid_peer_key",
            EnvelopeError::InvalidPrivateKey(_) => "invalid_private_key",
            EnvelopeError::KeyGenerationFailure(_) => "key_generation_failure",
            EnvelopeError::EncryptionFailure(_) => "encryption_failure",
            EnvelopeError::AuthenticationFailure => "authentication_failure",
            EnvelopeError::UnsupportedVersion(_) => "unsupported_version",
        }
    }

    /// Returns the process exit code that should be used for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            EnvelopeError::InvalidEncoding(_)
            | EnvelopeError::MalformedPem(_)
            | EnvelopeError::InvalidPeerKey(_)
            | EnvelopeError::InvalidPrivateKey(_)
            | EnvelopeError::UnsupportedVersion(_) => 2,
            EnvelopeError::AuthenticationFailure => 3,
            EnvelopeError::KeyGenerationFailure(_) | EnvelopeError::EncryptionFailure(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(EnvelopeError::MalformedPem("x".into()).exit_code(), 2);
        assert_eq!(EnvelopeError::InvalidPeerKey("x".into()).exit_code(), 2);
        assert_eq!(EnvelopeError::UnsupportedVersion("v9".into()).exit_code(), 2);
        assert_eq!(EnvelopeError::AuthenticationFailure.exit_code(), 3);
        assert_eq!(
            EnvelopeError::KeyGenerationFailure("x".into()).exit_code(),
            1
        );
        assert_eq!(EnvelopeError::EncryptionFailure("x".into()).exit_code(), 1);
    }

    #[test]
    fn codes_are_distinct() {
        let all = [
            EnvelopeError::InvalidEncoding(String::new()),
            EnvelopeError::MalformedPem(String::new()),
            EnvelopeError::InvalidPeerKey(String::new()),
            EnvelopeError::InvalidPrivateKey(String::new()),
            EnvelopeError::KeyGenerationFailure(String::new()),
            EnvelopeError::EncryptionFailure(String::new()),
            EnvelopeError::AuthenticationFailure,
            EnvelopeError::UnsupportedVersion(String::new()),
        ];
        let mut codes: Vec<_> = all.iter().map(EnvelopeError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn display_includes_message() {
        let e = EnvelopeError::MalformedPem("missing BEGIN marker".into());
        assert!(e.to_string().contains("missing BEGIN marker"));
    }
}
