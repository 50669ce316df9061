//! Binary-to-text codecs.
//!
//! - [`base64url`]: unpadded URL-safe base64 for IV and ciphertext.
//! - [`pem`]: SPKI DER ⇄ `PUBLIC KEY` PEM, standard alphabet, 64-column lines.
//!
//! Both are pure functions with no cryptographic dependency.

pub mod base64url;
pub mod pem;

use thiserror::Error;

/// Errors produced by the codec layer.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Input is not valid base64url.
    #[error("invalid base64url: {0}")]
    InvalidEncoding(base64::DecodeError),

    /// The `BEGIN`/`END PUBLIC KEY` markers were not found.
    #[error("PEM header or footer missing")]
    MissingPemMarkers,

    /// The text between the PEM markers is not valid standard base64.
    #[error("PEM body is not valid base64: {0}")]
    InvalidPemBody(base64::DecodeError),
}

impl From<CodecError> for common::EnvelopeError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::InvalidEncoding(_) => Self::InvalidEncoding(e.to_string()),
            CodecError::MissingPemMarkers | CodecError::InvalidPemBody(_) => {
                Self::MalformedPem(e.to_string())
            }
        }
    }
}
