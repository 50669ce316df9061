//! Records exchanged with the outside world.
//!
//! These types are serialised as JSON: the [`Envelope`] on stdout when a seal
//! succeeds, an [`ErrorReport`] on stderr when it does not.

use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;

/// Format tag written into every new envelope.
///
/// `v1`: P-256 ECDH, raw shared x-coordinate as the AES-256 key,
/// AES-256-GCM with a 96-bit IV and 128-bit tag.
pub const FORMAT_VERSION: &str = "v1";

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Self-contained output of one encryption.
///
/// Carries everything the recipient needs besides its own private key.
/// Legacy envelopes used the key names `enctyptedData` and `publicKeyPEM` and
/// had no `version`; both are still accepted when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Format tag; see [`FORMAT_VERSION`].
    #[serde(default = "legacy_version")]
    pub version: String,
    /// base64url (unpadded) of the 12-byte IV.
    pub iv: String,
    /// base64url (unpadded) of ciphertext with the 16-byte tag appended.
    #[serde(alias = "enctyptedData")]
    pub ciphertext: String,
    /// PEM text of the sender's ephemeral SPKI public key.
    #[serde(alias = "publicKeyPEM")]
    pub sender_public_key: String,
}

fn legacy_version() -> String {
    FORMAT_VERSION.into()
}

impl Envelope {
    /// Assemble a current-format envelope from its encoded parts.
    pub fn new(
        iv: impl Into<String>,
        ciphertext: impl Into<String>,
        sender_public_key: impl Into<String>,
    ) -> Self {
        Self {
            version: FORMAT_VERSION.into(),
            iv: iv.into(),
            ciphertext: ciphertext.into(),
            sender_public_key: sender_public_key.into(),
        }
    }

    /// Fail fast on envelopes written by a format this build cannot open.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::UnsupportedVersion`] for any tag other than
    /// [`FORMAT_VERSION`].
    pub fn check_version(&self) -> Result<(), EnvelopeError> {
        if self.version == FORMAT_VERSION {
            Ok(())
        } else {
            Err(EnvelopeError::UnsupportedVersion(self.version.clone()))
        }
    }
}

// ---------------------------------------------------------------------------
// Error report
// ---------------------------------------------------------------------------

/// Printed instead of an [`Envelope`] when an invocation fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Short machine-readable error code (e.g. `"malformed_pem"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorReport {
    /// Construct an [`ErrorReport`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&EnvelopeError> for ErrorReport {
    fn from(e: &EnvelopeError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialises_with_camel_case_keys() {
        let env = Envelope::new("aXY", "Y3Q", "-----BEGIN PUBLIC KEY-----\n");
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["version"], "v1");
        assert_eq!(value["iv"], "aXY");
        assert_eq!(value["ciphertext"], "Y3Q");
        assert!(value.get("senderPublicKey").is_some());
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn parses_legacy_field_names_without_version() {
        let legacy = json!({
            "iv": "aXY",
            "enctyptedData": "Y3Q",
            "publicKeyPEM": "pem",
        });
        let env: Envelope = serde_json::from_value(legacy).unwrap();
        assert_eq!(env.version, FORMAT_VERSION);
        assert_eq!(env.ciphertext, "Y3Q");
        assert_eq!(env.sender_public_key, "pem");
        assert!(env.check_version().is_ok());
    }

    #[test]
    fn unknown_version_is_rejected() {
        let env: Envelope = serde_json::from_value(json!({
            "version": "v2",
            "iv": "aXY",
            "ciphertext": "Y3Q",
            "senderPublicKey": "pem",
        }))
        .unwrap();
        assert!(matches!(
            env.check_version(),
            Err(EnvelopeError::UnsupportedVersion(ref v)) if v == "v2"
        ));
    }

    #[test]
    fn missing_ciphertext_fails_to_parse() {
        let parsed: Result<Envelope, _> =
            serde_json::from_value(json!({"iv": "aXY", "senderPublicKey": "pem"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn error_report_from_error() {
        let report = ErrorReport::from(&EnvelopeError::AuthenticationFailure);
        assert_eq!(report.code, "authentication_failure");
        assert!(report.message.contains("authentication"));
    }
}
