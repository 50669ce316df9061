//! Sealing a message for a peer, and opening it again with the peer's key.
//!
//! # Seal sequence
//!
//! 1. PEM-decode and import the peer public key (no randomness drawn yet).
//! 2. Generate an ephemeral P-256 key pair.
//! 3. ECDH with the peer key; the shared x-coordinate is the AES-256 key.
//! 4. Draw a 96-bit IV and AES-256-GCM encrypt the UTF-8 message.
//! 5. base64url the IV and ciphertext, PEM the ephemeral public key.
//!
//! Any failure aborts the whole sequence; no partial [`Envelope`] is returned.
//! There is no session and no state between calls.

use common::{Envelope, EnvelopeError};
use tracing::{debug, info, warn};

use crate::codec::{base64url, pem};
use crate::crypto::agreement::{EphemeralKeyPair, PublicKeyMaterial, RecipientKey};
use crate::crypto::cipher::{self, IV_LEN};
use crate::crypto::random::{RandomSource, SystemRandom};

/// Produces envelopes using an injected random source.
///
/// `Sealer` holds no other state, so one instance can serve any number of
/// concurrent callers as long as `R` is `Sync`.
#[derive(Debug, Clone, Default)]
pub struct Sealer<R = SystemRandom> {
    random: R,
}

impl<R: RandomSource> Sealer<R> {
    /// Create a sealer drawing keys and IVs from `random`.
    pub fn new(random: R) -> Self {
        Self { random }
    }

    /// Encrypt `message` for the holder of `peer_public_key_pem`.
    ///
    /// The PEM may be wrapped in stray double quotes and may contain literal
    /// `\n` sequences.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::MalformedPem`] / [`EnvelopeError::InvalidPeerKey`]
    ///   if the peer key is unusable. Nothing is drawn from the random source
    ///   in that case.
    /// - [`EnvelopeError::KeyGenerationFailure`] if the random source fails.
    /// - [`EnvelopeError::EncryptionFailure`] on an AEAD engine error.
    pub fn seal(
        &self,
        message: &str,
        peer_public_key_pem: &str,
    ) -> Result<Envelope, EnvelopeError> {
        let peer_der = pem::decode_pem_to_spki(peer_public_key_pem)?;
        let peer = PublicKeyMaterial::from_spki_der(&peer_der)?;
        let peer_fingerprint = peer.fingerprint();
        debug!(peer = %peer_fingerprint, "peer public key imported");

        let ephemeral = EphemeralKeyPair::generate(&self.random)?;
        let sender_public_key = ephemeral.public_key().to_pem()?;
        let key = ephemeral.derive_shared_key(&peer);

        let iv = cipher::generate_iv(&self.random)?;
        let ciphertext = cipher::encrypt(&key, &iv, message.as_bytes())?;

        info!(
            peer = %peer_fingerprint,
            plaintext_len = message.len(),
            ciphertext_len = ciphertext.len(),
            "envelope sealed"
        );
        Ok(Envelope::new(
            base64url::encode(&iv),
            base64url::encode(&ciphertext),
            sender_public_key,
        ))
    }
}

/// Recover the message from `envelope` with the recipient's private key.
///
/// # Errors
///
/// - [`EnvelopeError::UnsupportedVersion`] before any other work if the
///   envelope was written by an unknown format.
/// - [`EnvelopeError::MalformedPem`] / [`EnvelopeError::InvalidPeerKey`] for
///   an unusable sender key.
/// - [`EnvelopeError::InvalidEncoding`] if the IV or ciphertext is not
///   base64url, the IV is not 12 bytes, or the verified plaintext is not UTF-8.
/// - [`EnvelopeError::AuthenticationFailure`] if the tag does not verify.
pub fn open(envelope: &Envelope, recipient: &RecipientKey) -> Result<String, EnvelopeError> {
    envelope.check_version()?;

    let sender_der = pem::decode_pem_to_spki(&envelope.sender_public_key)?;
    let sender = PublicKeyMaterial::from_spki_der(&sender_der)?;

    let iv_bytes = base64url::decode(&envelope.iv)?;
    let iv: [u8; IV_LEN] = iv_bytes.as_slice().try_into().map_err(|_| {
        let got = iv_bytes.len();
        EnvelopeError::InvalidEncoding(format!("iv must be {IV_LEN} bytes, got {got}"))
    })?;
    let ciphertext = base64url::decode(&envelope.ciphertext)?;

    let key = recipient.derive_shared_key(&sender);
    let plaintext = cipher::decrypt(&key, &iv, &ciphertext).map_err(|e| {
        warn!(sender = %sender.fingerprint(), "envelope failed authentication");
        e
    })?;

    let message = String::from_utf8(plaintext)
        .map_err(|_| EnvelopeError::InvalidEncoding("plaintext is not valid UTF-8".into()))?;
    info!(
        sender = %sender.fingerprint(),
        plaintext_len = message.len(),
        "envelope opened"
    );
    Ok(message)
}
