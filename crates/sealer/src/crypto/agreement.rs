//! P-256 key pairs, SPKI public-key import and ECDH.
//!
//! Private scalars never leave this module: [`EphemeralKeyPair`] and
//! [`RecipientKey`] expose only their public halves and a method that derives
//! a [`SharedKey`]. Both zeroize the scalar on drop.

use std::fmt;

use p256::{
    ecdh,
    elliptic_curve::sec1::ToEncodedPoint,
    pkcs8::{spki, DecodePrivateKey, DecodePublicKey, EncodePublicKey},
    FieldBytes, PublicKey, SecretKey,
};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

use super::cipher::SharedKey;
use super::random::{EntropyError, RandomSource};
use crate::codec::pem;

/// Byte length of a P-256 scalar.
pub const SCALAR_LEN: usize = 32;

/// Draws tried before giving up on sampling a scalar. A uniformly random
/// 32-byte string is rejected with probability below 2^-32.
const MAX_SCALAR_ATTEMPTS: usize = 16;

/// Errors produced by the key-agreement layer.
#[derive(Debug, Error)]
pub enum AgreementError {
    /// Not a P-256 SubjectPublicKeyInfo, or the point is off-curve / identity.
    #[error("not a valid P-256 SPKI public key: {0}")]
    InvalidPeerKey(spki::Error),

    /// Neither a PKCS#8 nor a SEC1 P-256 private key.
    #[error("not a P-256 PKCS#8 or SEC1 private key")]
    InvalidPrivateKey,

    /// The random source failed while sampling a scalar.
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// Every draw fell outside `[1, n)`.
    #[error("no valid P-256 scalar after {MAX_SCALAR_ATTEMPTS} draws")]
    ScalarRejected,

    /// The public key could not be DER-encoded.
    #[error("failed to encode public key: {0}")]
    PublicKeyEncoding(spki::Error),
}

impl From<AgreementError> for common::EnvelopeError {
    fn from(e: AgreementError) -> Self {
        match e {
            AgreementError::InvalidPeerKey(_) => Self::InvalidPeerKey(e.to_string()),
            AgreementError::InvalidPrivateKey => Self::InvalidPrivateKey(e.to_string()),
            AgreementError::Entropy(_)
            | AgreementError::ScalarRejected
            | AgreementError::PublicKeyEncoding(_) => Self::KeyGenerationFailure(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Public keys
// ---------------------------------------------------------------------------

/// A validated P-256 public point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial {
    key: PublicKey,
}

impl PublicKeyMaterial {
    /// Import a peer's SPKI DER public key.
    ///
    /// The algorithm must be `id-ecPublicKey` on `prime256v1`, and the point
    /// must decode to a non-identity point on the curve. This runs before any
    /// secret is derived, which rules out invalid-curve attacks.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementError::InvalidPeerKey`] otherwise.
    pub fn from_spki_der(der: &[u8]) -> Result<Self, AgreementError> {
        PublicKey::from_public_key_der(der)
            .map(|key| Self { key })
            .map_err(AgreementError::InvalidPeerKey)
    }

    /// SPKI DER with the point in uncompressed form.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementError::PublicKeyEncoding`] if DER encoding fails.
    pub fn to_spki_der(&self) -> Result<Vec<u8>, AgreementError> {
        self.key
            .to_public_key_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(AgreementError::PublicKeyEncoding)
    }

    /// `PUBLIC KEY` PEM text of [`Self::to_spki_der`].
    ///
    /// # Errors
    ///
    /// Returns [`AgreementError::PublicKeyEncoding`] if DER encoding fails.
    pub fn to_pem(&self) -> Result<String, AgreementError> {
        Ok(pem::encode_spki_to_pem(&self.to_spki_der()?))
    }

    /// Lowercase hex SHA-256 of the uncompressed SEC1 point. Public, safe to log.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.key.to_encoded_point(false).as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Ephemeral key pair
// ---------------------------------------------------------------------------

/// Single-use P-256 key pair for one seal.
///
/// [`Self::derive_shared_key`] consumes the pair, so the private scalar takes
/// part in exactly one agreement.
pub struct EphemeralKeyPair {
    secret: SecretKey,
    public: PublicKeyMaterial,
}

impl EphemeralKeyPair {
    /// Generate a fresh key pair from `random`.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementError::Entropy`] if the random source fails and
    /// [`AgreementError::ScalarRejected`] if it never yields a valid scalar.
    pub fn generate<R: RandomSource + ?Sized>(random: &R) -> Result<Self, AgreementError> {
        let secret = sample_secret(random)?;
        let public = PublicKeyMaterial {
            key: secret.public_key(),
        };
        Ok(Self { secret, public })
    }

    /// The public half, sent to the peer inside the envelope.
    pub fn public_key(&self) -> &PublicKeyMaterial {
        &self.public
    }

    /// ECDH with `peer`, bound directly as the AES-256 key.
    pub fn derive_shared_key(self, peer: &PublicKeyMaterial) -> SharedKey {
        agree(&self.secret, peer)
    }
}

impl fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralKeyPair")
            .field("secret", &"[REDACTED]")
            .field("public", &self.public)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Recipient key
// ---------------------------------------------------------------------------

/// Long-term P-256 private key of the party that opens envelopes.
pub struct RecipientKey {
    secret: SecretKey,
}

impl RecipientKey {
    /// Generate an in-memory recipient key from `random`.
    ///
    /// # Errors
    ///
    /// Same as [`EphemeralKeyPair::generate`].
    pub fn generate<R: RandomSource + ?Sized>(random: &R) -> Result<Self, AgreementError> {
        Ok(Self {
            secret: sample_secret(random)?,
        })
    }

    /// Parse a `PRIVATE KEY` (PKCS#8) or `EC PRIVATE KEY` (SEC1) PEM.
    ///
    /// # Errors
    ///
    /// Returns [`AgreementError::InvalidPrivateKey`] if neither form parses
    /// as a P-256 key.
    pub fn from_pem(text: &str) -> Result<Self, AgreementError> {
        SecretKey::from_pkcs8_pem(text)
            .or_else(|_| SecretKey::from_sec1_pem(text))
            .map(|secret| Self { secret })
            .map_err(|_| AgreementError::InvalidPrivateKey)
    }

    /// The matching public key, to hand to senders.
    pub fn public_key(&self) -> PublicKeyMaterial {
        PublicKeyMaterial {
            key: self.secret.public_key(),
        }
    }

    /// ECDH with an envelope's sender key; same binding as the sender side.
    pub fn derive_shared_key(&self, sender: &PublicKeyMaterial) -> SharedKey {
        agree(&self.secret, sender)
    }
}

impl fmt::Debug for RecipientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipientKey")
            .field("secret", &"[REDACTED]")
            .field("fingerprint", &self.public_key().fingerprint())
            .finish()
    }
}

/// Rejection-sample a non-zero scalar below the group order.
fn sample_secret<R: RandomSource + ?Sized>(random: &R) -> Result<SecretKey, AgreementError> {
    let mut candidate = Zeroizing::new([0u8; SCALAR_LEN]);
    for _ in 0..MAX_SCALAR_ATTEMPTS {
        random.fill_bytes(&mut candidate[..])?;
        if let Ok(secret) = SecretKey::from_bytes(&FieldBytes::from(*candidate)) {
            return Ok(secret);
        }
    }
    Err(AgreementError::ScalarRejected)
}

fn agree(secret: &SecretKey, peer: &PublicKeyMaterial) -> SharedKey {
    let shared = ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.key.as_affine());
    SharedKey::from_ecdh(&shared)
}
