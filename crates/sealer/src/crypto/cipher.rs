//! AES-256-GCM encryption and decryption under a one-time shared key.
//!
//! No associated data. The 128-bit tag is appended to the returned
//! ciphertext, which is the layout every AES-GCM peer expects
//! (`ciphertext || tag`).
//!
//! **Never reuse a [`SharedKey`] for a second message.** Each key is derived
//! from a fresh ephemeral key pair, so a random IV per key is sufficient.

use std::fmt;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use p256::ecdh::SharedSecret;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::random::{EntropyError, RandomSource};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM IV (12 bytes = 96 bits).
pub const IV_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The AEAD engine refused to encrypt.
    #[error("aead encryption failed")]
    EncryptionFailure,

    /// The tag did not verify under this key and IV.
    #[error("aead authentication failed")]
    AuthenticationFailure,
}

impl From<CipherError> for common::EnvelopeError {
    fn from(e: CipherError) -> Self {
        match e {
            CipherError::EncryptionFailure => Self::EncryptionFailure(e.to_string()),
            CipherError::AuthenticationFailure => Self::AuthenticationFailure,
        }
    }
}

/// 256-bit key bound from an ECDH shared secret.
///
/// Never serialised or exported; zeroed when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedKey([u8; KEY_LEN]);

impl SharedKey {
    /// Bind the raw ECDH secret (the shared x-coordinate) as AES key material.
    pub(crate) fn from_ecdh(shared: &SharedSecret) -> Self {
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(shared.raw_secret_bytes());
        let bound = Self(key);
        key.zeroize();
        bound
    }

    #[cfg(test)]
    pub(crate) fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedKey([REDACTED])")
    }
}

/// Draw a fresh IV from `random`.
///
/// # Errors
///
/// Returns [`EntropyError`] if the random source is unavailable.
pub fn generate_iv<R: RandomSource + ?Sized>(random: &R) -> Result<[u8; IV_LEN], EntropyError> {
    let mut iv = [0u8; IV_LEN];
    random.fill_bytes(&mut iv)?;
    Ok(iv)
}

/// Encrypt `plaintext`, returning `ciphertext || tag`.
///
/// Deterministic for identical `(key, iv, plaintext)`.
///
/// # Errors
///
/// Returns [`CipherError::EncryptionFailure`] on an internal AEAD error (not
/// reachable for inputs shorter than the GCM length limit).
pub fn encrypt(
    key: &SharedKey,
    iv: &[u8; IV_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    build_cipher(key)
        .encrypt(&Nonce::from(*iv), plaintext)
        .map_err(|_| CipherError::EncryptionFailure)
}

/// Verify the tag and decrypt `ciphertext || tag`.
///
/// # Errors
///
/// Returns [`CipherError::AuthenticationFailure`] if the input is shorter than
/// a tag or the tag does not verify. No plaintext is released in that case.
pub fn decrypt(
    key: &SharedKey,
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    build_cipher(key)
        .decrypt(&Nonce::from(*iv), ciphertext)
        .map_err(|_| CipherError::AuthenticationFailure)
}

fn build_cipher(key: &SharedKey) -> Aes256Gcm {
    Aes256Gcm::new(&Key::<Aes256Gcm>::from(*key.as_bytes()))
}
