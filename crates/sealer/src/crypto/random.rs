//! Secure random capability injected into key generation and IV drawing.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use thiserror::Error;

/// The random source could not deliver bytes.
#[derive(Debug, Error)]
#[error("secure random source unavailable")]
pub struct EntropyError;

impl From<EntropyError> for common::EnvelopeError {
    fn from(e: EntropyError) -> Self {
        Self::KeyGenerationFailure(e.to_string())
    }
}

/// Source of cryptographically secure random bytes.
///
/// Implementations must be safe to share between concurrent invocations and
/// must never be backed by a non-cryptographic generator outside of tests.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    /// Fill `dest` entirely with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        OsRng.try_fill_bytes(dest).map_err(|_| EntropyError)
    }
}

/// Deterministic sources for tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicU64, Ordering};

    use sha2::{Digest, Sha256};

    use super::{EntropyError, RandomSource};

    /// Expands a seed as `SHA-256(seed || counter)` blocks. Same seed, same stream.
    pub(crate) struct SeededRandom {
        seed: [u8; 32],
        counter: AtomicU64,
    }

    impl SeededRandom {
        pub(crate) fn new(seed: u64) -> Self {
            Self {
                seed: Sha256::digest(seed.to_be_bytes()).into(),
                counter: AtomicU64::new(0),
            }
        }
    }

    impl RandomSource for SeededRandom {
        fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
            for chunk in dest.chunks_mut(32) {
                let n = self.counter.fetch_add(1, Ordering::Relaxed);
                let block = Sha256::new()
                    .chain_update(self.seed)
                    .chain_update(n.to_be_bytes())
                    .finalize();
                chunk.copy_from_slice(&block[..chunk.len()]);
            }
            Ok(())
        }
    }
}
