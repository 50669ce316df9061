//! Hybrid public-key encryption for text-only channels.
//!
//! A sender holding only the recipient's PEM public key produces an
//! [`Envelope`]: a fresh P-256 key pair is generated, ECDH with the recipient
//! key yields a one-time AES-256-GCM key, and the message is encrypted under a
//! random 96-bit IV. The envelope carries the IV, the ciphertext (tag
//! appended) and the sender's ephemeral public key, all as text.
//!
//! ```text
//! seal:  PEM ─▶ SPKI ─▶ peer key ─┐
//!        random ─▶ ephemeral pair ─┴─▶ ECDH x-coordinate ─▶ AES-256-GCM ─▶ base64url
//! ```
//!
//! - [`codec`]: base64url and PEM/SPKI text codecs.
//! - [`crypto`]: random source, key agreement, AEAD cipher.
//! - [`envelope`]: [`Sealer::seal`] and its counterpart [`open`].

pub mod codec;
pub mod crypto;
pub mod envelope;

pub use common::{Envelope, EnvelopeError, FORMAT_VERSION};
pub use crypto::agreement::{PublicKeyMaterial, RecipientKey};
pub use crypto::random::{RandomSource, SystemRandom};
pub use envelope::{open, Sealer};
