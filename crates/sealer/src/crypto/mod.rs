//! Cryptographic primitives behind an envelope.
//!
//! - [`random`]: the injected secure-random capability. Every key pair and
//!   IV is drawn through a [`random::RandomSource`], never from ambient state.
//! - [`agreement`]: P-256 key pairs, SPKI import, ECDH.
//! - [`cipher`]: AES-256-GCM over the shared key.
//!
//! # Key binding
//!
//! The AES-256 key is the 32-byte big-endian x-coordinate of the ECDH shared
//! point, with no KDF in between. This matches the WebCrypto
//! `deriveKey(ECDH → AES-GCM/256)` rule used by existing peers. The envelope
//! version tag is what allows a KDF-based format to be introduced later.
//!
//! This module is free of I/O, logging of secrets, and serialisation.

pub mod agreement;
pub mod cipher;
pub mod random;

pub use cipher::{IV_LEN, KEY_LEN, TAG_LEN};
