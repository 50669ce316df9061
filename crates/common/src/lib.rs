//! Envelope wire format and error types shared across `sealer` crates.
//!
//! This crate carries no cryptographic dependencies: it only describes what
//! crosses the system boundary.

pub mod error;
pub mod protocol;

pub use error::EnvelopeError;
pub use protocol::{Envelope, ErrorReport, FORMAT_VERSION};
