//! labelseal-core
//!
//! Core primitives for labelseal:
//! - the `x_sig` signed envelope (encode, split, verify)
//! - content digests over canonical claims documents
//! - passphrase-protected Ed25519 signing credentials and public keyrings
//! - flat claims extraction for label rendering
//!
//! The core performs no filesystem or network I/O and reads no environment.
//! Callers pass document bytes, key material and passphrases in explicitly.

pub mod config;
pub mod credential;
pub mod digest;
pub mod envelope;
pub mod errors;

#[cfg(feature = "claims")]
pub mod claims;

pub use crate::errors::{SealError, SealResult};

/// Name of the YAML field that carries the signature.
pub const SIGNATURE_FIELD: &str = "x_sig";

/// Literal separator between the document and the signature line.
///
/// Must occur exactly once in a well-formed envelope.
pub const SEPARATOR: &str = "\nx_sig: ";
