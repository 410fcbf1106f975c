//! Error types for labelseal-core.
//!
//! Every failure is terminal for the operation in progress. Nothing in the core
//! retries; callers decide whether to prompt, retry or abort.
//!
//! `MalformedEnvelope` ("could not parse") and `VerificationFailed` ("parsed,
//! but the signature is not valid") are kept apart on purpose: they call for
//! different remediation.

use thiserror::Error;

pub type SealResult<T> = Result<T, SealError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SealError {
    /// The document cannot be signed (empty, too large, contains the marker).
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Bad key material or wrong passphrase.
    #[error("credential error: {0}")]
    Credential(String),

    /// Failure inside the signing primitive.
    #[error("signing error: {0}")]
    Signing(String),

    /// Structural parse failure: missing/duplicate marker, bad base64.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Well-formed envelope whose signature does not check out.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Claims could not be read or a required field is missing.
    #[error("claims error: {0}")]
    Claims(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SealError {
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    pub fn credential(msg: impl Into<String>) -> Self {
        Self::Credential(msg.into())
    }

    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedEnvelope(msg.into())
    }

    pub fn verification_failed(msg: impl Into<String>) -> Self {
        Self::VerificationFailed(msg.into())
    }

    pub fn claims(msg: impl Into<String>) -> Self {
        Self::Claims(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Stable machine-readable code for this error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDocument(_) => "invalid_document",
            Self::Credential(_) => "credential_error",
            Self::Signing(_) => "signing_error",
            Self::MalformedEnvelope(_) => "malformed_envelope",
            Self::VerificationFailed(_) => "verification_failed",
            Self::Claims(_) => "claims_error",
            Self::InvalidArgument(_) => "invalid_argument",
        }
    }
}
