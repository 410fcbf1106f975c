//! Configuration structures for labelseal-core.
//!
//! The core crate does not read environment variables or files. The CLI builds
//! these objects from flags and its config file and passes them in.
//!
//! Secrets are not part of this configuration: the signing passphrase is
//! supplied separately as a [`crate::credential::Passphrase`] and has no
//! default.

use crate::digest::HashAlg;
use crate::errors::{SealError, SealResult};

/// Global configuration container.
#[derive(Debug, Clone, Default)]
pub struct SealConfig {
    pub hashing: HashingConfig,
    pub limits: LimitsConfig,
}

/// Hashing-related configuration.
///
/// Signer and verifier must use the same algorithm; the envelope does not
/// record it.
#[derive(Debug, Clone, Default)]
pub struct HashingConfig {
    pub algorithm: HashAlg,
}

/// Size limits.
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// Maximum canonical document size accepted for signing.
    pub max_document_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: 64 * 1024,
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &SealConfig) -> SealResult<()> {
    if cfg.limits.max_document_bytes == 0 {
        return Err(SealError::invalid_argument(
            "max_document_bytes must be greater than zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SealConfig::default();
        validate_config(&cfg).unwrap();
        assert_eq!(cfg.hashing.algorithm, HashAlg::Sha256);
    }

    #[test]
    fn zero_limit_detected() {
        let mut cfg = SealConfig::default();
        cfg.limits.max_document_bytes = 0;
        assert!(validate_config(&cfg).is_err());
    }
}
