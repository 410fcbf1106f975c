//! CLI configuration file.
//!
//! Optional JSON file passed with `--config`. Every field is optional;
//! command-line flags override file values. The file never holds the
//! passphrase itself, only where to find it.
//!
//! ```json
//! {
//!   "private_key": "keys/private.pem",
//!   "keyring": "keys/public.pem",
//!   "payload_out": "payload.yaml",
//!   "passphrase_env": "LABEL_SIGNING_PASS",
//!   "max_document_bytes": 4096,
//!   "label": { "qr": { "level": "medium" } }
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

use labelseal_core::config::SealConfig;
use labelseal_label::LabelConfig;

use crate::io::input;

pub const DEFAULT_PAYLOAD_OUT: &str = "payload.yaml";
pub const DEFAULT_PRIVATE_KEY: &str = "private.pem";
pub const DEFAULT_KEYRING: &str = "public.pem";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub private_key: Option<PathBuf>,
    pub keyring: Option<PathBuf>,
    pub payload_out: Option<PathBuf>,
    pub passphrase_env: Option<String>,
    pub passphrase_file: Option<PathBuf>,
    pub max_document_bytes: Option<usize>,
    pub label: LabelConfig,
}

impl FileConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let value = input::read_json_file(path)?;
        let cfg: FileConfig = serde_json::from_value(value)
            .map_err(|e| anyhow!("invalid config {}: {e}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    pub fn seal_config(&self) -> SealConfig {
        let mut cfg = SealConfig::default();
        if let Some(max) = self.max_document_bytes {
            cfg.limits.max_document_bytes = max;
        }
        cfg
    }

    pub fn private_key_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.private_key.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PRIVATE_KEY))
    }

    pub fn keyring_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.keyring.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KEYRING))
    }

    pub fn payload_out_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.payload_out.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PAYLOAD_OUT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_config_uses_defaults() {
        let cfg: FileConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.private_key_path(None), PathBuf::from(DEFAULT_PRIVATE_KEY));
        assert_eq!(
            cfg.payload_out_path(Some(PathBuf::from("x.yaml"))),
            PathBuf::from("x.yaml")
        );
        assert_eq!(cfg.seal_config().limits.max_document_bytes, 64 * 1024);
    }

    #[test]
    fn nested_label_config_parses() {
        let cfg: FileConfig = serde_json::from_str(
            r#"{"keyring": "ring.pem", "max_document_bytes": 100, "label": {"qr": {"level": "high"}}}"#,
        )
        .unwrap();
        assert_eq!(cfg.keyring_path(None), PathBuf::from("ring.pem"));
        assert_eq!(cfg.label.qr.level, labelseal_label::QrLevel::High);
        assert_eq!(cfg.label.qr.size_px, 512);
        assert_eq!(cfg.seal_config().limits.max_document_bytes, 100);
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(serde_json::from_str::<FileConfig>(r#"{"passphrase": "qwert1234"}"#).is_err());
    }
}
