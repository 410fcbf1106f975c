use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use labelseal_core::credential::Passphrase;

use crate::args::PassphraseArgs;
use crate::config::FileConfig;

pub const DEFAULT_PASSPHRASE_ENV: &str = "LABELSEAL_PASSPHRASE";

pub fn read_text<P: AsRef<Path>>(path: P, what: &str) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("unable to read {what} {}", path.display()))
}

pub fn read_bytes<P: AsRef<Path>>(path: P, what: &str) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).with_context(|| format!("unable to read {what} {}", path.display()))
}

pub fn read_json_file<P: AsRef<Path>>(path: P) -> Result<serde_json::Value> {
    let raw = read_text(path, "config file")?;
    let v: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| anyhow!("invalid json: {e}"))?;
    Ok(v)
}

/// Resolve the signing passphrase.
///
/// Precedence: `--passphrase-file`, `--passphrase-env`, config file
/// `passphrase_file`, config file `passphrase_env`, then the
/// `LABELSEAL_PASSPHRASE` variable. An unset or empty source is an error.
pub fn resolve_passphrase(args: &PassphraseArgs, cfg: &FileConfig) -> Result<Passphrase> {
    let file = args
        .passphrase_file
        .as_ref()
        .or(if args.passphrase_env.is_none() { cfg.passphrase_file.as_ref() } else { None });

    if let Some(path) = file {
        let raw = read_text(path, "passphrase file")?;
        let first = raw.lines().next().unwrap_or("");
        if first.is_empty() {
            return Err(anyhow!("passphrase file {} is empty", path.display()));
        }
        return Ok(Passphrase::new(first));
    }

    let var = args
        .passphrase_env
        .as_deref()
        .or(cfg.passphrase_env.as_deref())
        .unwrap_or(DEFAULT_PASSPHRASE_ENV);

    match std::env::var(var) {
        Ok(v) if !v.is_empty() => Ok(Passphrase::new(v)),
        _ => Err(anyhow!(
            "no passphrase supplied: set {var} or pass --passphrase-file"
        )),
    }
}
