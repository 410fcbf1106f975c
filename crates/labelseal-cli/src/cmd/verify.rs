use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use labelseal_core::credential::Keyring;
use labelseal_core::envelope::verify_envelope;

use crate::config::FileConfig;
use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct VerifyOut {
    pub ok: bool,
    pub alg: &'static str,
    pub digest: String,
    pub signer: String,
    pub document: String,
}

pub fn run(cfg: &FileConfig, payload_path: &Path, keyring: Option<PathBuf>) -> Result<()> {
    let keyring_path = cfg.keyring_path(keyring);

    let payload = input::read_bytes(payload_path, "payload")?;
    let armored = input::read_text(&keyring_path, "keyring")?;
    let keyring = Keyring::from_armored(&armored)
        .with_context(|| format!("unable to load {}", keyring_path.display()))?;
    tracing::debug!(keys = keyring.key_count(), "keyring loaded");

    let seal_cfg = cfg.seal_config();
    let result = verify_envelope(&payload, &keyring, &seal_cfg)?;
    let document = String::from_utf8_lossy(&result.document).into_owned();

    if output::is_json() {
        return output::print(&VerifyOut {
            ok: true,
            alg: seal_cfg.hashing.algorithm.as_str(),
            digest: result.digest_hex,
            signer: result.signer,
            document,
        });
    }

    output::status(true, &format!("signature valid (signer {})", result.signer));
    println!("{document}");
    Ok(())
}
