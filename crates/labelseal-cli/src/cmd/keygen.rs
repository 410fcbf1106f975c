use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use labelseal_core::credential::{KeyPair, DEFAULT_KDF_ITERATIONS};

use crate::args::PassphraseArgs;
use crate::config::{FileConfig, DEFAULT_KEYRING, DEFAULT_PRIVATE_KEY};
use crate::io::{export, input};
use crate::output;

#[derive(Debug, Serialize)]
pub struct KeygenOut {
    pub private_key: String,
    pub public_key: String,
    pub fingerprint: String,
}

pub fn run(
    cfg: &FileConfig,
    out_dir: &Path,
    kdf_iterations: Option<u32>,
    force: bool,
    passphrase: &PassphraseArgs,
) -> Result<()> {
    let private_path = out_dir.join(DEFAULT_PRIVATE_KEY);
    let public_path = out_dir.join(DEFAULT_KEYRING);

    if !force {
        for p in [&private_path, &public_path] {
            if p.exists() {
                bail!("{} already exists (use --force to overwrite)", p.display());
            }
        }
    }

    let pass = input::resolve_passphrase(passphrase, cfg)?;
    let kp = KeyPair::generate();
    let iterations = kdf_iterations.unwrap_or(DEFAULT_KDF_ITERATIONS);
    let private_pem = kp.to_encrypted_pem(&pass, iterations)?;
    let public_pem = kp.public_pem()?;

    export::write_private(&private_path, private_pem.as_bytes())?;
    export::write_atomic(&public_path, public_pem.as_bytes())?;
    tracing::info!(fingerprint = %kp.fingerprint(), "key pair generated");

    output::print(&KeygenOut {
        private_key: private_path.display().to_string(),
        public_key: public_path.display().to_string(),
        fingerprint: kp.fingerprint(),
    })
}
