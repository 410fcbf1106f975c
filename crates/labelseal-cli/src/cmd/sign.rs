use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use labelseal_core::claims::{Claims, LabelFields};
use labelseal_core::credential::PrivateCredential;
use labelseal_core::digest::digest_hex;
use labelseal_core::envelope::sign_document;

use crate::args::PassphraseArgs;
use crate::config::FileConfig;
use crate::io::{export, input};
use crate::output;

/// Paths given on the command line; unset ones fall back to the config file.
pub struct Outputs {
    pub key: Option<PathBuf>,
    pub payload: Option<PathBuf>,
    pub qr: Option<PathBuf>,
    pub label: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct SignOut {
    pub payload: String,
    pub bytes: usize,
    pub alg: &'static str,
    pub digest: String,
    pub signer: String,
    pub qr: Option<String>,
    pub label: Option<String>,
}

pub fn run(
    cfg: &FileConfig,
    claims_path: &Path,
    outputs: Outputs,
    passphrase: &PassphraseArgs,
) -> Result<()> {
    let seal_cfg = cfg.seal_config();
    let key_path = cfg.private_key_path(outputs.key);
    let payload_path = cfg.payload_out_path(outputs.payload);

    let document = input::read_text(claims_path, "claims")?;
    let key_pem = input::read_text(&key_path, "private key")?;
    let pass = input::resolve_passphrase(passphrase, cfg)?;

    let credential = PrivateCredential::from_encrypted_pem(&key_pem, &pass)
        .with_context(|| format!("unable to load {}", key_path.display()))?;
    let envelope = sign_document(&document, &credential, &seal_cfg)?;
    let text = envelope.to_text()?;

    // Render everything before writing anything.
    let qr_svg = match &outputs.qr {
        Some(_) => Some(labelseal_label::render_qr_svg(&text, &cfg.label.qr)?),
        None => None,
    };
    let label_svg = match &outputs.label {
        Some(_) => {
            let canonical = envelope.document_str().unwrap_or_default();
            let fields = LabelFields::from_claims(&Claims::parse(canonical)?)?;
            Some(labelseal_label::render_label_svg(&text, &fields, &cfg.label)?)
        }
        None => None,
    };

    // The payload goes last; anything written before a failed write is removed.
    let mut pending: Vec<(&Path, &[u8])> = Vec::new();
    if let (Some(path), Some(svg)) = (&outputs.qr, &qr_svg) {
        pending.push((path.as_path(), svg.as_bytes()));
    }
    if let (Some(path), Some(svg)) = (&outputs.label, &label_svg) {
        pending.push((path.as_path(), svg.as_bytes()));
    }
    pending.push((payload_path.as_path(), text.as_bytes()));
    write_all_or_nothing(&pending)?;

    let digest = digest_hex(seal_cfg.hashing.algorithm, envelope.document());
    tracing::info!(payload = %payload_path.display(), digest = %digest, "payload signed");

    output::print(&SignOut {
        payload: payload_path.display().to_string(),
        bytes: text.len(),
        alg: seal_cfg.hashing.algorithm.as_str(),
        digest,
        signer: credential.fingerprint(),
        qr: outputs.qr.map(|p| p.display().to_string()),
        label: outputs.label.map(|p| p.display().to_string()),
    })
}

fn write_all_or_nothing(files: &[(&Path, &[u8])]) -> Result<()> {
    for (i, (path, bytes)) in files.iter().enumerate() {
        if let Err(e) = export::write_atomic(path, bytes) {
            for (written, _) in &files[..i] {
                if let Err(rm) = std::fs::remove_file(written) {
                    tracing::warn!(path = %written.display(), error = %rm, "unable to remove partial output");
                }
            }
            return Err(e);
        }
    }
    Ok(())
}
