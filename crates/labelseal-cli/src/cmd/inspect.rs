use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use labelseal_core::claims::Claims;
use labelseal_core::digest::digest_hex;
use labelseal_core::envelope::SignedEnvelope;

use crate::config::FileConfig;
use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct InspectOut {
    pub verified: bool,
    pub digest: String,
    pub signature_bytes: usize,
    pub claims: Option<Claims>,
    pub claims_error: Option<String>,
}

/// Parse only. Nothing here says the payload is authentic.
pub fn run(cfg: &FileConfig, payload_path: &Path) -> Result<()> {
    let payload = input::read_bytes(payload_path, "payload")?;
    let envelope = SignedEnvelope::parse(&payload)?;

    let digest = digest_hex(cfg.seal_config().hashing.algorithm, envelope.document());
    let (claims, claims_error) = match envelope.document_str().map(Claims::parse) {
        Some(Ok(c)) => (Some(c), None),
        Some(Err(e)) => (None, Some(e.to_string())),
        None => (None, Some("document is not valid UTF-8".to_string())),
    };

    output::print(&InspectOut {
        verified: false,
        digest,
        signature_bytes: envelope.signature().len(),
        claims,
        claims_error,
    })
}
