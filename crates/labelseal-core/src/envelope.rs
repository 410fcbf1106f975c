//! The `x_sig` signed envelope.
//!
//! Wire format (bit exact):
//!
//! ```text
//! <canonical document, no leading/trailing whitespace>
//! x_sig: <base64 of the raw detached signature>
//! ```
//!
//! followed by exactly one trailing newline.
//!
//! Signing:
//! 1. trim the document
//! 2. sha256 over the trimmed bytes
//! 3. lowercase hex text of the digest
//! 4. detached signature over that hex text (the text, not the raw digest)
//! 5. append `\nx_sig: <base64>\n`
//!
//! Verification splits on the first `\nx_sig: `, recomputes the hex digest
//! over the document part exactly as written (no re-trimming) and checks the
//! signature against every key of the keyring.
//!
//! A document that itself contains `\nx_sig: ` would make the split
//! ambiguous. The encoder refuses such documents; the decoder refuses any
//! envelope in which the separator occurs more than once.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::Signature;
use tracing::debug;

use crate::config::{validate_config, SealConfig};
use crate::credential::{Keyring, PrivateCredential};
use crate::digest::{digest_hex, HashAlg};
use crate::errors::{SealError, SealResult};
use crate::{SEPARATOR, SIGNATURE_FIELD};

/// Canonical form of a claims document: leading/trailing whitespace removed.
pub fn canonicalize(document: &str) -> &str {
    document.trim()
}

/// A document together with its detached signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    document: Vec<u8>,
    signature: Vec<u8>,
}

/// Outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    /// The verified document bytes, exactly as they appear in the envelope.
    pub document: Vec<u8>,
    /// Lowercase hex digest that the signature covers.
    pub digest_hex: String,
    /// Fingerprint of the keyring entry that validated the signature.
    pub signer: String,
}

impl VerifyResult {
    pub fn document_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.document).ok()
    }
}

impl SignedEnvelope {
    /// Split an envelope into document and raw signature bytes.
    ///
    /// Performs no cryptographic check.
    pub fn parse(envelope: &[u8]) -> SealResult<Self> {
        let sep = SEPARATOR.as_bytes();

        let at = find(envelope, sep)
            .ok_or_else(|| SealError::malformed(format!("missing {SIGNATURE_FIELD} field")))?;
        let document = &envelope[..at];
        let tail = &envelope[at + sep.len()..];

        if find(tail, sep).is_some() {
            return Err(SealError::malformed(format!(
                "{SIGNATURE_FIELD} separator occurs more than once"
            )));
        }

        let signature_text = std::str::from_utf8(tail)
            .map_err(|_| SealError::malformed("signature is not ASCII text"))?
            .trim_end();
        if signature_text.is_empty() {
            return Err(SealError::malformed("signature is empty"));
        }

        let signature = BASE64
            .decode(signature_text)
            .map_err(|e| SealError::malformed(format!("signature is not valid base64: {e}")))?;

        Ok(Self {
            document: document.to_vec(),
            signature,
        })
    }

    pub fn document(&self) -> &[u8] {
        &self.document
    }

    pub fn document_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.document).ok()
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Base64 text of the signature as it appears after `x_sig: `.
    pub fn signature_b64(&self) -> String {
        BASE64.encode(&self.signature)
    }

    /// Serialize to the wire format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let sig = self.signature_b64();
        let mut out = Vec::with_capacity(self.document.len() + SEPARATOR.len() + sig.len() + 1);
        out.extend_from_slice(&self.document);
        out.extend_from_slice(SEPARATOR.as_bytes());
        out.extend_from_slice(sig.as_bytes());
        out.push(b'\n');
        out
    }

    /// Serialize to the wire format as text.
    pub fn to_text(&self) -> SealResult<String> {
        String::from_utf8(self.to_bytes())
            .map_err(|_| SealError::invalid_document("document is not valid UTF-8"))
    }

    /// Verify the embedded signature against `keyring`.
    pub fn verify(&self, keyring: &Keyring, alg: HashAlg) -> SealResult<VerifyResult> {
        let signature = Signature::from_slice(&self.signature).map_err(|_| {
            SealError::malformed(format!(
                "signature has {} bytes, expected {}",
                self.signature.len(),
                Signature::BYTE_SIZE
            ))
        })?;

        let digest = digest_hex(alg, &self.document);
        let signer = keyring
            .verify_detached(digest.as_bytes(), &signature)
            .ok_or_else(|| {
                SealError::verification_failed(format!(
                    "no key in keyring ({} key(s)) validates the signature",
                    keyring.key_count()
                ))
            })?;

        debug!(digest = %digest, signer = %signer, "envelope verified");
        Ok(VerifyResult {
            document: self.document.clone(),
            digest_hex: digest,
            signer,
        })
    }
}

/// Sign a claims document with an unlocked credential.
pub fn sign_document(
    document: &str,
    credential: &PrivateCredential,
    cfg: &SealConfig,
) -> SealResult<SignedEnvelope> {
    validate_config(cfg)?;

    let canonical = canonicalize(document);
    if canonical.is_empty() {
        return Err(SealError::invalid_document("document is empty"));
    }
    if canonical.len() > cfg.limits.max_document_bytes {
        return Err(SealError::invalid_document(format!(
            "document is {} bytes, limit is {}",
            canonical.len(),
            cfg.limits.max_document_bytes
        )));
    }
    if canonical.contains(SEPARATOR) {
        return Err(SealError::invalid_document(format!(
            "document already contains a {SIGNATURE_FIELD} line"
        )));
    }

    let digest = digest_hex(cfg.hashing.algorithm, canonical.as_bytes());
    let signature = credential.sign_detached(digest.as_bytes())?;

    debug!(digest = %digest, signer = %credential.fingerprint(), "document signed");
    Ok(SignedEnvelope {
        document: canonical.as_bytes().to_vec(),
        signature,
    })
}

/// Parse and verify an envelope in one step.
pub fn verify_envelope(
    envelope: &[u8],
    keyring: &Keyring,
    cfg: &SealConfig,
) -> SealResult<VerifyResult> {
    SignedEnvelope::parse(envelope)?.verify(keyring, cfg.hashing.algorithm)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{KeyPair, Passphrase};
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    const SCENARIO: &str = "r_person: Alice\nr_address: 1 Main St\n";

    fn seal(doc: &str, kp: &KeyPair) -> Vec<u8> {
        sign_document(doc, &kp.credential(), &SealConfig::default())
            .unwrap()
            .to_bytes()
    }

    #[test]
    fn scenario_signs_and_verifies() {
        let kp = KeyPair::generate();
        let env = seal(SCENARIO, &kp);

        let text = String::from_utf8(env.clone()).unwrap();
        assert!(text.starts_with("r_person: Alice\nr_address: 1 Main St\nx_sig: "));
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 3);

        let res = verify_envelope(&env, &kp.keyring(), &SealConfig::default()).unwrap();
        assert_eq!(res.document_str(), Some("r_person: Alice\nr_address: 1 Main St"));
        assert_eq!(res.signer, kp.fingerprint());
        assert_eq!(res.digest_hex, digest_hex(HashAlg::Sha256, res.document.as_slice()));
    }

    #[test]
    fn scenario_rejected_by_unrelated_keyring() {
        let kp = KeyPair::generate();
        let env = seal(SCENARIO, &kp);
        let other = KeyPair::generate();
        let err = verify_envelope(&env, &other.keyring(), &SealConfig::default()).unwrap_err();
        assert_matches!(err, SealError::VerificationFailed(_));
    }

    #[test]
    fn signature_is_over_hex_text_not_raw_digest() {
        let kp = KeyPair::generate();
        let env = SignedEnvelope::parse(&seal("a: b", &kp)).unwrap();
        let sig = Signature::from_slice(env.signature()).unwrap();

        let hex_text = digest_hex(HashAlg::Sha256, b"a: b");
        let raw = crate::digest::hash_bytes(HashAlg::Sha256, b"a: b");
        assert!(kp.keyring().verify_detached(hex_text.as_bytes(), &sig).is_some());
        assert!(kp.keyring().verify_detached(&raw, &sig).is_none());
    }

    #[test]
    fn missing_separator_is_malformed() {
        let kp = KeyPair::generate();
        let err = verify_envelope(b"r_person: Alice\n", &kp.keyring(), &SealConfig::default())
            .unwrap_err();
        assert_matches!(err, SealError::MalformedEnvelope(_));
    }

    #[test]
    fn duplicate_separator_is_malformed() {
        let kp = KeyPair::generate();
        let env = seal("a: b", &kp);
        let mut twice = b"a: c\nx_sig: AAAA\n".to_vec();
        twice.extend_from_slice(&env);
        assert_matches!(SignedEnvelope::parse(&twice), Err(SealError::MalformedEnvelope(_)));
    }

    #[test]
    fn bad_base64_is_malformed() {
        assert_matches!(
            SignedEnvelope::parse(b"a: b\nx_sig: not*base64!\n"),
            Err(SealError::MalformedEnvelope(_))
        );
        assert_matches!(
            SignedEnvelope::parse(b"a: b\nx_sig: \n"),
            Err(SealError::MalformedEnvelope(_))
        );
    }

    #[test]
    fn short_signature_is_malformed() {
        let kp = KeyPair::generate();
        let env = SignedEnvelope::parse(b"a: b\nx_sig: AAAA\n").unwrap();
        assert_matches!(
            env.verify(&kp.keyring(), HashAlg::Sha256),
            Err(SealError::MalformedEnvelope(_))
        );
    }

    #[test]
    fn document_containing_marker_is_refused() {
        let kp = KeyPair::generate();
        let doc = "a: b\nx_sig: forged\nc: d";
        let err = sign_document(doc, &kp.credential(), &SealConfig::default()).unwrap_err();
        assert_matches!(err, SealError::InvalidDocument(_));
    }

    #[test]
    fn empty_and_oversized_documents_are_refused() {
        let kp = KeyPair::generate();
        assert_matches!(
            sign_document(" \n\t ", &kp.credential(), &SealConfig::default()),
            Err(SealError::InvalidDocument(_))
        );

        let mut cfg = SealConfig::default();
        cfg.limits.max_document_bytes = 4;
        assert_matches!(
            sign_document("a: bcd", &kp.credential(), &cfg),
            Err(SealError::InvalidDocument(_))
        );
    }

    #[test]
    fn crlf_trailer_is_accepted() {
        let kp = KeyPair::generate();
        let mut env = seal("a: b", &kp);
        env.pop();
        env.extend_from_slice(b"\r\n");
        verify_envelope(&env, &kp.keyring(), &SealConfig::default()).unwrap();
    }

    #[test]
    fn armored_key_path_signs() {
        let kp = KeyPair::generate();
        let pass = Passphrase::new("qwert1234");
        let pem = kp.to_encrypted_pem(&pass, 1_000).unwrap();

        let cred = PrivateCredential::from_encrypted_pem(&pem, &pass).unwrap();
        let env = sign_document(SCENARIO, &cred, &SealConfig::default()).unwrap();
        verify_envelope(&env.to_bytes(), &kp.keyring(), &SealConfig::default()).unwrap();
    }

    fn document() -> impl Strategy<Value = String> {
        "[a-w_]{1,8}: [A-Za-z0-9 ]{0,20}(\n[a-w_]{1,8}: [A-Za-z0-9 ]{0,20}){0,4}"
    }

    proptest! {
        #[test]
        fn round_trip_verifies(doc in document()) {
            let kp = KeyPair::generate();
            let env = seal(&doc, &kp);
            let res = verify_envelope(&env, &kp.keyring(), &SealConfig::default()).unwrap();
            prop_assert_eq!(res.document_str(), Some(doc.trim()));
        }

        #[test]
        fn whitespace_is_normalized(doc in document(), lead in "[ \t\n]{0,3}", trail in "[ \t\n]{0,3}") {
            let kp = KeyPair::generate();
            let padded = format!("{lead}{doc}{trail}");
            let a = SignedEnvelope::parse(&seal(&padded, &kp)).unwrap();
            let b = SignedEnvelope::parse(&seal(&doc, &kp)).unwrap();
            prop_assert_eq!(a.document(), b.document());
        }

        #[test]
        fn document_tamper_is_detected(doc in document(), pick in any::<prop::sample::Index>()) {
            let kp = KeyPair::generate();
            let mut env = seal(&doc, &kp);
            let doc_len = doc.trim().len();
            let i = pick.index(doc_len);
            env[i] = if env[i] == b'#' { b'%' } else { b'#' };

            let err = verify_envelope(&env, &kp.keyring(), &SealConfig::default()).unwrap_err();
            prop_assert!(matches!(err, SealError::VerificationFailed(_)));
        }

        #[test]
        fn signature_tamper_is_detected(doc in document(), pick in any::<prop::sample::Index>()) {
            let kp = KeyPair::generate();
            let env = seal(&doc, &kp);
            let text = String::from_utf8(env).unwrap();
            let at = text.find(SEPARATOR).unwrap() + SEPARATOR.len();
            let sig_len = text.len() - 1 - at;

            let mut bytes = text.into_bytes();
            let i = at + pick.index(sig_len);
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };

            let err = verify_envelope(&bytes, &kp.keyring(), &SealConfig::default()).unwrap_err();
            prop_assert!(matches!(
                err,
                SealError::VerificationFailed(_) | SealError::MalformedEnvelope(_)
            ));
        }
    }
}
