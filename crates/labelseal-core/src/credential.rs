//! Signing credentials and verification keyrings.
//!
//! Key material is Ed25519 in armored PKCS#8 form:
//! - private credential: `ENCRYPTED PRIVATE KEY` PEM (PBES2, PBKDF2-SHA256 +
//!   AES-256-CBC), unlocked with a caller-supplied [`Passphrase`]
//! - keyring: one or more `PUBLIC KEY` (SPKI) PEM blocks in a single text;
//!   any of them may validate a signature
//!
//! Signatures produced here are detached: raw 64-byte Ed25519 signatures with
//! no wrapper or cleartext armor.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use pkcs8::pkcs5::pbes2;
use pkcs8::spki;
use pkcs8::{
    DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding,
    PrivateKeyInfo,
};
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::errors::{SealError, SealResult};

const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";
const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
const PUBLIC_KEY_BEGIN: &str = "-----BEGIN PUBLIC KEY-----";
const PUBLIC_KEY_END: &str = "-----END PUBLIC KEY-----";

/// PBKDF2 iteration count used by `keygen` unless overridden.
pub const DEFAULT_KDF_ITERATIONS: u32 = 600_000;

/// Passphrase that unlocks a private credential.
///
/// Always injected by the caller; there is no default. Debug output is
/// redacted and the inner string is zeroized on drop.
pub struct Passphrase(SecretString);

impl Passphrase {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::new(value.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(***)")
    }
}

/// Short fingerprint of a verification key: first 8 bytes, hex.
pub fn fingerprint(key: &VerifyingKey) -> String {
    hex::encode(&key.to_bytes()[..8])
}

/// Unlocked private signing credential.
pub struct PrivateCredential {
    signing_key: SigningKey,
}

impl fmt::Debug for PrivateCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateCredential")
            .field("signing_key", &"***SECRET***")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl PrivateCredential {
    /// Decrypt an armored, passphrase-protected PKCS#8 key.
    ///
    /// Unencrypted `PRIVATE KEY` blocks are refused.
    pub fn from_encrypted_pem(pem: &str, passphrase: &Passphrase) -> SealResult<Self> {
        match pem_label(pem) {
            Some(ENCRYPTED_PRIVATE_KEY_LABEL) => {}
            Some(PRIVATE_KEY_LABEL) => {
                return Err(SealError::credential(
                    "private key is not passphrase-protected",
                ))
            }
            Some(other) => {
                return Err(SealError::credential(format!(
                    "unexpected PEM block: {other}"
                )))
            }
            None => return Err(SealError::credential("no PEM block found")),
        }

        let signing_key = SigningKey::from_pkcs8_encrypted_pem(pem, passphrase.as_bytes())
            .map_err(|e| {
                SealError::credential(format!("unable to unlock private key: {e}"))
            })?;
        Ok(Self { signing_key })
    }

    /// Produce a detached signature over `message`.
    pub fn sign_detached(&self, message: &[u8]) -> SealResult<Vec<u8>> {
        let sig: Signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| SealError::signing(e.to_string()))?;
        Ok(sig.to_bytes().to_vec())
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(&self.signing_key.verifying_key())
    }
}

/// Set of public keys accepted by the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyring {
    keys: Vec<VerifyingKey>,
}

impl Keyring {
    pub fn new(keys: Vec<VerifyingKey>) -> SealResult<Self> {
        if keys.is_empty() {
            return Err(SealError::credential("keyring contains no public keys"));
        }
        Ok(Self { keys })
    }

    /// Parse every `PUBLIC KEY` block in an armored text.
    ///
    /// Blocks with other labels are skipped, as are public keys of another
    /// algorithm. A block that is not a valid public key at all is an error.
    pub fn from_armored(text: &str) -> SealResult<Self> {
        let mut keys = Vec::new();
        let mut rest = text;
        let mut index = 0usize;

        while let Some(start) = rest.find(PUBLIC_KEY_BEGIN) {
            let block = &rest[start..];
            let end = block
                .find(PUBLIC_KEY_END)
                .ok_or_else(|| SealError::credential("unterminated PUBLIC KEY block"))?
                + PUBLIC_KEY_END.len();
            index += 1;

            match VerifyingKey::from_public_key_pem(&block[..end]) {
                Ok(key) => keys.push(key),
                Err(spki::Error::OidUnknown { oid }) => {
                    debug!(block = index, %oid, "skipping non-Ed25519 public key");
                }
                Err(e) => {
                    return Err(SealError::credential(format!(
                        "invalid public key #{index}: {e}"
                    )))
                }
            }
            rest = &block[end..];
        }

        Self::new(keys)
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn fingerprints(&self) -> Vec<String> {
        self.keys.iter().map(fingerprint).collect()
    }

    /// Check a detached signature against each key in turn.
    ///
    /// Returns the fingerprint of the first key that validates.
    pub fn verify_detached(&self, message: &[u8], signature: &Signature) -> Option<String> {
        self.keys
            .iter()
            .find(|k| k.verify_strict(message, signature).is_ok())
            .map(fingerprint)
    }

    /// Armor all keys as concatenated `PUBLIC KEY` blocks.
    pub fn to_armored(&self) -> SealResult<String> {
        let mut out = String::new();
        for key in &self.keys {
            let pem = key
                .to_public_key_pem(LineEnding::LF)
                .map_err(|e| SealError::credential(format!("unable to encode public key: {e}")))?;
            out.push_str(&pem);
        }
        Ok(out)
    }
}

/// Freshly generated key pair, used by `keygen` and in tests.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn credential(&self) -> PrivateCredential {
        PrivateCredential {
            signing_key: self.signing_key.clone(),
        }
    }

    pub fn keyring(&self) -> Keyring {
        Keyring {
            keys: vec![self.signing_key.verifying_key()],
        }
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(&self.signing_key.verifying_key())
    }

    pub fn public_pem(&self) -> SealResult<String> {
        self.keyring().to_armored()
    }

    /// Armor the private key as an `ENCRYPTED PRIVATE KEY` block.
    pub fn to_encrypted_pem(
        &self,
        passphrase: &Passphrase,
        kdf_iterations: u32,
    ) -> SealResult<String> {
        if passphrase.is_empty() {
            return Err(SealError::credential("passphrase must not be empty"));
        }
        if kdf_iterations == 0 {
            return Err(SealError::invalid_argument(
                "kdf_iterations must be greater than zero",
            ));
        }

        let mut salt = [0u8; 16];
        let mut iv = [0u8; 16];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut iv);

        let params = pbes2::Parameters::pbkdf2_sha256_aes256cbc(kdf_iterations, &salt, &iv)
            .map_err(|e| SealError::credential(format!("invalid kdf parameters: {e}")))?;

        let der = self
            .signing_key
            .to_pkcs8_der()
            .map_err(|e| SealError::credential(format!("unable to encode private key: {e}")))?;
        let info = PrivateKeyInfo::try_from(der.as_bytes())
            .map_err(|e| SealError::credential(format!("unable to encode private key: {e}")))?;
        let encrypted = info
            .encrypt_with_params(params, passphrase.as_bytes())
            .map_err(|e| SealError::credential(format!("unable to encrypt private key: {e}")))?;
        let pem = encrypted
            .to_pem(ENCRYPTED_PRIVATE_KEY_LABEL, LineEnding::LF)
            .map_err(|e| SealError::credential(format!("unable to armor private key: {e}")))?;

        Ok(pem.as_str().to_owned())
    }
}

/// Label of the first PEM block in `text`, if any.
fn pem_label(text: &str) -> Option<&str> {
    const BEGIN: &str = "-----BEGIN ";
    let start = text.find(BEGIN)? + BEGIN.len();
    let rest = &text[start..];
    let end = rest.find("-----")?;
    Some(&rest[..end])
}
