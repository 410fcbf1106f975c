//! Content digests for claims documents.
//!
//! Digests are deterministic and unsalted: identical bytes always give an
//! identical digest. The signed message is the lowercase hex text of the
//! digest, not the raw digest bytes; signer and verifier both go through
//! [`digest_hex`].

use sha2::{Digest, Sha256};

use crate::errors::{SealError, SealResult};

/// Hash algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlg {
    #[default]
    Sha256,
}

impl HashAlg {
    pub fn parse(s: &str) -> SealResult<Self> {
        match s {
            "sha256" => Ok(HashAlg::Sha256),
            _ => Err(SealError::invalid_argument(format!(
                "unsupported hash algorithm: {s}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

/// Hash raw bytes using the selected algorithm.
pub fn hash_bytes(alg: HashAlg, bytes: &[u8]) -> Vec<u8> {
    match alg {
        HashAlg::Sha256 => {
            let mut h = Sha256::new();
            h.update(bytes);
            h.finalize().to_vec()
        }
    }
}

/// Hash raw bytes and return the lowercase hex text, no prefix.
pub fn digest_hex(alg: HashAlg, bytes: &[u8]) -> String {
    hex::encode(hash_bytes(alg, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable() {
        let h1 = hash_bytes(HashAlg::Sha256, b"r_person: Alice");
        let h2 = hash_bytes(HashAlg::Sha256, b"r_person: Alice");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 32);
        assert_eq!(
            digest_hex(HashAlg::Sha256, b"r_person: Alice"),
            digest_hex(HashAlg::Sha256, b"r_person: Alice")
        );
    }

    #[test]
    fn hex_is_lowercase_without_prefix() {
        // sha256("abc")
        assert_eq!(
            digest_hex(HashAlg::Sha256, b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn parse_alg() {
        assert_eq!(HashAlg::parse("sha256").unwrap(), HashAlg::Sha256);
        assert!(HashAlg::parse("md5").is_err());
    }
}
