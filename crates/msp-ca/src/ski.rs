//! Key identifiers via `ring::digest`.
//!
//! SHA-256 over the raw uncompressed public key point. Used to name the
//! private key file in an identity archive; never for trust decisions.

use rcgen::PublicKeyData;
use ring::digest::{digest, SHA256};
use std::fmt;

use crate::error::{CaError, Result};
use crate::keypair::{ec_point_from_spki, IdentityKey};

/// Length of a key identifier in bytes.
pub const KEY_IDENTIFIER_LEN: usize = 32;

/// Digest of a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyIdentifier([u8; KEY_IDENTIFIER_LEN]);

impl KeyIdentifier {
    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_IDENTIFIER_LEN] {
        &self.0
    }

    /// Lowercase hex rendering, as used in file names.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute the identifier of any public key rcgen can describe.
///
/// Works for generated keypairs, loaded private keys and bare subject keys
/// alike, since all of them expose the same raw point.
pub fn compute_key_identifier(key: &impl PublicKeyData) -> KeyIdentifier {
    let hash = digest(&SHA256, key.der_bytes());
    let mut out = [0u8; KEY_IDENTIFIER_LEN];
    out.copy_from_slice(hash.as_ref());
    KeyIdentifier(out)
}

/// Identifier of the public half of a PKCS#8 PEM private key.
pub fn key_identifier_from_pem(private_key_pem: &str) -> Result<KeyIdentifier> {
    let key = IdentityKey::from_pem(private_key_pem)?;
    Ok(compute_key_identifier(&key))
}

/// Identifier of a DER `SubjectPublicKeyInfo`.
pub fn key_identifier_from_spki(spki_der: &[u8]) -> Result<KeyIdentifier> {
    let point = ec_point_from_spki(spki_der).map_err(CaError::InvalidSubjectKey)?;
    let hash = digest(&SHA256, &point);
    let mut out = [0u8; KEY_IDENTIFIER_LEN];
    out.copy_from_slice(hash.as_ref());
    Ok(KeyIdentifier(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_deterministic() {
        let key = IdentityKey::generate().unwrap();
        let a = key_identifier_from_pem(key.private_key_pem()).unwrap();
        let b = key_identifier_from_pem(key.private_key_pem()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, compute_key_identifier(&key));
    }

    #[test]
    fn test_private_and_public_forms_agree() {
        let key = IdentityKey::generate().unwrap();
        let from_private = key_identifier_from_pem(key.private_key_pem()).unwrap();
        let from_public = key_identifier_from_spki(&key.public_key_der()).unwrap();
        assert_eq!(from_private, from_public);
    }

    #[test]
    fn test_different_keys_have_different_identifiers() {
        let a = IdentityKey::generate().unwrap();
        let b = IdentityKey::generate().unwrap();
        assert_ne!(compute_key_identifier(&a), compute_key_identifier(&b));
    }

    #[test]
    fn test_hex_rendering() {
        let key = IdentityKey::generate().unwrap();
        let ki = compute_key_identifier(&key);
        let hex = ki.to_hex();
        assert_eq!(hex.len(), KEY_IDENTIFIER_LEN * 2);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(hex, ki.to_string());
    }

    #[test]
    fn test_known_digest() {
        struct Fixed;
        impl PublicKeyData for Fixed {
            fn der_bytes(&self) -> &[u8] {
                b"hello world"
            }
            fn algorithm(&self) -> &'static rcgen::SignatureAlgorithm {
                &rcgen::PKCS_ECDSA_P256_SHA256
            }
        }
        assert_eq!(
            compute_key_identifier(&Fixed).to_hex(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
