//! ECDSA P-256 key generation and public key parsing.
//!
//! All key material is produced by `rcgen` on top of `ring`, so generation
//! draws from the operating system CSPRNG and is safe to call concurrently.

use rcgen::{KeyPair, PublicKeyData, SignatureAlgorithm, PKCS_ECDSA_P256_SHA256};
use ring::agreement::{self, EphemeralPrivateKey, UnparsedPublicKey, ECDH_P256};
use ring::rand::SystemRandom;
use x509_parser::oid_registry::{OID_EC_P256, OID_KEY_TYPE_EC_PUBLIC_KEY};
use x509_parser::prelude::{FromDer, SubjectPublicKeyInfo};

use crate::error::{CaError, Result};

/// Length of an uncompressed SEC1 P-256 point.
const P256_POINT_LEN: usize = 65;

/// SEC1 tag for an uncompressed point.
const SEC1_UNCOMPRESSED: u8 = 0x04;

/// The private key of a CA or an identity.
///
/// Both leaf certificates of an identity are issued for the public half of
/// this key.
pub struct IdentityKey {
    key_pair: KeyPair,
    private_key_pem: String,
}

impl IdentityKey {
    /// Generate a fresh P-256 keypair.
    pub fn generate() -> Result<Self> {
        let key_pair = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256)
            .map_err(|e| CaError::KeyGeneration(e.to_string()))?;
        let private_key_pem = key_pair.serialize_pem();
        Ok(Self {
            key_pair,
            private_key_pem,
        })
    }

    /// Load a PKCS#8 PEM private key.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let key_pair = KeyPair::from_pem(pem).map_err(|e| CaError::InvalidKey(e.to_string()))?;
        Ok(Self {
            key_pair,
            private_key_pem: pem.to_string(),
        })
    }

    /// PKCS#8 PEM encoding of the private key.
    pub fn private_key_pem(&self) -> &str {
        &self.private_key_pem
    }

    /// DER `SubjectPublicKeyInfo` of the public key.
    pub fn public_key_der(&self) -> Vec<u8> {
        self.key_pair.subject_public_key_info()
    }

    /// Raw uncompressed public key point.
    pub fn public_key_raw(&self) -> &[u8] {
        self.key_pair.der_bytes()
    }

    /// Consume into the underlying rcgen keypair.
    pub(crate) fn into_key_pair(self) -> KeyPair {
        self.key_pair
    }
}

impl PublicKeyData for IdentityKey {
    fn der_bytes(&self) -> &[u8] {
        self.key_pair.der_bytes()
    }

    fn algorithm(&self) -> &'static SignatureAlgorithm {
        self.key_pair.algorithm()
    }
}

impl std::fmt::Debug for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityKey").finish_non_exhaustive()
    }
}

/// A subject public key supplied by the caller, validated for issuance.
///
/// Only the public half is known, which is all rcgen needs to sign a
/// certificate for it.
#[derive(Debug)]
pub(crate) struct SubjectKey {
    point: Vec<u8>,
}

impl SubjectKey {
    /// Parse and validate a DER `SubjectPublicKeyInfo`.
    pub(crate) fn from_spki_der(der: &[u8]) -> Result<Self> {
        let point = ec_point_from_spki(der).map_err(CaError::InvalidSubjectKey)?;
        Ok(Self { point })
    }
}

impl PublicKeyData for SubjectKey {
    fn der_bytes(&self) -> &[u8] {
        &self.point
    }

    fn algorithm(&self) -> &'static SignatureAlgorithm {
        &PKCS_ECDSA_P256_SHA256
    }
}

/// Extract the uncompressed P-256 point from a DER `SubjectPublicKeyInfo`.
///
/// Rejects other key types, compressed or truncated points, the all-zero
/// point, and points that are not on the curve.
pub(crate) fn ec_point_from_spki(der: &[u8]) -> std::result::Result<Vec<u8>, String> {
    if der.is_empty() {
        return Err("empty public key".to_string());
    }

    let (rest, spki) = SubjectPublicKeyInfo::from_der(der)
        .map_err(|e| format!("malformed SubjectPublicKeyInfo: {e}"))?;
    if !rest.is_empty() {
        return Err(format!("{} trailing bytes after SubjectPublicKeyInfo", rest.len()));
    }

    if spki.algorithm.algorithm != OID_KEY_TYPE_EC_PUBLIC_KEY {
        return Err(format!("unsupported key algorithm {}", spki.algorithm.algorithm));
    }
    let on_p256 = spki
        .algorithm
        .parameters
        .as_ref()
        .and_then(|params| params.as_oid().ok())
        .is_some_and(|curve| curve == OID_EC_P256);
    if !on_p256 {
        return Err("unsupported curve, expected P-256".to_string());
    }

    let point: &[u8] = &spki.subject_public_key.data;
    if point.len() != P256_POINT_LEN || point[0] != SEC1_UNCOMPRESSED {
        return Err(format!(
            "expected {P256_POINT_LEN}-byte uncompressed point, got {} bytes",
            point.len()
        ));
    }
    if point[1..].iter().all(|b| *b == 0) {
        return Err("public key point is zero".to_string());
    }
    check_on_curve(point)?;

    Ok(point.to_vec())
}

/// Run ring's peer point validation through an ephemeral P-256 key
/// agreement.
fn check_on_curve(point: &[u8]) -> std::result::Result<(), String> {
    let rng = SystemRandom::new();
    let ephemeral = EphemeralPrivateKey::generate(&ECDH_P256, &rng)
        .map_err(|_| "cannot generate ephemeral P-256 key".to_string())?;
    agreement::agree_ephemeral(ephemeral, &UnparsedPublicKey::new(&ECDH_P256, point), |_| ())
        .map_err(|_| "public key point is not on P-256".to_string())
}
