//! # msp-archive
//!
//! Packages an enrolled identity into the two directory layouts network
//! nodes consume, each as a single tar.gz stream:
//!
//! ```text
//! identity (MSP)                         transport (TLS)
//! ├── config.yaml                        ├── ca.crt
//! ├── cacerts/ca.<domain>-cert.pem       ├── server.crt
//! ├── tlscacerts/tlsca.<domain>-cert.pem └── server.key
//! ├── keystore/<key-id>_sk
//! └── signcerts/<user>.<domain>-cert.pem
//! ```
//!
//! Output is byte-for-byte reproducible for the same inputs.

mod archive;
mod error;
pub mod layout;

pub use archive::{read_archive, Archive, ArchiveEntry};
pub use error::{ArchiveError, Result};

use msp_core::{Identity, Organization};

use crate::layout::{PRIVATE_MODE, PUBLIC_MODE};

/// Assemble the MSP layout of `identity` without encoding it.
pub fn identity_archive(org: &Organization, identity: &Identity) -> Result<Archive> {
    let key_id = msp_ca::key_identifier_from_pem(&identity.private_key_pem)
        .map_err(|e| ArchiveError::KeyIdentifier(e.to_string()))?;
    let ca_cert_path = layout::ca_cert_path(&org.domain);

    let mut archive = Archive::new();
    archive
        .add_file(
            layout::CONFIG_PATH,
            PUBLIC_MODE,
            layout::node_ous_config(&ca_cert_path),
        )?
        .add_file(
            ca_cert_path,
            PUBLIC_MODE,
            org.signing_ca.certificate_pem.as_bytes(),
        )?
        .add_file(
            layout::tls_ca_cert_path(&org.domain),
            PUBLIC_MODE,
            org.transport_ca.certificate_pem.as_bytes(),
        )?
        .add_file(
            layout::keystore_path(&key_id),
            PRIVATE_MODE,
            identity.private_key_pem.as_bytes(),
        )?
        .add_file(
            layout::signcert_path(&identity.user_id, &org.domain),
            PUBLIC_MODE,
            identity.signing_certificate_pem.as_bytes(),
        )?;
    Ok(archive)
}

/// Assemble the TLS layout of `identity` without encoding it.
pub fn transport_archive(org: &Organization, identity: &Identity) -> Result<Archive> {
    let mut archive = Archive::new();
    archive
        .add_file(
            layout::TLS_CA_PATH,
            PUBLIC_MODE,
            org.transport_ca.certificate_pem.as_bytes(),
        )?
        .add_file(
            layout::TLS_CERT_PATH,
            PUBLIC_MODE,
            identity.transport_certificate_pem.as_bytes(),
        )?
        .add_file(
            layout::TLS_KEY_PATH,
            PRIVATE_MODE,
            identity.transport_private_key_pem().as_bytes(),
        )?;
    Ok(archive)
}

/// Identity (MSP) bundle as tar.gz bytes.
pub fn build_identity_archive(org: &Organization, identity: &Identity) -> Result<Vec<u8>> {
    identity_archive(org, identity)?.generate()
}

/// Transport (TLS) bundle as tar.gz bytes.
pub fn build_transport_archive(org: &Organization, identity: &Identity) -> Result<Vec<u8>> {
    transport_archive(org, identity)?.generate()
}
