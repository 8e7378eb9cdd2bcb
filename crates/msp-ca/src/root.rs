//! Organization root CAs.
//!
//! Every organization owns two self-signed roots built from the same
//! template: one signs identity certificates, the other TLS certificates.
//! They share nothing but the subject.

use msp_core::{CaPair, CaPurpose, CertificateAuthority, DistinguishedNameTemplate};
use rcgen::{
    BasicConstraints, CertificateParams, ExtendedKeyUsagePurpose, IsCa, KeyUsagePurpose,
};

use crate::error::{CaError, Result};
use crate::keypair::IdentityKey;
use crate::{random_serial, subject, ValidityPeriod};

/// Create a self-signed CA for one purpose.
///
/// Subject and issuer both equal the template. The CA may sign leaf
/// certificates only (path length 0).
pub fn create_ca(
    template: &DistinguishedNameTemplate,
    purpose: CaPurpose,
) -> Result<CertificateAuthority> {
    let key = IdentityKey::generate()?;
    let private_key_pem = key.private_key_pem().to_string();
    let key_pair = key.into_key_pair();

    let mut params = CertificateParams::default();
    params.distinguished_name = subject::ca_subject(template);

    // Single-level hierarchy: signs leaves only.
    params.is_ca = IsCa::Ca(BasicConstraints::Constrained(0));

    params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
        KeyUsagePurpose::DigitalSignature,
    ];

    params.extended_key_usages = vec![
        ExtendedKeyUsagePurpose::ServerAuth,
        ExtendedKeyUsagePurpose::ClientAuth,
    ];

    let (not_before, not_after) = ValidityPeriod::Authority.window();
    params.not_before = not_before;
    params.not_after = not_after;
    params.serial_number = Some(random_serial());

    let certificate = params
        .self_signed(&key_pair)
        .map_err(|e| CaError::CertificateEncoding(e.to_string()))?;

    Ok(CertificateAuthority {
        purpose,
        private_key_pem,
        certificate_pem: certificate.pem(),
    })
}

/// Create the signing and transport CAs of an organization.
///
/// Two independent calls to [`create_ca`] with an identical template.
pub fn create_ca_pair(template: &DistinguishedNameTemplate) -> Result<CaPair> {
    Ok(CaPair {
        signing: create_ca(template, CaPurpose::Signing)?,
        transport: create_ca(template, CaPurpose::Transport)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ski::key_identifier_from_pem;
    use x509_parser::pem::parse_x509_pem;
    use x509_parser::prelude::AttributeTypeAndValue;

    fn first_value<'a, 'b: 'a>(
        mut it: impl Iterator<Item = &'a AttributeTypeAndValue<'b>>,
    ) -> Option<String> {
        it.next()
            .and_then(|attr| attr.as_str().ok())
            .map(str::to_string)
    }

    fn template() -> DistinguishedNameTemplate {
        DistinguishedNameTemplate {
            organizational_unit: "blockchain".into(),
            street_address: "1 Main St".into(),
            ..DistinguishedNameTemplate::with_defaults("org1")
        }
    }

    #[test]
    fn test_ca_is_self_signed() {
        let ca = create_ca(&template(), CaPurpose::Signing).unwrap();
        assert_eq!(ca.purpose, CaPurpose::Signing);
        assert!(ca.certificate_pem.contains("BEGIN CERTIFICATE"));
        assert!(ca.private_key_pem.contains("PRIVATE KEY"));

        let (_, pem) = parse_x509_pem(ca.certificate_pem.as_bytes()).unwrap();
        let cert = pem.parse_x509().unwrap();

        assert_eq!(cert.subject().as_raw(), cert.issuer().as_raw());
        cert.verify_signature(None).unwrap();

        let constraints = cert.basic_constraints().unwrap().unwrap().value;
        assert!(constraints.ca);
        assert_eq!(constraints.path_len_constraint, Some(0));

        let usage = cert.key_usage().unwrap().unwrap().value;
        assert!(usage.key_cert_sign());
        assert!(usage.crl_sign());
    }

    #[test]
    fn test_ca_subject_matches_template() {
        let ca = create_ca(&template(), CaPurpose::Transport).unwrap();
        let (_, pem) = parse_x509_pem(ca.certificate_pem.as_bytes()).unwrap();
        let cert = pem.parse_x509().unwrap();
        let subject = cert.subject();

        assert_eq!(first_value(subject.iter_organization()), Some("org1".into()));
        assert_eq!(first_value(subject.iter_country()), Some("China".into()));
        assert_eq!(first_value(subject.iter_state_or_province()), Some("Beijing".into()));
        assert_eq!(first_value(subject.iter_locality()), Some("Beijing".into()));
        assert_eq!(
            first_value(subject.iter_organizational_unit()),
            Some("blockchain".into())
        );
    }

    #[test]
    fn test_ca_pair_is_independent() {
        let pair = create_ca_pair(&template()).unwrap();
        assert_eq!(pair.signing.purpose, CaPurpose::Signing);
        assert_eq!(pair.transport.purpose, CaPurpose::Transport);

        let signing_ki = key_identifier_from_pem(&pair.signing.private_key_pem).unwrap();
        let transport_ki = key_identifier_from_pem(&pair.transport.private_key_pem).unwrap();
        assert_ne!(signing_ki, transport_ki);

        let (_, signing_pem) = parse_x509_pem(pair.signing.certificate_pem.as_bytes()).unwrap();
        let (_, transport_pem) =
            parse_x509_pem(pair.transport.certificate_pem.as_bytes()).unwrap();
        let signing = signing_pem.parse_x509().unwrap();
        let transport = transport_pem.parse_x509().unwrap();

        // Same subject, different keys and signatures.
        assert_eq!(signing.subject().as_raw(), transport.subject().as_raw());
        assert_ne!(signing.signature_value.data, transport.signature_value.data);
        signing.verify_signature(None).unwrap();
        transport.verify_signature(None).unwrap();
        assert!(transport
            .verify_signature(Some(signing.public_key()))
            .is_err());
    }
}
