//! Leaf certificate issuance.
//!
//! A leaf carries the organization's DN attributes, one OU per role of the
//! holder, and a common name identifying the holder. TLS leaves also carry
//! subject alternative names.

use std::collections::BTreeSet;
use std::net::IpAddr;

use msp_core::{CaPair, CertificateAuthority, DistinguishedNameTemplate, Role};
use rcgen::{
    string::Ia5String, CertificateParams, ExtendedKeyUsagePurpose, IsCa, Issuer, KeyPair,
    KeyUsagePurpose, PublicKeyData, SanType, SigningKey,
};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::der::asn1::{BitString, ObjectIdentifier, SetOfVec};
use x509_cert::der::pem::LineEnding;
use x509_cert::der::{Any, Decode, Encode, EncodePem, Tag};
use x509_cert::name::RelativeDistinguishedName;
use x509_cert::Certificate;
use x509_parser::pem::parse_x509_pem;

use crate::error::{CaError, Result};
use crate::keypair::{IdentityKey, SubjectKey};
use crate::{random_serial, subject, ValidityPeriod};

/// organizationalUnitName (2.5.4.11)
const OID_ORGANIZATIONAL_UNIT: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

/// Everything needed to issue one leaf certificate.
#[derive(Debug, Clone, Copy)]
pub struct IssueRequest<'a> {
    /// Organization DN attributes; the OU is replaced by the role.
    pub template: &'a DistinguishedNameTemplate,
    /// Holder identifier, usually `<user>.<domain>`.
    pub common_name: &'a str,
    /// Roles to embed as OUs, one attribute each. Must not be empty.
    pub roles: &'a BTreeSet<Role>,
    /// Subject alternative names. `None` or empty means no SAN extension.
    pub sans: Option<&'a [String]>,
    /// DER `SubjectPublicKeyInfo` of the holder's key.
    pub subject_public_key: &'a [u8],
}

/// A signed certificate in both encodings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCertificate {
    pub der: Vec<u8>,
    pub pem: String,
}

/// Issue a leaf certificate for the request's public key, signed by `authority`.
///
/// The subject key is validated before anything else, so a bad key never
/// reaches the signer.
pub fn issue_certificate(
    request: &IssueRequest<'_>,
    authority: &CertificateAuthority,
) -> Result<IssuedCertificate> {
    let subject_key = SubjectKey::from_spki_der(request.subject_public_key)?;
    let (role, extra_roles) = split_roles(request.roles)?;
    let subject_alt_names = subject_alt_names(request.sans)?;

    let ca_key = load_issuer_key(authority)?;
    let issuer = Issuer::from_ca_cert_pem(&authority.certificate_pem, &ca_key)
        .map_err(|e| CaError::Signing(format!("loading CA certificate: {e}")))?;

    let mut params = CertificateParams::default();
    params.distinguished_name = subject::leaf_subject(request.template, request.common_name, role);
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyEncipherment,
    ];
    params.extended_key_usages = vec![
        ExtendedKeyUsagePurpose::ServerAuth,
        ExtendedKeyUsagePurpose::ClientAuth,
    ];
    params.subject_alt_names = subject_alt_names;
    params.use_authority_key_identifier_extension = true;

    let (not_before, not_after) = ValidityPeriod::Leaf.window();
    params.not_before = not_before;
    params.not_after = not_after;
    params.serial_number = Some(random_serial());

    let certificate = params
        .signed_by(&subject_key, &issuer)
        .map_err(|e| CaError::Signing(e.to_string()))?;

    if extra_roles.is_empty() {
        return Ok(IssuedCertificate {
            der: certificate.der().to_vec(),
            pem: certificate.pem(),
        });
    }
    add_role_units(certificate.der(), &extra_roles, &ca_key)
}

/// Key and both leaf certificates of a freshly enrolled identity.
#[derive(Debug)]
pub struct EnrolledIdentity {
    pub key: IdentityKey,
    pub signing_certificate: IssuedCertificate,
    pub transport_certificate: IssuedCertificate,
}

/// Generate a key for `user_id` and issue its signing and transport leaves.
///
/// The signing leaf carries no SANs; the transport leaf carries `sans`. Both
/// are issued for the same public key.
pub fn enroll_identity(
    template: &DistinguishedNameTemplate,
    user_id: &str,
    domain: &str,
    role: Role,
    sans: &[String],
    cas: &CaPair,
) -> Result<EnrolledIdentity> {
    let key = IdentityKey::generate()?;
    let public_key = key.public_key_der();
    let common_name = format!("{user_id}.{domain}");
    let roles = BTreeSet::from([role]);

    let mut request = IssueRequest {
        template,
        common_name: &common_name,
        roles: &roles,
        sans: None,
        subject_public_key: &public_key,
    };
    let signing_certificate = issue_certificate(&request, &cas.signing)?;

    request.sans = Some(sans);
    let transport_certificate = issue_certificate(&request, &cas.transport)?;

    Ok(EnrolledIdentity {
        key,
        signing_certificate,
        transport_certificate,
    })
}

/// First role for the rcgen subject, the rest for [`add_role_units`].
fn split_roles(roles: &BTreeSet<Role>) -> Result<(Role, Vec<Role>)> {
    let mut iter = roles.iter().copied();
    let first = iter
        .next()
        .ok_or_else(|| CaError::InvalidRoles("no role given".to_string()))?;
    Ok((first, iter.collect()))
}

/// Insert one OU RDN per extra role after the existing OU and sign again.
///
/// rcgen keeps a single value per attribute type, so a multi-role subject
/// cannot be expressed through `DistinguishedName`.
fn add_role_units(der: &[u8], roles: &[Role], ca_key: &KeyPair) -> Result<IssuedCertificate> {
    let encoding = |e: x509_cert::der::Error| CaError::CertificateEncoding(e.to_string());

    let mut certificate = Certificate::from_der(der).map_err(encoding)?;
    let rdns = &mut certificate.tbs_certificate.subject.0;
    let position = rdns
        .iter()
        .position(|rdn| rdn.0.iter().any(|atv| atv.oid == OID_ORGANIZATIONAL_UNIT))
        .ok_or_else(|| CaError::CertificateEncoding("leaf subject has no OU".to_string()))?;

    for (offset, role) in roles.iter().enumerate() {
        let value = Any::new(Tag::Utf8String, role.as_str().as_bytes()).map_err(encoding)?;
        let attribute = AttributeTypeAndValue {
            oid: OID_ORGANIZATIONAL_UNIT,
            value,
        };
        let set = SetOfVec::try_from(vec![attribute]).map_err(encoding)?;
        rdns.insert(position + 1 + offset, RelativeDistinguishedName(set));
    }

    let tbs = certificate.tbs_certificate.to_der().map_err(encoding)?;
    let signature = ca_key
        .sign(&tbs)
        .map_err(|e| CaError::Signing(e.to_string()))?;
    certificate.signature = BitString::from_bytes(&signature).map_err(encoding)?;

    Ok(IssuedCertificate {
        der: certificate.to_der().map_err(encoding)?,
        pem: certificate.to_pem(LineEnding::LF).map_err(encoding)?,
    })
}

fn subject_alt_names(sans: Option<&[String]>) -> Result<Vec<SanType>> {
    sans.unwrap_or_default()
        .iter()
        .map(|name| {
            if name.is_empty() {
                return Err(CaError::InvalidSubjectAltName {
                    name: name.clone(),
                    reason: "empty name".to_string(),
                });
            }
            if let Ok(ip) = name.parse::<IpAddr>() {
                return Ok(SanType::IpAddress(ip));
            }
            Ia5String::try_from(name.clone())
                .map(SanType::DnsName)
                .map_err(|e| CaError::InvalidSubjectAltName {
                    name: name.clone(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Parse the CA key and check it belongs to a CA certificate.
fn load_issuer_key(authority: &CertificateAuthority) -> Result<KeyPair> {
    let key_pair = KeyPair::from_pem(&authority.private_key_pem)
        .map_err(|e| CaError::Signing(format!("loading CA key: {e}")))?;

    let (_, pem) = parse_x509_pem(authority.certificate_pem.as_bytes())
        .map_err(|e| CaError::Signing(format!("decoding CA certificate: {e}")))?;
    let certificate = pem
        .parse_x509()
        .map_err(|e| CaError::Signing(format!("parsing CA certificate: {e}")))?;

    let is_ca = certificate
        .basic_constraints()
        .ok()
        .flatten()
        .is_some_and(|ext| ext.value.ca);
    if !is_ca {
        return Err(CaError::Signing("issuer certificate is not a CA".to_string()));
    }

    let cert_point: &[u8] = &certificate.public_key().subject_public_key.data;
    if cert_point != key_pair.der_bytes() {
        return Err(CaError::Signing(
            "CA key does not match CA certificate".to_string(),
        ));
    }

    Ok(key_pair)
}
