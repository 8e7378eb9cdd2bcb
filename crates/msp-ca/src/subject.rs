//! Subject distinguished names built from an organization template.
//!
//! Attribute order follows the usual pkix layout: C, O, OU, L, ST, STREET,
//! postalCode, CN. Empty template fields are omitted.

use msp_core::{DistinguishedNameTemplate, Role};
use rcgen::{DistinguishedName, DnType};

/// streetAddress (2.5.4.9), not a named rcgen attribute.
const OID_STREET_ADDRESS: [u64; 4] = [2, 5, 4, 9];

/// postalCode (2.5.4.17), not a named rcgen attribute.
const OID_POSTAL_CODE: [u64; 4] = [2, 5, 4, 17];

/// Subject (and issuer) of an organization CA: the template, verbatim.
pub(crate) fn ca_subject(template: &DistinguishedNameTemplate) -> DistinguishedName {
    build(template, &template.organizational_unit, None)
}

/// Subject of a leaf: the template's organization fields, `role` in place of
/// the template OU, and the identity's common name.
pub(crate) fn leaf_subject(
    template: &DistinguishedNameTemplate,
    common_name: &str,
    role: Role,
) -> DistinguishedName {
    build(template, role.as_str(), Some(common_name))
}

fn build(
    template: &DistinguishedNameTemplate,
    organizational_unit: &str,
    common_name: Option<&str>,
) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    push_non_empty(&mut dn, DnType::CountryName, &template.country);
    push_non_empty(&mut dn, DnType::OrganizationName, &template.organization);
    push_non_empty(&mut dn, DnType::OrganizationalUnitName, organizational_unit);
    push_non_empty(&mut dn, DnType::LocalityName, &template.locality);
    push_non_empty(&mut dn, DnType::StateOrProvinceName, &template.province);
    push_non_empty(
        &mut dn,
        DnType::CustomDnType(OID_STREET_ADDRESS.to_vec()),
        &template.street_address,
    );
    push_non_empty(
        &mut dn,
        DnType::CustomDnType(OID_POSTAL_CODE.to_vec()),
        &template.postal_code,
    );
    if let Some(cn) = common_name {
        push_non_empty(&mut dn, DnType::CommonName, cn);
    }
    dn
}

fn push_non_empty(dn: &mut DistinguishedName, ty: DnType, value: &str) {
    if !value.is_empty() {
        dn.push(ty, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> DistinguishedNameTemplate {
        DistinguishedNameTemplate {
            organizational_unit: "blockchain".into(),
            street_address: "1 Main St".into(),
            ..DistinguishedNameTemplate::with_defaults("org1")
        }
    }

    #[test]
    fn test_ca_subject_keeps_template_ou() {
        let dn = ca_subject(&template());
        assert!(matches!(
            dn.get(&DnType::OrganizationalUnitName),
            Some(rcgen::DnValue::Utf8String(ou)) if ou == "blockchain"
        ));
        assert!(dn.get(&DnType::CommonName).is_none());
    }

    #[test]
    fn test_leaf_subject_replaces_ou_with_role() {
        let dn = leaf_subject(&template(), "alice.org1.example.com", Role::Peer);
        assert!(matches!(
            dn.get(&DnType::OrganizationalUnitName),
            Some(rcgen::DnValue::Utf8String(ou)) if ou == "peer"
        ));
        assert!(matches!(
            dn.get(&DnType::CommonName),
            Some(rcgen::DnValue::Utf8String(cn)) if cn == "alice.org1.example.com"
        ));
    }

    #[test]
    fn test_empty_fields_omitted() {
        let dn = ca_subject(&DistinguishedNameTemplate::new("org1"));
        assert!(dn.get(&DnType::CountryName).is_none());
        assert!(dn.get(&DnType::OrganizationalUnitName).is_none());
        assert_eq!(dn.iter().count(), 1);
    }
}
