use serde::{Deserialize, Serialize};

/// Default country applied to new organizations.
pub const DEFAULT_COUNTRY: &str = "China";
/// Default province applied to new organizations.
pub const DEFAULT_PROVINCE: &str = "Beijing";
/// Default locality applied to new organizations.
pub const DEFAULT_LOCALITY: &str = "Beijing";
/// Default postal code applied to new organizations.
pub const DEFAULT_POSTAL_CODE: &str = "100000";

/// Organization-level subject fields shared by a CA and every certificate it issues.
///
/// Empty strings are treated as absent and left out of the encoded name.
/// Role and subject alternative names vary per leaf and are not part of the
/// template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinguishedNameTemplate {
    /// Organization name (O)
    pub organization: String,

    /// Country (C)
    #[serde(default)]
    pub country: String,

    /// State or province (ST)
    #[serde(default)]
    pub province: String,

    /// Locality (L)
    #[serde(default)]
    pub locality: String,

    /// Organizational unit (OU), used on CA certificates only
    #[serde(default)]
    pub organizational_unit: String,

    /// Street address (STREET)
    #[serde(default)]
    pub street_address: String,

    /// Postal code
    #[serde(default)]
    pub postal_code: String,
}

impl DistinguishedNameTemplate {
    /// Template for an organization, with every other field empty.
    #[must_use]
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            ..Self::default()
        }
    }

    /// Template carrying the default location fields.
    #[must_use]
    pub fn with_defaults(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            country: DEFAULT_COUNTRY.to_string(),
            province: DEFAULT_PROVINCE.to_string(),
            locality: DEFAULT_LOCALITY.to_string(),
            postal_code: DEFAULT_POSTAL_CODE.to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_defaults() {
        let template = DistinguishedNameTemplate::with_defaults("org1");
        assert_eq!(template.organization, "org1");
        assert_eq!(template.country, "China");
        assert_eq!(template.province, "Beijing");
        assert_eq!(template.locality, "Beijing");
        assert_eq!(template.postal_code, "100000");
        assert!(template.organizational_unit.is_empty());
        assert!(template.street_address.is_empty());
    }
}
