use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::{CaPair, CertificateAuthority, DistinguishedNameTemplate};

/// Kind of organization in the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgType {
    /// Organization running peers
    #[default]
    Peer,
    /// Organization running the ordering service
    Orderer,
}

impl OrgType {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Peer => "peer",
            Self::Orderer => "orderer",
        }
    }
}

impl FromStr for OrgType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "peer" => Ok(Self::Peer),
            "orderer" => Ok(Self::Orderer),
            _ => Err(CoreError::UnknownOrgType(s.to_string())),
        }
    }
}

impl fmt::Display for OrgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An organization and its two certificate authorities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    /// Unique organization identifier, also the subject O value
    pub organization_id: String,

    /// Display name
    pub name: String,

    /// DNS domain, used in every archive path that names the organization
    pub domain: String,

    /// Free-form description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Peer or orderer organization
    pub org_type: OrgType,

    /// Networks this organization has joined
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub network_ids: Vec<String>,

    /// Country (C)
    pub country: String,

    /// State or province (ST)
    pub province: String,

    /// Locality (L)
    pub locality: String,

    /// Organizational unit (OU) of the CA certificates
    #[serde(skip_serializing_if = "String::is_empty")]
    pub organizational_unit: String,

    /// Street address
    #[serde(skip_serializing_if = "String::is_empty")]
    pub street_address: String,

    /// Postal code
    pub postal_code: String,

    /// CA for identity certificates
    pub signing_ca: CertificateAuthority,

    /// CA for TLS certificates
    pub transport_ca: CertificateAuthority,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// The subject template this organization's CAs were created from.
    ///
    /// The CA subjects are derived from it, so leaf issuance can rebuild the
    /// same organization fields at any time.
    #[must_use]
    pub fn dn_template(&self) -> DistinguishedNameTemplate {
        DistinguishedNameTemplate {
            organization: self.organization_id.clone(),
            country: self.country.clone(),
            province: self.province.clone(),
            locality: self.locality.clone(),
            organizational_unit: self.organizational_unit.clone(),
            street_address: self.street_address.clone(),
            postal_code: self.postal_code.clone(),
        }
    }

    /// Both certificate authorities.
    #[must_use]
    pub fn ca_pair(&self) -> CaPair {
        CaPair {
            signing: self.signing_ca.clone(),
            transport: self.transport_ca.clone(),
        }
    }

    /// Returns true if the organization has joined the given network.
    #[must_use]
    pub fn has_network(&self, id: &str) -> bool {
        self.network_ids.iter().any(|nid| nid == id)
    }
}
