//! Request payloads accepted by the services.

use msp_core::{DEFAULT_COUNTRY, DEFAULT_LOCALITY, DEFAULT_POSTAL_CODE, DEFAULT_PROVINCE};
use serde::{Deserialize, Serialize};

/// Create an organization and its two CAs.
///
/// Location fields left as `None` are filled from [`SubjectDefaults`]; an
/// explicit empty string keeps the attribute out of the CA subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub organization_id: String,
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub description: String,
    /// `peer` or `orderer`
    #[serde(rename = "type")]
    pub org_type: String,
    #[serde(default)]
    pub network_ids: Vec<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub organizational_unit: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub postal_code: Option<String>,
}

/// Enroll a user or node under an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollIdentity {
    pub organization_id: String,
    pub user_id: String,
    /// `client`, `peer`, `admin` or `orderer`
    #[serde(rename = "type")]
    pub role: String,
    #[serde(default)]
    pub sans: Vec<String>,
}

/// Location attributes applied to organizations that do not set them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDefaults {
    pub country: String,
    pub province: String,
    pub locality: String,
    pub postal_code: String,
}

impl Default for SubjectDefaults {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            province: DEFAULT_PROVINCE.to_string(),
            locality: DEFAULT_LOCALITY.to_string(),
            postal_code: DEFAULT_POSTAL_CODE.to_string(),
        }
    }
}
