//! Storage records and their mapping to the core types.
//!
//! Records are what stores persist. Unlike the core types they carry every
//! private key and encode timestamps as unix seconds, so conversion back is
//! fallible.

use chrono::{DateTime, Utc};
use msp_core::{CaPurpose, CertificateAuthority, Identity, OrgType, Organization, Role};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Persisted form of an [`Organization`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRecord {
    pub organization_id: String,
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub description: String,
    pub org_type: String,
    #[serde(default)]
    pub network_ids: Vec<String>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub organizational_unit: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub postal_code: String,
    pub signing_ca_private_key: String,
    pub signing_ca_certificate: String,
    pub transport_ca_private_key: String,
    pub transport_ca_certificate: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Persisted form of an [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub organization_id: String,
    pub user_id: String,
    pub role: String,
    #[serde(default)]
    pub sans: Vec<String>,
    pub private_key: String,
    pub signing_certificate: String,
    pub transport_certificate: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Organization> for OrganizationRecord {
    fn from(org: &Organization) -> Self {
        Self {
            organization_id: org.organization_id.clone(),
            name: org.name.clone(),
            domain: org.domain.clone(),
            description: org.description.clone(),
            org_type: org.org_type.as_str().to_string(),
            network_ids: org.network_ids.clone(),
            country: org.country.clone(),
            province: org.province.clone(),
            locality: org.locality.clone(),
            organizational_unit: org.organizational_unit.clone(),
            street_address: org.street_address.clone(),
            postal_code: org.postal_code.clone(),
            signing_ca_private_key: org.signing_ca.private_key_pem.clone(),
            signing_ca_certificate: org.signing_ca.certificate_pem.clone(),
            transport_ca_private_key: org.transport_ca.private_key_pem.clone(),
            transport_ca_certificate: org.transport_ca.certificate_pem.clone(),
            created_at: org.created_at.timestamp(),
            updated_at: org.updated_at.timestamp(),
        }
    }
}

impl TryFrom<OrganizationRecord> for Organization {
    type Error = StoreError;

    fn try_from(record: OrganizationRecord) -> Result<Self, Self::Error> {
        let org_type: OrgType = record
            .org_type
            .parse()
            .map_err(|e| corrupt(&record.organization_id, e))?;

        Ok(Self {
            created_at: timestamp(&record.organization_id, record.created_at)?,
            updated_at: timestamp(&record.organization_id, record.updated_at)?,
            signing_ca: CertificateAuthority {
                purpose: CaPurpose::Signing,
                private_key_pem: record.signing_ca_private_key,
                certificate_pem: record.signing_ca_certificate,
            },
            transport_ca: CertificateAuthority {
                purpose: CaPurpose::Transport,
                private_key_pem: record.transport_ca_private_key,
                certificate_pem: record.transport_ca_certificate,
            },
            organization_id: record.organization_id,
            name: record.name,
            domain: record.domain,
            description: record.description,
            org_type,
            network_ids: record.network_ids,
            country: record.country,
            province: record.province,
            locality: record.locality,
            organizational_unit: record.organizational_unit,
            street_address: record.street_address,
            postal_code: record.postal_code,
        })
    }
}

impl From<&Identity> for IdentityRecord {
    fn from(identity: &Identity) -> Self {
        Self {
            organization_id: identity.organization_id.clone(),
            user_id: identity.user_id.clone(),
            role: identity.role.as_str().to_string(),
            sans: identity.sans.clone(),
            private_key: identity.private_key_pem.clone(),
            signing_certificate: identity.signing_certificate_pem.clone(),
            transport_certificate: identity.transport_certificate_pem.clone(),
            created_at: identity.created_at.timestamp(),
            updated_at: identity.updated_at.timestamp(),
        }
    }
}

impl TryFrom<IdentityRecord> for Identity {
    type Error = StoreError;

    fn try_from(record: IdentityRecord) -> Result<Self, Self::Error> {
        let key = format!("{}/{}", record.organization_id, record.user_id);
        let role: Role = record.role.parse().map_err(|e| corrupt(&key, e))?;

        Ok(Self {
            created_at: timestamp(&key, record.created_at)?,
            updated_at: timestamp(&key, record.updated_at)?,
            organization_id: record.organization_id,
            user_id: record.user_id,
            role,
            sans: record.sans,
            private_key_pem: record.private_key,
            signing_certificate_pem: record.signing_certificate,
            transport_certificate_pem: record.transport_certificate,
        })
    }
}

fn timestamp(key: &str, secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| corrupt(key, format!("timestamp {secs} out of range")))
}

fn corrupt(key: &str, reason: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(format!("corrupt record {key}: {reason}"))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_mapping_keeps_keys() {
        let org = fixtures::organization("org1");
        let record = OrganizationRecord::from(&org);
        assert_eq!(record.signing_ca_private_key, "org1-sign-key");
        assert_eq!(record.org_type, "peer");
        assert_eq!(Organization::try_from(record).unwrap(), org);
    }

    #[test]
    fn test_identity_mapping_keeps_key() {
        let identity = fixtures::identity("org1", "alice");
        let record = IdentityRecord::from(&identity);
        assert_eq!(record.private_key, "alice-key");
        assert_eq!(Identity::try_from(record).unwrap(), identity);
    }

    #[test]
    fn test_corrupt_role_is_backend_error() {
        let mut record = IdentityRecord::from(&fixtures::identity("org1", "alice"));
        record.role = "wizard".into();
        let err = Identity::try_from(record).unwrap_err();
        assert!(matches!(err, StoreError::Backend(msg) if msg.contains("org1/alice")));
    }

    #[test]
    fn test_record_json_shape() {
        let record = OrganizationRecord::from(&fixtures::organization("org1"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["organization_id"], "org1");
        assert_eq!(json["created_at"], 1_700_000_000);
        assert!(json["transport_ca_private_key"].is_string());
    }
}
