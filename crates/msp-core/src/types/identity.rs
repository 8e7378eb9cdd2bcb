use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::types::Role;

/// A user or node identity enrolled under an organization.
///
/// One private key backs both certificates: the signing certificate chains to
/// the organization's signing CA, the transport certificate to its transport
/// CA.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Owning organization
    pub organization_id: String,

    /// Public identifier, unique within the organization
    pub user_id: String,

    /// OU role marker embedded in both certificates
    pub role: Role,

    /// Subject alternative names of the transport certificate
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sans: Vec<String>,

    /// PKCS#8 PEM private key
    #[serde(skip)]
    pub private_key_pem: String,

    /// PEM signing certificate
    pub signing_certificate_pem: String,

    /// PEM transport certificate
    pub transport_certificate_pem: String,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Private key of the transport certificate (the identity key).
    #[must_use]
    pub fn transport_private_key_pem(&self) -> &str {
        &self.private_key_pem
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("organization_id", &self.organization_id)
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .field("sans", &self.sans)
            .field("private_key_pem", &"<redacted>")
            .finish_non_exhaustive()
    }
}
