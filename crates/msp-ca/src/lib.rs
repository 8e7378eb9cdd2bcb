//! # msp-ca
//!
//! Certificate authority infrastructure for organization identities.
//!
//! ## Architecture
//!
//! ```text
//! ORGANIZATION
//!    │
//!    ├── Signing CA (self-signed, pathLen 0)
//!    │      └── identity certificate  (CN=<user>.<domain>, OU=<role>)
//!    │
//!    └── Transport CA (self-signed, pathLen 0)
//!           └── TLS certificate       (CN=<user>.<domain>, OU=<role>, SAN=...)
//! ```
//!
//! Both CAs share one distinguished-name template and differ only in key
//! material and in the slot they are stored in. Every identity gets one
//! ECDSA P-256 key that backs both of its leaf certificates.
//!
//! Everything here is a pure function of its inputs: no storage, no logging,
//! no shared state. Fresh randomness is drawn for every key and serial.
//!
//! ## Example
//!
//! ```rust,ignore
//! use msp_ca::{create_ca_pair, enroll_identity};
//! use msp_core::{DistinguishedNameTemplate, Role};
//!
//! let template = DistinguishedNameTemplate::with_defaults("org1");
//! let cas = create_ca_pair(&template)?;
//!
//! let sans = vec!["peer0.org1.example.com".to_string()];
//! let alice = enroll_identity(&template, "alice", "org1.example.com", Role::Client, &sans, &cas)?;
//! println!("{}", alice.signing_certificate.pem);
//! ```

mod error;
mod issuer;
mod keypair;
mod root;
mod ski;
mod subject;

pub use error::{CaError, Result};
pub use issuer::{enroll_identity, issue_certificate, EnrolledIdentity, IssueRequest, IssuedCertificate};
pub use keypair::IdentityKey;
pub use root::{create_ca, create_ca_pair};
pub use ski::{
    compute_key_identifier, key_identifier_from_pem, key_identifier_from_spki, KeyIdentifier,
    KEY_IDENTIFIER_LEN,
};

use rcgen::SerialNumber;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Validity period presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityPeriod {
    /// Organization CA: 10 years
    Authority,
    /// Identity and TLS certificates: 10 years
    Leaf,
    /// Custom duration in days
    Custom(u32),
}

impl ValidityPeriod {
    /// Clock skew tolerance applied to `not_before`.
    pub const BACKDATE: Duration = Duration::minutes(5);

    /// Get the number of days for this validity period.
    pub const fn days(&self) -> u32 {
        match self {
            Self::Authority | Self::Leaf => 10 * 365,
            Self::Custom(d) => *d,
        }
    }

    /// `(not_before, not_after)` starting now.
    pub fn window(&self) -> (OffsetDateTime, OffsetDateTime) {
        let now = OffsetDateTime::now_utc();
        (
            now - Self::BACKDATE,
            now + Duration::days(i64::from(self.days())),
        )
    }
}

/// Random positive 64-bit serial number.
pub(crate) fn random_serial() -> SerialNumber {
    let (high, _) = Uuid::new_v4().as_u64_pair();
    // Clear the top bit so the DER integer never needs a sign byte.
    SerialNumber::from(high & (u64::MAX >> 1))
}
