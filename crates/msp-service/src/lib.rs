//! # msp-service
//!
//! Request layer over the issuance engine: validates input, drives CA
//! creation, enrollment and packaging, persists records through a [`Store`],
//! and logs every outcome.
//!
//! Failures map to HTTP-style status codes through
//! [`ServiceError::status_code`], so a transport can be put in front
//! without re-deriving them.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use msp_service::{CreateOrganization, EnrollIdentity, MemoryStore, Services};
//!
//! let services = Services::new(Arc::new(MemoryStore::new()));
//! services.organizations.create(CreateOrganization {
//!     organization_id: "org1".into(),
//!     name: "Org One".into(),
//!     domain: "org1.example.com".into(),
//!     org_type: "peer".into(),
//!     ..Default::default()
//! }).await?;
//! let archive = services.exports.identity_archive("org1", "alice").await?;
//! ```

mod error;
mod export;
mod identity;
mod organization;
pub mod record;
mod request;
pub mod store;
pub mod validate;

pub use error::{Result, ServiceError};
pub use export::ExportService;
pub use identity::IdentityService;
pub use organization::OrganizationService;
pub use request::{CreateOrganization, EnrollIdentity, SubjectDefaults};
pub use store::{FileStore, MemoryStore, RecordKind, Store, StoreError};

use std::sync::Arc;

use tracing::{debug, error, warn};

/// All services sharing one store.
#[derive(Clone)]
pub struct Services {
    pub organizations: OrganizationService,
    pub identities: IdentityService,
    pub exports: ExportService,
}

impl Services {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_defaults(store, SubjectDefaults::default())
    }

    pub fn with_defaults(store: Arc<dyn Store>, defaults: SubjectDefaults) -> Self {
        Self {
            organizations: OrganizationService::with_defaults(Arc::clone(&store), defaults),
            identities: IdentityService::new(Arc::clone(&store)),
            exports: ExportService::new(store),
        }
    }
}

/// Log how a service call ended. Client errors are warnings, the rest are
/// errors, and both carry the status and the failing step when known.
pub(crate) fn log_outcome<T>(operation: &'static str, result: &Result<T>) {
    match result {
        Ok(_) => debug!(operation, "request completed"),
        Err(err) if err.is_client_error() => warn!(
            operation,
            status = err.status_code(),
            error = %err,
            "request rejected"
        ),
        Err(err) => error!(
            operation,
            status = err.status_code(),
            step = err.step().unwrap_or("store"),
            error = %err,
            "request failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_services_share_one_store() {
        let services = Services::new(Arc::new(MemoryStore::new()));
        services
            .organizations
            .create(CreateOrganization {
                organization_id: "org1".into(),
                name: "Org One".into(),
                domain: "org1.example.com".into(),
                org_type: "orderer".into(),
                ..CreateOrganization::default()
            })
            .await
            .unwrap();

        services
            .identities
            .enroll(EnrollIdentity {
                organization_id: "org1".into(),
                user_id: "orderer0".into(),
                role: "orderer".into(),
                sans: vec!["orderer0.org1.example.com".into(), "10.0.0.5".into()],
            })
            .await
            .unwrap();

        let archive = services
            .exports
            .transport_archive("org1", "orderer0")
            .await
            .unwrap();
        assert!(!archive.is_empty());
    }
}
