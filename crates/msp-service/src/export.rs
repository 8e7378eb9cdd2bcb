use std::sync::Arc;

use msp_core::{Identity, Organization};
use tracing::{info, instrument};

use crate::error::{Result, ServiceError};
use crate::store::Store;
use crate::{log_outcome, validate};

/// Packages stored identities into MSP and TLS archives.
#[derive(Clone)]
pub struct ExportService {
    store: Arc<dyn Store>,
}

impl ExportService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// MSP directory of an identity as tar.gz bytes.
    #[instrument(skip(self))]
    pub async fn identity_archive(&self, organization_id: &str, user_id: &str) -> Result<Vec<u8>> {
        let result = self.try_identity_archive(organization_id, user_id).await;
        log_archive("export identity archive", &result);
        result
    }

    /// TLS bundle of an identity as tar.gz bytes.
    #[instrument(skip(self))]
    pub async fn transport_archive(&self, organization_id: &str, user_id: &str) -> Result<Vec<u8>> {
        let result = self.try_transport_archive(organization_id, user_id).await;
        log_archive("export transport archive", &result);
        result
    }

    async fn try_identity_archive(&self, organization_id: &str, user_id: &str) -> Result<Vec<u8>> {
        let (org, identity) = self.load(organization_id, user_id).await?;
        msp_archive::build_identity_archive(&org, &identity)
            .map_err(ServiceError::packaging("identity archive"))
    }

    async fn try_transport_archive(&self, organization_id: &str, user_id: &str) -> Result<Vec<u8>> {
        let (org, identity) = self.load(organization_id, user_id).await?;
        msp_archive::build_transport_archive(&org, &identity)
            .map_err(ServiceError::packaging("transport archive"))
    }

    async fn load(&self, organization_id: &str, user_id: &str) -> Result<(Organization, Identity)> {
        validate::identifier("organization_id", organization_id)?;
        validate::identifier("user_id", user_id)?;
        let org = self.store.get_organization(organization_id).await?;
        let identity = self.store.get_identity(organization_id, user_id).await?;
        Ok((org, identity))
    }
}

fn log_archive(operation: &'static str, result: &Result<Vec<u8>>) {
    if let Ok(bytes) = result {
        info!(bytes = bytes.len(), "archive built");
    }
    log_outcome(operation, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{CreateOrganization, EnrollIdentity};
    use crate::store::{FileStore, MemoryStore};
    use crate::{IdentityService, OrganizationService};
    use msp_archive::read_archive;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    async fn seed(store: Arc<dyn Store>) -> Identity {
        assert_ok!(
            OrganizationService::new(Arc::clone(&store))
                .create(CreateOrganization {
                    organization_id: "org1".into(),
                    name: "Org One".into(),
                    domain: "example.com".into(),
                    org_type: "peer".into(),
                    ..CreateOrganization::default()
                })
                .await
        );
        assert_ok!(
            IdentityService::new(store)
                .enroll(EnrollIdentity {
                    organization_id: "org1".into(),
                    user_id: "alice".into(),
                    role: "client".into(),
                    sans: vec!["peer0.example.com".into()],
                })
                .await
        )
    }

    #[tokio::test]
    async fn test_identity_archive_end_to_end() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let alice = seed(Arc::clone(&store)).await;
        let exports = ExportService::new(store);

        let bytes = assert_ok!(exports.identity_archive("org1", "alice").await);
        let entries = read_archive(&bytes).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();

        assert_eq!(paths.len(), 5);
        assert_eq!(paths[0], "config.yaml");
        assert_eq!(paths[1], "cacerts/ca.example.com-cert.pem");
        assert_eq!(paths[2], "tlscacerts/tlsca.example.com-cert.pem");
        assert!(paths[3].starts_with("keystore/") && paths[3].ends_with("_sk"));
        assert_eq!(paths[4], "signcerts/alice.example.com-cert.pem");
        assert_eq!(entries[3].content, alice.private_key_pem.as_bytes());

        // Stable across calls.
        assert_eq!(assert_ok!(exports.identity_archive("org1", "alice").await), bytes);
    }

    #[tokio::test]
    async fn test_transport_archive_from_file_store() {
        let dir = TempDir::new().unwrap();
        let store: Arc<dyn Store> = Arc::new(FileStore::new(dir.path()));
        let alice = seed(Arc::clone(&store)).await;

        let bytes = assert_ok!(ExportService::new(store).transport_archive("org1", "alice").await);
        let entries = read_archive(&bytes).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["ca.crt", "server.crt", "server.key"]);
        assert_eq!(entries[1].content, alice.transport_certificate_pem.as_bytes());
        assert_eq!(entries[2].mode, 0o600);
    }

    #[tokio::test]
    async fn test_missing_identity_is_not_found() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        seed(Arc::clone(&store)).await;
        let exports = ExportService::new(store);

        let err = assert_err!(exports.identity_archive("org1", "bob").await);
        assert_eq!(err.status_code(), 404);
        let err = assert_err!(exports.transport_archive("org2", "alice").await);
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_corrupt_key_is_packaging_error() {
        let store = Arc::new(MemoryStore::new());
        let mut alice = seed(Arc::clone(&store) as Arc<dyn Store>).await;
        alice.user_id = "mallory".into();
        alice.private_key_pem = "not a key".into();
        store.create_identity(&alice).await.unwrap();

        let err = assert_err!(
            ExportService::new(store)
                .identity_archive("org1", "mallory")
                .await
        );
        assert_eq!(err.step(), Some("identity archive"));
        assert_eq!(err.status_code(), 500);
    }
}
