use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use msp_core::{Identity, Role};
use tracing::{info, instrument};

use crate::error::{Result, ServiceError};
use crate::request::EnrollIdentity;
use crate::store::{Store, StoreError};
use crate::{log_outcome, validate};

/// Enrolls users and nodes under existing organizations.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn Store>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Generate a key for the user and issue its signing and transport
    /// certificates from the organization's CAs.
    #[instrument(
        skip(self, request),
        fields(organization_id = %request.organization_id, user_id = %request.user_id)
    )]
    pub async fn enroll(&self, request: EnrollIdentity) -> Result<Identity> {
        let result = self.try_enroll(request).await;
        log_outcome("enroll identity", &result);
        result
    }

    #[instrument(skip(self))]
    pub async fn get(&self, organization_id: &str, user_id: &str) -> Result<Identity> {
        let result = self.try_get(organization_id, user_id).await;
        log_outcome("get identity", &result);
        result
    }

    /// Identities of an existing organization, ordered by user id.
    #[instrument(skip(self))]
    pub async fn list(&self, organization_id: &str) -> Result<Vec<Identity>> {
        let result = self.try_list(organization_id).await;
        log_outcome("list identities", &result);
        result
    }

    async fn try_get(&self, organization_id: &str, user_id: &str) -> Result<Identity> {
        validate::identifier("organization_id", organization_id)?;
        validate::identifier("user_id", user_id)?;
        Ok(self.store.get_identity(organization_id, user_id).await?)
    }

    async fn try_list(&self, organization_id: &str) -> Result<Vec<Identity>> {
        validate::identifier("organization_id", organization_id)?;
        self.store.get_organization(organization_id).await?;
        Ok(self.store.list_identities(organization_id).await?)
    }

    async fn try_enroll(&self, request: EnrollIdentity) -> Result<Identity> {
        validate::identifier("organization_id", &request.organization_id)?;
        validate::identifier("user_id", &request.user_id)?;
        let role: Role = request
            .role
            .parse()
            .map_err(|e| ServiceError::Invalid(format!("{e}")))?;
        validate::sans(&request.sans)?;

        let org = self.store.get_organization(&request.organization_id).await?;

        match self
            .store
            .get_identity(&request.organization_id, &request.user_id)
            .await
        {
            Ok(_) => {
                return Err(
                    StoreError::identity_exists(&request.organization_id, &request.user_id).into(),
                )
            }
            Err(StoreError::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        let enrolled = msp_ca::enroll_identity(
            &org.dn_template(),
            &request.user_id,
            &org.domain,
            role,
            &request.sans,
            &org.ca_pair(),
        )
        .map_err(ServiceError::issuance("certificate enrollment"))?;

        let now = Utc::now().trunc_subsecs(0);
        let identity = Identity {
            organization_id: request.organization_id,
            user_id: request.user_id,
            role,
            sans: request.sans,
            private_key_pem: enrolled.key.private_key_pem().to_string(),
            signing_certificate_pem: enrolled.signing_certificate.pem,
            transport_certificate_pem: enrolled.transport_certificate.pem,
            created_at: now,
            updated_at: now,
        };

        self.store.create_identity(&identity).await?;
        info!(role = %identity.role, sans = identity.sans.len(), "identity enrolled");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::CreateOrganization;
    use crate::store::{MemoryStore, RecordKind};
    use crate::OrganizationService;
    use msp_core::{CertificateAuthority, Organization};
    use tokio_test::{assert_err, assert_ok};
    use x509_parser::pem::parse_x509_pem;

    async fn setup() -> (OrganizationService, IdentityService) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let orgs = OrganizationService::new(Arc::clone(&store));
        assert_ok!(
            orgs.create(CreateOrganization {
                organization_id: "org1".into(),
                name: "Org One".into(),
                domain: "example.com".into(),
                org_type: "peer".into(),
                ..CreateOrganization::default()
            })
            .await
        );
        (orgs, IdentityService::new(store))
    }

    fn request(user: &str, role: &str) -> EnrollIdentity {
        EnrollIdentity {
            organization_id: "org1".into(),
            user_id: user.into(),
            role: role.into(),
            sans: vec!["peer0.example.com".into()],
        }
    }

    fn verifies(cert_pem: &str, ca: &CertificateAuthority) -> bool {
        let (_, ca_pem) = parse_x509_pem(ca.certificate_pem.as_bytes()).unwrap();
        let (_, leaf_pem) = parse_x509_pem(cert_pem.as_bytes()).unwrap();
        let ca_cert = ca_pem.parse_x509().unwrap();
        let leaf = leaf_pem.parse_x509().unwrap();
        leaf.verify_signature(Some(ca_cert.public_key())).is_ok()
    }

    #[tokio::test]
    async fn test_enroll_chains_to_org_cas() {
        let (orgs, identities) = setup().await;
        let org: Organization = assert_ok!(orgs.get("org1").await);

        let alice = assert_ok!(identities.enroll(request("alice", "Client")).await);
        assert_eq!(alice.role, Role::Client);
        assert_eq!(alice.sans, vec!["peer0.example.com"]);

        assert!(verifies(&alice.signing_certificate_pem, &org.signing_ca));
        assert!(verifies(&alice.transport_certificate_pem, &org.transport_ca));
        assert!(!verifies(&alice.transport_certificate_pem, &org.signing_ca));

        let (_, pem) = parse_x509_pem(alice.signing_certificate_pem.as_bytes()).unwrap();
        let cert = pem.parse_x509().unwrap();
        let cn = cert
            .subject()
            .iter_common_name()
            .next()
            .and_then(|attr| attr.as_str().ok());
        assert_eq!(cn, Some("alice.example.com"));
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let (_, identities) = setup().await;
        let bob = assert_ok!(identities.enroll(request("bob", "peer")).await);
        let alice = assert_ok!(identities.enroll(request("alice", "admin")).await);

        assert_eq!(assert_ok!(identities.get("org1", "bob").await), bob);
        assert_eq!(assert_ok!(identities.list("org1").await), vec![alice, bob]);
    }

    #[tokio::test]
    async fn test_unknown_organization_is_not_found() {
        let (_, identities) = setup().await;
        let err = assert_err!(
            identities
                .enroll(EnrollIdentity {
                    organization_id: "org9".into(),
                    ..request("alice", "client")
                })
                .await
        );
        assert!(matches!(
            err,
            ServiceError::NotFound { kind: RecordKind::Organization, .. }
        ));
        assert_eq!(err.status_code(), 404);

        assert_eq!(assert_err!(identities.list("org9").await).status_code(), 404);
        assert_eq!(assert_err!(identities.get("org1", "nobody").await).status_code(), 404);
    }

    #[tokio::test]
    async fn test_duplicate_user_is_bad_request() {
        let (_, identities) = setup().await;
        assert_ok!(identities.enroll(request("alice", "client")).await);
        let err = assert_err!(identities.enroll(request("alice", "peer")).await);
        assert!(matches!(
            err,
            ServiceError::AlreadyExists { kind: RecordKind::Identity, .. }
        ));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_invalid_requests() {
        let (_, identities) = setup().await;
        let cases = [
            request("alice", "wizard"),
            request("", "client"),
            request("al/ice", "client"),
            EnrollIdentity {
                sans: vec![String::new()],
                ..request("alice", "client")
            },
            EnrollIdentity {
                sans: vec!["pëer.example.com".into()],
                ..request("alice", "client")
            },
        ];
        for case in cases {
            let err = assert_err!(identities.enroll(case).await);
            assert!(matches!(err, ServiceError::Invalid(_)), "{err}");
        }
    }
}
