use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use msp_core::{CaPurpose, DistinguishedNameTemplate, OrgType, Organization};
use tracing::{debug, info, instrument};

use crate::error::{Result, ServiceError};
use crate::request::{CreateOrganization, SubjectDefaults};
use crate::store::{Store, StoreError};
use crate::{log_outcome, validate};

/// Creates organizations together with their signing and transport CAs.
#[derive(Clone)]
pub struct OrganizationService {
    store: Arc<dyn Store>,
    defaults: SubjectDefaults,
}

impl OrganizationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_defaults(store, SubjectDefaults::default())
    }

    pub fn with_defaults(store: Arc<dyn Store>, defaults: SubjectDefaults) -> Self {
        Self { store, defaults }
    }

    /// Validate the request, create both CAs and persist the organization.
    #[instrument(skip(self, request), fields(organization_id = %request.organization_id))]
    pub async fn create(&self, request: CreateOrganization) -> Result<Organization> {
        let result = self.try_create(request).await;
        log_outcome("create organization", &result);
        result
    }

    #[instrument(skip(self))]
    pub async fn get(&self, organization_id: &str) -> Result<Organization> {
        let result = self.try_get(organization_id).await;
        log_outcome("get organization", &result);
        result
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Organization>> {
        let result = self.store.list_organizations().await.map_err(Into::into);
        log_outcome("list organizations", &result);
        result
    }

    async fn try_get(&self, organization_id: &str) -> Result<Organization> {
        validate::identifier("organization_id", organization_id)?;
        Ok(self.store.get_organization(organization_id).await?)
    }

    async fn try_create(&self, request: CreateOrganization) -> Result<Organization> {
        validate::identifier("organization_id", &request.organization_id)?;
        validate::required("name", &request.name)?;
        validate::domain(&request.domain)?;
        let org_type: OrgType = request
            .org_type
            .parse()
            .map_err(|e| ServiceError::Invalid(format!("{e}")))?;
        for network_id in &request.network_ids {
            validate::identifier("network_id", network_id)?;
        }

        // Key generation is the expensive part; skip it for known duplicates.
        match self.store.get_organization(&request.organization_id).await {
            Ok(_) => return Err(StoreError::organization_exists(&request.organization_id).into()),
            Err(StoreError::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        let template = self.template(&request);
        let signing_ca = msp_ca::create_ca(&template, CaPurpose::Signing)
            .map_err(ServiceError::issuance("signing CA"))?;
        let transport_ca = msp_ca::create_ca(&template, CaPurpose::Transport)
            .map_err(ServiceError::issuance("transport CA"))?;
        debug!("certificate authorities created");

        let now = Utc::now().trunc_subsecs(0);
        let org = Organization {
            organization_id: template.organization,
            name: request.name,
            domain: request.domain,
            description: request.description,
            org_type,
            network_ids: request.network_ids,
            country: template.country,
            province: template.province,
            locality: template.locality,
            organizational_unit: template.organizational_unit,
            street_address: template.street_address,
            postal_code: template.postal_code,
            signing_ca,
            transport_ca,
            created_at: now,
            updated_at: now,
        };

        self.store.create_organization(&org).await?;
        info!(domain = %org.domain, org_type = %org.org_type, "organization created");
        Ok(org)
    }

    fn template(&self, request: &CreateOrganization) -> DistinguishedNameTemplate {
        let or_default =
            |value: &Option<String>, default: &str| value.clone().unwrap_or_else(|| default.to_string());

        DistinguishedNameTemplate {
            organization: request.organization_id.clone(),
            country: or_default(&request.country, &self.defaults.country),
            province: or_default(&request.province, &self.defaults.province),
            locality: or_default(&request.locality, &self.defaults.locality),
            organizational_unit: request.organizational_unit.clone(),
            street_address: request.street_address.clone(),
            postal_code: or_default(&request.postal_code, &self.defaults.postal_code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, RecordKind};
    use tokio_test::{assert_err, assert_ok};
    use x509_parser::pem::parse_x509_pem;

    fn service() -> OrganizationService {
        OrganizationService::new(Arc::new(MemoryStore::new()))
    }

    fn request(id: &str) -> CreateOrganization {
        CreateOrganization {
            organization_id: id.into(),
            name: format!("{id} name"),
            domain: format!("{id}.example.com"),
            org_type: "peer".into(),
            ..CreateOrganization::default()
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let org = assert_ok!(service().create(request("org1")).await);
        assert_eq!(org.country, "China");
        assert_eq!(org.province, "Beijing");
        assert_eq!(org.locality, "Beijing");
        assert_eq!(org.postal_code, "100000");
        assert_eq!(org.org_type, OrgType::Peer);
        assert_eq!(org.signing_ca.purpose, CaPurpose::Signing);
        assert_eq!(org.transport_ca.purpose, CaPurpose::Transport);
        assert_ne!(org.signing_ca.certificate_pem, org.transport_ca.certificate_pem);
    }

    #[tokio::test]
    async fn test_explicit_fields_override_defaults() {
        let defaults = SubjectDefaults {
            country: "Germany".into(),
            ..SubjectDefaults::default()
        };
        let service = OrganizationService::with_defaults(Arc::new(MemoryStore::new()), defaults);
        let org = assert_ok!(
            service
                .create(CreateOrganization {
                    locality: Some(String::new()),
                    organizational_unit: "blockchain".into(),
                    ..request("org1")
                })
                .await
        );
        assert_eq!(org.country, "Germany");
        assert_eq!(org.locality, "");

        let (_, pem) = parse_x509_pem(org.signing_ca.certificate_pem.as_bytes()).unwrap();
        let cert = pem.parse_x509().unwrap();
        assert!(cert.subject().iter_locality().next().is_none());
        assert_eq!(
            cert.subject()
                .iter_organization()
                .next()
                .and_then(|attr| attr.as_str().ok()),
            Some("org1")
        );
    }

    #[tokio::test]
    async fn test_get_returns_created() {
        let service = service();
        let created = assert_ok!(service.create(request("org1")).await);
        assert_eq!(assert_ok!(service.get("org1").await), created);
        assert_eq!(assert_ok!(service.list().await), vec![created]);
    }

    #[tokio::test]
    async fn test_duplicate_is_bad_request() {
        let service = service();
        assert_ok!(service.create(request("org1")).await);
        let err = assert_err!(service.create(request("org1")).await);
        assert!(matches!(
            err,
            ServiceError::AlreadyExists { kind: RecordKind::Organization, .. }
        ));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_missing_is_not_found() {
        let err = assert_err!(service().get("nope").await);
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_invalid_requests() {
        let service = service();
        let cases = [
            CreateOrganization {
                organization_id: String::new(),
                ..request("org1")
            },
            CreateOrganization {
                domain: "localhost".into(),
                ..request("org1")
            },
            CreateOrganization {
                org_type: "client".into(),
                ..request("org1")
            },
            CreateOrganization {
                name: "  ".into(),
                ..request("org1")
            },
            CreateOrganization {
                organization_id: "../etc".into(),
                ..request("org1")
            },
        ];
        for case in cases {
            let err = assert_err!(service.create(case).await);
            assert!(matches!(err, ServiceError::Invalid(_)), "{err}");
            assert_eq!(err.status_code(), 400);
        }
        assert!(assert_ok!(service.list().await).is_empty());
    }
}
