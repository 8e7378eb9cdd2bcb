use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use async_trait::async_trait;
use msp_core::{Identity, Organization};
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::record::{IdentityRecord, OrganizationRecord};

/// In-process store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    organizations: RwLock<BTreeMap<String, OrganizationRecord>>,
    identities: RwLock<BTreeMap<(String, String), IdentityRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_organization(&self, org: &Organization) -> Result<(), StoreError> {
        let mut organizations = self.organizations.write().await;
        match organizations.entry(org.organization_id.clone()) {
            Entry::Occupied(_) => Err(StoreError::organization_exists(&org.organization_id)),
            Entry::Vacant(slot) => {
                slot.insert(OrganizationRecord::from(org));
                Ok(())
            }
        }
    }

    async fn get_organization(&self, organization_id: &str) -> Result<Organization, StoreError> {
        let record = self
            .organizations
            .read()
            .await
            .get(organization_id)
            .cloned()
            .ok_or_else(|| StoreError::organization_not_found(organization_id))?;
        Organization::try_from(record)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError> {
        let organizations = self.organizations.read().await;
        organizations
            .values()
            .cloned()
            .map(Organization::try_from)
            .collect()
    }

    async fn create_identity(&self, identity: &Identity) -> Result<(), StoreError> {
        let key = (identity.organization_id.clone(), identity.user_id.clone());
        let mut identities = self.identities.write().await;
        match identities.entry(key) {
            Entry::Occupied(_) => Err(StoreError::identity_exists(
                &identity.organization_id,
                &identity.user_id,
            )),
            Entry::Vacant(slot) => {
                slot.insert(IdentityRecord::from(identity));
                Ok(())
            }
        }
    }

    async fn get_identity(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Identity, StoreError> {
        let key = (organization_id.to_string(), user_id.to_string());
        let record = self
            .identities
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| StoreError::identity_not_found(organization_id, user_id))?;
        Identity::try_from(record)
    }

    async fn list_identities(&self, organization_id: &str) -> Result<Vec<Identity>, StoreError> {
        let identities = self.identities.read().await;
        identities
            .iter()
            .filter(|((org, _), _)| org == organization_id)
            .map(|(_, record)| Identity::try_from(record.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::conformance;

    #[tokio::test]
    async fn test_organizations() {
        conformance::organizations(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_identities() {
        conformance::identities(&MemoryStore::new()).await;
    }
}
