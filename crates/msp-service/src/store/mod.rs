//! Persistence boundary for organizations and identities.
//!
//! Stores persist [`crate::record`] types and hand back core types. Lookup
//! failures are a closed enum so callers can match on them.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;

use async_trait::async_trait;
use msp_core::{Identity, Organization};
use thiserror::Error;

/// Kind of record a store error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Organization,
    Identity,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization => f.write_str("organization"),
            Self::Identity => f.write_str("identity"),
        }
    }
}

/// Errors returned by a [`Store`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A record with the same key exists.
    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: RecordKind, key: String },

    /// No record under this key.
    #[error("{kind} {key} not found")]
    NotFound { kind: RecordKind, key: String },

    /// The backend failed or returned a record that cannot be decoded.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn organization_exists(organization_id: &str) -> Self {
        Self::AlreadyExists {
            kind: RecordKind::Organization,
            key: organization_id.to_string(),
        }
    }

    pub(crate) fn organization_not_found(organization_id: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::Organization,
            key: organization_id.to_string(),
        }
    }

    pub(crate) fn identity_exists(organization_id: &str, user_id: &str) -> Self {
        Self::AlreadyExists {
            kind: RecordKind::Identity,
            key: format!("{organization_id}/{user_id}"),
        }
    }

    pub(crate) fn identity_not_found(organization_id: &str, user_id: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::Identity,
            key: format!("{organization_id}/{user_id}"),
        }
    }
}

/// Record storage used by the services.
///
/// `create_*` never overwrites: a second create under the same key fails
/// with [`StoreError::AlreadyExists`]. Lists are ordered by key.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_organization(&self, org: &Organization) -> Result<(), StoreError>;

    async fn get_organization(&self, organization_id: &str) -> Result<Organization, StoreError>;

    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError>;

    async fn create_identity(&self, identity: &Identity) -> Result<(), StoreError>;

    async fn get_identity(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Identity, StoreError>;

    /// Identities of one organization. Empty if the organization has none
    /// or does not exist.
    async fn list_identities(&self, organization_id: &str) -> Result<Vec<Identity>, StoreError>;
}

/// Behavior every store must share, run against each implementation.
#[cfg(test)]
pub(crate) mod conformance {
    use super::*;
    use crate::record::fixtures;

    pub(crate) async fn organizations(store: &dyn Store) {
        store.create_organization(&fixtures::organization("org2")).await.unwrap();
        store.create_organization(&fixtures::organization("org1")).await.unwrap();

        let err = store
            .create_organization(&fixtures::organization("org1"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::organization_exists("org1"));

        assert_eq!(
            store.get_organization("org1").await.unwrap(),
            fixtures::organization("org1")
        );
        assert_eq!(
            store.get_organization("nope").await.unwrap_err(),
            StoreError::organization_not_found("nope")
        );

        let ids: Vec<String> = store
            .list_organizations()
            .await
            .unwrap()
            .into_iter()
            .map(|org| org.organization_id)
            .collect();
        assert_eq!(ids, vec!["org1", "org2"]);
    }

    pub(crate) async fn identities(store: &dyn Store) {
        store.create_identity(&fixtures::identity("org1", "bob")).await.unwrap();
        store.create_identity(&fixtures::identity("org1", "alice")).await.unwrap();
        store.create_identity(&fixtures::identity("org2", "alice")).await.unwrap();

        let err = store
            .create_identity(&fixtures::identity("org1", "alice"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::identity_exists("org1", "alice"));

        let alice = store.get_identity("org1", "alice").await.unwrap();
        assert_eq!(alice, fixtures::identity("org1", "alice"));
        assert_eq!(alice.private_key_pem, "alice-key");

        assert_eq!(
            store.get_identity("org1", "carol").await.unwrap_err(),
            StoreError::identity_not_found("org1", "carol")
        );

        let users: Vec<String> = store
            .list_identities("org1")
            .await
            .unwrap()
            .into_iter()
            .map(|identity| identity.user_id)
            .collect();
        assert_eq!(users, vec!["alice", "bob"]);
        assert!(store.list_identities("org3").await.unwrap().is_empty());
    }
}
