//! JSON documents on disk, one file per record.
//!
//! ```text
//! <root>/organizations/<organization_id>.json
//! <root>/identities/<organization_id>/<user_id>.json
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use msp_core::{Identity, Organization};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::{Store, StoreError};
use crate::record::{IdentityRecord, OrganizationRecord};

const ORGANIZATIONS_DIR: &str = "organizations";
const IDENTITIES_DIR: &str = "identities";
const EXTENSION: &str = "json";

/// Store rooted at a directory. Records are published with a hard link,
/// which fails if the target exists, so concurrent creates of the same key
/// cannot both succeed.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn organization_path(&self, organization_id: &str) -> Result<PathBuf, StoreError> {
        Ok(self
            .root
            .join(ORGANIZATIONS_DIR)
            .join(file_name(organization_id)?))
    }

    fn identity_dir(&self, organization_id: &str) -> Result<PathBuf, StoreError> {
        Ok(self
            .root
            .join(IDENTITIES_DIR)
            .join(path_component(organization_id)?))
    }

    fn identity_path(&self, organization_id: &str, user_id: &str) -> Result<PathBuf, StoreError> {
        Ok(self.identity_dir(organization_id)?.join(file_name(user_id)?))
    }
}

#[async_trait]
impl Store for FileStore {
    async fn create_organization(&self, org: &Organization) -> Result<(), StoreError> {
        let path = self.organization_path(&org.organization_id)?;
        if write_new(&path, &OrganizationRecord::from(org)).await? {
            Ok(())
        } else {
            Err(StoreError::organization_exists(&org.organization_id))
        }
    }

    async fn get_organization(&self, organization_id: &str) -> Result<Organization, StoreError> {
        let path = self.organization_path(organization_id)?;
        let record: OrganizationRecord = read(&path)
            .await?
            .ok_or_else(|| StoreError::organization_not_found(organization_id))?;
        Organization::try_from(record)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError> {
        let dir = self.root.join(ORGANIZATIONS_DIR);
        let mut out = Vec::new();
        for path in list_json(&dir).await? {
            if let Some(record) = read::<OrganizationRecord>(&path).await? {
                out.push(Organization::try_from(record)?);
            }
        }
        Ok(out)
    }

    async fn create_identity(&self, identity: &Identity) -> Result<(), StoreError> {
        let path = self.identity_path(&identity.organization_id, &identity.user_id)?;
        if write_new(&path, &IdentityRecord::from(identity)).await? {
            Ok(())
        } else {
            Err(StoreError::identity_exists(
                &identity.organization_id,
                &identity.user_id,
            ))
        }
    }

    async fn get_identity(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Identity, StoreError> {
        let path = self.identity_path(organization_id, user_id)?;
        let record: IdentityRecord = read(&path)
            .await?
            .ok_or_else(|| StoreError::identity_not_found(organization_id, user_id))?;
        Identity::try_from(record)
    }

    async fn list_identities(&self, organization_id: &str) -> Result<Vec<Identity>, StoreError> {
        let dir = self.identity_dir(organization_id)?;
        let mut out = Vec::new();
        for path in list_json(&dir).await? {
            if let Some(record) = read::<IdentityRecord>(&path).await? {
                out.push(Identity::try_from(record)?);
            }
        }
        Ok(out)
    }
}

/// Reject keys that would escape their directory.
fn path_component(key: &str) -> Result<&str, StoreError> {
    if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\', '\0']) {
        return Err(StoreError::Backend(format!("unusable record key {key:?}")));
    }
    Ok(key)
}

fn file_name(key: &str) -> Result<String, StoreError> {
    Ok(format!("{}.{EXTENSION}", path_component(key)?))
}

fn backend(path: &Path, e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(format!("{}: {e}", path.display()))
}

/// Write `value` to a file that must not exist yet. `Ok(false)` if it does.
///
/// The body is staged in a temporary file and published with a hard link,
/// so `path` either holds a complete record or does not exist.
async fn write_new<T: Serialize>(path: &Path, value: &T) -> Result<bool, StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| backend(parent, e))?;
    }

    let body = serde_json::to_vec_pretty(value).map_err(|e| backend(path, e))?;
    let staging = staging_path(path);
    let result = publish(&staging, path, &body).await;

    if let Err(e) = fs::remove_file(&staging).await {
        if e.kind() != ErrorKind::NotFound {
            warn!(path = %staging.display(), error = %e, "staging file not removed");
        }
    }

    let created = result?;
    if created {
        debug!(path = %path.display(), bytes = body.len(), "record written");
    }
    Ok(created)
}

async fn publish(staging: &Path, path: &Path, body: &[u8]) -> Result<bool, StoreError> {
    let mut file = fs::File::create(staging)
        .await
        .map_err(|e| backend(staging, e))?;
    file.write_all(body).await.map_err(|e| backend(staging, e))?;
    file.flush().await.map_err(|e| backend(staging, e))?;
    drop(file);

    match fs::hard_link(staging, path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(backend(path, e)),
    }
}

/// Hidden sibling of `path`, unique within the process. Not a `.json` file,
/// so listings skip it.
fn staging_path(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{name}.{}.{n}.tmp", std::process::id()))
}

/// Read and decode a record. `Ok(None)` if the file does not exist.
async fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let body = match fs::read(path).await {
        Ok(body) => body,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(backend(path, e)),
    };
    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|e| backend(path, e))
}

/// `*.json` files in `dir`, sorted by name. Empty if `dir` is missing.
async fn list_json(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(backend(dir, e)),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| backend(dir, e))? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
