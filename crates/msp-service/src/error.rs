//! Service-level errors and their status mapping.

use msp_archive::ArchiveError;
use msp_ca::CaError;
use thiserror::Error;

use crate::store::{RecordKind, StoreError};

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors returned by the organization, identity and export services.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request failed validation.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// A record with the same key exists.
    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: RecordKind, key: String },

    /// The referenced record does not exist.
    #[error("{kind} {key} not found")]
    NotFound { kind: RecordKind, key: String },

    /// CA creation or certificate issuance failed.
    #[error("{step} failed: {source}")]
    Issuance {
        step: &'static str,
        #[source]
        source: CaError,
    },

    /// Archive assembly failed.
    #[error("{step} failed: {source}")]
    Packaging {
        step: &'static str,
        #[source]
        source: ArchiveError,
    },

    /// The store backend failed.
    #[error("store error: {0}")]
    Store(String),
}

impl ServiceError {
    /// HTTP-style status code for this error.
    ///
    /// Duplicates are reported as 400, not 409.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Invalid(_) | Self::AlreadyExists { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::Issuance { .. } | Self::Packaging { .. } | Self::Store(_) => 500,
        }
    }

    /// True when the caller, not the system, is at fault.
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// The step that failed, for issuance and packaging errors.
    pub const fn step(&self) -> Option<&'static str> {
        match self {
            Self::Issuance { step, .. } | Self::Packaging { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub(crate) fn issuance(step: &'static str) -> impl FnOnce(CaError) -> Self {
        move |source| Self::Issuance { step, source }
    }

    pub(crate) fn packaging(step: &'static str) -> impl FnOnce(ArchiveError) -> Self {
        move |source| Self::Packaging { step, source }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists { kind, key } => Self::AlreadyExists { kind, key },
            StoreError::NotFound { kind, key } => Self::NotFound { kind, key },
            StoreError::Backend(msg) => Self::Store(msg),
        }
    }
}
