use thiserror::Error;

/// Result type alias for core record operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while interpreting core record values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Role label is not one of the NodeOU identifiers
    #[error("unknown role: {0} (expected client, peer, admin or orderer)")]
    UnknownRole(String),

    /// Organization type is not recognized
    #[error("unknown organization type: {0} (expected peer or orderer)")]
    UnknownOrgType(String),

    /// Certificate authority purpose is not recognized
    #[error("unknown CA purpose: {0} (expected sign or tls)")]
    UnknownCaPurpose(String),
}
