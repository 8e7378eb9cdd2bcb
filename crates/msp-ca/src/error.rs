//! Error types for certificate authority operations.

use thiserror::Error;

/// Result type for msp-ca operations.
pub type Result<T> = std::result::Result<T, CaError>;

/// Errors that can occur while creating CAs or issuing certificates.
///
/// None of these are retryable: they come from malformed input or from the
/// local crypto provider, never from I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaError {
    /// Randomness or key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Self-signing or encoding the CA certificate failed.
    #[error("certificate encoding failed: {0}")]
    CertificateEncoding(String),

    /// The subject public key is malformed, zero, or of an unsupported type.
    #[error("invalid subject public key: {0}")]
    InvalidSubjectKey(String),

    /// The issuing CA key or certificate is unusable, or signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The role set is empty.
    #[error("invalid role set: {0}")]
    InvalidRoles(String),

    /// A subject alternative name is neither an IP address nor an IA5 DNS name.
    #[error("invalid subject alternative name {name:?}: {reason}")]
    InvalidSubjectAltName {
        /// The offending name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A stored private key could not be parsed.
    #[error("invalid private key: {0}")]
    InvalidKey(String),
}
