//! Error types for archive packaging.

use thiserror::Error;

/// Result type for msp-archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while assembling or reading an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Writing the tar or gzip stream failed.
    #[error("archive encoding failed: {0}")]
    Encoding(String),

    /// The same path was added twice.
    #[error("duplicate archive path: {0}")]
    DuplicatePath(String),

    /// The identity key could not be parsed to name its keystore file.
    #[error("cannot derive key identifier: {0}")]
    KeyIdentifier(String),

    /// Reading an archive back failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
