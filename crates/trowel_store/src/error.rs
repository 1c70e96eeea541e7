//! Error types for store operations.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the trench and attachment stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A version file could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// No trench exists under the given name.
    #[error("no trench '{0}'")]
    TrenchNotFound(String),

    /// The requested version identifier is not in the trench's history.
    #[error("unknown version '{0}'")]
    VersionNotFound(String),

    /// No attachment matches the given name and validator.
    #[error("no attachment '{name}' [{checksum}]")]
    AttachmentNotFound {
        /// The requested attachment name.
        name: String,
        /// The requested content validator.
        checksum: String,
    },

    /// An attachment name escapes the trench directory or is empty.
    #[error("invalid attachment name '{0}'")]
    InvalidName(String),

    /// On-disk state that should exist is unreadable or inconsistent.
    #[error("trench corrupted: {0}")]
    Corrupted(String),
}

impl StoreError {
    /// Returns true if the error means the requested entity does not exist,
    /// as opposed to a storage fault.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::TrenchNotFound(_)
                | StoreError::VersionNotFound(_)
                | StoreError::AttachmentNotFound { .. }
        )
    }
}
