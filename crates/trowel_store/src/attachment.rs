//! The attachment blob-store interface.

use crate::error::StoreResult;
use std::time::SystemTime;

/// Metadata about a stored attachment blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentMeta {
    /// Blob size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

/// A store of binary attachment blobs for one trench.
///
/// Attachment identity is the pair `(name, checksum)`: the name is a path
/// relative to the trench and the checksum is a strong content validator.
/// A blob whose stored validator differs from the requested one is treated
/// as absent.
pub trait AttachmentStore {
    /// Returns true if a blob named `name` with the given validator exists.
    ///
    /// Any lookup failure reads as absent; this is the safe default for the
    /// missing-attachment gate.
    fn exists(&self, name: &str, checksum: &str) -> bool;

    /// Reads a blob's bytes and metadata.
    ///
    /// # Errors
    ///
    /// Returns `AttachmentNotFound` if the `(name, checksum)` pair does not
    /// exist, or an I/O error if the blob cannot be read.
    fn read(&self, name: &str, checksum: &str) -> StoreResult<(Vec<u8>, AttachmentMeta)>;

    /// Stores a blob under the checksum-qualified name, replacing any
    /// previous content for that name.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be persisted.
    fn write(&mut self, name: &str, checksum: &str, data: &[u8]) -> StoreResult<()>;
}
