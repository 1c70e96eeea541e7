//! Attachment transfer handlers.
//!
//! These are the transport-independent read/write operations; the HTTP
//! layer maps them onto `GET`/`PUT` with `If-Match`/`ETag` validators.

use crate::error::{ServerError, ServerResult};
use tracing::info;
use trowel_store::{AttachmentMeta, AttachmentStore};

/// Reads an attachment blob by name and content validator.
///
/// # Errors
///
/// Returns `AttachmentNotFound` (404) if the pair does not exist; an empty
/// checksum never matches.
pub fn read_attachment<S: AttachmentStore>(
    store: &S,
    name: &str,
    checksum: &str,
) -> ServerResult<(Vec<u8>, AttachmentMeta)> {
    let (data, meta) = store.read(name, checksum)?;
    info!(name, checksum, bytes = meta.size, "read attachment");
    Ok((data, meta))
}

/// Stores an attachment blob under a checksum-qualified name.
///
/// Both name and checksum are mandatory; their absence is a client error
/// and the blob store is never consulted.
///
/// # Errors
///
/// Returns `InvalidRequest` on a missing name or checksum, or a store error
/// if the write fails.
pub fn write_attachment<S: AttachmentStore>(
    store: &mut S,
    name: &str,
    checksum: &str,
    data: &[u8],
) -> ServerResult<()> {
    if name.is_empty() {
        return Err(ServerError::InvalidRequest(
            "invalid attachment name".into(),
        ));
    }
    if checksum.is_empty() {
        return Err(ServerError::InvalidRequest("missing etag".into()));
    }
    store.write(name, checksum, data)?;
    info!(name, checksum, bytes = data.len(), "wrote attachment");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trowel_store::MemoryTrench;

    #[test]
    fn write_then_read() {
        let mut trench = MemoryTrench::new();
        write_attachment(&mut trench, "photo.jpg", "2023-01-01", b"bytes").unwrap();

        let (data, meta) = read_attachment(&trench, "photo.jpg", "2023-01-01").unwrap();
        assert_eq!(data, b"bytes");
        assert_eq!(meta.size, 5);
    }

    #[test]
    fn read_unknown_is_not_found() {
        let trench = MemoryTrench::new();
        let err = read_attachment(&trench, "photo.jpg", "2023-01-01").unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn write_without_name_is_client_error() {
        let mut trench = MemoryTrench::new();
        let err = write_attachment(&mut trench, "", "2023-01-01", b"bytes").unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn write_without_checksum_is_client_error() {
        let mut trench = MemoryTrench::new();
        let err = write_attachment(&mut trench, "photo.jpg", "", b"bytes").unwrap_err();
        assert!(err.is_client_error());
        assert!(!trench.exists("photo.jpg", ""));
    }
}
