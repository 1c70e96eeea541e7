//! In-memory trench for testing.

use crate::attachment::{AttachmentMeta, AttachmentStore};
use crate::error::{StoreError, StoreResult};
use crate::version::{Author, VersionId, VersionStore};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::SystemTime;
use trowel_model::SurveySet;

/// An in-memory trench implementing both store interfaces.
///
/// Version identifiers are sequential (`"1"`, `"2"`, ...), which keeps test
/// assertions readable. The observable contract matches [`crate::FileTrench`],
/// including no-op commit detection.
///
/// # Example
///
/// ```
/// use trowel_store::{Author, MemoryTrench, VersionStore};
/// use trowel_model::SurveySet;
///
/// let mut trench = MemoryTrench::new();
/// assert!(trench.head().unwrap().is_none());
///
/// let id = trench
///     .commit(&Author::new("u1", "bea", "first"), &SurveySet::new())
///     .unwrap();
/// assert_eq!(trench.head().unwrap(), Some(id));
/// ```
#[derive(Debug, Default)]
pub struct MemoryTrench {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    versions: Vec<(VersionId, SurveySet)>,
    attachments: HashMap<String, StoredBlob>,
}

#[derive(Debug)]
struct StoredBlob {
    checksum: String,
    data: Vec<u8>,
    modified: SystemTime,
}

impl MemoryTrench {
    /// Creates a new empty trench.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of committed versions.
    #[must_use]
    pub fn version_count(&self) -> usize {
        self.inner.read().versions.len()
    }
}

impl VersionStore for MemoryTrench {
    fn head(&self) -> StoreResult<Option<VersionId>> {
        Ok(self.inner.read().versions.last().map(|(id, _)| id.clone()))
    }

    fn checkout(&self, id: &str) -> StoreResult<SurveySet> {
        self.inner
            .read()
            .versions
            .iter()
            .find(|(vid, _)| vid == id)
            .map(|(_, surveys)| surveys.clone())
            .ok_or_else(|| StoreError::VersionNotFound(id.to_string()))
    }

    fn current(&self) -> StoreResult<SurveySet> {
        Ok(self
            .inner
            .read()
            .versions
            .last()
            .map(|(_, surveys)| surveys.clone())
            .unwrap_or_default())
    }

    fn commit(&mut self, _author: &Author, surveys: &SurveySet) -> StoreResult<VersionId> {
        let mut inner = self.inner.write();
        if let Some((id, current)) = inner.versions.last() {
            if current == surveys {
                return Ok(id.clone());
            }
        }
        let id = (inner.versions.len() + 1).to_string();
        inner.versions.push((id.clone(), surveys.clone()));
        Ok(id)
    }
}

impl AttachmentStore for MemoryTrench {
    fn exists(&self, name: &str, checksum: &str) -> bool {
        self.inner
            .read()
            .attachments
            .get(name)
            .is_some_and(|blob| blob.checksum == checksum)
    }

    fn read(&self, name: &str, checksum: &str) -> StoreResult<(Vec<u8>, AttachmentMeta)> {
        let inner = self.inner.read();
        let blob = inner
            .attachments
            .get(name)
            .filter(|blob| blob.checksum == checksum)
            .ok_or_else(|| StoreError::AttachmentNotFound {
                name: name.to_string(),
                checksum: checksum.to_string(),
            })?;
        let meta = AttachmentMeta {
            size: blob.data.len() as u64,
            modified: blob.modified,
        };
        Ok((blob.data.clone(), meta))
    }

    fn write(&mut self, name: &str, checksum: &str, data: &[u8]) -> StoreResult<()> {
        self.inner.write().attachments.insert(
            name.to_string(),
            StoredBlob {
                checksum: checksum.to_string(),
                data: data.to_vec(),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trowel_model::Survey;

    fn author() -> Author {
        Author::new("u1", "bea", "test")
    }

    fn one_record(id: &str, field: &str, value: &str) -> SurveySet {
        let mut survey = Survey::new();
        survey.set(field, value);
        let mut set = SurveySet::new();
        set.insert(id, survey);
        set
    }

    #[test]
    fn new_trench_has_no_head() {
        let trench = MemoryTrench::new();
        assert!(trench.head().unwrap().is_none());
        assert!(trench.current().unwrap().is_empty());
    }

    #[test]
    fn commit_advances_head() {
        let mut trench = MemoryTrench::new();
        let id = trench.commit(&author(), &one_record("r1", "q1", "a")).unwrap();
        assert_eq!(trench.head().unwrap(), Some(id.clone()));
        assert_eq!(trench.current().unwrap(), one_record("r1", "q1", "a"));
        assert_eq!(trench.checkout(&id).unwrap(), one_record("r1", "q1", "a"));
    }

    #[test]
    fn identical_commit_is_noop() {
        let mut trench = MemoryTrench::new();
        let surveys = one_record("r1", "q1", "a");
        let first = trench.commit(&author(), &surveys).unwrap();
        let second = trench.commit(&author(), &surveys).unwrap();
        assert_eq!(first, second);
        assert_eq!(trench.version_count(), 1);
    }

    #[test]
    fn checkout_keeps_history() {
        let mut trench = MemoryTrench::new();
        let v1 = trench.commit(&author(), &one_record("r1", "q1", "a")).unwrap();
        let v2 = trench.commit(&author(), &one_record("r1", "q1", "b")).unwrap();
        assert_ne!(v1, v2);
        assert_eq!(trench.checkout(&v1).unwrap(), one_record("r1", "q1", "a"));
        assert_eq!(trench.head().unwrap(), Some(v2));
    }

    #[test]
    fn checkout_unknown_version_fails() {
        let trench = MemoryTrench::new();
        assert!(matches!(
            trench.checkout("v0"),
            Err(StoreError::VersionNotFound(_))
        ));
    }

    #[test]
    fn attachment_round_trip() {
        let mut trench = MemoryTrench::new();
        trench.write("photo.jpg", "2023-01-01", b"bytes").unwrap();

        assert!(trench.exists("photo.jpg", "2023-01-01"));
        let (data, meta) = trench.read("photo.jpg", "2023-01-01").unwrap();
        assert_eq!(data, b"bytes");
        assert_eq!(meta.size, 5);
    }

    #[test]
    fn stale_validator_reads_as_absent() {
        let mut trench = MemoryTrench::new();
        trench.write("photo.jpg", "2023-01-01", b"bytes").unwrap();

        assert!(!trench.exists("photo.jpg", "2023-01-02"));
        assert!(matches!(
            trench.read("photo.jpg", "2023-01-02"),
            Err(StoreError::AttachmentNotFound { .. })
        ));
    }

    #[test]
    fn rewrite_replaces_validator() {
        let mut trench = MemoryTrench::new();
        trench.write("photo.jpg", "a", b"one").unwrap();
        trench.write("photo.jpg", "b", b"two").unwrap();

        assert!(!trench.exists("photo.jpg", "a"));
        assert!(trench.exists("photo.jpg", "b"));
        assert_eq!(trench.read("photo.jpg", "b").unwrap().0, b"two");
    }
}
