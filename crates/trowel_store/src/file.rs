//! Persistent file-backed trench.
//!
//! On-disk layout, one directory per trench:
//!
//! ```text
//! <root>/<trench>/
//! ├─ LOCK                 # Advisory lock, held for the handle's lifetime
//! ├─ HEAD                 # Current version id; absent or empty = no history
//! ├─ versions/<id>.json   # One file per version: parent, author, records
//! └─ attachments/<path>   # Blob, with validator sidecar <path>.etag
//! ```
//!
//! All multi-file updates use write-temp-then-rename followed by a directory
//! fsync, so a crash leaves `HEAD` naming a fully written version.

use crate::attachment::{AttachmentMeta, AttachmentStore};
use crate::error::{StoreError, StoreResult};
use crate::version::{Author, VersionId, VersionStore};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use trowel_model::SurveySet;

const LOCK_FILE: &str = "LOCK";
const HEAD_FILE: &str = "HEAD";
const VERSIONS_DIR: &str = "versions";
const ATTACHMENTS_DIR: &str = "attachments";
const ETAG_SUFFIX: &str = ".etag";
const TEMP_SUFFIX: &str = ".tmp";

/// One committed version as stored on disk.
#[derive(Debug, Serialize, Deserialize)]
struct VersionRecord {
    parent: Option<VersionId>,
    uid: String,
    username: String,
    message: String,
    timestamp: u64,
    surveys: SurveySet,
}

/// A file-backed trench implementing both store interfaces.
///
/// Opening takes a blocking exclusive advisory lock on the trench's `LOCK`
/// file; a second opener (same or another process) waits until the first
/// handle drops. This makes the store the per-trench serialization point for
/// the reconciler's read-then-decide-then-commit sequence.
#[derive(Debug)]
pub struct FileTrench {
    path: PathBuf,
    _lock_file: File,
}

impl FileTrench {
    /// Opens an existing trench under `root`, blocking until the trench
    /// lock is available.
    ///
    /// # Errors
    ///
    /// Returns `TrenchNotFound` if no directory named `name` exists under
    /// `root`, or an I/O error if the lock cannot be acquired.
    pub fn open(root: &Path, name: &str) -> StoreResult<Self> {
        let path = root.join(name);
        if !path.is_dir() {
            return Err(StoreError::TrenchNotFound(name.to_string()));
        }

        fs::create_dir_all(path.join(VERSIONS_DIR))?;
        fs::create_dir_all(path.join(ATTACHMENTS_DIR))?;

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.join(LOCK_FILE))?;
        lock_file.lock_exclusive()?;

        Ok(Self {
            path,
            _lock_file: lock_file,
        })
    }

    /// Creates a new trench directory under `root` and opens it.
    ///
    /// Creating an already-existing trench is not an error; the existing
    /// history is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or locked.
    pub fn create(root: &Path, name: &str) -> StoreResult<Self> {
        fs::create_dir_all(root.join(name))?;
        Self::open(root, name)
    }

    /// Returns the trench directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_FILE)
    }

    fn version_path(&self, id: &str) -> PathBuf {
        self.path.join(VERSIONS_DIR).join(format!("{id}.json"))
    }

    fn load_version(&self, id: &str) -> StoreResult<VersionRecord> {
        if !is_safe_version_id(id) {
            return Err(StoreError::VersionNotFound(id.to_string()));
        }
        let data = match fs::read(self.version_path(id)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::VersionNotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&data)?)
    }

    fn blob_path(&self, name: &str) -> StoreResult<PathBuf> {
        Ok(self.path.join(ATTACHMENTS_DIR).join(attachment_rel(name)?))
    }

    fn etag_path(&self, name: &str) -> StoreResult<PathBuf> {
        let mut path = self.blob_path(name)?.into_os_string();
        path.push(ETAG_SUFFIX);
        Ok(PathBuf::from(path))
    }

    fn stored_checksum(&self, name: &str) -> Option<String> {
        let etag = self.etag_path(name).ok()?;
        fs::read_to_string(etag).ok().map(|s| s.trim().to_string())
    }
}

impl VersionStore for FileTrench {
    fn head(&self) -> StoreResult<Option<VersionId>> {
        match fs::read_to_string(self.head_path()) {
            Ok(contents) => {
                let id = contents.trim().to_string();
                Ok((!id.is_empty()).then_some(id))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn checkout(&self, id: &str) -> StoreResult<SurveySet> {
        Ok(self.load_version(id)?.surveys)
    }

    fn current(&self) -> StoreResult<SurveySet> {
        match self.head()? {
            Some(id) => Ok(self.load_version(&id)?.surveys),
            None => Ok(SurveySet::new()),
        }
    }

    fn commit(&mut self, author: &Author, surveys: &SurveySet) -> StoreResult<VersionId> {
        let head = self.head()?;
        let canonical = serde_json::to_vec(surveys)?;

        // A commit of the current record set is a no-op.
        if let Some(head_id) = &head {
            let current = self.load_version(head_id)?;
            if serde_json::to_vec(&current.surveys)? == canonical {
                return Ok(head_id.clone());
            }
        }

        let mut hasher = Sha256::new();
        if let Some(parent) = &head {
            hasher.update(parent.as_bytes());
        }
        hasher.update(&canonical);
        let id = hex::encode(hasher.finalize());

        let record = VersionRecord {
            parent: head,
            uid: author.uid.clone(),
            username: author.username.clone(),
            message: author.message.clone(),
            timestamp: unix_timestamp(),
            surveys: surveys.clone(),
        };

        write_atomic(&self.version_path(&id), &serde_json::to_vec_pretty(&record)?)?;
        sync_directory(&self.path.join(VERSIONS_DIR))?;

        write_atomic(&self.head_path(), id.as_bytes())?;
        sync_directory(&self.path)?;

        Ok(id)
    }
}

impl AttachmentStore for FileTrench {
    fn exists(&self, name: &str, checksum: &str) -> bool {
        if checksum.is_empty() {
            return false;
        }
        match self.blob_path(name) {
            Ok(blob) => {
                blob.is_file() && self.stored_checksum(name).as_deref() == Some(checksum)
            }
            Err(_) => false,
        }
    }

    fn read(&self, name: &str, checksum: &str) -> StoreResult<(Vec<u8>, AttachmentMeta)> {
        if !self.exists(name, checksum) {
            return Err(StoreError::AttachmentNotFound {
                name: name.to_string(),
                checksum: checksum.to_string(),
            });
        }
        let blob = self.blob_path(name)?;
        let data = fs::read(&blob)?;
        let metadata = fs::metadata(&blob)?;
        let meta = AttachmentMeta {
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        };
        Ok((data, meta))
    }

    fn write(&mut self, name: &str, checksum: &str, data: &[u8]) -> StoreResult<()> {
        let blob = self.blob_path(name)?;
        if let Some(parent) = blob.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomic(&blob, data)?;
        write_atomic(&self.etag_path(name)?, checksum.as_bytes())?;
        if let Some(parent) = blob.parent() {
            sync_directory(parent)?;
        }
        Ok(())
    }
}

/// Version ids are hex digests (or test-style short names); anything that
/// could address outside `versions/` is treated as unknown.
fn is_safe_version_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validates an attachment name and returns it as a relative path.
fn attachment_rel(name: &str) -> StoreResult<PathBuf> {
    if name.is_empty() {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    let mut rel = PathBuf::new();
    for segment in name.split('/') {
        if segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains('\\')
        {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        rel.push(segment);
    }
    Ok(rel)
}

fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(TEMP_SUFFIX);
    let tmp = PathBuf::from(tmp);

    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp, path)
}

#[cfg(unix)]
fn sync_directory(path: &Path) -> io::Result<()> {
    File::open(path)?.sync_all()
}

#[cfg(not(unix))]
fn sync_directory(_path: &Path) -> io::Result<()> {
    // NTFS journaling covers metadata durability on Windows.
    Ok(())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
