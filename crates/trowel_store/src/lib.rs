//! # Trowel Store
//!
//! Versioned trench storage and the attachment blob store.
//!
//! A *trench* is one independently versioned dataset. This crate defines the
//! two narrow interfaces the reconciler depends on:
//!
//! - [`VersionStore`] - current head id, checkout-by-id, read current
//!   records, atomic commit with author metadata
//! - [`AttachmentStore`] - existence check, read, and write of binary blobs
//!   keyed by name and content validator
//!
//! and two implementations:
//!
//! - [`MemoryTrench`] - in-memory, for tests
//! - [`FileTrench`] - persistent, one directory per trench
//!
//! # Concurrency
//!
//! The store is the sole arbiter of per-trench concurrency: opening a
//! [`FileTrench`] takes a blocking exclusive advisory lock, so concurrent
//! requests against one trench serialize at open and the reconciler's
//! read-then-decide-then-commit sequence never interleaves with another
//! commit. The lock is released when the handle drops.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod attachment;
mod error;
mod file;
mod memory;
mod version;

pub use attachment::{AttachmentMeta, AttachmentStore};
pub use error::{StoreError, StoreResult};
pub use file::FileTrench;
pub use memory::MemoryTrench;
pub use version::{Author, VersionId, VersionStore};
