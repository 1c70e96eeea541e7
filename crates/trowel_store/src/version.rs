//! The versioned-storage interface.

use crate::error::StoreResult;
use trowel_model::SurveySet;

/// Identifier of one collection version in a trench's history.
pub type VersionId = String;

/// Commit author metadata, recorded alongside every new version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    /// Submitter identifier.
    pub uid: String,
    /// Submitter display name.
    pub username: String,
    /// Free-text commit message.
    pub message: String,
}

impl Author {
    /// Creates author metadata.
    pub fn new(
        uid: impl Into<String>,
        username: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            username: username.into(),
            message: message.into(),
        }
    }
}

/// A versioned store of survey records for one trench.
///
/// Implementations must provide atomic, serializable commit semantics per
/// trench: either the full submitted record set becomes the new version or
/// none of it does, and no two commits interleave incoherently.
///
/// # Invariants
///
/// - `head` is `None` iff the trench has no history
/// - `checkout(id)` returns exactly the record set committed as `id` and
///   does not move the trench's head
/// - `commit` of a record set identical to the current one returns the
///   unchanged head id (a no-op)
pub trait VersionStore {
    /// Returns the identifier of the current (latest) version, or `None` if
    /// the trench has no history yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the head cannot be read.
    fn head(&self) -> StoreResult<Option<VersionId>>;

    /// Returns the record set of an arbitrary historical version.
    ///
    /// # Errors
    ///
    /// Returns `VersionNotFound` if `id` is not in this trench's history.
    fn checkout(&self, id: &str) -> StoreResult<SurveySet>;

    /// Returns the record set of the current version; empty if the trench
    /// has no history.
    ///
    /// # Errors
    ///
    /// Returns an error if the current version cannot be read.
    fn current(&self) -> StoreResult<SurveySet>;

    /// Atomically commits a new record set, returning the new head id.
    ///
    /// Committing a record set identical to the current one is a no-op and
    /// returns the unchanged head id.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit cannot be persisted; in that case the
    /// trench is left on its previous version.
    fn commit(&mut self, author: &Author, surveys: &SurveySet) -> StoreResult<VersionId>;
}
