//! The push reconciliation decision procedure.

use crate::error::ServerResult;
use std::collections::BTreeSet;
use tracing::{debug, info};
use trowel_model::{diff, SurveySet};
use trowel_protocol::{parse_attachment_refs, PushRequest, PushResponse, ATTACHMENTS_FIELD};
use trowel_store::{AttachmentStore, Author, VersionStore};

/// Reconciles a push against a trench and decides the protocol outcome.
///
/// Evaluated in order:
///
/// 1. If the trench has history and the client's claimed head does not match
///    it, answer `conflict` with the diff between the client's base version
///    (empty if it cannot be checked out) and the current version. Read-only.
/// 2. If any attachment referenced by the submitted records is absent from
///    the blob store, answer `missing` with the sorted, deduplicated names.
///    No commit.
/// 3. Otherwise commit. A changed head answers `pushed`; an unchanged head
///    (the submitted records were already the current state) answers `ok`.
///
/// Only step 3 mutates the trench, and the commit is atomic per the store's
/// contract. Storage failures abort with an error; no response is produced.
///
/// # Errors
///
/// Returns an error if reading the trench's state or committing fails.
pub fn reconcile<T>(trench: &mut T, request: &PushRequest) -> ServerResult<PushResponse>
where
    T: VersionStore + AttachmentStore,
{
    info!(
        head = %request.head,
        uid = %request.uid,
        username = %request.username,
        surveys = request.surveys.len(),
        "push"
    );

    let head = trench.head()?;

    if let Some(head) = head.as_deref() {
        if request.head.is_empty() || request.head != head {
            // Stale or fork-based client: report what it must pull.
            let new = trench.current()?;
            let old = if request.head.is_empty() {
                SurveySet::new()
            } else {
                match trench.checkout(&request.head) {
                    Ok(surveys) => surveys,
                    Err(err) => {
                        debug!(claimed = %request.head, %err, "claimed base not found, diffing against empty version");
                        SurveySet::new()
                    }
                }
            };
            let updates = diff(&old, &new);
            info!(version = %head, updates = updates.len(), "conflict");
            return Ok(PushResponse::conflict(head, updates));
        }
    }

    let missing = missing_attachments(trench, &request.surveys);
    if !missing.is_empty() {
        if missing.len() < 4 {
            info!(missing = %missing.join(", "), "missing attachments");
        } else {
            info!(missing = missing.len(), "missing attachments");
        }
        return Ok(PushResponse::missing(head.unwrap_or_default(), missing));
    }

    let author = Author::new(
        request.uid.clone(),
        request.username.clone(),
        request.message.clone(),
    );
    let new_head = trench.commit(&author, &request.surveys)?;

    match head {
        Some(head) if head == new_head => {
            info!(version = %head, "ok");
            Ok(PushResponse::ok(head))
        }
        _ => {
            info!(version = %new_head, "pushed");
            Ok(PushResponse::pushed(new_head))
        }
    }
}

/// Returns the names of all attachments referenced by the submitted records
/// but absent from the blob store, deduplicated and sorted.
pub fn missing_attachments<S: AttachmentStore>(store: &S, surveys: &SurveySet) -> Vec<String> {
    let mut missing = BTreeSet::new();
    for (_, survey) in surveys.iter() {
        for aref in parse_attachment_refs(survey.field(ATTACHMENTS_FIELD)) {
            if !store.exists(&aref.name, &aref.stamp) {
                missing.insert(aref.name);
            }
        }
    }
    missing.into_iter().collect()
}
