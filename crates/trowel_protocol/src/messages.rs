//! Push request and response messages.

use serde::{Deserialize, Serialize};
use trowel_model::{Patch, SurveySet};

/// The outcome of a push, as reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushStatus {
    /// The push was a no-op; the client is already current.
    Ok,
    /// The records were committed as a new version.
    Pushed,
    /// The client's claimed base version is stale; it must pull updates.
    Conflict,
    /// Referenced attachments are absent; the client must upload them.
    Missing,
}

/// A push submitted by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushRequest {
    /// Submitter identifier.
    #[serde(default)]
    pub uid: String,
    /// Submitter display name.
    #[serde(default)]
    pub username: String,
    /// Free-text commit message.
    #[serde(default)]
    pub message: String,
    /// The version identifier of the client's local snapshot; empty if the
    /// client has never synchronized.
    #[serde(default)]
    pub head: String,
    /// The records the client wants committed, keyed by record identifier.
    #[serde(default)]
    pub surveys: SurveySet,
}

impl PushRequest {
    /// Decodes a push request from a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error if the body is not valid JSON of
    /// the expected shape.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// The server's answer to a push.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushResponse {
    /// The protocol outcome.
    pub status: PushStatus,
    /// The resulting or authoritative version identifier.
    pub version: String,
    /// Names of attachments the client must upload (status `missing`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    /// Field-level updates the client must merge (status `conflict`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<Patch>,
}

impl PushResponse {
    /// A no-op push: the client was already current.
    #[must_use]
    pub fn ok(version: impl Into<String>) -> Self {
        Self {
            status: PushStatus::Ok,
            version: version.into(),
            missing: Vec::new(),
            updates: Vec::new(),
        }
    }

    /// A successful commit yielding a new version.
    #[must_use]
    pub fn pushed(version: impl Into<String>) -> Self {
        Self {
            status: PushStatus::Pushed,
            version: version.into(),
            missing: Vec::new(),
            updates: Vec::new(),
        }
    }

    /// A stale-head reconciliation report.
    #[must_use]
    pub fn conflict(version: impl Into<String>, updates: Vec<Patch>) -> Self {
        Self {
            status: PushStatus::Conflict,
            version: version.into(),
            missing: Vec::new(),
            updates,
        }
    }

    /// A missing-attachments report.
    #[must_use]
    pub fn missing(version: impl Into<String>, missing: Vec<String>) -> Self {
        Self {
            status: PushStatus::Missing,
            version: version.into(),
            missing,
            updates: Vec::new(),
        }
    }

    /// Encodes the response as JSON, optionally pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error if encoding fails.
    pub fn to_json(&self, pretty: bool) -> Result<Vec<u8>, serde_json::Error> {
        if pretty {
            serde_json::to_vec_pretty(self)
        } else {
            serde_json::to_vec(self)
        }
    }
}
