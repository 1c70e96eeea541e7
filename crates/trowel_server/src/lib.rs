//! # Trowel Sync Server
//!
//! Push reconciliation server for Trowel trenches.
//!
//! This crate provides:
//! - The push reconciler - the decision procedure between
//!   already-current, fast-forward commit, conflict, and missing-attachments
//! - Attachment transfer handlers with conditional-request semantics
//! - The HTTP surface (axum router) and server configuration
//!
//! # Protocol
//!
//! Each trench is one independently versioned dataset. A client pushes its
//! record set together with the head id of the snapshot it last pulled:
//!
//! 1. If the claimed head is stale, the server answers `conflict` with the
//!    field-level updates the client is missing. Nothing is written.
//! 2. If submitted records reference attachments the server does not hold,
//!    the answer is `missing` with the sorted attachment names. Nothing is
//!    written.
//! 3. Otherwise the records are committed; the answer is `pushed` with the
//!    new head id, or `ok` if the commit was a no-op.
//!
//! `conflict` and `missing` are successful responses (HTTP 200) guiding the
//! client's next action, not errors.

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect().
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handlers;
mod http;
mod reconcile;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handlers::{read_attachment, write_attachment};
pub use http::{app_router, serve, AppState};
pub use reconcile::{missing_attachments, reconcile};
