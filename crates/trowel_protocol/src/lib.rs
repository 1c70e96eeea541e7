//! # Trowel Sync Protocol
//!
//! Wire types for the Trowel push protocol.
//!
//! This crate provides:
//! - [`PushRequest`] / [`PushResponse`] - the JSON bodies exchanged on a push
//! - [`PushStatus`] - the four protocol outcomes
//! - [`AttachmentRef`] and [`parse_attachment_refs`] - extraction of
//!   embedded attachment references from a survey record
//!
//! # Protocol
//!
//! A client pushes its full record set together with the version identifier
//! of the snapshot it last synchronized (`head`). The server answers with one
//! of four statuses:
//!
//! 1. `conflict` - the claimed head is stale; the response carries the
//!    field-level updates the client must merge before retrying
//! 2. `missing` - referenced attachments are absent from the server; the
//!    client must upload them and retry
//! 3. `pushed` - the records were committed as a new version
//! 4. `ok` - the push was a no-op; the client is already current
//!
//! `conflict` and `missing` are successful responses guiding the client's
//! next action, not errors.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod attachments;
mod messages;

pub use attachments::{parse_attachment_refs, AttachmentRef, ATTACHMENTS_FIELD};
pub use messages::{PushRequest, PushResponse, PushStatus};
