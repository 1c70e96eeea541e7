//! # Trowel Model
//!
//! Survey records and collection versions for the Trowel sync server.
//!
//! This crate provides:
//! - [`Survey`] - a schemaless field-name to value record
//! - [`SurveySet`] - the full set of records at one point in a trench's history
//! - [`Patch`] and [`diff`] - field-level differences between two versions
//!
//! # Equality model
//!
//! Two surveys are equal iff every field in the union of both key sets has
//! the same value, with a missing field reading as the empty string. This is
//! the equality the version differ is built on: a record that drops a field
//! by writing `""` into it has not diverged from one that never had the
//! field at all.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod diff;
mod survey;

pub use diff::{diff, Patch};
pub use survey::{Survey, SurveySet};
