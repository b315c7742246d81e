//! Core data types for regdesk
//!
//! Registration records arrive from a forms/sheet backend with a shape that
//! varies per event. This crate gives them one well-defined representation:
//!
//! - [`Value`]: recursive tagged union (null, bool, number, string, array, map)
//! - [`Record`]: insertion-ordered field map with accessors for the
//!   conventional `id`, `registration_status`, payment flag, and sub-event
//!   fields
//! - [`RegistrationStatus`]: pending / verified / cancelled
//! - [`StatusUpdate`]: body of a status-update request

#![warn(missing_docs)]

pub mod error;
pub mod record;
pub mod status;
pub mod update;
pub mod value;

pub use error::{RecordError, RecordResult};
pub use record::Record;
pub use status::RegistrationStatus;
pub use update::StatusUpdate;
pub use value::Value;
