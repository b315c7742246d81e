//! # regdesk
//!
//! Registration review dashboard for event organisers.
//!
//! Registrations arrive as schema-less records whose shape differs per
//! event. regdesk derives a table from whatever fields are present, filters
//! it by free text, status, payment, and sub-event, renders every value
//! shape to a readable string, and exports the filtered rows.
//!
//! ## Feature Flags
//!
//! - `minimal` - Records and the table pipeline
//! - `standard` - Adds layered settings and export
//! - `full` (default) - Adds the HTTP client and dashboard controller
//!
//! Fine-grained flags: `conf`, `export`, `client`.
//!
//! ## Quick Example
//!
//! ```rust
//! use regdesk::prelude::*;
//!
//! let records = Record::parse_list(r#"[
//!     {"id": "a", "registration_status": "pending", "payment_verified": false},
//!     {"id": "b", "registration_status": "verified", "payment_verified": true}
//! ]"#).unwrap();
//!
//! let state = ViewState::new(FieldNames::default()).reduce(Action::LoadStarted);
//! let epoch = state.epoch();
//! let state = state
//!     .reduce(Action::LoadSucceeded { epoch, records })
//!     .reduce(Action::SetStatusFilter(Some(RegistrationStatus::Verified)));
//!
//! let visible = state.visible_records();
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].id("id").as_deref(), Some("b"));
//! ```

#![warn(missing_docs)]

pub use regdesk_tables as tables;
pub use regdesk_types as types;

#[cfg(feature = "conf")]
pub use regdesk_conf as conf;

#[cfg(feature = "client")]
pub use regdesk_client as client;

/// Commonly used types
pub mod prelude {
	pub use regdesk_tables::{
		Action, CellFormatter, Column, ColumnRules, DetailView, FieldNames, FilterEngine,
		FilterState, PaymentFilter, RecordColumn, TableConfig, TableError, ViewState,
	};
	pub use regdesk_types::{Record, RegistrationStatus, StatusUpdate, Value};

	#[cfg(feature = "export")]
	pub use regdesk_tables::{ExportFormat, ExportResult};

	#[cfg(feature = "conf")]
	pub use regdesk_conf::{Settings, SettingsError};

	#[cfg(feature = "client")]
	pub use regdesk_client::{
		ClientConfig, ClientError, Dashboard, EventScope, HttpRegistrationClient, JsonFileApi,
		LoadOutcome, RegistrationApi,
	};
}
