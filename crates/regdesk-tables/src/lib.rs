//! Registration table pipeline for regdesk
//!
//! This crate turns a list of schema-less registration records into the
//! table an admin or event organiser reviews:
//!
//! - **Column derivation**: union of keys across records, minus hidden
//!   fields, ordered by a priority list
//! - **Filtering**: free-text search, status, payment, and sub-event
//!   filters composed with logical AND
//! - **Formatting**: infallible display strings for every value shape
//! - **Export**: CSV, TSV, and JSON of the filtered rows (requires `export`
//!   feature, enabled by default)
//! - **Detail view and row expansion**: per-record detail rendering and a
//!   pure reducer over the whole view state
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[Records] --> B[ColumnRules::derive_columns]
//!     A --> C[FilterEngine]
//!     S[FilterState] --> C
//!     C --> D[Visible rows]
//!     B --> E[RecordColumn]
//!     F[CellFormatter] --> E
//!     D --> G[Export]
//!     E --> G
//!     G --> H[CSV]
//!     G --> I[TSV]
//!     G --> J[JSON]
//!     V[ViewState] --> C
//!     V --> K[DetailView]
//! ```
//!
//! # Example
//!
//! ```rust
//! use regdesk_tables::TableConfig;
//! use regdesk_tables::filters::FilterState;
//! use regdesk_tables::state::{Action, ViewState};
//! use regdesk_types::Record;
//!
//! let config = TableConfig::default();
//! let records = Record::parse_list(r#"[
//!     {"id": "a", "name": "Asha", "registration_status": "verified"},
//!     {"id": "b", "name": "Ravi"}
//! ]"#).unwrap();
//!
//! let state = ViewState::new(config.fields.clone()).reduce(Action::LoadStarted);
//! let epoch = state.epoch();
//! let state = state
//!     .reduce(Action::LoadSucceeded { epoch, records })
//!     .reduce(Action::SetQuery("ravi".to_string()));
//!
//! assert_eq!(state.columns(&config), vec!["id", "name", "registration_status"]);
//! assert_eq!(state.visible_records().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod column;
pub mod config;
pub mod detail;
pub mod error;
#[cfg(feature = "export")]
pub mod export;
pub mod filters;
pub mod format;
pub mod state;

// Re-exports for convenience
pub use column::{Column, ColumnRules, RecordColumn};
pub use config::TableConfig;
pub use detail::{DetailField, DetailValue, DetailView};
pub use error::{Result, TableError};
#[cfg(feature = "export")]
pub use export::{ExportFormat, ExportResult};
pub use filters::{FieldNames, FilterEngine, FilterState, PaymentFilter, RecordFilter};
pub use format::{CellFormatter, FormatOptions};
pub use state::{Action, ViewState};
