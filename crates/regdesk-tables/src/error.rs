//! Error types for table operations

use thiserror::Error;

/// Errors raised by table derivation and export
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TableError {
	/// The filtered set is empty; export is disabled rather than producing
	/// an empty file
	#[error("Nothing to export: the filtered registration list is empty")]
	NothingToExport,

	/// No columns survived the hidden-column rules
	#[error("Nothing to export: no visible columns")]
	NoColumns,

	/// A filter input could not be parsed
	#[error("Invalid filter: {0}")]
	InvalidFilter(String),

	/// An export format name could not be parsed
	#[error("Unknown export format: {0}")]
	UnknownFormat(String),

	/// CSV writer failure
	#[cfg(feature = "export")]
	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	/// JSON serialization failure
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// Buffer flush failure
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result type for table operations
pub type Result<T> = std::result::Result<T, TableError>;
