//! Error types for record handling

use thiserror::Error;

/// Errors raised while building records from external input
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RecordError {
	/// Input was valid JSON but not an object
	#[error("Expected a JSON object, got {0}")]
	NotAnObject(String),

	/// Input was valid JSON but not an array of records
	#[error("Expected a JSON array of records, got {0}")]
	NotAList(String),

	/// Status string outside pending/verified/cancelled
	#[error("Unknown registration status: {0}")]
	UnknownStatus(String),

	/// Input was not valid JSON
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;
