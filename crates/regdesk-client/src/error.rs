//! Client error types

use regdesk_types::RecordError;
use thiserror::Error;

/// Result type for backend calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while talking to the registration backend
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientError {
	/// The HTTP client could not be built
	#[error("Failed to create client: {0}")]
	Config(String),

	/// The request never produced a response
	#[error("Request failed: {0}")]
	Network(String),

	/// The backend answered 401 or 403; the user must log in again
	#[error("Not authorized, please log in again")]
	Unauthorized {
		/// Where to send the user
		login_url: Option<String>,
	},

	/// The backend answered with a non-success status
	#[error("Server returned {status}: {message}")]
	Server {
		/// HTTP status code
		status: u16,
		/// Response body or reason
		message: String,
	},

	/// The response body did not have the expected shape
	#[error("Failed to parse response: {0}")]
	Decode(String),

	/// The backend answered `success: false`
	#[error("Request rejected: {0}")]
	Rejected(String),

	/// Offline input could not be read
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Offline input is not a list of records
	#[error(transparent)]
	Record(#[from] RecordError),
}

impl ClientError {
	/// Whether the caller should redirect to the login page
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, ClientError::Unauthorized { .. })
	}
}
