//! Status update requests

use crate::status::RegistrationStatus;
use serde::{Deserialize, Serialize};

/// Body sent to the status-update endpoint
///
/// # Examples
///
/// ```
/// use regdesk_types::{RegistrationStatus, StatusUpdate};
///
/// let update = StatusUpdate::new("reg-42", RegistrationStatus::Verified, true)
///     .with_message("Payment received, see you at the fest!");
///
/// let body = serde_json::to_value(&update).unwrap();
/// assert_eq!(body["registration_status"], "verified");
/// assert_eq!(body["payment_verified"], true);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
	/// Identifier of the record to update
	pub id: String,
	/// Target workflow status
	pub registration_status: RegistrationStatus,
	/// Target payment-verified flag
	pub payment_verified: bool,
	/// Optional notification sent to the registrant
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl StatusUpdate {
	/// Create an update without a notification message
	pub fn new(
		id: impl Into<String>,
		registration_status: RegistrationStatus,
		payment_verified: bool,
	) -> Self {
		Self {
			id: id.into(),
			registration_status,
			payment_verified,
			message: None,
		}
	}

	/// Attach a notification message; blank messages are dropped
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		let message = message.into();
		self.message = if message.trim().is_empty() {
			None
		} else {
			Some(message)
		};
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_message_omitted_when_absent() {
		let update = StatusUpdate::new("a", RegistrationStatus::Cancelled, false);
		let json = serde_json::to_string(&update).unwrap();
		assert_eq!(
			json,
			r#"{"id":"a","registration_status":"cancelled","payment_verified":false}"#
		);
	}

	#[rstest]
	fn test_blank_message_dropped() {
		let update = StatusUpdate::new("a", RegistrationStatus::Pending, false).with_message("   ");
		assert_eq!(update.message, None);
	}
}
