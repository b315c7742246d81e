//! Registration workflow status

use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow state of a registration
///
/// # Examples
///
/// ```
/// use regdesk_types::RegistrationStatus;
///
/// let status: RegistrationStatus = "Verified".parse().unwrap();
/// assert_eq!(status, RegistrationStatus::Verified);
/// assert_eq!(status.as_str(), "verified");
/// ```
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
	/// Submitted, not yet reviewed
	#[default]
	Pending,
	/// Reviewed and accepted
	Verified,
	/// Withdrawn or rejected
	Cancelled,
}

impl RegistrationStatus {
	/// All statuses in display order
	pub const ALL: [RegistrationStatus; 3] = [
		RegistrationStatus::Pending,
		RegistrationStatus::Verified,
		RegistrationStatus::Cancelled,
	];

	/// Wire representation
	pub fn as_str(&self) -> &'static str {
		match self {
			RegistrationStatus::Pending => "pending",
			RegistrationStatus::Verified => "verified",
			RegistrationStatus::Cancelled => "cancelled",
		}
	}
}

impl fmt::Display for RegistrationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for RegistrationStatus {
	type Err = RecordError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		RegistrationStatus::ALL
			.into_iter()
			.find(|status| status.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| RecordError::UnknownStatus(s.to_string()))
	}
}
