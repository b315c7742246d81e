//! Backend API abstraction

use crate::error::ClientResult;
use async_trait::async_trait;
use regdesk_types::{Record, StatusUpdate};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Which event's registrations to list
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum EventScope {
	/// Every event
	#[default]
	All,
	/// One event by identifier
	Event(String),
}

impl EventScope {
	/// Value sent as the `event` query parameter
	pub fn as_query(&self) -> &str {
		match self {
			EventScope::All => "all",
			EventScope::Event(id) => id,
		}
	}
}

impl fmt::Display for EventScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_query())
	}
}

impl FromStr for EventScope {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if s.is_empty() || s.eq_ignore_ascii_case("all") {
			Ok(EventScope::All)
		} else {
			Ok(EventScope::Event(s.to_string()))
		}
	}
}

/// The two registration endpoints the dashboard uses
///
/// Implemented over HTTP by [`HttpRegistrationClient`](crate::HttpRegistrationClient)
/// and over a local JSON file by [`JsonFileApi`](crate::JsonFileApi).
#[async_trait]
pub trait RegistrationApi: Send + Sync {
	/// List registrations for an event scope
	async fn list_registrations(&self, scope: &EventScope) -> ClientResult<Vec<Record>>;

	/// Change one registration's workflow status and payment flag
	///
	/// Returns the backend's confirmation message, if any.
	async fn update_status(&self, update: &StatusUpdate) -> ClientResult<Option<String>>;
}

#[async_trait]
impl<T: RegistrationApi + ?Sized> RegistrationApi for Box<T> {
	async fn list_registrations(&self, scope: &EventScope) -> ClientResult<Vec<Record>> {
		(**self).list_registrations(scope).await
	}

	async fn update_status(&self, update: &StatusUpdate) -> ClientResult<Option<String>> {
		(**self).update_status(update).await
	}
}
