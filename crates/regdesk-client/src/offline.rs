//! Read-only registration source backed by a JSON file

use crate::api::{EventScope, RegistrationApi};
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use regdesk_types::{Record, StatusUpdate};
use std::path::PathBuf;

/// Serves registrations from a JSON array on disk
///
/// The event scope is not applied; the file is taken to be one export.
/// Status updates are refused.
pub struct JsonFileApi {
	path: PathBuf,
}

impl JsonFileApi {
	/// Read from `path`
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

#[async_trait]
impl RegistrationApi for JsonFileApi {
	async fn list_registrations(&self, _scope: &EventScope) -> ClientResult<Vec<Record>> {
		let content = tokio::fs::read_to_string(&self.path).await?;
		Ok(Record::parse_list(&content)?)
	}

	async fn update_status(&self, _update: &StatusUpdate) -> ClientResult<Option<String>> {
		Err(ClientError::Rejected(format!(
			"{} is read-only input",
			self.path.display()
		)))
	}
}
