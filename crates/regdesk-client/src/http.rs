//! HTTP implementation of [`RegistrationApi`]

use crate::api::{EventScope, RegistrationApi};
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use regdesk_types::{Record, StatusUpdate};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Connection settings for [`HttpRegistrationClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL the `/registrations` endpoints hang off
	pub base_url: String,
	/// Bearer token
	pub token: Option<String>,
	/// Login page reported with authorization failures
	pub login_url: Option<String>,
	/// Per-request timeout
	pub timeout: Duration,
}

impl ClientConfig {
	/// Create a configuration for a base URL
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			token: None,
			login_url: None,
			timeout: Duration::from_secs(30),
		}
	}

	/// Set the bearer token
	pub fn with_token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(token.into());
		self
	}

	/// Set the login page URL
	pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
		self.login_url = Some(login_url.into());
		self
	}

	/// Set the request timeout
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}
}

/// Listing response: either a bare array or a `{success, data, error}` envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse {
	Bare(Vec<Record>),
	Envelope {
		success: bool,
		#[serde(default)]
		data: Vec<Record>,
		#[serde(default)]
		error: Option<String>,
	},
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
	success: bool,
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	error: Option<String>,
}

/// reqwest-backed registration client
///
/// # Examples
///
/// ```no_run
/// use regdesk_client::{ClientConfig, EventScope, HttpRegistrationClient, RegistrationApi};
///
/// # async fn run() -> regdesk_client::ClientResult<()> {
/// let client = HttpRegistrationClient::new(
///     ClientConfig::new("https://fest.example.org/api").with_token("secret"),
/// )?;
/// let records = client.list_registrations(&EventScope::All).await?;
/// println!("{} registrations", records.len());
/// # Ok(())
/// # }
/// ```
pub struct HttpRegistrationClient {
	config: ClientConfig,
	client: reqwest::Client,
}

impl HttpRegistrationClient {
	/// Create a new client
	pub fn new(config: ClientConfig) -> ClientResult<Self> {
		let client = reqwest::Client::builder()
			.timeout(config.timeout)
			.build()
			.map_err(|e| ClientError::Config(e.to_string()))?;

		Ok(Self { config, client })
	}

	/// Connection settings in use
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	fn build_url(&self, path: &str) -> String {
		format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
	}

	async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ClientResult<T> {
		let req = match &self.config.token {
			Some(token) => req.bearer_auth(token),
			None => req,
		};

		let response = req
			.send()
			.await
			.map_err(|e| ClientError::Network(e.to_string()))?;

		let status = response.status();
		if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
			return Err(ClientError::Unauthorized {
				login_url: self.config.login_url.clone(),
			});
		}
		if !status.is_success() {
			let error_text = response
				.text()
				.await
				.unwrap_or_else(|_| "Unknown error".to_string());
			return Err(ClientError::Server {
				status: status.as_u16(),
				message: error_text,
			});
		}

		response
			.json()
			.await
			.map_err(|e| ClientError::Decode(e.to_string()))
	}
}

#[async_trait]
impl RegistrationApi for HttpRegistrationClient {
	async fn list_registrations(&self, scope: &EventScope) -> ClientResult<Vec<Record>> {
		let req = self
			.client
			.get(self.build_url("registrations"))
			.query(&[("event", scope.as_query())]);

		match self.send::<ListResponse>(req).await? {
			ListResponse::Bare(records) => Ok(records),
			ListResponse::Envelope {
				success: true,
				data,
				..
			} => Ok(data),
			ListResponse::Envelope { error, .. } => Err(ClientError::Rejected(
				error.unwrap_or_else(|| "listing failed".to_string()),
			)),
		}
	}

	async fn update_status(&self, update: &StatusUpdate) -> ClientResult<Option<String>> {
		let req = self
			.client
			.post(self.build_url("registrations/status"))
			.json(update);

		let response: UpdateResponse = self.send(req).await?;
		if response.success {
			Ok(response.message)
		} else {
			Err(ClientError::Rejected(
				response
					.error
					.or(response.message)
					.unwrap_or_else(|| "update failed".to_string()),
			))
		}
	}
}
