//! Settings for the registration dashboard
//!
//! [`Settings`] is assembled by a [`SettingsBuilder`] from
//! [`ConfigSource`](sources::ConfigSource)s merged in priority order, then
//! deserialised and validated.
//!
//! ```toml
//! [api]
//! base_url = "https://fest.example.org/api"
//! login_url = "https://fest.example.org/login"
//!
//! [format]
//! timezone = "Asia/Kolkata"
//! ```

pub mod sources;
pub mod validation;

use chrono_tz::Tz;
use regdesk_tables::column::ColumnRules;
use regdesk_tables::filters::FieldNames;
use regdesk_tables::format::{CellFormatter, FormatOptions};
use regdesk_tables::TableConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource, merge_values};
use std::path::Path;
use validation::{SettingsValidator, ValidationError, default_validators, validate_all};

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "regdesk.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "REGDESK_";

/// Errors raised while assembling settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// A source failed to load
	#[error("Failed to load configuration: {0}")]
	Source(#[from] SourceError),

	/// The merged configuration does not fit the settings structure
	#[error("Invalid configuration structure: {0}")]
	Deserialize(#[from] serde_json::Error),

	/// A value failed validation
	#[error("Validation failed: {0}")]
	Validation(#[from] ValidationError),
}

/// Backend API access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
	/// Base URL the `/registrations` endpoints hang off
	pub base_url: String,
	/// Bearer token sent with every request
	pub token: Option<String>,
	/// Where to send the user after a 401/403
	pub login_url: Option<String>,
	/// Request timeout in seconds
	pub timeout_secs: u64,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:8000/api".to_string(),
			token: None,
			login_url: None,
			timeout_secs: 30,
		}
	}
}

/// Table column and rendering rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
	/// Fields never shown
	pub hidden_columns: Vec<String>,
	/// Fields shown first, in order
	pub priority_columns: Vec<String>,
	/// Words upper-cased in headers
	pub acronyms: Vec<String>,
	/// Fields rendered as nested lists in the detail view
	pub collection_fields: Vec<String>,
	/// Text for null, missing, and empty values
	pub placeholder: String,
	/// Leading columns shown for collapsed rows
	pub summary_limit: usize,
}

impl Default for TableSettings {
	fn default() -> Self {
		let rules = ColumnRules::default();
		let table = TableConfig::default();
		Self {
			hidden_columns: rules.hidden,
			priority_columns: rules.priority,
			acronyms: rules.acronyms,
			collection_fields: table.collection_fields,
			placeholder: table.formatter.placeholder().to_string(),
			summary_limit: table.summary_limit,
		}
	}
}

/// Timestamp rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
	/// IANA time zone name
	pub timezone: String,
	/// `strftime` pattern
	pub datetime_format: String,
}

impl Default for FormatSettings {
	fn default() -> Self {
		let options = FormatOptions::default();
		Self {
			timezone: options.timezone.name().to_string(),
			datetime_format: options.datetime_format,
		}
	}
}

/// Log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// Default filter directive when `RUST_LOG` is unset
	pub level: String,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
		}
	}
}

/// All regdesk settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// `[api]`
	pub api: ApiSettings,
	/// `[table]`
	pub table: TableSettings,
	/// `[fields]`
	pub fields: FieldNames,
	/// `[format]`
	pub format: FormatSettings,
	/// `[logging]`
	pub logging: LoggingSettings,
}

impl Settings {
	/// Load defaults, then `config_path` (or `regdesk.toml`), then `REGDESK_*` variables
	pub fn load(config_path: Option<&Path>) -> Result<Self, SettingsError> {
		let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
		SettingsBuilder::new()
			.add_source(DefaultSource::new().with_object(serde_json::to_value(Settings::default())?))
			.add_source(TomlFileSource::new(path))
			.add_source(EnvSource::new().with_prefix(ENV_PREFIX))
			.build()
	}

	/// Time zone as a parsed value
	pub fn timezone(&self) -> Result<Tz, SettingsError> {
		self.format.timezone.parse::<Tz>().map_err(|e| {
			SettingsError::Validation(ValidationError::InvalidValue {
				key: "format.timezone".to_string(),
				message: e.to_string(),
			})
		})
	}

	/// Build the table pipeline configuration
	pub fn table_config(&self) -> Result<TableConfig, SettingsError> {
		let rules = ColumnRules::empty()
			.with_hidden(self.table.hidden_columns.iter().cloned())
			.with_priority(self.table.priority_columns.iter().cloned())
			.with_acronyms(self.table.acronyms.iter().cloned());

		let formatter = CellFormatter::new(FormatOptions {
			placeholder: self.table.placeholder.clone(),
			timezone: self.timezone()?,
			datetime_format: self.format.datetime_format.clone(),
		});

		Ok(TableConfig {
			rules,
			fields: self.fields.clone(),
			formatter,
			collection_fields: self.table.collection_fields.clone(),
			summary_limit: self.table.summary_limit,
		})
	}
}

/// Merges sources by priority and produces validated [`Settings`]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
	validators: Vec<Box<dyn SettingsValidator>>,
}

impl SettingsBuilder {
	/// Builder with no sources and the default validators
	pub fn new() -> Self {
		Self {
			sources: Vec::new(),
			validators: default_validators(),
		}
	}

	/// Add a configuration source
	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Add an extra validator
	pub fn add_validator(mut self, validator: impl SettingsValidator + 'static) -> Self {
		self.validators.push(Box::new(validator));
		self
	}

	/// Merge every source, lowest priority first, then deserialise and validate
	pub fn build(mut self) -> Result<Settings, SettingsError> {
		self.sources.sort_by_key(|source| source.priority());

		let mut merged = Value::Object(serde_json::Map::new());
		for source in &self.sources {
			let values = source.load()?;
			tracing::debug!(
				source = %source.description(),
				keys = values.len(),
				"loaded configuration source"
			);
			merge_values(&mut merged, Value::Object(values.into_iter().collect()));
		}

		let settings: Settings = serde_json::from_value(merged)?;
		validate_all(&settings, &self.validators)?;
		Ok(settings)
	}
}

impl Default for SettingsBuilder {
	fn default() -> Self {
		Self::new()
	}
}
