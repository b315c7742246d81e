//! Settings validation
//!
//! Validators run after the sources are merged and deserialised, so a bad
//! URL or time zone is reported at startup instead of on first use.

use super::Settings;
use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;

/// Validation result
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
	/// A single setting has an unusable value
	#[error("Invalid value for '{key}': {message}")]
	InvalidValue {
		/// Dotted settings key, e.g. `api.base_url`
		key: String,
		/// What is wrong with it
		message: String,
	},

	/// More than one validator failed
	#[error("Multiple validation errors: {0:?}")]
	Multiple(Vec<ValidationError>),
}

impl ValidationError {
	fn invalid(key: &str, message: impl Into<String>) -> Self {
		ValidationError::InvalidValue {
			key: key.to_string(),
			message: message.into(),
		}
	}
}

/// Trait for validators that check the merged settings
pub trait SettingsValidator: Send + Sync {
	/// Validate the entire settings value
	fn validate_settings(&self, settings: &Settings) -> ValidationResult;

	/// Get validator description
	fn description(&self) -> String;
}

/// API URLs must be absolute http(s) URLs
pub struct UrlValidator;

impl UrlValidator {
	fn check(key: &str, raw: &str) -> ValidationResult {
		let parsed = url::Url::parse(raw).map_err(|e| ValidationError::invalid(key, e.to_string()))?;
		match parsed.scheme() {
			"http" | "https" => Ok(()),
			other => Err(ValidationError::invalid(
				key,
				format!("unsupported scheme '{}'", other),
			)),
		}
	}
}

impl SettingsValidator for UrlValidator {
	fn validate_settings(&self, settings: &Settings) -> ValidationResult {
		Self::check("api.base_url", &settings.api.base_url)?;
		if let Some(login_url) = &settings.api.login_url {
			Self::check("api.login_url", login_url)?;
		}
		Ok(())
	}

	fn description(&self) -> String {
		"API URLs are absolute http(s) URLs".to_string()
	}
}

/// Time zone must be an IANA name and the date-time pattern must parse
pub struct FormatValidator;

impl SettingsValidator for FormatValidator {
	fn validate_settings(&self, settings: &Settings) -> ValidationResult {
		settings
			.format
			.timezone
			.parse::<Tz>()
			.map_err(|e| ValidationError::invalid("format.timezone", e.to_string()))?;

		if StrftimeItems::new(&settings.format.datetime_format).any(|item| matches!(item, Item::Error))
		{
			return Err(ValidationError::invalid(
				"format.datetime_format",
				format!("invalid pattern '{}'", settings.format.datetime_format),
			));
		}
		Ok(())
	}

	fn description(&self) -> String {
		"Time zone and date-time pattern are valid".to_string()
	}
}

/// Numeric limits must be positive
pub struct LimitValidator;

impl SettingsValidator for LimitValidator {
	fn validate_settings(&self, settings: &Settings) -> ValidationResult {
		if settings.table.summary_limit == 0 {
			return Err(ValidationError::invalid(
				"table.summary_limit",
				"must be greater than zero",
			));
		}
		if settings.api.timeout_secs == 0 {
			return Err(ValidationError::invalid(
				"api.timeout_secs",
				"must be greater than zero",
			));
		}
		Ok(())
	}

	fn description(&self) -> String {
		"Summary limit and timeout are positive".to_string()
	}
}

/// The validators every loaded [`Settings`] passes through
pub fn default_validators() -> Vec<Box<dyn SettingsValidator>> {
	vec![
		Box::new(UrlValidator),
		Box::new(FormatValidator),
		Box::new(LimitValidator),
	]
}

/// Run validators, collecting every failure
pub fn validate_all(settings: &Settings, validators: &[Box<dyn SettingsValidator>]) -> ValidationResult {
	let mut errors: Vec<ValidationError> = validators
		.iter()
		.filter_map(|validator| validator.validate_settings(settings).err())
		.collect();

	match errors.len() {
		0 => Ok(()),
		1 => Err(errors.remove(0)),
		_ => Err(ValidationError::Multiple(errors)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults_are_valid() {
		assert!(validate_all(&Settings::default(), &default_validators()).is_ok());
	}

	#[rstest]
	#[case("not a url")]
	#[case("ftp://fest.example.org")]
	fn test_bad_base_url(#[case] url: &str) {
		let mut settings = Settings::default();
		settings.api.base_url = url.to_string();
		let result = UrlValidator.validate_settings(&settings);
		assert!(matches!(
			result,
			Err(ValidationError::InvalidValue { key, .. }) if key == "api.base_url"
		));
	}

	#[rstest]
	fn test_bad_timezone() {
		let mut settings = Settings::default();
		settings.format.timezone = "Mars/Olympus".to_string();
		assert!(FormatValidator.validate_settings(&settings).is_err());
	}

	#[rstest]
	fn test_bad_datetime_pattern() {
		let mut settings = Settings::default();
		settings.format.datetime_format = "%Y-%Q".to_string();
		assert!(matches!(
			FormatValidator.validate_settings(&settings),
			Err(ValidationError::InvalidValue { key, .. }) if key == "format.datetime_format"
		));
	}

	#[rstest]
	fn test_multiple_failures_are_collected() {
		let mut settings = Settings::default();
		settings.table.summary_limit = 0;
		settings.format.timezone = "Nowhere".to_string();

		let result = validate_all(&settings, &default_validators());
		assert!(matches!(result, Err(ValidationError::Multiple(errors)) if errors.len() == 2));
	}
}
