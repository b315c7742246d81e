//! Configuration sources for layered settings
//!
//! Provides the sources a [`SettingsBuilder`](super::SettingsBuilder) merges
//! in priority order (environment variables > config file > defaults).

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Settings keys whose environment values are comma-separated lists
const LIST_KEYS: &[&str] = &[
	"hidden_columns",
	"priority_columns",
	"acronyms",
	"collection_fields",
];

/// Settings keys whose environment values stay strings even when they look
/// like numbers or booleans
const STRING_KEYS: &[&str] = &[
	"base_url",
	"token",
	"login_url",
	"placeholder",
	"timezone",
	"datetime_format",
	"level",
];

/// Sections holding only string values
const STRING_SECTIONS: &[&str] = &["fields"];

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	/// Reading a file failed
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Content had an unexpected shape
	#[error("Parse error: {0}")]
	Parse(String),

	/// TOML syntax error
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// JSON conversion error
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Environment variable configuration source
///
/// Variables are matched by prefix, the prefix is stripped, and the rest is
/// lower-cased and split on the nesting separator, so with the default
/// separator `REGDESK_API__BASE_URL` becomes `api.base_url`.
pub struct EnvSource {
	prefix: Option<String>,
	separator: String,
}

impl EnvSource {
	/// Create a new environment variable configuration source
	///
	/// # Examples
	///
	/// ```
	/// use regdesk_conf::settings::sources::EnvSource;
	///
	/// let source = EnvSource::new();
	/// ```
	pub fn new() -> Self {
		Self {
			prefix: None,
			separator: "__".to_string(),
		}
	}

	/// Set a prefix filter for environment variables
	///
	/// # Examples
	///
	/// ```
	/// use regdesk_conf::settings::sources::EnvSource;
	///
	/// let source = EnvSource::new()
	///     .with_prefix("REGDESK_");
	/// ```
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Set the separator between nesting levels (default `__`)
	pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
		self.separator = separator.into();
		self
	}

	/// Load from an explicit set of variables instead of the process env
	pub fn load_from<I>(&self, vars: I) -> IndexMap<String, Value>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut config: IndexMap<String, Value> = IndexMap::new();

		for (key, value) in vars {
			// Skip if prefix is set and key doesn't start with it
			let clean_key = match &self.prefix {
				Some(prefix) => match key.strip_prefix(prefix.as_str()) {
					Some(rest) => rest,
					None => continue,
				},
				None => key.as_str(),
			};

			let lower_key = clean_key.to_lowercase();
			let path: Vec<&str> = lower_key
				.split(self.separator.as_str())
				.filter(|segment| !segment.is_empty())
				.collect();
			let Some((leaf, parents)) = path.split_last() else {
				continue;
			};

			let parsed_value = parse_env_value(parents, leaf, &value);
			insert_path(&mut config, parents, leaf, parsed_value);
		}

		config
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.load_from(std::env::vars()))
	}

	fn priority(&self) -> u8 {
		100 // Highest priority
	}

	fn description(&self) -> String {
		match &self.prefix {
			Some(prefix) => format!("Environment variables (prefix: {})", prefix),
			None => "Environment variables".to_string(),
		}
	}
}

fn parse_env_value(parents: &[&str], key: &str, value: &str) -> Value {
	if STRING_KEYS.contains(&key)
		|| parents
			.last()
			.is_some_and(|section| STRING_SECTIONS.contains(section))
	{
		return Value::String(value.to_string());
	}

	if LIST_KEYS.contains(&key) {
		// Parse comma-separated list
		let list = value
			.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(|s| Value::String(s.to_string()))
			.collect();
		return Value::Array(list);
	}

	if let Ok(num) = value.parse::<i64>() {
		Value::Number(num.into())
	} else if let Ok(b) = value.parse::<bool>() {
		Value::Bool(b)
	} else {
		Value::String(value.to_string())
	}
}

fn insert_path(config: &mut IndexMap<String, Value>, parents: &[&str], leaf: &str, value: Value) {
	let Some((first, rest)) = parents.split_first() else {
		config.insert(leaf.to_string(), value);
		return;
	};

	let entry = config
		.entry((*first).to_string())
		.or_insert_with(|| Value::Object(serde_json::Map::new()));
	if !entry.is_object() {
		*entry = Value::Object(serde_json::Map::new());
	}

	let mut current = entry;
	for segment in rest {
		let Value::Object(map) = current else {
			return;
		};
		let next = map
			.entry((*segment).to_string())
			.or_insert_with(|| Value::Object(serde_json::Map::new()));
		if !next.is_object() {
			*next = Value::Object(serde_json::Map::new());
		}
		current = next;
	}

	if let Value::Object(map) = current {
		map.insert(leaf.to_string(), value);
	}
}

/// TOML file configuration source
///
/// A missing file loads as empty, so the default `regdesk.toml` is optional.
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	/// Create a new TOML file configuration source
	///
	/// # Examples
	///
	/// ```
	/// use regdesk_conf::settings::sources::TomlFileSource;
	/// use std::path::PathBuf;
	///
	/// let source = TomlFileSource::new(PathBuf::from("regdesk.toml"));
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;

		// Convert TOML value to JSON value
		let json_value = serde_json::to_value(&toml_value)?;

		let map = json_value
			.as_object()
			.ok_or_else(|| SourceError::Parse("Expected table at root".to_string()))?;

		Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
	}

	fn priority(&self) -> u8 {
		50 // Medium priority
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Default values configuration source
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Create a new default values configuration source
	///
	/// # Examples
	///
	/// ```
	/// use regdesk_conf::settings::sources::DefaultSource;
	/// use serde_json::json;
	///
	/// let source = DefaultSource::new()
	///     .with_value("logging", json!({"level": "debug"}));
	/// ```
	pub fn new() -> Self {
		Self {
			values: IndexMap::new(),
		}
	}

	/// Add a default value for a top-level key
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}

	/// Add every entry of a JSON object as defaults
	///
	/// Non-object values are ignored.
	pub fn with_object(mut self, object: Value) -> Self {
		if let Value::Object(map) = object {
			self.values.extend(map);
		}
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0 // Lowest priority
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// Deep-merge `overlay` into `base`; objects merge key by key, anything else replaces
pub fn merge_values(base: &mut Value, overlay: Value) {
	match (base, overlay) {
		(Value::Object(base_map), Value::Object(overlay_map)) => {
			for (key, value) in overlay_map {
				match base_map.get_mut(&key) {
					Some(existing) => merge_values(existing, value),
					None => {
						base_map.insert(key, value);
					}
				}
			}
		}
		(base, overlay) => *base = overlay,
	}
}
