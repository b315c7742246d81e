//! Cell and value formatting
//!
//! Turns a single field value into a display string. Every path is
//! infallible: a malformed or unexpected shape degrades to a best-effort
//! string so one bad record never breaks the rest of the table.
//!
//! Nested records are expanded exactly one level. Anything nested deeper is
//! collapsed to a marker ([`MAP_MARKER`] or [`ARRAY_MARKER`]) so adversarial
//! input cannot produce unbounded output.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regdesk_types::Value;
use regdesk_types::value::format_number;
use std::fmt::Write as _;

/// Marker for a nested record below the expansion depth
pub const MAP_MARKER: &str = "{...}";

/// Marker for an array of records below the expansion depth
pub const ARRAY_MARKER: &str = "[...]";

/// Separator between entries of an array of nested records
pub const ENTRY_SEPARATOR: &str = " | ";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Display options for [`CellFormatter`]
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
	/// Text shown for null, missing, and empty values
	pub placeholder: String,
	/// Time zone timestamps are rendered in
	pub timezone: Tz,
	/// `strftime` pattern for timestamps
	pub datetime_format: String,
}

impl Default for FormatOptions {
	fn default() -> Self {
		Self {
			placeholder: "-".to_string(),
			timezone: Tz::UTC,
			datetime_format: "%d/%m/%Y, %H:%M:%S".to_string(),
		}
	}
}

/// Renders field values for tables, detail views, and exports
///
/// # Examples
///
/// ```
/// use regdesk_tables::format::CellFormatter;
/// use regdesk_types::{Record, Value};
///
/// let formatter = CellFormatter::default();
///
/// let members = Value::Array(vec![
///     Value::Map(Record::from_iter([("name".to_string(), Value::from("Asha"))])),
///     Value::Map(Record::from_iter([("name".to_string(), Value::from("Ravi"))])),
/// ]);
///
/// assert_eq!(formatter.format_cell("team_members", Some(&members)), "#1: name: Asha | #2: name: Ravi");
/// assert_eq!(formatter.format_cell("paid", Some(&Value::Bool(false))), "No");
/// assert_eq!(formatter.format_cell("college", None), "-");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellFormatter {
	options: FormatOptions,
}

impl CellFormatter {
	/// Create a formatter with explicit options
	pub fn new(options: FormatOptions) -> Self {
		Self { options }
	}

	/// Current options
	pub fn options(&self) -> &FormatOptions {
		&self.options
	}

	/// Placeholder text for empty cells
	pub fn placeholder(&self) -> &str {
		&self.options.placeholder
	}

	/// Whether a column holds timestamps, judged by its name
	///
	/// ```
	/// use regdesk_tables::format::CellFormatter;
	///
	/// assert!(CellFormatter::is_timestamp_column("timestamp"));
	/// assert!(CellFormatter::is_timestamp_column("verified_at"));
	/// assert!(!CellFormatter::is_timestamp_column("category"));
	/// ```
	pub fn is_timestamp_column(column: &str) -> bool {
		let column = column.to_ascii_lowercase();
		column == "timestamp"
			|| column.ends_with("_at")
			|| column.ends_with("_time")
			|| column.ends_with("_timestamp")
	}

	/// Format a cell for `column`; `None` means the record lacks the field
	pub fn format_cell(&self, column: &str, value: Option<&Value>) -> String {
		let Some(value) = value else {
			return self.placeholder().to_string();
		};
		if Self::is_timestamp_column(column)
			&& let Some(formatted) = self.format_timestamp(value)
		{
			return formatted;
		}
		self.format_value(value)
	}

	/// Format a value without column-specific rules
	pub fn format_value(&self, value: &Value) -> String {
		match value {
			Value::Null => self.placeholder().to_string(),
			Value::Bool(b) => yes_no(*b).to_string(),
			Value::Number(n) => format_number(*n),
			Value::String(s) if s.is_empty() => self.placeholder().to_string(),
			Value::String(s) => s.clone(),
			Value::Array(items) if items.is_empty() => self.placeholder().to_string(),
			Value::Array(items) if value.is_record_array() => items
				.iter()
				.enumerate()
				.map(|(index, entry)| format!("#{}: {}", index + 1, self.format_entry(entry)))
				.collect::<Vec<_>>()
				.join(ENTRY_SEPARATOR),
			Value::Array(items) => items
				.iter()
				.map(|item| self.inline(item))
				.collect::<Vec<_>>()
				.join(", "),
			Value::Map(record) if record.is_empty() => self.placeholder().to_string(),
			Value::Map(_) => self.format_entry(value),
		}
	}

	/// One line per entry of a collection value, without the `#n:` prefix
	///
	/// Used by detail views that render sub-events and team members as a
	/// nested list. Non-array values yield a single line.
	pub fn entry_lines(&self, value: &Value) -> Vec<String> {
		match value {
			Value::Array(items) => items.iter().map(|entry| self.format_entry(entry)).collect(),
			other => vec![self.format_value(other)],
		}
	}

	/// `key: value, ...` for a nested record, one level deep
	fn format_entry(&self, entry: &Value) -> String {
		match entry {
			Value::Map(record) if record.is_empty() => self.placeholder().to_string(),
			Value::Map(record) => record
				.iter()
				.map(|(key, value)| format!("{}: {}", key, self.inline(value)))
				.collect::<Vec<_>>()
				.join(", "),
			other => self.inline(other),
		}
	}

	/// Render a value that is already nested one level down
	fn inline(&self, value: &Value) -> String {
		match value {
			Value::Null => self.placeholder().to_string(),
			Value::Bool(b) => yes_no(*b).to_string(),
			Value::Number(n) => format_number(*n),
			Value::String(s) if s.is_empty() => self.placeholder().to_string(),
			Value::String(s) => s.clone(),
			Value::Map(_) => MAP_MARKER.to_string(),
			Value::Array(items) if items.iter().all(Value::is_primitive) => {
				let inner = items
					.iter()
					.map(|item| self.inline(item))
					.collect::<Vec<_>>()
					.join(", ");
				format!("[{}]", inner)
			}
			Value::Array(_) => ARRAY_MARKER.to_string(),
		}
	}

	/// Render a timestamp value in the configured zone and format
	///
	/// Accepts RFC 3339 strings, naive `YYYY-MM-DD HH:MM:SS` strings (taken
	/// as UTC), and epoch milliseconds as numbers or digit strings. Returns
	/// `None` when the value is not recognisable as a timestamp.
	pub fn format_timestamp(&self, value: &Value) -> Option<String> {
		let utc = parse_timestamp(value)?;
		let local = utc.with_timezone(&self.options.timezone);

		let mut out = String::new();
		// An invalid pattern surfaces as fmt::Error here rather than a panic
		if write!(out, "{}", local.format(&self.options.datetime_format)).is_err() {
			return Some(local.to_rfc3339());
		}
		Some(out)
	}
}

fn yes_no(b: bool) -> &'static str {
	if b { "Yes" } else { "No" }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
	match value {
		Value::Number(millis) if millis.is_finite() => {
			DateTime::from_timestamp_millis(*millis as i64)
		}
		Value::String(s) => {
			let s = s.trim();
			if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
				return Some(dt.with_timezone(&Utc));
			}
			if let Some(naive) = NAIVE_FORMATS
				.iter()
				.find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
			{
				return Some(Utc.from_utc_datetime(&naive));
			}
			if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
				return s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis);
			}
			None
		}
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use regdesk_types::Record;
	use rstest::rstest;
	use serde_json::json;

	fn value(json: serde_json::Value) -> Value {
		Value::from(json)
	}

	#[rstest]
	#[case(json!(null), "-")]
	#[case(json!(true), "Yes")]
	#[case(json!(false), "No")]
	#[case(json!(250), "250")]
	#[case(json!(12.5), "12.5")]
	#[case(json!(""), "-")]
	#[case(json!("IISER Kolkata"), "IISER Kolkata")]
	#[case(json!([]), "-")]
	#[case(json!({}), "-")]
	#[case(json!(["dance", "music", 3]), "dance, music, 3")]
	fn test_format_value(#[case] input: serde_json::Value, #[case] expected: &str) {
		assert_eq!(CellFormatter::default().format_value(&value(input)), expected);
	}

	#[rstest]
	fn test_record_array_entries() {
		let members = value(json!([
			{"name": "Asha", "phone": 98300},
			{"name": "Ravi", "captain": true}
		]));
		assert_eq!(
			CellFormatter::default().format_value(&members),
			"#1: name: Asha, phone: 98300 | #2: name: Ravi, captain: Yes"
		);
	}

	#[rstest]
	fn test_nested_record_collapses_deeper_levels() {
		let partner = value(json!({
			"email": "x@iiserkol.ac.in",
			"address": {"city": "Kolkata"},
			"langs": ["bn", "en"],
			"history": [{"year": 2023}]
		}));
		assert_eq!(
			CellFormatter::default().format_value(&partner),
			"email: x@iiserkol.ac.in, address: {...}, langs: [bn, en], history: [...]"
		);
	}

	#[rstest]
	fn test_mixed_array_never_panics() {
		let mixed = value(json!([{"id": "x"}, "loose", null, [1, {"deep": true}]]));
		assert_eq!(
			CellFormatter::default().format_value(&mixed),
			"#1: id: x | #2: loose | #3: - | #4: [...]"
		);
	}

	#[rstest]
	fn test_missing_field_is_placeholder() {
		let formatter = CellFormatter::new(FormatOptions {
			placeholder: "n/a".to_string(),
			..FormatOptions::default()
		});
		assert_eq!(formatter.format_cell("college", None), "n/a");
	}

	#[rstest]
	#[case(json!("2025-01-10T18:30:00Z"), "11/01/2025, 00:00:00")]
	#[case(json!("2025-01-10 18:30:00"), "11/01/2025, 00:00:00")]
	#[case(json!(1736533800000_i64), "11/01/2025, 00:00:00")]
	#[case(json!("1736533800000"), "11/01/2025, 00:00:00")]
	fn test_timestamp_in_configured_zone(#[case] input: serde_json::Value, #[case] expected: &str) {
		let formatter = CellFormatter::new(FormatOptions {
			timezone: chrono_tz::Asia::Kolkata,
			..FormatOptions::default()
		});
		assert_eq!(formatter.format_cell("timestamp", Some(&value(input))), expected);
	}

	#[rstest]
	fn test_unparseable_timestamp_falls_back() {
		let formatter = CellFormatter::default();
		assert_eq!(
			formatter.format_cell("submitted_at", Some(&value(json!("yesterday")))),
			"yesterday"
		);
		assert_eq!(formatter.format_cell("submitted_at", Some(&Value::Null)), "-");
	}

	#[rstest]
	fn test_invalid_datetime_pattern_does_not_panic() {
		let formatter = CellFormatter::new(FormatOptions {
			datetime_format: "%Q".to_string(),
			..FormatOptions::default()
		});
		let out = formatter.format_cell("timestamp", Some(&value(json!("2025-01-10T18:30:00Z"))));
		assert_eq!(out, "2025-01-10T18:30:00+00:00");
	}

	#[rstest]
	fn test_entry_lines() {
		let sub_events = value(json!([
			{"id": "x-press", "fee": 100},
			{"id": "survival", "fee": 150}
		]));
		assert_eq!(
			CellFormatter::default().entry_lines(&sub_events),
			vec!["id: x-press, fee: 100", "id: survival, fee: 150"]
		);
		assert_eq!(
			CellFormatter::default().entry_lines(&Value::Map(Record::new())),
			vec!["-"]
		);
	}
}
