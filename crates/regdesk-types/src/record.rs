//! Registration records
//!
//! A [`Record`] is an insertion-ordered mapping from field name to [`Value`].
//! Key order matters: column derivation keeps first-appearance order for
//! columns that have no configured priority.

use crate::error::RecordError;
use crate::value::{Value, format_number};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Status assumed when a record carries no usable `registration_status`
pub const DEFAULT_STATUS: &str = "pending";

/// One registration entry with schema-less fields
///
/// # Examples
///
/// ```
/// use regdesk_types::Record;
///
/// let mut record = Record::new();
/// record.insert("id", "a");
/// record.insert("payment_verified", false);
///
/// assert_eq!(record.id("id").as_deref(), Some("a"));
/// assert_eq!(record.status("registration_status"), "pending");
/// assert!(!record.payment_verified("payment_verified"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, Value>);

impl Record {
	/// Create an empty record
	pub fn new() -> Self {
		Self(IndexMap::new())
	}

	/// Build a record from a JSON value, which must be an object
	pub fn from_json(value: serde_json::Value) -> Result<Self, RecordError> {
		match Value::from(value) {
			Value::Map(record) => Ok(record),
			other => Err(RecordError::NotAnObject(kind_name(&other).to_string())),
		}
	}

	/// Parse a JSON array of objects into records
	///
	/// ```
	/// use regdesk_types::Record;
	///
	/// let records = Record::parse_list(r#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
	/// assert_eq!(records.len(), 2);
	/// ```
	pub fn parse_list(json: &str) -> Result<Vec<Self>, RecordError> {
		let value: serde_json::Value = serde_json::from_str(json)?;
		match value {
			serde_json::Value::Array(items) => items.into_iter().map(Record::from_json).collect(),
			other => Err(RecordError::NotAList(
				kind_name(&Value::from(other)).to_string(),
			)),
		}
	}

	/// Insert or replace a field, returning the previous value
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(key.into(), value.into())
	}

	/// Look up a field
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Check whether a field is present (even if null)
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Field names in insertion order
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	/// Fields in insertion order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Number of fields
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the record has no fields
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Stringified identifier stored under `id_field`
	///
	/// Numbers are accepted because sheet backends frequently emit numeric
	/// row ids.
	pub fn id(&self, id_field: &str) -> Option<String> {
		match self.get(id_field)? {
			Value::String(s) if !s.is_empty() => Some(s.clone()),
			Value::Number(n) => Some(format_number(*n)),
			_ => None,
		}
	}

	/// Workflow status, defaulting to `pending` when missing, null, or empty
	pub fn status(&self, status_field: &str) -> &str {
		match self.get(status_field) {
			Some(Value::String(s)) if !s.is_empty() => s,
			_ => DEFAULT_STATUS,
		}
	}

	/// Whether an admin has confirmed payment
	///
	/// Missing or unrecognised values count as not verified.
	pub fn payment_verified(&self, flag_field: &str) -> bool {
		self.get(flag_field).is_some_and(is_truthy_flag)
	}

	/// Identifiers of the entries in a sub-event collection
	///
	/// Entries are either nested records carrying an `id` or bare strings.
	/// Anything else is skipped.
	pub fn sub_event_ids<'a>(&'a self, field: &str) -> Vec<&'a str> {
		let Some(items) = self.get(field).and_then(Value::as_array) else {
			return Vec::new();
		};
		items
			.iter()
			.filter_map(|item| match item {
				Value::String(s) => Some(s.as_str()),
				Value::Map(entry) => entry.get("id").and_then(Value::as_str),
				_ => None,
			})
			.collect()
	}
}

/// Interpret a stored flag the way the registration sheet writes it
///
/// ```
/// use regdesk_types::{Value, record::is_truthy_flag};
///
/// assert!(is_truthy_flag(&Value::Bool(true)));
/// assert!(is_truthy_flag(&Value::from("TRUE")));
/// assert!(!is_truthy_flag(&Value::Null));
/// ```
pub fn is_truthy_flag(value: &Value) -> bool {
	match value {
		Value::Bool(b) => *b,
		Value::String(s) => {
			let s = s.trim();
			s.eq_ignore_ascii_case("true")
				|| s.eq_ignore_ascii_case("yes")
				|| s.eq_ignore_ascii_case("verified")
		}
		_ => false,
	}
}

fn kind_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Map(_) => "object",
	}
}

impl FromIterator<(String, Value)> for Record {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl IntoIterator for Record {
	type Item = (String, Value);
	type IntoIter = indexmap::map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn record(value: serde_json::Value) -> Record {
		Record::from_json(value).unwrap()
	}

	#[rstest]
	fn test_keys_keep_insertion_order() {
		let r = record(json!({"zeta": 1, "alpha": 2, "mid": 3}));
		assert_eq!(r.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
	}

	#[rstest]
	#[case(json!({"id": "a"}), Some("a"))]
	#[case(json!({"id": 12}), Some("12"))]
	#[case(json!({"id": ""}), None)]
	#[case(json!({"id": null}), None)]
	#[case(json!({}), None)]
	fn test_id(#[case] input: serde_json::Value, #[case] expected: Option<&str>) {
		assert_eq!(record(input).id("id").as_deref(), expected);
	}

	#[rstest]
	#[case(json!({"registration_status": "verified"}), "verified")]
	#[case(json!({"registration_status": ""}), "pending")]
	#[case(json!({"registration_status": null}), "pending")]
	#[case(json!({}), "pending")]
	fn test_status_defaults_to_pending(#[case] input: serde_json::Value, #[case] expected: &str) {
		assert_eq!(record(input).status("registration_status"), expected);
	}

	#[rstest]
	#[case(json!({"payment_verified": true}), true)]
	#[case(json!({"payment_verified": "Yes"}), true)]
	#[case(json!({"payment_verified": false}), false)]
	#[case(json!({"payment_verified": "no"}), false)]
	#[case(json!({"payment_verified": 1}), false)]
	#[case(json!({}), false)]
	fn test_payment_verified(#[case] input: serde_json::Value, #[case] expected: bool) {
		assert_eq!(record(input).payment_verified("payment_verified"), expected);
	}

	#[rstest]
	fn test_sub_event_ids_accepts_maps_and_strings() {
		let r = record(json!({
			"sub_events": [{"id": "x-press", "name": "X-Press"}, "survival", 4, {"name": "no id"}]
		}));
		assert_eq!(r.sub_event_ids("sub_events"), vec!["x-press", "survival"]);
		assert!(r.sub_event_ids("missing").is_empty());
	}

	#[rstest]
	fn test_from_json_rejects_non_objects() {
		let err = Record::from_json(json!([1, 2])).unwrap_err();
		assert!(matches!(err, RecordError::NotAnObject(kind) if kind == "array"));
	}

	#[rstest]
	fn test_parse_list_rejects_single_object() {
		let err = Record::parse_list(r#"{"id": "a"}"#).unwrap_err();
		assert!(matches!(err, RecordError::NotAList(_)));
	}

	#[rstest]
	fn test_serialize_is_plain_object() {
		let r = record(json!({"id": "a", "amount": 100}));
		assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"id":"a","amount":100}"#);
	}
}
