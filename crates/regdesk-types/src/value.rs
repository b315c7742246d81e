//! Recursive field value type
//!
//! Registration records have no fixed schema, so every field holds a
//! [`Value`]. Column derivation, filtering, and formatting all work over this
//! one type instead of poking at raw JSON.

use crate::record::Record;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest magnitude rendered as an integer without a fractional part.
const MAX_INTEGRAL: f64 = 1e15;

/// A single field value inside a registration record
///
/// # Examples
///
/// ```
/// use regdesk_types::Value;
///
/// let value = Value::from("x@iiserkol.ac.in");
/// assert_eq!(value.as_str(), Some("x@iiserkol.ac.in"));
/// assert!(value.is_primitive());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	/// Absent or explicit null
	#[default]
	Null,
	/// Boolean flag
	Bool(bool),
	/// Any JSON number
	Number(f64),
	/// Text
	String(String),
	/// Ordered list of values (primitives or nested records)
	Array(Vec<Value>),
	/// Nested record (e.g. a partner object)
	Map(Record),
}

impl Value {
	/// Returns true for `Null`
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Returns true for values that are neither arrays nor maps
	pub fn is_primitive(&self) -> bool {
		!matches!(self, Value::Array(_) | Value::Map(_))
	}

	/// Returns true for an array holding at least one nested record
	pub fn is_record_array(&self) -> bool {
		match self {
			Value::Array(items) => items.iter().any(|item| matches!(item, Value::Map(_))),
			_ => false,
		}
	}

	/// Borrow the string payload
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	/// Copy out the boolean payload
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Copy out the numeric payload
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Number(n) => Some(*n),
			_ => None,
		}
	}

	/// Borrow the array payload
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Value::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Borrow the nested record payload
	pub fn as_map(&self) -> Option<&Record> {
		match self {
			Value::Map(map) => Some(map),
			_ => None,
		}
	}

	/// Plain text form of a primitive, or compact JSON for nested values
	///
	/// This is the representation free-text search matches against. `Null`
	/// yields an empty string so that searching for "null" does not match
	/// every sparse record.
	///
	/// ```
	/// use regdesk_types::{Record, Value};
	///
	/// let mut partner = Record::new();
	/// partner.insert("email", "x@iiserkol.ac.in");
	/// let value = Value::Map(partner);
	/// assert_eq!(value.to_search_text(), r#"{"email":"x@iiserkol.ac.in"}"#);
	/// assert_eq!(Value::Number(42.0).to_search_text(), "42");
	/// ```
	pub fn to_search_text(&self) -> String {
		match self {
			Value::Null => String::new(),
			Value::Bool(b) => b.to_string(),
			Value::Number(n) => format_number(*n),
			Value::String(s) => s.clone(),
			Value::Array(_) | Value::Map(_) => self.to_json_string(),
		}
	}

	/// Compact JSON serialization
	pub fn to_json_string(&self) -> String {
		serde_json::to_string(self).unwrap_or_default()
	}
}

/// Render a number the way a spreadsheet shows it: integral values carry no
/// trailing `.0`.
///
/// ```
/// use regdesk_types::value::format_number;
///
/// assert_eq!(format_number(250.0), "250");
/// assert_eq!(format_number(99.5), "99.5");
/// ```
pub fn format_number(n: f64) -> String {
	if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_INTEGRAL {
		format!("{}", n as i64)
	} else {
		format!("{}", n)
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
			serde_json::Value::String(s) => Value::String(s),
			serde_json::Value::Array(items) => {
				Value::Array(items.into_iter().map(Value::from).collect())
			}
			serde_json::Value::Object(map) => {
				Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
			}
		}
	}
}

impl From<Value> for serde_json::Value {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => serde_json::Value::Null,
			Value::Bool(b) => serde_json::Value::Bool(b),
			Value::Number(n) => number_to_json(n),
			Value::String(s) => serde_json::Value::String(s),
			Value::Array(items) => {
				serde_json::Value::Array(items.into_iter().map(Into::into).collect())
			}
			Value::Map(record) => serde_json::Value::Object(
				record
					.into_iter()
					.map(|(k, v)| (k, serde_json::Value::from(v)))
					.collect(),
			),
		}
	}
}

fn number_to_json(n: f64) -> serde_json::Value {
	if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_INTEGRAL {
		serde_json::Value::from(n as i64)
	} else {
		serde_json::Number::from_f64(n)
			.map(serde_json::Value::Number)
			.unwrap_or(serde_json::Value::Null)
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::Null => serializer.serialize_unit(),
			Value::Bool(b) => serializer.serialize_bool(*b),
			Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_INTEGRAL => {
				serializer.serialize_i64(*n as i64)
			}
			Value::Number(n) => serializer.serialize_f64(*n),
			Value::String(s) => serializer.serialize_str(s),
			Value::Array(items) => items.serialize(serializer),
			Value::Map(record) => record.serialize(serializer),
		}
	}
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		serde_json::Value::deserialize(deserializer).map(Value::from)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::String(s)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<f64> for Value {
	fn from(n: f64) -> Self {
		Value::Number(n)
	}
}

impl From<i64> for Value {
	fn from(n: i64) -> Self {
		Value::Number(n as f64)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Value::Array(items)
	}
}

impl From<Record> for Value {
	fn from(record: Record) -> Self {
		Value::Map(record)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Value::Null)
	}
}
