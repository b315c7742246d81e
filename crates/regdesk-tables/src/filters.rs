//! Record filtering for registration lists
//!
//! A [`FilterState`] holds the four user-facing criteria (free text, status,
//! payment, sub-event). [`FilterEngine`] turns it into a set of
//! [`RecordFilter`]s and applies them conjunctively. Filtering is a pure
//! function of (records, state): it keeps input order and holds no state
//! between calls.

use crate::error::TableError;
use indexmap::IndexMap;
use regdesk_types::{Record, RegistrationStatus, Value};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Names of the conventional fields the filters read
///
/// Different events export the same concepts under the same names, but the
/// names are configurable so a renamed sheet column does not break filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
	/// Unique record identifier
	pub id: String,
	/// Workflow status
	pub status: String,
	/// Payment-verified flag
	pub payment: String,
	/// Sub-event selections
	pub sub_events: String,
}

impl Default for FieldNames {
	fn default() -> Self {
		Self {
			id: "id".to_string(),
			status: "registration_status".to_string(),
			payment: "payment_verified".to_string(),
			sub_events: "sub_events".to_string(),
		}
	}
}

/// Payment filter choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFilter {
	/// No filtering on payment
	#[default]
	All,
	/// Only records with a verified payment
	Verified,
	/// Only records whose payment is not verified (including missing flags)
	Pending,
}

impl FromStr for PaymentFilter {
	type Err = TableError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"all" | "" => Ok(PaymentFilter::All),
			"verified" | "paid" | "true" => Ok(PaymentFilter::Verified),
			"pending" | "unpaid" | "false" => Ok(PaymentFilter::Pending),
			other => Err(TableError::InvalidFilter(format!(
				"unknown payment filter '{}'",
				other
			))),
		}
	}
}

/// The user-facing filter inputs
///
/// Every field in its default state is a no-op.
///
/// # Examples
///
/// ```
/// use regdesk_tables::filters::{FilterState, PaymentFilter};
/// use regdesk_types::RegistrationStatus;
///
/// let state = FilterState::default()
///     .with_status(RegistrationStatus::Verified)
///     .with_payment(PaymentFilter::Verified);
///
/// assert!(!state.is_unfiltered());
/// assert!(FilterState::default().is_unfiltered());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
	/// Free-text query; empty means no search
	pub query: String,
	/// Status to match; `None` means all
	pub status: Option<RegistrationStatus>,
	/// Payment choice
	pub payment: PaymentFilter,
	/// Sub-event identifier to match; `None` means all
	pub sub_event: Option<String>,
}

impl FilterState {
	/// Set the free-text query
	pub fn with_query(mut self, query: impl Into<String>) -> Self {
		self.query = query.into();
		self
	}

	/// Set the status filter
	pub fn with_status(mut self, status: RegistrationStatus) -> Self {
		self.status = Some(status);
		self
	}

	/// Set the payment filter
	pub fn with_payment(mut self, payment: PaymentFilter) -> Self {
		self.payment = payment;
		self
	}

	/// Set the sub-event filter
	pub fn with_sub_event(mut self, sub_event: impl Into<String>) -> Self {
		self.sub_event = Some(sub_event.into());
		self
	}

	/// Whether every criterion is in its all/unset state
	pub fn is_unfiltered(&self) -> bool {
		self.query.is_empty()
			&& self.status.is_none()
			&& self.payment == PaymentFilter::All
			&& self.sub_event.is_none()
	}
}

/// A single criterion a record must satisfy
///
/// # Examples
///
/// ```
/// use regdesk_tables::filters::RecordFilter;
/// use regdesk_types::{Record, Value};
///
/// struct HasCollege;
///
/// impl RecordFilter for HasCollege {
///     fn name(&self) -> &str {
///         "has_college"
///     }
///
///     fn matches(&self, record: &Record) -> bool {
///         record.get("college").is_some_and(|v| !v.is_null())
///     }
/// }
/// ```
pub trait RecordFilter: Send + Sync {
	/// Identifier used in logs
	fn name(&self) -> &str;

	/// Whether the record passes this criterion
	fn matches(&self, record: &Record) -> bool;

	/// Inactive filters are skipped entirely (default: always active)
	fn is_active(&self) -> bool {
		true
	}
}

/// Exact match on `registration_status`, with missing treated as pending
#[derive(Debug, Clone)]
pub struct StatusFilter {
	field: String,
	status: Option<RegistrationStatus>,
}

impl StatusFilter {
	/// Create a status filter; `None` matches everything
	pub fn new(field: impl Into<String>, status: Option<RegistrationStatus>) -> Self {
		Self {
			field: field.into(),
			status,
		}
	}
}

impl RecordFilter for StatusFilter {
	fn name(&self) -> &str {
		"status"
	}

	fn matches(&self, record: &Record) -> bool {
		match self.status {
			Some(status) => record.status(&self.field) == status.as_str(),
			None => true,
		}
	}

	fn is_active(&self) -> bool {
		self.status.is_some()
	}
}

/// Boolean match on the payment-verified flag
#[derive(Debug, Clone)]
pub struct PaymentFlagFilter {
	field: String,
	choice: PaymentFilter,
}

impl PaymentFlagFilter {
	/// Create a payment filter
	pub fn new(field: impl Into<String>, choice: PaymentFilter) -> Self {
		Self {
			field: field.into(),
			choice,
		}
	}
}

impl RecordFilter for PaymentFlagFilter {
	fn name(&self) -> &str {
		"payment"
	}

	fn matches(&self, record: &Record) -> bool {
		match self.choice {
			PaymentFilter::All => true,
			PaymentFilter::Verified => record.payment_verified(&self.field),
			PaymentFilter::Pending => !record.payment_verified(&self.field),
		}
	}

	fn is_active(&self) -> bool {
		self.choice != PaymentFilter::All
	}
}

/// Passes records whose sub-event collection contains the selected id
#[derive(Debug, Clone)]
pub struct SubEventFilter {
	field: String,
	sub_event: Option<String>,
}

impl SubEventFilter {
	/// Create a sub-event filter; `None` matches everything
	pub fn new(field: impl Into<String>, sub_event: Option<String>) -> Self {
		Self {
			field: field.into(),
			sub_event,
		}
	}
}

impl RecordFilter for SubEventFilter {
	fn name(&self) -> &str {
		"sub_event"
	}

	fn matches(&self, record: &Record) -> bool {
		match &self.sub_event {
			Some(selected) => record
				.sub_event_ids(&self.field)
				.into_iter()
				.any(|id| id == selected),
			None => true,
		}
	}

	fn is_active(&self) -> bool {
		self.sub_event.is_some()
	}
}

/// Case-insensitive substring search over every field value
///
/// Nested arrays and records are stringified to compact JSON before
/// matching, so `partner.email` is searchable. Matching happens against the
/// whole stringified field, not per leaf.
#[derive(Debug, Clone)]
pub struct SearchFilter {
	needle: String,
}

impl SearchFilter {
	/// Create a search filter; an empty query matches everything
	pub fn new(query: &str) -> Self {
		Self {
			needle: query.to_lowercase(),
		}
	}
}

impl RecordFilter for SearchFilter {
	fn name(&self) -> &str {
		"search"
	}

	fn matches(&self, record: &Record) -> bool {
		if self.needle.is_empty() {
			return true;
		}
		record
			.iter()
			.any(|(_, value)| value.to_search_text().to_lowercase().contains(&self.needle))
	}

	fn is_active(&self) -> bool {
		!self.needle.is_empty()
	}
}

/// Composes filters with logical AND
///
/// # Examples
///
/// ```
/// use regdesk_tables::filters::{FieldNames, FilterEngine, FilterState};
/// use regdesk_types::{Record, RegistrationStatus};
///
/// let records = Record::parse_list(r#"[
///     {"id": "a", "registration_status": "pending", "payment_verified": false},
///     {"id": "b", "registration_status": "verified", "payment_verified": true}
/// ]"#).unwrap();
///
/// let state = FilterState::default().with_status(RegistrationStatus::Verified);
/// let engine = FilterEngine::from_state(&state, &FieldNames::default());
/// let visible = engine.apply(&records);
///
/// assert_eq!(visible.len(), 1);
/// assert_eq!(visible[0].id("id").as_deref(), Some("b"));
/// ```
#[derive(Default)]
pub struct FilterEngine {
	filters: Vec<Box<dyn RecordFilter>>,
}

impl FilterEngine {
	/// Create an engine with no filters
	pub fn new() -> Self {
		Self::default()
	}

	/// Build the engine for a filter state; inactive criteria are dropped
	pub fn from_state(state: &FilterState, fields: &FieldNames) -> Self {
		Self::new()
			.add_filter(SearchFilter::new(&state.query))
			.add_filter(StatusFilter::new(&fields.status, state.status))
			.add_filter(PaymentFlagFilter::new(&fields.payment, state.payment))
			.add_filter(SubEventFilter::new(
				&fields.sub_events,
				state.sub_event.clone(),
			))
	}

	/// Add a filter; inactive filters are not stored
	pub fn add_filter(mut self, filter: impl RecordFilter + 'static) -> Self {
		if filter.is_active() {
			self.filters.push(Box::new(filter));
		}
		self
	}

	/// Number of active filters
	pub fn filter_count(&self) -> usize {
		self.filters.len()
	}

	/// Whether no filter is active
	pub fn is_empty(&self) -> bool {
		self.filters.is_empty()
	}

	/// Whether a record passes every active filter
	pub fn matches(&self, record: &Record) -> bool {
		self.filters.iter().all(|filter| filter.matches(record))
	}

	/// Apply every active filter, preserving input order
	pub fn apply<'a, I>(&self, records: I) -> Vec<&'a Record>
	where
		I: IntoIterator<Item = &'a Record>,
	{
		let mut total = 0usize;
		let visible: Vec<&'a Record> = records
			.into_iter()
			.inspect(|_| total += 1)
			.filter(|record| self.matches(record))
			.collect();

		tracing::debug!(
			filters = ?self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
			total,
			visible = visible.len(),
			"applied record filters"
		);
		visible
	}
}

/// A selectable sub-event option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubEventChoice {
	/// Identifier matched by [`SubEventFilter`]
	pub id: String,
	/// Display name, falling back to the id
	pub name: String,
}

/// Distinct sub-events across the records, in first-appearance order
pub fn sub_event_choices(records: &[Record], fields: &FieldNames) -> Vec<SubEventChoice> {
	let mut choices: IndexMap<String, String> = IndexMap::new();
	for record in records {
		let Some(items) = record.get(&fields.sub_events).and_then(Value::as_array) else {
			continue;
		};
		for item in items {
			let (id, name) = match item {
				Value::String(id) => (id.as_str(), id.as_str()),
				Value::Map(entry) => {
					let Some(id) = entry.get("id").and_then(Value::as_str) else {
						continue;
					};
					let name = entry.get("name").and_then(Value::as_str).unwrap_or(id);
					(id, name)
				}
				_ => continue,
			};
			choices
				.entry(id.to_string())
				.or_insert_with(|| name.to_string());
		}
	}
	choices
		.into_iter()
		.map(|(id, name)| SubEventChoice { id, name })
		.collect()
}

/// Per-status and payment tallies for a dashboard header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
	/// All records
	pub total: usize,
	/// Pending (including records without a status)
	pub pending: usize,
	/// Verified
	pub verified: usize,
	/// Cancelled
	pub cancelled: usize,
	/// Status strings outside the known three
	pub other: usize,
	/// Payment-verified records
	pub payment_verified: usize,
}

/// Count records per status and payment state
pub fn status_counts<'a, I>(records: I, fields: &FieldNames) -> StatusCounts
where
	I: IntoIterator<Item = &'a Record>,
{
	let mut counts = StatusCounts::default();
	for record in records {
		counts.total += 1;
		match record.status(&fields.status) {
			"pending" => counts.pending += 1,
			"verified" => counts.verified += 1,
			"cancelled" => counts.cancelled += 1,
			_ => counts.other += 1,
		}
		if record.payment_verified(&fields.payment) {
			counts.payment_verified += 1;
		}
	}
	counts
}
