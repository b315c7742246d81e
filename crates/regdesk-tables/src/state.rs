//! Dashboard view state
//!
//! All mutable dashboard state lives in one [`ViewState`] value that is
//! replaced, never mutated in place, by [`ViewState::reduce`]. Every
//! transition is a pure function of (state, action) and can be tested
//! without any UI harness.
//!
//! Loads carry an epoch. Each [`Action::LoadStarted`] bumps the epoch, and a
//! completion tagged with an older epoch is ignored, so a slow superseded
//! fetch can never overwrite the result of a newer one.

use crate::config::TableConfig;
use crate::detail::DetailView;
use crate::filters::{FieldNames, FilterEngine, FilterState, PaymentFilter};
use regdesk_types::{Record, RegistrationStatus, StatusUpdate, Value};
use std::collections::BTreeSet;

/// Events that move the view from one state to the next
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
	/// Free-text query changed
	SetQuery(String),
	/// Status filter changed (`None` = all)
	SetStatusFilter(Option<RegistrationStatus>),
	/// Payment filter changed
	SetPaymentFilter(PaymentFilter),
	/// Sub-event filter changed (`None` = all)
	SetSubEventFilter(Option<String>),
	/// Reset every filter to its no-op state
	ClearFilters,
	/// Flip one row between collapsed and expanded
	ToggleExpanded(String),
	/// Collapse every row
	CollapseAll,
	/// A fetch was issued
	LoadStarted,
	/// A fetch resolved with records
	LoadSucceeded {
		/// Epoch returned by [`ViewState::epoch`] after `LoadStarted`
		epoch: u64,
		/// The freshly loaded list
		records: Vec<Record>,
	},
	/// A fetch failed; previously loaded records stay in place
	LoadFailed {
		/// Epoch of the failed fetch
		epoch: u64,
		/// Human-readable failure
		message: String,
	},
	/// A status update was accepted by the backend
	RecordUpdated(StatusUpdate),
}

/// Loaded records, filter inputs, expanded rows, and load status
///
/// # Examples
///
/// ```
/// use regdesk_tables::filters::FieldNames;
/// use regdesk_tables::state::{Action, ViewState};
/// use regdesk_types::Record;
///
/// let records = Record::parse_list(r#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
///
/// let state = ViewState::new(FieldNames::default()).reduce(Action::LoadStarted);
/// let epoch = state.epoch();
/// let state = state
///     .reduce(Action::LoadSucceeded { epoch, records })
///     .reduce(Action::ToggleExpanded("b".to_string()));
///
/// assert!(state.is_expanded("b"));
/// assert!(!state.is_expanded("a"));
/// assert_eq!(state.visible_records().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
	fields: FieldNames,
	records: Vec<Record>,
	filters: FilterState,
	expanded: BTreeSet<String>,
	loading: bool,
	error: Option<String>,
	epoch: u64,
}

impl ViewState {
	/// Empty state reading the given field names
	pub fn new(fields: FieldNames) -> Self {
		Self {
			fields,
			..Self::default()
		}
	}

	/// Apply one action, producing the next state
	pub fn reduce(mut self, action: Action) -> Self {
		match action {
			Action::SetQuery(query) => self.filters.query = query,
			Action::SetStatusFilter(status) => self.filters.status = status,
			Action::SetPaymentFilter(payment) => self.filters.payment = payment,
			Action::SetSubEventFilter(sub_event) => self.filters.sub_event = sub_event,
			Action::ClearFilters => self.filters = FilterState::default(),
			Action::ToggleExpanded(id) => {
				if !self.expanded.remove(&id) {
					self.expanded.insert(id);
				}
			}
			Action::CollapseAll => self.expanded.clear(),
			Action::LoadStarted => {
				self.epoch += 1;
				self.loading = true;
			}
			Action::LoadSucceeded { epoch, records } => {
				if epoch != self.epoch {
					tracing::debug!(epoch, current = self.epoch, "dropping stale load result");
					return self;
				}
				let ids: BTreeSet<String> = records
					.iter()
					.filter_map(|r| r.id(&self.fields.id))
					.collect();
				self.expanded.retain(|id| ids.contains(id));
				self.records = records;
				self.loading = false;
				self.error = None;
			}
			Action::LoadFailed { epoch, message } => {
				if epoch != self.epoch {
					tracing::debug!(epoch, current = self.epoch, "dropping stale load failure");
					return self;
				}
				self.loading = false;
				self.error = Some(message);
			}
			Action::RecordUpdated(update) => self.apply_update(&update),
		}
		self
	}

	fn apply_update(&mut self, update: &StatusUpdate) {
		let fields = &self.fields;
		let Some(record) = self
			.records
			.iter_mut()
			.find(|r| r.id(&fields.id).as_deref() == Some(update.id.as_str()))
		else {
			tracing::debug!(id = %update.id, "updated record is not loaded");
			return;
		};
		record.insert(
			fields.status.clone(),
			Value::from(update.registration_status.as_str()),
		);
		record.insert(fields.payment.clone(), Value::Bool(update.payment_verified));
	}

	/// Field names this state reads
	pub fn fields(&self) -> &FieldNames {
		&self.fields
	}

	/// Every loaded record, unfiltered
	pub fn records(&self) -> &[Record] {
		&self.records
	}

	/// Current filter inputs
	pub fn filters(&self) -> &FilterState {
		&self.filters
	}

	/// Whether a fetch is outstanding
	pub fn is_loading(&self) -> bool {
		self.loading
	}

	/// Last load failure, cleared by the next successful load
	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// Epoch of the most recently started load
	pub fn epoch(&self) -> u64 {
		self.epoch
	}

	/// Whether a row is expanded
	pub fn is_expanded(&self, id: &str) -> bool {
		self.expanded.contains(id)
	}

	/// Expanded row identifiers
	pub fn expanded(&self) -> impl Iterator<Item = &str> {
		self.expanded.iter().map(String::as_str)
	}

	/// The filtered subset, in load order
	pub fn visible_records(&self) -> Vec<&Record> {
		FilterEngine::from_state(&self.filters, &self.fields).apply(&self.records)
	}

	/// Derived column order for the loaded records
	pub fn columns(&self, config: &TableConfig) -> Vec<String> {
		config.rules.derive_columns(&self.records)
	}

	/// Export is offered only when the filtered set is non-empty
	pub fn can_export(&self) -> bool {
		let engine = FilterEngine::from_state(&self.filters, &self.fields);
		self.records.iter().any(|r| engine.matches(r))
	}

	/// Whether the empty-state message should be shown
	pub fn is_empty(&self) -> bool {
		!self.loading && !self.can_export()
	}

	/// Find a loaded record by identifier
	pub fn record(&self, id: &str) -> Option<&Record> {
		self.records
			.iter()
			.find(|r| r.id(&self.fields.id).as_deref() == Some(id))
	}

	/// Detail views for the expanded rows that are currently visible
	pub fn expanded_details(&self, config: &TableConfig) -> Vec<DetailView> {
		self.visible_records()
			.into_iter()
			.filter(|r| r.id(&self.fields.id).is_some_and(|id| self.is_expanded(&id)))
			.map(|r| {
				DetailView::build(
					r,
					&self.fields.id,
					&config.rules,
					&config.formatter,
					&config.collection_fields,
				)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn loaded(json: &str) -> ViewState {
		let records = Record::parse_list(json).unwrap();
		let state = ViewState::new(FieldNames::default()).reduce(Action::LoadStarted);
		let epoch = state.epoch();
		state.reduce(Action::LoadSucceeded { epoch, records })
	}

	#[rstest]
	fn test_toggle_twice_collapses() {
		let state = loaded(r#"[{"id": "a"}]"#)
			.reduce(Action::ToggleExpanded("a".into()))
			.reduce(Action::ToggleExpanded("a".into()));
		assert!(!state.is_expanded("a"));
	}

	#[rstest]
	fn test_expansion_does_not_affect_filtering() {
		let state = loaded(r#"[{"id": "a"}, {"id": "b"}]"#)
			.reduce(Action::ToggleExpanded("a".into()))
			.reduce(Action::SetQuery("b".into()));
		assert_eq!(state.visible_records().len(), 1);
		assert!(state.is_expanded("a"));
	}

	#[rstest]
	fn test_load_failure_keeps_records() {
		let state = loaded(r#"[{"id": "a"}]"#).reduce(Action::LoadStarted);
		let epoch = state.epoch();
		let state = state.reduce(Action::LoadFailed {
			epoch,
			message: "network down".into(),
		});
		assert_eq!(state.records().len(), 1);
		assert_eq!(state.error(), Some("network down"));
		assert!(!state.is_loading());
	}

	#[rstest]
	fn test_stale_load_failure_is_ignored() {
		let state = ViewState::new(FieldNames::default()).reduce(Action::LoadStarted);
		let first = state.epoch();
		let state = state.reduce(Action::LoadStarted);
		let second = state.epoch();
		let records = Record::parse_list(r#"[{"id": "b"}, {"id": "c"}]"#).unwrap();

		let state = state
			.reduce(Action::LoadSucceeded {
				epoch: second,
				records,
			})
			.reduce(Action::LoadFailed {
				epoch: first,
				message: "timed out".into(),
			});

		assert_eq!(state.error(), None);
		assert!(!state.is_loading());
		assert_eq!(state.records().len(), 2);
		assert!(state.record("b").is_some());
		assert!(state.record("c").is_some());
	}

	#[rstest]
	fn test_record_updated_patches_status_and_payment() {
		let state = loaded(r#"[{"id": "a", "registration_status": "pending"}]"#).reduce(
			Action::RecordUpdated(StatusUpdate::new("a", RegistrationStatus::Verified, true)),
		);
		let record = state.record("a").unwrap();
		assert_eq!(record.status("registration_status"), "verified");
		assert!(record.payment_verified("payment_verified"));
	}

	#[rstest]
	fn test_update_for_unknown_record_is_ignored() {
		let before = loaded(r#"[{"id": "a"}]"#);
		let after = before.clone().reduce(Action::RecordUpdated(StatusUpdate::new(
			"zzz",
			RegistrationStatus::Cancelled,
			false,
		)));
		assert_eq!(before, after);
	}

	#[rstest]
	fn test_clear_filters() {
		let state = loaded(r#"[{"id": "a"}]"#)
			.reduce(Action::SetPaymentFilter(PaymentFilter::Verified))
			.reduce(Action::SetSubEventFilter(Some("x".into())))
			.reduce(Action::ClearFilters);
		assert!(state.filters().is_unfiltered());
	}
}
