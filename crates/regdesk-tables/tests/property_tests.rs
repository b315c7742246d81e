//! Property-based tests for the table pipeline
//!
//! Uses proptest to check column derivation, filtering, and CSV escaping
//! over generated record shapes.

#![cfg(feature = "export")]

use proptest::prelude::*;
use regdesk_tables::column::{ColumnRules, RecordColumn};
use regdesk_tables::export::CsvExporter;
use regdesk_tables::filters::{FieldNames, FilterEngine, FilterState, PaymentFilter};
use regdesk_tables::state::ViewState;
use regdesk_tables::{CellFormatter, TableConfig};
use regdesk_types::{Record, RegistrationStatus, Value};
use rstest::*;
use std::collections::HashSet;

fn arb_leaf() -> impl Strategy<Value = Value> {
	prop_oneof![
		Just(Value::Null),
		any::<bool>().prop_map(Value::Bool),
		(-10_000i64..10_000).prop_map(Value::from),
		"[a-zA-Z0-9 ,\"\n@.-]{0,16}".prop_map(Value::from),
	]
}

fn arb_value() -> impl Strategy<Value = Value> {
	arb_leaf().prop_recursive(2, 16, 4, |inner| {
		prop_oneof![
			prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
			prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
				.prop_map(|entries| Value::Map(entries.into_iter().collect())),
		]
	})
}

fn arb_record() -> impl Strategy<Value = Record> {
	let keys = prop_oneof![
		Just("id".to_string()),
		Just("name".to_string()),
		Just("registration_status".to_string()),
		Just("payment_verified".to_string()),
		Just("created_at".to_string()),
		Just("qr_used".to_string()),
		"[a-z_]{1,8}",
	];
	prop::collection::vec((keys, arb_value()), 0..6)
		.prop_map(|entries| entries.into_iter().collect())
}

fn arb_filter_state() -> impl Strategy<Value = FilterState> {
	(
		"[a-z0-9]{0,3}",
		prop::option::of(prop::sample::select(RegistrationStatus::ALL.to_vec())),
		prop::sample::select(vec![
			PaymentFilter::All,
			PaymentFilter::Verified,
			PaymentFilter::Pending,
		]),
	)
		.prop_map(|(query, status, payment)| FilterState {
			query,
			status,
			payment,
			sub_event: None,
		})
}

proptest! {
	#[rstest]
	fn prop_columns_are_key_union_minus_hidden(records in prop::collection::vec(arb_record(), 0..6)) {
		let rules = ColumnRules::default();
		let columns = rules.derive_columns(&records);

		let unique: HashSet<&String> = columns.iter().collect();
		prop_assert_eq!(unique.len(), columns.len());

		let expected: HashSet<String> = records
			.iter()
			.flat_map(|r| r.keys().map(str::to_string))
			.filter(|k| !rules.is_hidden(k))
			.collect();
		let actual: HashSet<String> = columns.iter().cloned().collect();
		prop_assert_eq!(actual, expected);
	}

	#[rstest]
	fn prop_filtering_is_idempotent(
		records in prop::collection::vec(arb_record(), 0..8),
		state in arb_filter_state(),
	) {
		let engine = FilterEngine::from_state(&state, &FieldNames::default());
		let once: Vec<Record> = engine.apply(&records).into_iter().cloned().collect();
		let twice: Vec<Record> = engine.apply(&once).into_iter().cloned().collect();
		prop_assert_eq!(once, twice);
	}

	#[rstest]
	fn prop_filtered_set_is_ordered_subset(
		records in prop::collection::vec(arb_record(), 0..8),
		state in arb_filter_state(),
	) {
		let engine = FilterEngine::from_state(&state, &FieldNames::default());
		let filtered = engine.apply(&records);
		prop_assert!(filtered.len() <= records.len());

		let mut cursor = records.iter();
		for kept in filtered {
			prop_assert!(cursor.any(|r| std::ptr::eq(r, kept)));
		}
	}

	#[rstest]
	fn prop_csv_parses_back_to_rendered_cells(records in prop::collection::vec(arb_record(), 1..6)) {
		let rules = ColumnRules::default();
		let formatter = CellFormatter::default();
		let names = rules.derive_columns(&records);
		prop_assume!(!names.is_empty());
		let columns = RecordColumn::from_names(&names, &rules, &formatter);
		let rows: Vec<&Record> = records.iter().collect();

		let data = CsvExporter::export(&columns, &rows, b',').unwrap();
		let mut reader = csv::Reader::from_reader(data.as_slice());
		let parsed: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

		prop_assert_eq!(parsed.len(), records.len());
		for (row, record) in parsed.iter().zip(&records) {
			prop_assert_eq!(row.len(), names.len());
			for (cell, name) in row.iter().zip(&names) {
				prop_assert_eq!(cell, formatter.format_cell(name, record.get(name)));
			}
		}
	}

	#[rstest]
	fn prop_format_never_empty(value in arb_value()) {
		let formatter = CellFormatter::default();
		prop_assert!(!formatter.format_value(&value).is_empty());
	}
}

#[rstest]
fn test_empty_list_yields_empty_views() {
	let config = TableConfig::default();
	let state = ViewState::new(config.fields.clone());
	assert!(state.columns(&config).is_empty());
	assert!(state.visible_records().is_empty());
	assert!(!state.can_export());
}
