#![cfg(feature = "export")]

mod common;

use chrono::NaiveDate;
use common::{festival_records, record};
use regdesk_tables::column::{ColumnRules, RecordColumn};
use regdesk_tables::export::{ExportFormat, export_rows};
use regdesk_tables::filters::{FieldNames, FilterEngine, FilterState};
use regdesk_tables::{CellFormatter, TableError};
use regdesk_types::Record;
use rstest::*;
use serde_json::json;

fn date() -> NaiveDate {
	NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
}

/// Scenario: quotes and commas in a name are escaped per RFC 4180
#[rstest]
fn test_csv_escapes_quotes_and_commas() {
	let records = vec![record(json!({"name": "Jöhn \"Doe\", Jr."}))];
	let rules = ColumnRules::default();
	let formatter = CellFormatter::default();
	let names = rules.derive_columns(&records);
	let columns = RecordColumn::from_names(&names, &rules, &formatter);
	let rows: Vec<&Record> = records.iter().collect();

	let result = export_rows(ExportFormat::Csv, &columns, &rows, "all", date()).unwrap();
	let text = String::from_utf8(result.data).unwrap();

	assert!(text.contains(r#""Jöhn ""Doe"", Jr.""#));
	assert_eq!(result.filename, "registrations_all_2025-01-31.csv");
	assert_eq!(result.row_count, 1);
}

#[rstest]
fn test_csv_round_trip_preserves_rows_and_header(festival_records: Vec<Record>) {
	let rules = ColumnRules::default();
	let formatter = CellFormatter::default();
	let names = rules.derive_columns(&festival_records);
	let columns = RecordColumn::from_names(&names, &rules, &formatter);
	let rows: Vec<&Record> = festival_records.iter().collect();

	let result = export_rows(ExportFormat::Csv, &columns, &rows, "all", date()).unwrap();

	let mut reader = csv::Reader::from_reader(result.data.as_slice());
	let header: Vec<String> = reader
		.headers()
		.unwrap()
		.iter()
		.map(str::to_string)
		.collect();
	let expected: Vec<String> = names.iter().map(|n| rules.label(n)).collect();
	assert_eq!(header, expected);

	let parsed: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
	assert_eq!(parsed.len(), festival_records.len());

	let notes = names.iter().position(|n| n == "notes").unwrap();
	assert_eq!(&parsed[3][notes], "line one\nline two");
	let name = names.iter().position(|n| n == "name").unwrap();
	assert_eq!(&parsed[3][name], "Farah \"Fizz\" Ali, Jr.");
}

#[rstest]
fn test_export_covers_only_filtered_rows(festival_records: Vec<Record>) {
	let rules = ColumnRules::default();
	let formatter = CellFormatter::default();
	let names = rules.derive_columns(&festival_records);
	let columns = RecordColumn::from_names(&names, &rules, &formatter);

	let engine = FilterEngine::from_state(
		&FilterState::default().with_sub_event("x-press"),
		&FieldNames::default(),
	);
	let rows = engine.apply(&festival_records);

	let result = export_rows(ExportFormat::Tsv, &columns, &rows, "X-Press", date()).unwrap();
	let mut reader = csv::ReaderBuilder::new()
		.delimiter(b'\t')
		.from_reader(result.data.as_slice());
	let ids: Vec<String> = reader
		.records()
		.map(|r| r.unwrap()[0].to_string())
		.collect();

	assert_eq!(ids, vec!["a", "c"]);
	assert_eq!(result.filename, "registrations_x-press_2025-01-31.tsv");
	assert_eq!(result.mime_type, "text/tab-separated-values");
}

#[rstest]
fn test_json_export_keeps_raw_values(festival_records: Vec<Record>) {
	let rules = ColumnRules::default();
	let formatter = CellFormatter::default();
	let names = rules.derive_columns(&festival_records);
	let columns = RecordColumn::from_names(&names, &rules, &formatter);
	let rows: Vec<&Record> = festival_records.iter().collect();

	let result = export_rows(ExportFormat::Json, &columns, &rows, "all", date()).unwrap();
	let parsed: serde_json::Value = serde_json::from_slice(&result.data).unwrap();

	assert_eq!(parsed.as_array().unwrap().len(), 4);
	assert_eq!(parsed[1]["payment_verified"], json!(true));
	assert_eq!(parsed[2]["partner"]["email"], json!("esha@iiserkol.ac.in"));
	// hidden fields stay out of the export
	assert!(parsed[0].get("created_at").is_none());
}

#[rstest]
fn test_empty_selection_is_refused() {
	let rules = ColumnRules::default();
	let formatter = CellFormatter::default();
	let names = vec!["id".to_string()];
	let columns = RecordColumn::from_names(&names, &rules, &formatter);

	let result = export_rows(ExportFormat::Csv, &columns, &[], "all", date());
	assert!(matches!(result, Err(TableError::NothingToExport)));
}
