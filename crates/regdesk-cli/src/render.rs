//! Plain-text rendering of tables, details, and counts

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use regdesk_tables::column::{Column, ColumnRules, RecordColumn, summary_columns};
use regdesk_tables::filters::StatusCounts;
use regdesk_tables::{DetailValue, DetailView, TableConfig, ViewState};

/// Table of the visible rows
///
/// Shows the leading summary columns unless `all_columns` is set.
pub(crate) fn records_table(state: &ViewState, config: &TableConfig, all_columns: bool) -> String {
	let names = state.columns(config);
	let shown = if all_columns {
		&names[..]
	} else {
		summary_columns(&names, config.summary_limit)
	};
	let columns = RecordColumn::from_names(shown, &config.rules, &config.formatter);

	let mut table = Table::new();
	table
		.load_preset(UTF8_FULL)
		.set_content_arrangement(ContentArrangement::Dynamic)
		.set_header(columns.iter().map(|c| c.header().to_string()));

	for record in state.visible_records() {
		table.add_row(columns.iter().map(|c| c.render(record)));
	}

	table.to_string()
}

/// One-line tally for the footer
pub(crate) fn counts_line(counts: &StatusCounts, shown: usize) -> String {
	format!(
		"{} of {} shown | pending {} | verified {} | cancelled {} | payment verified {}",
		shown, counts.total, counts.pending, counts.verified, counts.cancelled, counts.payment_verified
	)
}

/// Aligned label and value lines, collections as indented bullets
pub(crate) fn detail_text(view: &DetailView) -> String {
	let width = view
		.fields
		.iter()
		.map(|f| f.label.chars().count())
		.max()
		.unwrap_or(0);

	let mut out = String::new();
	for field in &view.fields {
		match &field.value {
			DetailValue::Text(text) => {
				out.push_str(&format!("{:<width$}  {}\n", field.label, text, width = width));
			}
			DetailValue::List(lines) => {
				out.push_str(&format!("{}\n", field.label));
				for line in lines {
					out.push_str(&format!("  - {}\n", line));
				}
			}
		}
	}
	out
}

/// Derived column order with header labels
pub(crate) fn columns_text(columns: &[String], rules: &ColumnRules) -> String {
	columns
		.iter()
		.enumerate()
		.map(|(index, name)| format!("{:>3}. {} ({})\n", index + 1, rules.label(name), name))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use regdesk_tables::filters::FieldNames;
	use regdesk_tables::state::Action;
	use regdesk_types::Record;
	use rstest::*;

	#[fixture]
	fn state() -> ViewState {
		let records = Record::parse_list(
			r#"[
				{"id": "a", "name": "Asha", "registration_status": "verified", "payment_verified": true},
				{"id": "b", "name": "Ravi", "college": "IISER Kolkata"}
			]"#,
		)
		.unwrap();
		let state = ViewState::new(FieldNames::default()).reduce(Action::LoadStarted);
		let epoch = state.epoch();
		state.reduce(Action::LoadSucceeded { epoch, records })
	}

	#[rstest]
	fn test_table_has_headers_and_rows(state: ViewState) {
		let text = records_table(&state, &TableConfig::default(), false);
		assert!(text.contains("ID"));
		assert!(text.contains("Registration Status"));
		assert!(text.contains("Asha"));
		assert!(text.contains("IISER Kolkata"));
	}

	#[rstest]
	fn test_table_respects_summary_limit(state: ViewState) {
		let config = TableConfig {
			summary_limit: 2,
			..TableConfig::default()
		};
		let text = records_table(&state, &config, false);
		assert!(text.contains("Name"));
		assert!(!text.contains("College"));

		let text = records_table(&state, &config, true);
		assert!(text.contains("College"));
	}

	#[rstest]
	fn test_detail_text_lists_collections() {
		let record = Record::parse_list(
			r#"[{"id": "c", "sub_events": [{"id": "x-press", "name": "X-Press"}]}]"#,
		)
		.unwrap()
		.remove(0);
		let config = TableConfig::default();
		let view = DetailView::build(
			&record,
			"id",
			&config.rules,
			&config.formatter,
			&config.collection_fields,
		);
		let text = detail_text(&view);
		assert!(text.contains("Sub Events\n  - id: x-press, name: X-Press\n"));
		assert!(text.starts_with("ID"));
	}

	#[rstest]
	fn test_counts_line() {
		let counts = StatusCounts {
			total: 4,
			pending: 2,
			verified: 1,
			cancelled: 1,
			other: 0,
			payment_verified: 2,
		};
		assert_eq!(
			counts_line(&counts, 3),
			"3 of 4 shown | pending 2 | verified 1 | cancelled 1 | payment verified 2"
		);
	}

	#[rstest]
	fn test_columns_text() {
		let columns = vec!["id".to_string(), "utr_number".to_string()];
		let text = columns_text(&columns, &ColumnRules::default());
		assert_eq!(text, "  1. ID (id)\n  2. UTR Number (utr_number)\n");
	}
}
