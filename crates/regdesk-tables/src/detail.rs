//! Detail view of a single expanded record

use crate::column::ColumnRules;
use crate::format::CellFormatter;
use regdesk_types::Record;
use serde::Serialize;

/// Rendered content of one detail field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DetailValue {
	/// Single formatted string
	Text(String),
	/// Nested list, one line per collection entry
	List(Vec<String>),
}

/// One labelled field of a detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
	/// Record field name
	pub column: String,
	/// Header label
	pub label: String,
	/// Rendered value
	pub value: DetailValue,
}

/// Every non-hidden field of one record, in column order
///
/// Unlike the summary table, the detail view includes fields past the
/// summary limit. Collection fields such as sub-events and team members are
/// shown as a nested list instead of one joined string.
///
/// # Examples
///
/// ```
/// use regdesk_tables::column::ColumnRules;
/// use regdesk_tables::detail::{DetailValue, DetailView};
/// use regdesk_tables::format::CellFormatter;
/// use regdesk_types::Record;
///
/// let record = Record::from_json(serde_json::json!({
///     "id": "c",
///     "qr_used": true,
///     "sub_events": [{"id": "x-press", "name": "X-Press"}]
/// })).unwrap();
///
/// let collections = vec!["sub_events".to_string()];
/// let view = DetailView::build(&record, "id", &ColumnRules::default(), &CellFormatter::default(), &collections);
///
/// assert_eq!(view.id.as_deref(), Some("c"));
/// assert_eq!(view.fields.len(), 2);
/// assert_eq!(
///     view.fields[1].value,
///     DetailValue::List(vec!["id: x-press, name: X-Press".to_string()])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
	/// Record identifier, if present
	pub id: Option<String>,
	/// Rendered fields
	pub fields: Vec<DetailField>,
}

impl DetailView {
	/// Build the detail view for a record
	pub fn build(
		record: &Record,
		id_field: &str,
		rules: &ColumnRules,
		formatter: &CellFormatter,
		collection_fields: &[String],
	) -> Self {
		let columns = rules.derive_columns(std::slice::from_ref(record));

		let fields = columns
			.into_iter()
			.map(|column| {
				let value = record.get(&column);
				let rendered = match value {
					Some(v)
						if collection_fields.contains(&column)
							&& v.as_array().is_some_and(|items| !items.is_empty()) =>
					{
						DetailValue::List(formatter.entry_lines(v))
					}
					_ => DetailValue::Text(formatter.format_cell(&column, value)),
				};
				DetailField {
					label: rules.label(&column),
					column,
					value: rendered,
				}
			})
			.collect();

		Self {
			id: record.id(id_field),
			fields,
		}
	}

	/// Look up a field by column name
	pub fn field(&self, column: &str) -> Option<&DetailField> {
		self.fields.iter().find(|f| f.column == column)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn build(value: serde_json::Value, collections: &[&str]) -> DetailView {
		let record = Record::from_json(value).unwrap();
		let collections: Vec<String> = collections.iter().map(|s| s.to_string()).collect();
		DetailView::build(
			&record,
			"id",
			&ColumnRules::default(),
			&CellFormatter::default(),
			&collections,
		)
	}

	#[rstest]
	fn test_detail_orders_by_priority_and_hides_internal() {
		let view = build(
			json!({"team": "Alpha", "updated_at": "x", "name": "Asha", "id": "r1"}),
			&[],
		);
		let columns: Vec<&str> = view.fields.iter().map(|f| f.column.as_str()).collect();
		assert_eq!(columns, vec!["id", "name", "team"]);
		assert_eq!(view.field("name").unwrap().label, "Name");
	}

	#[rstest]
	fn test_empty_collection_renders_placeholder() {
		let view = build(json!({"id": "r1", "team_members": []}), &["team_members"]);
		assert_eq!(
			view.field("team_members").unwrap().value,
			DetailValue::Text("-".to_string())
		);
	}

	#[rstest]
	fn test_non_collection_array_is_joined() {
		let view = build(
			json!({"id": "r1", "team_members": [{"name": "A"}, {"name": "B"}]}),
			&[],
		);
		assert_eq!(
			view.field("team_members").unwrap().value,
			DetailValue::Text("#1: name: A | #2: name: B".to_string())
		);
	}

	#[rstest]
	fn test_detail_serializes_tagged() {
		let view = build(json!({"id": "r1"}), &[]);
		let json = serde_json::to_value(&view).unwrap();
		assert_eq!(json["fields"][0]["value"]["kind"], "text");
		assert_eq!(json["fields"][0]["value"]["value"], "r1");
	}
}
