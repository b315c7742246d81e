//! Combined table configuration

use crate::column::ColumnRules;
use crate::filters::FieldNames;
use crate::format::CellFormatter;

/// Everything the table pipeline needs besides the records themselves
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
	/// Hidden/priority/acronym rules
	pub rules: ColumnRules,
	/// Conventional field names
	pub fields: FieldNames,
	/// Value formatter
	pub formatter: CellFormatter,
	/// Fields rendered as nested lists in detail views
	pub collection_fields: Vec<String>,
	/// Number of leading columns shown for collapsed rows
	pub summary_limit: usize,
}

impl Default for TableConfig {
	fn default() -> Self {
		Self {
			rules: ColumnRules::default(),
			fields: FieldNames::default(),
			formatter: CellFormatter::default(),
			collection_fields: vec!["sub_events".to_string(), "team_members".to_string()],
			summary_limit: 8,
		}
	}
}
