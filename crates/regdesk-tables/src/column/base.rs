//! Base column trait and the record column implementation

use crate::column::ColumnRules;
use crate::format::CellFormatter;
use regdesk_types::Record;
use std::fmt::Debug;

/// Trait for table column definitions
///
/// A column knows its identifier, its header text, and how to render a
/// cell for a row. Exporters and text renderers work against this trait so
/// they never need to know where the display string comes from.
pub trait Column: Debug {
	/// The type of rows this column operates on
	type Row;

	/// Returns the name of this column
	///
	/// This is the record field the column reads.
	fn name(&self) -> &str;

	/// Returns the header text for this column
	fn header(&self) -> &str;

	/// Renders the column value for the given row
	fn render(&self, row: &Self::Row) -> String;
}

/// A column reading one field of a [`Record`] through a [`CellFormatter`]
///
/// # Example
///
/// ```rust
/// use regdesk_tables::column::{Column, ColumnRules, RecordColumn};
/// use regdesk_tables::format::CellFormatter;
/// use regdesk_types::Record;
///
/// let formatter = CellFormatter::default();
/// let rules = ColumnRules::default();
/// let column = RecordColumn::new("payment_verified", &rules, &formatter);
///
/// let mut record = Record::new();
/// record.insert("payment_verified", true);
///
/// assert_eq!(column.header(), "Payment Verified");
/// assert_eq!(column.render(&record), "Yes");
/// ```
pub struct RecordColumn<'f> {
	name: String,
	header: String,
	formatter: &'f CellFormatter,
}

impl<'f> RecordColumn<'f> {
	/// Creates a column for `name`, labelling it with the rules' acronyms
	pub fn new(name: impl Into<String>, rules: &ColumnRules, formatter: &'f CellFormatter) -> Self {
		let name = name.into();
		Self {
			header: rules.label(&name),
			name,
			formatter,
		}
	}

	/// Builds one column per derived column name, keeping their order
	pub fn from_names(
		names: &[String],
		rules: &ColumnRules,
		formatter: &'f CellFormatter,
	) -> Vec<Self> {
		names
			.iter()
			.map(|name| RecordColumn::new(name.as_str(), rules, formatter))
			.collect()
	}
}

impl Debug for RecordColumn<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RecordColumn")
			.field("name", &self.name)
			.field("header", &self.header)
			.finish_non_exhaustive()
	}
}

impl Column for RecordColumn<'_> {
	type Row = Record;

	fn name(&self) -> &str {
		&self.name
	}

	fn header(&self) -> &str {
		&self.header
	}

	fn render(&self, row: &Self::Row) -> String {
		self.formatter.format_cell(&self.name, row.get(&self.name))
	}
}
