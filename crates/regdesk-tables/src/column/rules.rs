//! Column hide/priority rules and header labelling

use indexmap::IndexSet;
use regdesk_types::Record;
use serde::{Deserialize, Serialize};

const DEFAULT_HIDDEN: &[&str] = &[
	"created_at",
	"updated_at",
	"qr_used",
	"qr_used_at",
	"qr_scanned_at",
	"row_number",
];

const DEFAULT_PRIORITY: &[&str] = &[
	"id",
	"registration_id",
	"name",
	"email",
	"phone",
	"college",
	"event_name",
	"registration_status",
	"payment_verified",
	"utr_number",
	"amount",
	"timestamp",
];

const DEFAULT_ACRONYMS: &[&str] = &["id", "uid", "utr", "qr", "upi", "url"];

/// Rules deciding which derived columns are shown and in what order
///
/// # Examples
///
/// ```
/// use regdesk_tables::column::ColumnRules;
/// use regdesk_types::Record;
///
/// let records = Record::parse_list(r#"[
///     {"team": "Alpha", "id": "a", "qr_used": true},
///     {"id": "b", "name": "Bea", "college": "IISER"}
/// ]"#).unwrap();
///
/// let columns = ColumnRules::default().derive_columns(&records);
/// assert_eq!(columns, vec!["id", "name", "college", "team"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRules {
	/// Internal or audit fields never shown
	pub hidden: Vec<String>,
	/// Columns shown first, in this order
	pub priority: Vec<String>,
	/// Words upper-cased in header labels
	pub acronyms: Vec<String>,
}

impl Default for ColumnRules {
	fn default() -> Self {
		Self {
			hidden: to_strings(DEFAULT_HIDDEN),
			priority: to_strings(DEFAULT_PRIORITY),
			acronyms: to_strings(DEFAULT_ACRONYMS),
		}
	}
}

impl ColumnRules {
	/// Rules with no hidden columns, no priority, and no acronyms
	pub fn empty() -> Self {
		Self {
			hidden: Vec::new(),
			priority: Vec::new(),
			acronyms: Vec::new(),
		}
	}

	/// Replace the hidden set
	pub fn with_hidden<I, S>(mut self, hidden: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.hidden = hidden.into_iter().map(Into::into).collect();
		self
	}

	/// Replace the priority list
	pub fn with_priority<I, S>(mut self, priority: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.priority = priority.into_iter().map(Into::into).collect();
		self
	}

	/// Replace the acronym list
	pub fn with_acronyms<I, S>(mut self, acronyms: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.acronyms = acronyms.into_iter().map(Into::into).collect();
		self
	}

	/// Whether a column is in the hidden set
	pub fn is_hidden(&self, column: &str) -> bool {
		self.hidden.iter().any(|hidden| hidden == column)
	}

	/// Position in the priority list; unprioritised columns sort last
	fn priority_rank(&self, column: &str) -> usize {
		self.priority
			.iter()
			.position(|p| p == column)
			.unwrap_or(usize::MAX)
	}

	/// Derive the ordered, visible column list for a set of records
	///
	/// The result is the union of keys across every record (shapes differ
	/// per event), without hidden columns and without duplicates. Prioritised
	/// columns come first in priority order; the rest keep the order in which
	/// they were first seen.
	pub fn derive_columns(&self, records: &[Record]) -> Vec<String> {
		let mut seen: IndexSet<&str> = IndexSet::new();
		for record in records {
			seen.extend(record.keys());
		}

		let mut columns: Vec<String> = seen
			.into_iter()
			.filter(|column| !self.is_hidden(column))
			.map(str::to_string)
			.collect();
		// sort_by_key is stable, which keeps first-seen order within a rank
		columns.sort_by_key(|column| self.priority_rank(column));

		tracing::debug!(
			records = records.len(),
			columns = columns.len(),
			"derived table columns"
		);
		columns
	}

	/// Convert a `snake_case` column name to a Title Case header
	///
	/// ```
	/// use regdesk_tables::column::ColumnRules;
	///
	/// let rules = ColumnRules::default();
	/// assert_eq!(rules.label("utr_number"), "UTR Number");
	/// assert_eq!(rules.label("team_uid"), "Team UID");
	/// assert_eq!(rules.label("registration_status"), "Registration Status");
	/// ```
	pub fn label(&self, column: &str) -> String {
		column
			.split(['_', '-'])
			.filter(|word| !word.is_empty())
			.map(|word| {
				if self.acronyms.iter().any(|a| a.eq_ignore_ascii_case(word)) {
					return word.to_uppercase();
				}
				let mut chars = word.chars();
				match chars.next() {
					None => String::new(),
					Some(first) => first.to_uppercase().chain(chars).collect(),
				}
			})
			.collect::<Vec<_>>()
			.join(" ")
	}
}

/// Leading columns shown while a row is collapsed
pub fn summary_columns(columns: &[String], limit: usize) -> &[String] {
	&columns[..columns.len().min(limit)]
}

fn to_strings(items: &[&str]) -> Vec<String> {
	items.iter().map(|s| s.to_string()).collect()
}
