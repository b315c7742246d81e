//! Export functionality for filtered registration lists
//!
//! Exports always operate on the currently filtered rows, in filtered order,
//! and on the derived (non-hidden) columns. An empty filtered set is refused
//! with [`TableError::NothingToExport`] instead of producing an empty file.

use crate::column::Column;
use crate::error::{Result, TableError};
use chrono::NaiveDate;
use csv::WriterBuilder;
use regdesk_types::Record;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Export format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
	/// Comma-separated values
	#[default]
	Csv,
	/// Tab-separated values
	Tsv,
	/// JSON array of the raw (unformatted) field values
	Json,
}

impl ExportFormat {
	/// Get file extension for this format
	pub fn extension(&self) -> &'static str {
		match self {
			ExportFormat::Csv => "csv",
			ExportFormat::Tsv => "tsv",
			ExportFormat::Json => "json",
		}
	}

	/// Get MIME type for this format
	pub fn mime_type(&self) -> &'static str {
		match self {
			ExportFormat::Csv => "text/csv",
			ExportFormat::Tsv => "text/tab-separated-values",
			ExportFormat::Json => "application/json",
		}
	}
}

impl FromStr for ExportFormat {
	type Err = TableError;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"csv" => Ok(ExportFormat::Csv),
			"tsv" => Ok(ExportFormat::Tsv),
			"json" => Ok(ExportFormat::Json),
			other => Err(TableError::UnknownFormat(other.to_string())),
		}
	}
}

/// Export result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
	/// Exported data as bytes
	pub data: Vec<u8>,
	/// MIME type
	pub mime_type: String,
	/// Suggested filename
	pub filename: String,
	/// Number of rows exported
	pub row_count: usize,
}

impl ExportResult {
	/// Create a new export result
	pub fn new(
		data: Vec<u8>,
		mime_type: impl Into<String>,
		filename: impl Into<String>,
		row_count: usize,
	) -> Self {
		Self {
			data,
			mime_type: mime_type.into(),
			filename: filename.into(),
			row_count,
		}
	}

	/// Get data size in bytes
	pub fn size_bytes(&self) -> usize {
		self.data.len()
	}
}

/// CSV (and TSV) exporter
pub struct CsvExporter;

impl CsvExporter {
	/// Export rows with RFC 4180 escaping
	///
	/// The header row holds each column's header. Cells use the column's
	/// rendering, so arrays and nested records arrive as the same readable
	/// summary the table shows. Fields containing the delimiter, a quote, or
	/// a line break are quoted with internal quotes doubled.
	///
	/// # Examples
	///
	/// ```
	/// use regdesk_tables::column::{ColumnRules, RecordColumn};
	/// use regdesk_tables::export::CsvExporter;
	/// use regdesk_tables::format::CellFormatter;
	/// use regdesk_types::Record;
	///
	/// let records = Record::parse_list(r#"[{"id": "a", "name": "Jöhn \"Doe\", Jr."}]"#).unwrap();
	/// let formatter = CellFormatter::default();
	/// let names = vec!["id".to_string(), "name".to_string()];
	/// let columns = RecordColumn::from_names(&names, &ColumnRules::default(), &formatter);
	/// let rows: Vec<&Record> = records.iter().collect();
	///
	/// let data = CsvExporter::export(&columns, &rows, b',').unwrap();
	/// assert_eq!(
	///     String::from_utf8(data).unwrap(),
	///     "ID,Name\na,\"Jöhn \"\"Doe\"\", Jr.\"\n"
	/// );
	/// ```
	pub fn export<C>(columns: &[C], rows: &[&Record], delimiter: u8) -> Result<Vec<u8>>
	where
		C: Column<Row = Record>,
	{
		let mut writer = WriterBuilder::new()
			.delimiter(delimiter)
			.from_writer(Vec::new());

		writer.write_record(columns.iter().map(|c| c.header()))?;

		for row in rows {
			writer.write_record(columns.iter().map(|c| c.render(row)))?;
		}

		writer.flush()?;
		writer.into_inner().map_err(|e| e.into_error().into())
	}
}

/// JSON exporter
pub struct JsonExporter;

impl JsonExporter {
	/// Export rows as a JSON array restricted to the given columns
	///
	/// Values are exported raw, not formatted. Fields a record lacks are
	/// omitted from its object.
	pub fn export<C>(columns: &[C], rows: &[&Record]) -> Result<Vec<u8>>
	where
		C: Column<Row = Record>,
	{
		let objects: Vec<serde_json::Map<String, serde_json::Value>> = rows
			.iter()
			.map(|row| {
				columns
					.iter()
					.filter_map(|c| {
						row.get(c.name())
							.map(|v| (c.name().to_string(), serde_json::Value::from(v.clone())))
					})
					.collect()
			})
			.collect();

		Ok(serde_json::to_vec_pretty(&objects)?)
	}
}

/// Suggested download name, e.g. `registrations_all_2025-01-31.csv`
///
/// ```
/// use chrono::NaiveDate;
/// use regdesk_tables::export::{ExportFormat, export_filename};
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
/// assert_eq!(
///     export_filename("Dance Off!", date, ExportFormat::Csv),
///     "registrations_dance-off_2025-01-31.csv"
/// );
/// ```
pub fn export_filename(scope: &str, date: NaiveDate, format: ExportFormat) -> String {
	let mut slug = String::new();
	for c in scope.trim().chars() {
		if c.is_ascii_alphanumeric() {
			slug.push(c.to_ascii_lowercase());
		} else if !slug.ends_with('-') && !slug.is_empty() {
			slug.push('-');
		}
	}
	let slug = slug.trim_end_matches('-');
	let slug = if slug.is_empty() { "all" } else { slug };

	format!(
		"registrations_{}_{}.{}",
		slug,
		date.format("%Y-%m-%d"),
		format.extension()
	)
}

/// Export the filtered rows in the requested format
pub fn export_rows<C>(
	format: ExportFormat,
	columns: &[C],
	rows: &[&Record],
	scope: &str,
	date: NaiveDate,
) -> Result<ExportResult>
where
	C: Column<Row = Record>,
{
	if rows.is_empty() {
		return Err(TableError::NothingToExport);
	}
	if columns.is_empty() {
		return Err(TableError::NoColumns);
	}

	let data = match format {
		ExportFormat::Csv => CsvExporter::export(columns, rows, b',')?,
		ExportFormat::Tsv => CsvExporter::export(columns, rows, b'\t')?,
		ExportFormat::Json => JsonExporter::export(columns, rows)?,
	};

	tracing::info!(
		format = format.extension(),
		rows = rows.len(),
		columns = columns.len(),
		bytes = data.len(),
		"exported registrations"
	);

	Ok(ExportResult::new(
		data,
		format.mime_type(),
		export_filename(scope, date, format),
		rows.len(),
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(ExportFormat::Csv, "csv", "text/csv")]
	#[case(ExportFormat::Tsv, "tsv", "text/tab-separated-values")]
	#[case(ExportFormat::Json, "json", "application/json")]
	fn test_format_metadata(
		#[case] format: ExportFormat,
		#[case] extension: &str,
		#[case] mime: &str,
	) {
		assert_eq!(format.extension(), extension);
		assert_eq!(format.mime_type(), mime);
	}

	#[rstest]
	fn test_format_parse() {
		assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
		assert!(matches!(
			"xlsx".parse::<ExportFormat>(),
			Err(TableError::UnknownFormat(f)) if f == "xlsx"
		));
	}

	#[rstest]
	#[case("", "all")]
	#[case("all", "all")]
	#[case("  X-Press 2025 ", "x-press-2025")]
	#[case("***", "all")]
	fn test_export_filename_slug(#[case] scope: &str, #[case] slug: &str) {
		let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
		assert_eq!(
			export_filename(scope, date, ExportFormat::Tsv),
			format!("registrations_{}_2025-02-03.tsv", slug)
		);
	}
}
