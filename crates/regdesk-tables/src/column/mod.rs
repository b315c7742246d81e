//! Column definitions and derivation
//!
//! Columns are never declared up front. They are the union of keys seen
//! across the loaded records, minus a hidden set, ordered by a priority list.

pub mod base;
pub mod rules;

pub use base::{Column, RecordColumn};
pub use rules::{ColumnRules, summary_columns};
