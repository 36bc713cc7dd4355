//! The flat measures output table

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One output row: a measure's counts and rate for one stratum
///
/// Suppressed cells are `None`; `suppressed` records that redaction
/// happened so a missing cell cannot be confused with a zero count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureRow {
    /// Measure id
    pub measure_id: String,
    /// Stratum category value (e.g. "F", "London", "unknown")
    pub category: String,
    /// Numerator count, redacted when suppressed
    pub numerator: Option<u64>,
    /// Denominator count, redacted when suppressed
    pub denominator: Option<u64>,
    /// numerator / denominator; absent when the denominator is zero or
    /// either operand is suppressed
    pub rate: Option<Decimal>,
    /// Whether any cell in this row was redacted
    pub suppressed: bool,
}

/// The full measures table for a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureTable {
    rows: Vec<MeasureRow>,
}

impl MeasureTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows for one measure
    pub fn extend(&mut self, rows: impl IntoIterator<Item = MeasureRow>) {
        self.rows.extend(rows);
    }

    /// All rows, in measure-then-stratum order
    pub fn rows(&self) -> &[MeasureRow] {
        &self.rows
    }

    /// Rows belonging to one measure
    pub fn measure(&self, measure_id: &str) -> impl Iterator<Item = &MeasureRow> {
        self.rows.iter().filter(move |r| r.measure_id == measure_id)
    }

    /// Find the row for a (measure, stratum) pair
    pub fn cell(&self, measure_id: &str, category: &str) -> Option<&MeasureRow> {
        self.rows
            .iter()
            .find(|r| r.measure_id == measure_id && r.category == category)
    }

    /// Consume the table, yielding its rows
    pub fn into_rows(self) -> Vec<MeasureRow> {
        self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
