// src/table.rs
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fund balance per snapshot date. A `None` value is a missing or
/// non-numeric cell.
pub type FundSeries = BTreeMap<NaiveDate, Option<f64>>;

/// One row after normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CanonicalRecord {
    pub state: String,
    pub unit: String,
    pub customer_name: String,
    pub segment: String,
    pub gratuity: Option<bool>,
    pub superannuation: Option<bool>,
    pub leave_encashment: Option<bool>,
    pub funds: FundSeries,
}

/// Fixed fields found in the source header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSet {
    pub state: bool,
    pub unit: bool,
    pub customer_name: bool,
    pub segment: bool,
    pub gratuity: bool,
    pub superannuation: bool,
    pub leave_encashment: bool,
}

/// Why a fund-date column was left out of the series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The trailing token of the header is not a `DD.MM.YYYY` date.
    UnparseableDate { token: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedColumn {
    pub header: String,
    pub reason: SkipReason,
}

/// The schema-stable table every query runs against. Rebuilt in full on each
/// load and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalTable {
    pub records: Vec<CanonicalRecord>,
    pub columns: ColumnSet,
    /// Fund snapshot dates shared by every record, ascending.
    pub fund_dates: Vec<NaiveDate>,
    pub skipped_columns: Vec<SkippedColumn>,
}

impl CanonicalTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// An empty table means "no data", not failure.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalRecord> {
        self.records.iter()
    }
}
