// src/query/mod.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

use crate::table::{CanonicalRecord, CanonicalTable};

pub mod selection;

pub use selection::{LocationSelection, SegmentSelection};

/// Exact, case-sensitive match on every supplied field; `None` is a wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub state: Option<String>,
    pub unit: Option<String>,
    pub segment: Option<String>,
    pub customer: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    pub fn matches(&self, rec: &CanonicalRecord) -> bool {
        fn eq(want: &Option<String>, have: &str) -> bool {
            want.as_deref().map_or(true, |w| w == have)
        }
        eq(&self.state, &rec.state)
            && eq(&self.unit, &rec.unit)
            && eq(&self.segment, &rec.segment)
            && eq(&self.customer, &rec.customer_name)
    }
}

/// Records matching `filter`, in table order.
pub fn records_for<'a>(table: &'a CanonicalTable, filter: &RecordFilter) -> Vec<&'a CanonicalRecord> {
    table.iter().filter(|r| filter.matches(r)).collect()
}

/// Sorted, de-duplicated, non-empty values of one field over the filtered rows.
fn distinct_by<F>(table: &CanonicalTable, filter: &RecordFilter, key: F) -> Vec<String>
where
    F: Fn(&CanonicalRecord) -> &str,
{
    table
        .iter()
        .filter(|r| filter.matches(r))
        .map(key)
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

pub fn distinct_states(table: &CanonicalTable) -> Vec<String> {
    distinct_by(table, &RecordFilter::new(), |r| r.state.as_str())
}

pub fn distinct_units(table: &CanonicalTable, state: &str) -> Vec<String> {
    distinct_by(table, &RecordFilter::new().state(state), |r| r.unit.as_str())
}

pub fn distinct_segments(table: &CanonicalTable, state: &str, unit: &str) -> Vec<String> {
    distinct_by(table, &RecordFilter::new().state(state).unit(unit), |r| r.segment.as_str())
}

pub fn distinct_customers(
    table: &CanonicalTable,
    state: &str,
    unit: &str,
    segment: &str,
) -> Vec<String> {
    let filter = RecordFilter::new().state(state).unit(unit).segment(segment);
    distinct_by(table, &filter, |r| r.customer_name.as_str())
}

/// Segments across the whole table, for the segment-first path.
pub fn distinct_segments_global(table: &CanonicalTable) -> Vec<String> {
    distinct_by(table, &RecordFilter::new(), |r| r.segment.as_str())
}

pub fn customers_in_segment(table: &CanonicalTable, segment: &str) -> Vec<String> {
    distinct_by(table, &RecordFilter::new().segment(segment), |r| r.customer_name.as_str())
}

/// One line of the segment overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub customer_name: String,
    pub state: String,
    pub unit: String,
}

/// Every row of a segment, in table order.
pub fn segment_roster(table: &CanonicalTable, segment: &str) -> Vec<RosterEntry> {
    records_for(table, &RecordFilter::new().segment(segment))
        .into_iter()
        .map(|r| RosterEntry {
            customer_name: r.customer_name.clone(),
            state: r.state.clone(),
            unit: r.unit.clone(),
        })
        .collect()
}

/// How a single-customer view resolves several matching rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Use the first matching row in table order; no reconciliation.
    #[default]
    FirstRow,
    /// Refuse to pick when more than one row matches.
    RequireUnique,
}

pub fn customer_record<'a>(
    table: &'a CanonicalTable,
    filter: &RecordFilter,
    policy: DuplicatePolicy,
) -> Option<&'a CanonicalRecord> {
    let mut matches = table.iter().filter(|r| filter.matches(r));
    let first = matches.next()?;
    match policy {
        DuplicatePolicy::FirstRow => Some(first),
        DuplicatePolicy::RequireUnique => {
            let extra = matches.count();
            if extra > 0 {
                warn!(?filter, matches = extra + 1, "customer filter is ambiguous");
                None
            } else {
                Some(first)
            }
        }
    }
}
