// src/normalize/mod.rs
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::source::{Cell, RawTable};
use crate::table::{CanonicalRecord, CanonicalTable, ColumnSet, SkipReason, SkippedColumn};

pub mod coerce;
pub mod header;

pub use header::{classify_header, parse_fund_date, ColumnKind, Field};

static EMPTY: Cell = Cell::Empty;

/// Column index → target, resolved once from the header row.
struct Plan {
    fixed: Vec<(usize, Field)>,
    /// Fund date → source column. Later headers overwrite earlier ones.
    funds: BTreeMap<chrono::NaiveDate, usize>,
    columns: ColumnSet,
    skipped: Vec<SkippedColumn>,
}

fn plan_columns(headers: &[String]) -> Plan {
    let mut fixed: BTreeMap<Field, usize> = BTreeMap::new();
    let mut funds = BTreeMap::new();
    let mut skipped = Vec::new();

    for (i, h) in headers.iter().enumerate() {
        match classify_header(h) {
            ColumnKind::Fixed(field) => {
                fixed.insert(field, i);
            }
            ColumnKind::FundDate(date) => {
                if let Some(prev) = funds.insert(date, i) {
                    debug!(%date, previous = prev, column = i, "duplicate fund date; later column wins");
                }
            }
            ColumnKind::BadFundDate { token } => {
                warn!(header = %h, "Could not parse date from fund column; skipping");
                skipped.push(SkippedColumn {
                    header: h.clone(),
                    reason: SkipReason::UnparseableDate { token },
                });
            }
            ColumnKind::Ignored => {}
        }
    }

    let mut columns = ColumnSet::default();
    for field in fixed.keys() {
        match field {
            Field::State => columns.state = true,
            Field::Unit => columns.unit = true,
            Field::CustomerName => columns.customer_name = true,
            Field::Segment => columns.segment = true,
            Field::Gratuity => columns.gratuity = true,
            Field::Superannuation => columns.superannuation = true,
            Field::LeaveEncashment => columns.leave_encashment = true,
        }
    }

    Plan {
        fixed: fixed.into_iter().map(|(f, i)| (i, f)).collect(),
        funds,
        columns,
        skipped,
    }
}

/// Coerce a raw sheet into the canonical schema. Pure: the input is not
/// touched, unparseable fund headers are dropped and reported, unparseable
/// fund cells become missing values.
#[tracing::instrument(level = "info", skip(raw), fields(headers = raw.headers.len(), rows = raw.rows.len()))]
pub fn normalize(raw: &RawTable) -> CanonicalTable {
    let plan = plan_columns(&raw.headers);

    if plan.fixed.is_empty() && plan.funds.is_empty() {
        debug!("no recognized columns");
        return CanonicalTable {
            skipped_columns: plan.skipped,
            ..CanonicalTable::empty()
        };
    }

    let records: Vec<CanonicalRecord> = raw
        .rows
        .iter()
        .map(|row| {
            let cell = |i: usize| row.get(i).unwrap_or(&EMPTY);
            let mut rec = CanonicalRecord::default();
            for &(i, field) in &plan.fixed {
                let c = cell(i);
                match field {
                    Field::State => rec.state = coerce::to_text(c),
                    Field::Unit => rec.unit = coerce::to_text(c),
                    Field::CustomerName => rec.customer_name = coerce::to_text(c),
                    Field::Segment => rec.segment = coerce::to_text(c),
                    Field::Gratuity => rec.gratuity = coerce::to_flag(c),
                    Field::Superannuation => rec.superannuation = coerce::to_flag(c),
                    Field::LeaveEncashment => rec.leave_encashment = coerce::to_flag(c),
                }
            }
            rec.funds = plan
                .funds
                .iter()
                .map(|(&date, &i)| (date, coerce::to_number(cell(i))))
                .collect();
            rec
        })
        .collect();

    debug!(
        records = records.len(),
        fund_dates = plan.funds.len(),
        skipped = plan.skipped.len(),
        "normalized"
    );
    CanonicalTable {
        records,
        columns: plan.columns,
        fund_dates: plan.funds.keys().copied().collect(),
        skipped_columns: plan.skipped,
    }
}
