// src/dossier.rs
use chrono::NaiveDate;
use serde::Serialize;

use crate::fund::{self, FundObservation, FundPoint, Trend};
use crate::query::{customer_record, DuplicatePolicy, RecordFilter};
use crate::table::{CanonicalRecord, CanonicalTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    Gratuity,
    Superannuation,
    LeaveEncashment,
}

impl Policy {
    pub const ALL: [Policy; 3] = [
        Policy::Gratuity,
        Policy::Superannuation,
        Policy::LeaveEncashment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Policy::Gratuity => "Gratuity",
            Policy::Superannuation => "Superannuation",
            Policy::LeaveEncashment => "Leave Encashment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatus {
    pub policy: Policy,
    pub label: &'static str,
    /// `None` when the cell was blank.
    pub enrolled: Option<bool>,
}

/// Everything the single-customer view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerDossier {
    pub customer: String,
    pub state: String,
    pub unit: String,
    pub segment: String,
    pub most_recent: Option<FundPoint>,
    /// Display form of `most_recent`, e.g. `₹ 12.00 Crores (as on 31.12.2023)`.
    pub headline: Option<String>,
    pub series: Vec<FundObservation>,
    pub trend: Trend,
    pub policies: Vec<PolicyStatus>,
}

impl CustomerDossier {
    /// Build the view from the row `filter` resolves to under `policy`.
    pub fn lookup(
        table: &CanonicalTable,
        filter: &RecordFilter,
        policy: DuplicatePolicy,
    ) -> Option<Self> {
        customer_record(table, filter, policy).map(|rec| Self::from_record(table, rec))
    }

    pub fn from_record(table: &CanonicalTable, rec: &CanonicalRecord) -> Self {
        let most_recent = fund::most_recent_fund([rec]);
        let series = fund::series([rec]);
        let trend = Trend::from_series(&series);

        let cols = &table.columns;
        let policies = Policy::ALL
            .iter()
            .filter_map(|&p| {
                let (present, enrolled) = match p {
                    Policy::Gratuity => (cols.gratuity, rec.gratuity),
                    Policy::Superannuation => (cols.superannuation, rec.superannuation),
                    Policy::LeaveEncashment => (cols.leave_encashment, rec.leave_encashment),
                };
                present.then(|| PolicyStatus {
                    policy: p,
                    label: p.label(),
                    enrolled,
                })
            })
            .collect();

        Self {
            customer: rec.customer_name.clone(),
            state: rec.state.clone(),
            unit: rec.unit.clone(),
            segment: rec.segment.clone(),
            headline: most_recent
                .map(|p| format!("{} (as on {})", format_crores(p.value), format_as_on(p.date))),
            most_recent,
            series,
            trend,
            policies,
        }
    }

    pub fn has_fund_data(&self) -> bool {
        self.most_recent.is_some()
    }
}

/// `₹ 1,234.50 Crores`
pub fn format_crores(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("₹ {}{}.{} Crores", sign, grouped, frac_part)
}

/// `DD.MM.YYYY`, the way the sheet headers spell dates.
pub fn format_as_on(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::portfolio;
    use crate::table::ColumnSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn crores_formatting() {
        assert_eq!(format_crores(12.0), "₹ 12.00 Crores");
        assert_eq!(format_crores(1234.5), "₹ 1,234.50 Crores");
        assert_eq!(format_crores(1234567.891), "₹ 1,234,567.89 Crores");
        assert_eq!(format_crores(-2500.0), "₹ -2,500.00 Crores");
        assert_eq!(format_crores(0.0), "₹ 0.00 Crores");
        assert_eq!(format_crores(-0.001), "₹ 0.00 Crores");
    }

    #[test]
    fn as_on_formatting() {
        assert_eq!(format_as_on(date(2023, 3, 1)), "01.03.2023");
    }

    #[test]
    fn dossier_shows_only_present_policy_columns() {
        let mut table = portfolio();
        table.columns = ColumnSet {
            gratuity: true,
            leave_encashment: true,
            ..Default::default()
        };
        let filter = RecordFilter::new().segment("Corporate").customer("Acme Ltd");
        let d = CustomerDossier::lookup(&table, &filter, DuplicatePolicy::FirstRow).unwrap();

        assert_eq!(d.unit, "Chennai");
        assert_eq!(d.policies.len(), 2);
        assert_eq!(d.policies[0].policy, Policy::Gratuity);
        assert_eq!(d.policies[0].enrolled, Some(true));
        assert_eq!(d.policies[1].label, "Leave Encashment");
        assert_eq!(d.policies[1].enrolled, None);
        assert_eq!(d.headline.as_deref(), Some("₹ 1.00 Crores (as on 31.12.2023)"));
        assert!(!d.trend.is_sufficient());
    }

    #[test]
    fn customer_without_funds_has_no_headline() {
        let table = portfolio();
        let filter = RecordFilter::new().customer("Port Trust");
        let d = CustomerDossier::lookup(&table, &filter, DuplicatePolicy::FirstRow).unwrap();
        assert!(!d.has_fund_data());
        assert_eq!(d.headline, None);
        assert_eq!(d.series.len(), 1);
        assert_eq!(d.trend, Trend::Insufficient { valid_points: 0 });
    }

    #[test]
    fn unknown_customer_has_no_dossier() {
        let table = portfolio();
        let filter = RecordFilter::new().customer("Nobody");
        assert!(CustomerDossier::lookup(&table, &filter, DuplicatePolicy::FirstRow).is_none());
    }
}
