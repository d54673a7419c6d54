// src/fund.rs
use chrono::NaiveDate;
use serde::Serialize;

use crate::table::CanonicalRecord;

/// One snapshot of a customer's fund; `value` is `None` when the cell was
/// missing or not numeric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FundObservation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A present fund value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FundPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// The latest-dated present fund value of the first record, skipping missing
/// values at more recent dates. `None` when nothing is present.
pub fn most_recent_fund<'a, I>(records: I) -> Option<FundPoint>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let record = records.into_iter().next()?;
    record
        .funds
        .iter()
        .rev()
        .find_map(|(&date, value)| value.map(|value| FundPoint { date, value }))
}

/// All fund observations of the first record, ascending by date, gaps kept.
pub fn series<'a, I>(records: I) -> Vec<FundObservation>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    records
        .into_iter()
        .next()
        .map(|record| {
            record
                .funds
                .iter()
                .map(|(&date, &value)| FundObservation { date, value })
                .collect()
        })
        .unwrap_or_default()
}

/// Only the present observations of a series.
pub fn valid_points(series: &[FundObservation]) -> Vec<FundPoint> {
    series
        .iter()
        .filter_map(|o| o.value.map(|value| FundPoint { date: o.date, value }))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trend {
    /// Fewer than two present values; no chart.
    Insufficient { valid_points: usize },
    Series {
        points: Vec<FundPoint>,
        /// Last minus first present value.
        change: f64,
        /// `None` when the first value is zero.
        change_pct: Option<f64>,
    },
}

impl Trend {
    pub fn from_series(series: &[FundObservation]) -> Self {
        let points = valid_points(series);
        if points.len() < 2 {
            return Trend::Insufficient {
                valid_points: points.len(),
            };
        }
        let first = points[0].value;
        let change = points[points.len() - 1].value - first;
        let change_pct = (first != 0.0).then(|| change / first * 100.0);
        Trend::Series {
            points,
            change,
            change_pct,
        }
    }

    pub fn is_sufficient(&self) -> bool {
        matches!(self, Trend::Series { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(funds: &[(NaiveDate, Option<f64>)]) -> CanonicalRecord {
        CanonicalRecord {
            customer_name: "Acme".into(),
            funds: funds.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn most_recent_skips_missing_latest() {
        let rec = record(&[
            (date(2023, 1, 31), Some(10.5)),
            (date(2023, 6, 30), None),
            (date(2023, 12, 31), Some(12.0)),
        ]);
        assert_eq!(
            most_recent_fund([&rec]),
            Some(FundPoint {
                date: date(2023, 12, 31),
                value: 12.0
            })
        );

        let gap_at_end = record(&[(date(2023, 1, 31), Some(10.5)), (date(2023, 6, 30), None)]);
        assert_eq!(
            most_recent_fund([&gap_at_end]).map(|p| p.date),
            Some(date(2023, 1, 31))
        );
    }

    #[test]
    fn most_recent_none_when_all_missing() {
        let rec = record(&[(date(2023, 1, 31), None), (date(2023, 6, 30), None)]);
        assert_eq!(most_recent_fund([&rec]), None);
        assert_eq!(most_recent_fund([&record(&[])]), None);
        assert_eq!(most_recent_fund(std::iter::empty::<&CanonicalRecord>()), None);
    }

    #[test]
    fn first_record_wins() {
        let a = record(&[(date(2023, 1, 31), Some(1.0))]);
        let b = record(&[(date(2023, 1, 31), Some(2.0))]);
        assert_eq!(most_recent_fund([&a, &b]).map(|p| p.value), Some(1.0));
        assert_eq!(series(vec![&b, &a])[0].value, Some(2.0));
    }

    #[test]
    fn series_is_ascending_with_gaps() {
        let rec = record(&[
            (date(2023, 12, 31), Some(12.0)),
            (date(2023, 1, 31), Some(10.5)),
            (date(2023, 6, 30), None),
        ]);
        let s = series([&rec]);
        let dates: Vec<_> = s.iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![date(2023, 1, 31), date(2023, 6, 30), date(2023, 12, 31)]);
        assert_eq!(s[1].value, None);
        assert_eq!(valid_points(&s).len(), 2);
    }

    #[test]
    fn single_point_is_insufficient_for_trend() {
        let rec = record(&[(date(2023, 1, 31), None), (date(2023, 6, 30), Some(4.0))]);
        let trend = Trend::from_series(&series([&rec]));
        assert_eq!(trend, Trend::Insufficient { valid_points: 1 });
        assert!(!trend.is_sufficient());
        assert_eq!(most_recent_fund([&rec]).map(|p| p.value), Some(4.0));
    }

    #[test]
    fn trend_reports_change() {
        let rec = record(&[
            (date(2023, 1, 31), Some(10.0)),
            (date(2023, 6, 30), None),
            (date(2023, 12, 31), Some(12.5)),
        ]);
        match Trend::from_series(&series([&rec])) {
            Trend::Series {
                points,
                change,
                change_pct,
            } => {
                assert_eq!(points.len(), 2);
                assert!((change - 2.5).abs() < 1e-9);
                assert!((change_pct.unwrap() - 25.0).abs() < 1e-9);
            }
            other => panic!("expected a series, got {:?}", other),
        }

        let from_zero = record(&[(date(2023, 1, 31), Some(0.0)), (date(2023, 2, 28), Some(3.0))]);
        match Trend::from_series(&series([&from_zero])) {
            Trend::Series { change_pct, .. } => assert_eq!(change_pct, None),
            other => panic!("expected a series, got {:?}", other),
        }
    }
}
