use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static FUND_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^closing balance as on").expect("valid fund header pattern"));

/// Fixed target field of a recognized header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    State,
    Unit,
    CustomerName,
    Segment,
    Gratuity,
    Superannuation,
    LeaveEncashment,
}

/// What a source header maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Fixed(Field),
    FundDate(NaiveDate),
    /// Looked like a fund column but the date token did not parse.
    BadFundDate { token: String },
    Ignored,
}

/// Classify a header after trimming and lowercasing it.
pub fn classify_header(header: &str) -> ColumnKind {
    let clean = header.trim().to_lowercase();
    let field = match clean.as_str() {
        "state" => Field::State,
        "unit" => Field::Unit,
        "customer name" => Field::CustomerName,
        "segment" => Field::Segment,
        "gratuity" => Field::Gratuity,
        "superannuation" => Field::Superannuation,
        "leave encashment" => Field::LeaveEncashment,
        _ if FUND_HEADER.is_match(&clean) => {
            let token = header.trim().split_whitespace().last().unwrap_or_default();
            return match parse_fund_date(token) {
                Some(date) => ColumnKind::FundDate(date),
                None => ColumnKind::BadFundDate {
                    token: token.to_string(),
                },
            };
        }
        _ => return ColumnKind::Ignored,
    };
    ColumnKind::Fixed(field)
}

/// Strict `DD.MM.YYYY`.
pub fn parse_fund_date(token: &str) -> Option<NaiveDate> {
    let mut parts = token.split('.');
    let (d, m, y) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some()
        || y.len() != 4
        || !(1..=2).contains(&d.len())
        || !(1..=2).contains(&m.len())
    {
        return None;
    }
    if ![d, m, y].iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}
