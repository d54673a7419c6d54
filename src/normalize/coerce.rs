use crate::source::Cell;

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Coerce a fund cell to a number. Anything that is not a finite number
/// (blanks, stray text, currency symbols, `nan`) is missing.
pub fn to_number(cell: &Cell) -> Option<f64> {
    let v = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => clean_str(s).parse::<f64>().ok()?,
        Cell::Empty => return None,
    };
    v.is_finite().then_some(v)
}

/// Text fields keep the stored value; missing cells become `""`.
pub fn to_text(cell: &Cell) -> String {
    cell.to_string()
}

/// `Y` (any case, surrounding whitespace ignored) is enrolled; any other
/// present value is not; a missing cell is unknown.
pub fn to_flag(cell: &Cell) -> Option<bool> {
    match cell {
        Cell::Empty => None,
        other => Some(other.to_string().trim().eq_ignore_ascii_case("y")),
    }
}
