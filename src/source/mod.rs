// src/source/mod.rs
use anyhow::{bail, Result};
use std::{fmt, path::Path};
use tracing::{debug, info};

pub mod csv_source;
pub mod xlsx_source;

/// One spreadsheet cell, before any schema is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            // whole numbers render without the trailing `.0`
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Empty => Ok(()),
        }
    }
}

/// The untrusted sheet as read from disk.
#[derive(Debug, Default, Clone)]
pub struct RawTable {
    /// Header row, stringified, in sheet order.
    pub headers: Vec<String>,
    /// Data rows, each padded to `headers.len()`.
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Build a table from a header row and data rows, dropping blank rows and
    /// padding short ones.
    pub fn from_rows(headers: Vec<String>, rows: impl IntoIterator<Item = Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .filter(|row| !row.iter().all(Cell::is_empty))
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, Cell::Empty);
                }
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read the source spreadsheet at `path`.
///
/// Returns `Ok(None)` when the file does not exist; an absent source is a
/// valid "no data" state. Unknown extensions and unreadable containers are
/// errors.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_raw<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<Option<RawTable>> {
    let path = path.as_ref();
    if !path.exists() {
        info!("source file not found; treating as empty dataset");
        return Ok(None);
    }

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => xlsx_source::read_workbook(path, sheet)?,
        "csv" => csv_source::read_csv(path)?,
        other => bail!(
            "unsupported source extension `{}` for {}",
            other,
            path.display()
        ),
    };

    debug!(
        headers = table.headers.len(),
        rows = table.rows.len(),
        "raw table loaded"
    );
    Ok(Some(table))
}
