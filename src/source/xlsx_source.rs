use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::debug;

use super::{Cell, RawTable};

/// Read the configured worksheet (or the first one) of a workbook.
pub fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook: {}", path.display()))?;

    let range = match sheet {
        Some(name) => workbook
            .worksheet_range(name)
            .with_context(|| format!("failed to read sheet `{}` in {}", name, path.display()))?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| anyhow!("workbook has no worksheets: {}", path.display()))?
            .with_context(|| format!("failed to read first sheet in {}", path.display()))?,
    };
    debug!(height = range.height(), width = range.width(), "worksheet range");

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(r) => r.iter().map(|c| data_to_cell(c).to_string()).collect(),
        None => return Ok(RawTable::default()),
    };
    let body: Vec<Vec<Cell>> = rows.map(|r| r.iter().map(data_to_cell).collect()).collect();

    Ok(RawTable::from_rows(headers, body))
}

/// Map a workbook value onto a raw cell.
pub fn data_to_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(v) if v.trim().is_empty() => Cell::Empty,
        Data::String(v) => Cell::Text(v.clone()),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Error(_) => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::source::load_raw;
    use anyhow::Result;
    use chrono::NaiveDate;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    /// Two sheets: a portfolio on "First", a different layout on "Second".
    fn write_workbook() -> Result<(TempDir, PathBuf)> {
        let dir = tempdir()?;
        let path = dir.path().join("data.xlsx");
        let mut workbook = Workbook::new();

        let first = workbook.add_worksheet();
        first.set_name("First")?;
        for (col, h) in [
            "State",
            "Unit",
            "Customer Name",
            "Segment",
            "Gratuity",
            "Closing Balance as on 31.03.2023",
            "Closing Balance as on 31.03.2024",
        ]
        .iter()
        .enumerate()
        {
            first.write_string(0, col as u16, *h)?;
        }
        first.write_string(1, 0, "Tamil Nadu")?;
        first.write_string(1, 1, "Chennai")?;
        first.write_string(1, 2, "Acme Ltd")?;
        first.write_string(1, 3, "Corporate")?;
        first.write_string(1, 4, "Y")?;
        first.write_number(1, 5, 10.5)?;
        first.write_string(1, 6, "pending")?;
        first.write_string(2, 0, "Kerala")?;
        first.write_string(2, 1, "Kochi")?;
        first.write_string(2, 2, "Spice Co")?;
        first.write_string(2, 3, "Government")?;
        first.write_number(2, 6, 7.0)?;

        let second = workbook.add_worksheet();
        second.set_name("Second")?;
        second.write_string(0, 0, "Customer Name")?;
        second.write_string(0, 1, "Closing Balance as on 30.06.2024")?;
        second.write_string(1, 0, "Port Trust")?;
        second.write_number(1, 1, 3.25)?;

        workbook.save(&path)?;
        Ok((dir, path))
    }

    #[test]
    fn reads_first_sheet_by_default() -> Result<()> {
        let (_dir, path) = write_workbook()?;
        let raw = load_raw(&path, None)?.expect("workbook exists");

        assert_eq!(raw.headers.len(), 7);
        assert_eq!(raw.headers[2], "Customer Name");
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[0][5], Cell::Number(10.5));
        assert_eq!(raw.rows[0][6], Cell::Text("pending".into()));
        assert_eq!(raw.rows[1][4], Cell::Empty);

        let table = normalize(&raw);
        let mar_23 = NaiveDate::from_ymd_opt(2023, 3, 31).unwrap();
        let mar_24 = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(table.fund_dates, vec![mar_23, mar_24]);
        assert_eq!(table.records[0].gratuity, Some(true));
        assert_eq!(table.records[0].funds.get(&mar_23), Some(&Some(10.5)));
        assert_eq!(table.records[0].funds.get(&mar_24), Some(&None));
        assert_eq!(table.records[1].funds.get(&mar_24), Some(&Some(7.0)));
        Ok(())
    }

    #[test]
    fn reads_named_sheet() -> Result<()> {
        let (_dir, path) = write_workbook()?;
        let raw = load_raw(&path, Some("Second"))?.expect("workbook exists");

        assert_eq!(
            raw.headers,
            vec!["Customer Name", "Closing Balance as on 30.06.2024"]
        );
        let table = normalize(&raw);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].customer_name, "Port Trust");
        assert_eq!(
            table.fund_dates,
            vec![NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()]
        );
        Ok(())
    }

    #[test]
    fn unknown_sheet_is_an_error() -> Result<()> {
        let (_dir, path) = write_workbook()?;
        assert!(load_raw(&path, Some("Missing")).is_err());
        Ok(())
    }

    #[test]
    fn workbook_values_map_to_cells() {
        assert_eq!(data_to_cell(&Data::Float(10.5)), Cell::Number(10.5));
        assert_eq!(data_to_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(data_to_cell(&Data::String(String::new())), Cell::Empty);
        assert_eq!(data_to_cell(&Data::String("   ".into())), Cell::Empty);
        assert_eq!(
            data_to_cell(&Data::String("Y".into())),
            Cell::Text("Y".into())
        );
        assert_eq!(data_to_cell(&Data::Bool(true)), Cell::Text("true".into()));
        assert_eq!(data_to_cell(&Data::Empty), Cell::Empty);
    }
}
