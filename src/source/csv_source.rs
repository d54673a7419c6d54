use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};

use super::{Cell, RawTable};

/// Read a delimited export of the sheet. The first record is the header row;
/// every other field stays text and is typed later by the normalizer.
pub fn read_csv(path: &Path) -> Result<RawTable> {
    let file =
        File::open(path).with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    read_csv_from(file).with_context(|| format!("Failed to parse CSV file: {:?}", path))
}

pub fn read_csv_from<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // keep this so rows with missing trailing cells still load
        .from_reader(reader);

    let mut records = rdr.records();
    let headers: Vec<String> = match records.next() {
        Some(first) => first
            .context("CSV parse error in header row")?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect(),
        None => return Ok(RawTable::default()),
    };

    let mut rows = Vec::new();
    for (idx, result) in records.enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx + 1))?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RawTable::from_rows(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Cursor;

    #[test]
    fn reads_headers_and_typed_cells() -> Result<()> {
        let content = "\u{feff}State,Unit,Customer Name\nTamil Nadu,Chennai,Acme\nKerala,,\n";
        let table = read_csv_from(Cursor::new(content))?;

        assert_eq!(table.headers, vec!["State", "Unit", "Customer Name"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][2], Cell::Text("Acme".into()));
        assert_eq!(table.rows[1], vec![
            Cell::Text("Kerala".into()),
            Cell::Empty,
            Cell::Empty
        ]);
        Ok(())
    }

    #[test]
    fn whitespace_only_fields_are_blank() -> Result<()> {
        let table = read_csv_from(Cursor::new("State,Unit\n  ,Chennai\n   , \t\n"))?;
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], Cell::Empty);
        assert_eq!(table.rows[0][1], Cell::Text("Chennai".into()));
        Ok(())
    }

    #[test]
    fn empty_input_yields_empty_table() -> Result<()> {
        let table = read_csv_from(Cursor::new(""))?;
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
        Ok(())
    }

    #[test]
    fn ragged_rows_are_padded() -> Result<()> {
        let table = read_csv_from(Cursor::new("a,b,c\n1\n"))?;
        assert_eq!(table.rows[0].len(), 3);
        Ok(())
    }
}
