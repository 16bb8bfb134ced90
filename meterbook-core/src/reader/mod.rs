//! Excel/ODS workbook reader using calamine

use crate::error::{ExtractError, ExtractionCause};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub mod dates;
pub mod table;
pub mod value;

pub use table::{Column, RowRef, Table};
pub use value::Value;

/// An open workbook of any format calamine understands
pub type Workbook = Sheets<BufReader<File>>;

/// Open a workbook, distinguishing a missing file from an unreadable one
pub fn open_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook, ExtractError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }

    open_workbook_auto(path).map_err(|source| {
        ExtractionCause::Open {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

/// Read worksheet `sheet` into a [`Table`] with trimmed column names
pub fn read_table(workbook: &mut Workbook, sheet: &str) -> Result<Table, ExtractionCause> {
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| ExtractionCause::Worksheet {
            sheet: sheet.to_string(),
            source,
        })?;

    Ok(parse_range(&range))
}

/// Build a table from a cell range whose first row is the header
pub fn parse_range(range: &Range<Data>) -> Table {
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Table::default();
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(col, cell)| header_name(col, cell))
        .collect();
    let mut table = Table::new(columns);

    // Blank rows are dropped; labels number the kept rows from zero
    for row in rows.filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty))) {
        table.push_row(table.len(), row.iter().map(Value::from).collect());
    }

    table
}

/// Trimmed header text; empty header cells get a positional placeholder
fn header_name(col: usize, cell: &Data) -> String {
    match cell {
        Data::Empty => format!("Unnamed: {}", col),
        Data::String(s) => s.trim().to_string(),
        other => Value::from(other).to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_trims_headers() {
        let mut range = Range::new((0, 0), (3, 2));
        range.set_value((0, 0), Data::String("  Date ".into()));
        range.set_value((0, 1), Data::String("Period".into()));
        range.set_value((0, 2), Data::String("kWh\t".into()));
        range.set_value((1, 0), Data::String("2023-04-01".into()));
        range.set_value((1, 1), Data::Int(1));
        range.set_value((1, 2), Data::Float(5.2));
        range.set_value((3, 1), Data::Int(2));

        let table = parse_range(&range);
        assert_eq!(table.columns(), ["Date", "Period", "kWh"]);
        assert_eq!(table.len(), 2);

        // Row 2 is blank and skipped; labels stay contiguous
        let labels: Vec<usize> = table.rows().map(|r| r.label()).collect();
        assert_eq!(labels, vec![0, 1]);
    }

    #[test]
    fn test_header_placeholders() {
        assert_eq!(header_name(3, &Data::Empty), "Unnamed: 3");
        assert_eq!(header_name(0, &Data::String("   ".into())), "");
        assert_eq!(header_name(1, &Data::Int(2023)), "2023");
        assert_eq!(
            header_name(0, &Data::String(" Customer Name ".into())),
            "Customer Name"
        );
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        let table = parse_range(&range);
        assert!(table.columns().is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = open_workbook("definitely-missing.xlsx").err().unwrap();
        assert!(err.is_not_found());
    }
}
