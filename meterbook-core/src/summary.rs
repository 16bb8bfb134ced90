//! Console summary of an extraction

use crate::error::TableError;
use crate::extract::{Extraction, SheetKey};
use crate::reader::{Table, Value};
use chrono::{NaiveDate, NaiveTime};
use colored::*;
use std::io::{self, Write};

/// Rows shown per table unless configured otherwise
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Print the summary of `extraction` to stdout
pub fn print_summary(extraction: Option<&Extraction>, preview_rows: usize) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    // Nothing useful can be done about a closed stdout here
    let _ = write_summary(&mut out, extraction, preview_rows);
}

/// Write one section per extracted table: title, row count, columns and a
/// preview of the first `preview_rows` rows
pub fn write_summary<W: Write>(
    out: &mut W,
    extraction: Option<&Extraction>,
    preview_rows: usize,
) -> io::Result<()> {
    let extraction = match extraction {
        Some(e) if !e.is_empty() => e,
        _ => return writeln!(out, "No data to summarize"),
    };

    for (key, table) in extraction.iter() {
        writeln!(out)?;
        writeln!(out, "{}", format!("{} Summary:", key.title()).bold())?;
        writeln!(out, "Number of rows: {}", table.len())?;
        writeln!(out, "Columns: {}", table.columns().join(", "))?;
        writeln!(out, "First few rows:\n{}\n", table.head(preview_rows))?;
    }
    Ok(())
}

/// Values of `Customer Name`, when customer details were extracted
pub fn customer_names(extraction: &Extraction) -> Option<Result<Vec<String>, TableError>> {
    let table = extraction.get(SheetKey::CustomerDetails)?;
    Some(
        table
            .require_column("Customer Name")
            .map(|column| column.text_values()),
    )
}

/// Render names as a quoted list, e.g. `['Alice', 'Bob']`
pub fn format_names(names: &[String]) -> String {
    let quoted: Vec<String> = names
        .iter()
        .map(|name| {
            if name.contains('\'') && !name.contains('"') {
                format!("\"{}\"", name.replace('\\', "\\\\"))
            } else {
                format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'"))
            }
        })
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// `Period` and `kWh` of the export readings taken on `date`
pub fn export_on(extraction: &Extraction, date: NaiveDate) -> Option<Result<Table, TableError>> {
    let table = extraction.get(SheetKey::ExportKwh)?;
    Some(daily_export(table, date))
}

fn daily_export(table: &Table, date: NaiveDate) -> Result<Table, TableError> {
    table.require_column("Date")?;
    let day = date.and_time(NaiveTime::MIN);
    table
        .filter(|row| row.get("Date").and_then(Value::as_datetime) == Some(day))
        .select(&["Period", "kWh"])
}
