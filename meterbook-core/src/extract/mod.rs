//! Worksheet extraction into logical tables

pub mod registry;

use crate::error::{ExtractError, ExtractionCause};
use crate::reader::{self, Table, Value, Workbook, dates};
use calamine::Reader;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

pub use registry::{DateColumns, SHEET_RULES, SheetKey, SheetRule};

/// Tables extracted from one workbook, keyed by logical key.
///
/// Entries keep the order of [`SHEET_RULES`]. A worksheet missing from the
/// workbook has no entry at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    tables: Vec<(SheetKey, Table)>,
}

impl Extraction {
    pub fn get(&self, key: SheetKey) -> Option<&Table> {
        self.tables
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, table)| table)
    }

    pub fn contains(&self, key: SheetKey) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SheetKey, &Table)> {
        self.tables.iter().map(|(key, table)| (*key, table))
    }

    pub fn keys(&self) -> impl Iterator<Item = SheetKey> + '_ {
        self.tables.iter().map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub(crate) fn insert(&mut self, key: SheetKey, table: Table) {
        match self.tables.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = table,
            None => self.tables.push((key, table)),
        }
    }
}

/// Extract the known worksheets of the workbook at `path`.
///
/// Fails with [`ExtractError::NotFound`] when `path` is not a file. Any other
/// failure aborts the whole extraction; no partial result is returned.
pub fn extract<P: AsRef<Path>>(path: P) -> Result<Extraction, ExtractError> {
    let path = path.as_ref();
    let mut workbook = reader::open_workbook(path)?;
    let extraction = extract_from(&mut workbook, SHEET_RULES)?;

    info!(
        path = %path.display(),
        tables = extraction.len(),
        "extracted workbook"
    );
    Ok(extraction)
}

/// Apply `rules` to an already open workbook
pub fn extract_from(
    workbook: &mut Workbook,
    rules: &[SheetRule],
) -> Result<Extraction, ExtractionCause> {
    let present: HashSet<String> = workbook.sheet_names().into_iter().collect();
    let mut extraction = Extraction::default();

    for rule in rules {
        if !present.contains(rule.sheet) {
            debug!(sheet = rule.sheet, "worksheet not present, skipping");
            continue;
        }

        let mut table = reader::read_table(workbook, rule.sheet)?;
        coerce_dates(&mut table, rule)?;

        debug!(
            sheet = rule.sheet,
            key = %rule.key,
            rows = table.len(),
            columns = table.columns().len(),
            "read worksheet"
        );
        extraction.insert(rule.key, table);
    }

    Ok(extraction)
}

/// Parse the date columns `rule` designates
fn coerce_dates(table: &mut Table, rule: &SheetRule) -> Result<(), ExtractionCause> {
    if let DateColumns::Named(name) = rule.dates {
        if table.column_index(name).is_none() {
            return Err(ExtractionCause::MissingColumn {
                sheet: rule.sheet.to_string(),
                column: name.to_string(),
            });
        }
    }

    let columns: Vec<(usize, String)> = rule
        .dates
        .select(table.columns())
        .into_iter()
        .filter_map(|name| table.column_index(name).map(|i| (i, name.to_string())))
        .collect();

    for (index, column) in columns {
        debug!(sheet = rule.sheet, column = %column, "parsing dates");
        table.map_column(index, |label, value| {
            dates::parse_datetime(value)
                .map(|parsed| parsed.map_or(Value::Empty, Value::DateTime))
                .map_err(|source| ExtractionCause::UnparsableDate {
                    sheet: rule.sheet.to_string(),
                    column: column.clone(),
                    row: label,
                    source,
                })
        })?;
    }

    Ok(())
}
