//! Ordered-column table built from one worksheet

use super::Value;
use crate::error::TableError;
use std::fmt;

/// Rows of typed values under an ordered list of column names.
///
/// Every row carries a label: its zero-based position among the data rows of
/// the source worksheet. Labels survive [`Table::filter`] and [`Table::head`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    labels: Vec<usize>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            labels: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the column count
    pub fn push_row(&mut self, label: usize, mut values: Vec<Value>) {
        values.resize(self.columns.len(), Value::Empty);
        self.labels.push(label);
        self.rows.push(values);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<Column<'_>> {
        self.column_index(name).map(|index| Column {
            table: self,
            index,
        })
    }

    /// Like [`Table::column`], failing with [`TableError::MissingColumn`]
    pub fn require_column(&self, name: &str) -> Result<Column<'_>, TableError> {
        self.column(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        (0..self.rows.len()).map(move |pos| RowRef { table: self, pos })
    }

    /// The first `n` rows
    pub fn head(&self, n: usize) -> Table {
        let n = n.min(self.len());
        Table {
            columns: self.columns.clone(),
            labels: self.labels[..n].to_vec(),
            rows: self.rows[..n].to_vec(),
        }
    }

    /// Rows for which `predicate` holds, in their original order
    pub fn filter<F>(&self, predicate: F) -> Table
    where
        F: Fn(&RowRef<'_>) -> bool,
    {
        let mut table = Table::new(self.columns.clone());
        for row in self.rows().filter(|row| predicate(row)) {
            table.labels.push(row.label());
            table.rows.push(row.values().to_vec());
        }
        table
    }

    /// Projection onto `names`, in the given order
    pub fn select(&self, names: &[&str]) -> Result<Table, TableError> {
        let indices = names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| TableError::MissingColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Table {
            columns: names.iter().map(|n| n.to_string()).collect(),
            labels: self.labels.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// Replace every value of the column at `index` with `f(label, value)`.
    ///
    /// The first error aborts and leaves the table partly converted.
    pub fn map_column<F, E>(&mut self, index: usize, mut f: F) -> Result<(), E>
    where
        F: FnMut(usize, &Value) -> Result<Value, E>,
    {
        for (label, row) in self.labels.iter().zip(self.rows.iter_mut()) {
            if let Some(cell) = row.get_mut(index) {
                *cell = f(*label, cell)?;
            }
        }
        Ok(())
    }
}

/// Borrowed view of one column
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Column<'a> {
    pub fn name(&self) -> &'a str {
        &self.table.columns[self.index]
    }

    pub fn values(&self) -> impl Iterator<Item = &'a Value> + 'a {
        let index = self.index;
        self.table.rows.iter().map(move |row| &row[index])
    }

    /// All values as numbers; empty cells are an error like any other text
    pub fn f64_values(&self) -> Result<Vec<f64>, TableError> {
        self.values()
            .zip(self.table.labels.iter())
            .map(|(value, &label)| {
                value.as_f64().ok_or_else(|| TableError::NotNumeric {
                    column: self.name().to_string(),
                    label,
                    value: value.to_string(),
                })
            })
            .collect()
    }

    /// All values rendered as display text
    pub fn text_values(&self) -> Vec<String> {
        self.values().map(|v| v.to_string()).collect()
    }
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    pos: usize,
}

impl<'a> RowRef<'a> {
    pub fn label(&self) -> usize {
        self.table.labels[self.pos]
    }

    pub fn values(&self) -> &'a [Value] {
        &self.table.rows[self.pos]
    }

    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.table
            .column_index(column)
            .map(|index| &self.table.rows[self.pos][index])
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            writeln!(f, "Empty DataFrame")?;
            writeln!(f, "Columns: [{}]", self.columns.join(", "))?;
            return write!(f, "Index: []");
        }

        let labels: Vec<String> = self.labels.iter().map(|l| l.to_string()).collect();
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();

        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:label_width$}", "")?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", name)?;
        }

        for (label, row) in labels.iter().zip(&cells) {
            writeln!(f)?;
            write!(f, "{:<label_width$}", label)?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {:>width$}", cell)?;
            }
        }
        Ok(())
    }
}
