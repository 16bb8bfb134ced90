//! Error types for extraction, table access and charting

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a whole extraction call.
///
/// A missing file is kept apart from every other failure so callers can
/// report it distinctly. Any other problem aborts the extraction with an
/// inspectable [`ExtractionCause`].
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Error: File '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("Error occurred while reading Excel file: {0}")]
    Extraction(#[from] ExtractionCause),
}

impl ExtractError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExtractError::NotFound(_))
    }

    /// The underlying cause, unless the file was missing
    pub fn cause(&self) -> Option<&ExtractionCause> {
        match self {
            ExtractError::NotFound(_) => None,
            ExtractError::Extraction(cause) => Some(cause),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExtractionCause {
    #[error("failed to open workbook {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("failed to read worksheet '{sheet}': {source}")]
    Worksheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("worksheet '{sheet}' has no column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("worksheet '{sheet}', column '{column}', row {row}: {source}")]
    UnparsableDate {
        sheet: String,
        column: String,
        row: usize,
        #[source]
        source: DateParseError,
    },
}

/// A cell value that could not be read as a calendar date/time
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot parse '{value}' as a date")]
pub struct DateParseError {
    pub value: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("no column named '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' holds non-numeric value '{value}' at row {label}")]
    NotNumeric {
        column: String,
        label: usize,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("no rows match MPAN {mpan} on {date}")]
    NoMatchingRows { mpan: i64, date: chrono::NaiveDate },

    #[error("failed to write chart to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
