//! meterbook-core: extraction of metering workbooks
//!
//! Reads the known worksheets of a customer metering workbook into ordered,
//! typed tables, prints a console summary of them and renders the daily
//! export generation of a meter as a line chart.

pub mod chart;
pub mod config;
pub mod error;
pub mod extract;
pub mod reader;
pub mod summary;

pub use config::MeterbookConfig;
pub use error::{ChartError, ExtractError, ExtractionCause, TableError};
pub use extract::{Extraction, SheetKey, extract};
pub use reader::{Table, Value};
pub use summary::print_summary;
