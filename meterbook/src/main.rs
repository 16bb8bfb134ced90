use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use meterbook_core::{MeterbookConfig, extract, summary};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "meterbook")]
#[command(about = "Extract and summarise the worksheets of a metering workbook")]
#[command(version)]
struct Cli {
    /// Path to the Excel/ODS workbook (default: configured path, Data.xlsx)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of rows shown in each table preview
    #[arg(short = 'n', long, value_name = "ROWS")]
    preview_rows: Option<usize>,

    /// Day whose export readings are listed
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = MeterbookConfig::discover(cli.config.as_deref())?;

    let path = cli.file.unwrap_or(config.workbook.path);
    let preview_rows = cli.preview_rows.unwrap_or(config.summary.preview_rows);
    let sample_date = cli.date.unwrap_or(config.summary.sample_date);

    let stdout = std::io::stdout();
    report(&mut stdout.lock(), &path, preview_rows, sample_date)
}

/// Extract `path` and write the summary and example listings to `out`.
/// An extraction error is reported in place of the summary and is not fatal.
fn report<W: Write>(
    out: &mut W,
    path: &Path,
    preview_rows: usize,
    sample_date: NaiveDate,
) -> Result<()> {
    let extraction = match extract(path) {
        Ok(extraction) => extraction,
        Err(err) => {
            writeln!(out, "{}", err)?;
            summary::write_summary(out, None, preview_rows)?;
            return Ok(());
        }
    };

    summary::write_summary(out, Some(&extraction), preview_rows)?;

    if let Some(names) = summary::customer_names(&extraction) {
        let names = names.context("Failed to list customer names")?;
        writeln!(out, "\nCustomer Names:")?;
        writeln!(out, "{}", summary::format_names(&names))?;
    }

    if let Some(daily) = summary::export_on(&extraction, sample_date) {
        let daily = daily
            .with_context(|| format!("Failed to select export readings on {}", sample_date))?;
        writeln!(out, "\nExport kWh on {}:", sample_date)?;
        writeln!(out, "{}", daily)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_workbook_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.xlsx");
        let date = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();

        let mut out = Vec::new();
        report(&mut out, &path, 5, date).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            format!(
                "Error: File '{}' not found\nNo data to summarize\n",
                path.display()
            )
        );
    }
}
