use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use meterbook_core::MeterbookConfig;
use meterbook_core::chart::{self, ChartRequest, EXPORT_GEN_SHEET, LineChart};
use meterbook_core::config::ChartConfig;
use meterbook_core::reader;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "meterchart")]
#[command(about = "Plot one day of export generation for a metering point", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Excel/ODS workbook (default: configured path, Data.xlsx)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Meter Point Administration Number to plot
    #[arg(short, long)]
    mpan: Option<i64>,

    /// Day to plot
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// Keep the SVG chart at this path instead of a temporary file
    #[arg(short, long, value_name = "SVG")]
    output: Option<PathBuf>,

    /// Render the chart without opening it
    #[arg(long)]
    no_show: bool,
}

impl Cli {
    /// Configured request with command line overrides on top
    fn request(&self, config: &ChartConfig) -> ChartRequest {
        let mut request = config.request();
        if let Some(mpan) = self.mpan {
            request.mpan = mpan;
        }
        if let Some(date) = self.date {
            request.date = date;
        }
        request
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = MeterbookConfig::discover(cli.config.as_deref())?;

    let request = cli.request(&config.chart);
    let path = cli.file.clone().unwrap_or(config.workbook.path);
    let output = cli.output.clone().or(config.chart.output);

    let mut workbook = reader::open_workbook(&path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;
    let table = reader::read_table(&mut workbook, EXPORT_GEN_SHEET)
        .with_context(|| format!("Failed to read worksheet '{}'", EXPORT_GEN_SHEET))?;

    let series = chart::generation_series(&table, &request)?;
    println!("{}", series);
    println!("{:?}", series.values());

    let file = LineChart::generation(&series).render(output.as_deref())?;
    info!(
        path = %file.path().display(),
        points = series.len(),
        temporary = file.is_temporary(),
        "chart rendered"
    );
    if !file.is_temporary() {
        println!("Chart written to {}", file.path().display());
    }

    if !cli.no_show {
        show(file.path())?;
    }

    Ok(())
}

/// Open the chart in the system viewer and block until the user is done with it
fn show(path: &Path) -> Result<()> {
    open::that(path).with_context(|| format!("Failed to open chart: {}", path.display()))?;
    println!("Close the chart window and press Enter to exit.");

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to wait for the chart window")?;
    Ok(())
}
