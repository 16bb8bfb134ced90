//! Export generation series and line chart rendering
//!
//! The chart is rendered as a self-contained SVG document. All drawing goes
//! through small writers that append to one `String` buffer.

use crate::error::ChartError;
use crate::reader::{Table, Value};
use chrono::{NaiveDate, NaiveTime};
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// A chart on disk. Temporary files are deleted when dropped.
#[derive(Debug)]
pub enum ChartFile {
    Saved(PathBuf),
    Temporary(TempPath),
}

impl ChartFile {
    pub fn path(&self) -> &Path {
        match self {
            ChartFile::Saved(path) => path,
            ChartFile::Temporary(path) => path,
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, ChartFile::Temporary(_))
    }
}

/// Worksheet holding half-hourly export generation
pub const EXPORT_GEN_SHEET: &str = "Export Gen kWh";
pub const MPAN_COLUMN: &str = "Meter Point Administration Number";
pub const DATE_COLUMN: &str = "Date";
pub const KWH_COLUMN: &str = "kWh";

pub const GENERATION_TITLE: &str = "24-Hour Export Generation for Customer A";
pub const GENERATION_X_LABEL: &str = "Settlement Period (1/2 Hour)";
pub const GENERATION_Y_LABEL: &str = "Generation (kWh)";

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const MAX_X_TICKS: usize = 12;
const Y_TICKS: usize = 5;

/// Which meter and day to plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRequest {
    pub mpan: i64,
    pub date: NaiveDate,
}

impl Default for ChartRequest {
    fn default() -> Self {
        Self {
            mpan: 1_099_999_999_999,
            date: NaiveDate::from_ymd_opt(2023, 4, 2).unwrap_or_default(),
        }
    }
}

/// Labelled numeric values, labels being source row positions
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub labels: Vec<usize>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(|l| l.to_string().len())
            .max()
            .unwrap_or(0);
        for (label, value) in self.labels.iter().zip(&self.values) {
            writeln!(f, "{:<width$}    {:?}", label, value)?;
        }
        write!(f, "Name: {}, dtype: float64", self.name)
    }
}

/// `kWh` readings of `request.mpan` on `request.date`, in row order
pub fn generation_series(table: &Table, request: &ChartRequest) -> Result<Series, ChartError> {
    for column in [MPAN_COLUMN, DATE_COLUMN, KWH_COLUMN] {
        table.require_column(column)?;
    }

    let day = request.date.and_time(NaiveTime::MIN);
    let matching = table.filter(|row| {
        let mpan_matches = row
            .get(MPAN_COLUMN)
            .and_then(Value::as_f64)
            .is_some_and(|mpan| mpan == request.mpan as f64);
        let date_matches = row.get(DATE_COLUMN).and_then(Value::as_datetime) == Some(day);
        mpan_matches && date_matches
    });

    if matching.is_empty() {
        return Err(ChartError::NoMatchingRows {
            mpan: request.mpan,
            date: request.date,
        });
    }

    let kwh = matching.require_column(KWH_COLUMN)?;
    let values = kwh.f64_values()?;
    Ok(Series {
        name: KWH_COLUMN.to_string(),
        labels: matching.rows().map(|row| row.label()).collect(),
        values,
    })
}

/// A single-line chart
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
}

impl LineChart {
    /// Generation against settlement period, x running `0..n`
    pub fn generation(series: &Series) -> Self {
        Self {
            title: GENERATION_TITLE.to_string(),
            x_label: GENERATION_X_LABEL.to_string(),
            y_label: GENERATION_Y_LABEL.to_string(),
            points: series
                .values()
                .iter()
                .enumerate()
                .map(|(x, &y)| (x as f64, y))
                .collect(),
        }
    }

    pub fn x_values(&self) -> Vec<f64> {
        self.points.iter().map(|(x, _)| *x).collect()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ChartError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_svg()).map_err(|source| ChartError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the chart to `output`, or to a temporary SVG file when none is given
    pub fn render(&self, output: Option<&Path>) -> Result<ChartFile, ChartError> {
        if let Some(path) = output {
            self.save(path)?;
            return Ok(ChartFile::Saved(path.to_path_buf()));
        }

        let file = tempfile::Builder::new()
            .prefix("meterchart-")
            .suffix(".svg")
            .tempfile()
            .map_err(|source| ChartError::Write {
                path: std::env::temp_dir(),
                source,
            })?;
        self.save(file.path())?;
        Ok(ChartFile::Temporary(file.into_temp_path()))
    }

    pub fn to_svg(&self) -> String {
        let (x_min, x_max) = padded_bounds(self.points.iter().map(|p| p.0), 0.0);
        let (y_min, y_max) = padded_bounds(self.points.iter().map(|p| p.1), 0.05);

        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let sx = |x: f64| MARGIN_LEFT + (x - x_min) / (x_max - x_min) * plot_w;
        let sy = |y: f64| MARGIN_TOP + plot_h - (y - y_min) / (y_max - y_min) * plot_h;

        let mut buf = String::with_capacity(4096);
        let _ = write!(
            buf,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = WIDTH,
            h = HEIGHT
        );
        buf.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);

        // Axes
        write_line(&mut buf, MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, MARGIN_TOP + plot_h);
        write_line(
            &mut buf,
            MARGIN_LEFT,
            MARGIN_TOP + plot_h,
            MARGIN_LEFT + plot_w,
            MARGIN_TOP + plot_h,
        );

        // X ticks on whole periods
        let span = (x_max - x_min).round().max(1.0) as usize;
        let step = span.div_ceil(MAX_X_TICKS).max(1);
        for tick in (0..=span).step_by(step) {
            let x = x_min + tick as f64;
            let px = sx(x);
            write_line(&mut buf, px, MARGIN_TOP + plot_h, px, MARGIN_TOP + plot_h + 5.0);
            write_text(
                &mut buf,
                px,
                MARGIN_TOP + plot_h + 20.0,
                "middle",
                12,
                None,
                &fmt_num(x),
            );
        }

        for i in 0..=Y_TICKS {
            let y = y_min + (y_max - y_min) * i as f64 / Y_TICKS as f64;
            let py = sy(y);
            write_line(&mut buf, MARGIN_LEFT - 5.0, py, MARGIN_LEFT, py);
            write_text(&mut buf, MARGIN_LEFT - 8.0, py + 4.0, "end", 12, None, &fmt_num(y));
        }

        let (mid_x, mid_y) = (MARGIN_LEFT + plot_w / 2.0, MARGIN_TOP + plot_h / 2.0);
        write_text(
            &mut buf,
            WIDTH / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            "middle",
            16,
            None,
            &self.title,
        );
        write_text(&mut buf, mid_x, HEIGHT - 15.0, "middle", 13, None, &self.x_label);
        write_text(&mut buf, 20.0, mid_y, "middle", 13, Some(-90), &self.y_label);

        if !self.points.is_empty() {
            buf.push_str(r##"<polyline fill="none" stroke="#1f77b4" stroke-width="2" points=""##);
            for (i, (x, y)) in self.points.iter().enumerate() {
                if i > 0 {
                    buf.push(' ');
                }
                buf.push_str(&fmt_num(sx(*x)));
                buf.push(',');
                buf.push_str(&fmt_num(sy(*y)));
            }
            buf.push_str(r#""/>"#);
        }

        buf.push_str("</svg>\n");
        buf
    }
}

/// Data bounds widened by `pad` of the span; a zero span becomes one unit wide
fn padded_bounds(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max - min == 0.0 {
        return (min - 0.5, max + 0.5);
    }
    let margin = (max - min) * pad;
    (min - margin, max + margin)
}

/// Number with at most two decimals and no trailing zeros
fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let s = format!("{:.2}", n);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn write_line(buf: &mut String, x1: f64, y1: f64, x2: f64, y2: f64) {
    let _ = write!(
        buf,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="black"/>"#,
        fmt_num(x1),
        fmt_num(y1),
        fmt_num(x2),
        fmt_num(y2)
    );
}

fn write_text(
    buf: &mut String,
    x: f64,
    y: f64,
    anchor: &str,
    size: u32,
    rotate: Option<i32>,
    text: &str,
) {
    let (x, y) = (fmt_num(x), fmt_num(y));
    let _ = write!(
        buf,
        r#"<text x="{x}" y="{y}" text-anchor="{anchor}" font-family="sans-serif" font-size="{size}""#
    );
    if let Some(angle) = rotate {
        let _ = write!(buf, r#" transform="rotate({angle} {x} {y})""#);
    }
    buf.push('>');
    escape_into(buf, text);
    buf.push_str("</text>");
}

fn escape_into(buf: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            _ => buf.push(c),
        }
    }
}
