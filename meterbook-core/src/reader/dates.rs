//! Date/time coercion of cell values

use super::Value;
use crate::error::DateParseError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Coerce a cell to a date/time.
///
/// Empty cells (and blank text) stay missing and yield `Ok(None)`. Numbers
/// are read as Excel 1900-system serials.
pub fn parse_datetime(value: &Value) -> Result<Option<NaiveDateTime>, DateParseError> {
    let parsed = match value {
        Value::Empty => return Ok(None),
        Value::DateTime(dt) => Some(*dt),
        Value::Int(i) => excel_serial_to_datetime(*i as f64),
        Value::Float(f) => excel_serial_to_datetime(*f),
        Value::Text(s) if s.trim().is_empty() => return Ok(None),
        Value::Text(s) => parse_text(s),
        Value::Bool(_) | Value::Duration(_) | Value::Error(_) => None,
    };

    parsed.map(Some).ok_or_else(|| DateParseError {
        value: value.to_string(),
    })
}

/// Parse a textual date or date/time
pub fn parse_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Convert an Excel serial number (1900 date system) to a date/time.
///
/// Serials below 60 are shifted by a day to undo the fictitious
/// 1900-02-29 that Excel inherited from Lotus 1-2-3.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let mut millis = (serial * 86_400_000.0).round() as i64;
    if serial < 60.0 {
        millis += 86_400_000;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_excel_serials() {
        assert_eq!(
            excel_serial_to_datetime(45017.0),
            Some(ymd_hms(2023, 4, 1, 0, 0, 0))
        );
        assert_eq!(
            excel_serial_to_datetime(45017.5),
            Some(ymd_hms(2023, 4, 1, 12, 0, 0))
        );
        assert_eq!(
            excel_serial_to_datetime(1.0),
            Some(ymd_hms(1900, 1, 1, 0, 0, 0))
        );
        assert_eq!(excel_serial_to_datetime(-1.0), None);
        assert_eq!(excel_serial_to_datetime(f64::NAN), None);
    }

    #[test]
    fn test_text_formats() {
        let april_first = ymd_hms(2023, 4, 1, 0, 0, 0);
        for text in [
            "2023-04-01",
            " 2023-04-01 ",
            "2023/04/01",
            "04/01/2023",
            "01 Apr 2023",
            "April 1, 2023",
            "2023-04-01 00:00:00",
            "2023-04-01T00:00:00",
        ] {
            assert_eq!(parse_text(text), Some(april_first), "{text}");
        }

        assert_eq!(
            parse_text("2023-04-01 13:30"),
            Some(ymd_hms(2023, 4, 1, 13, 30, 0))
        );
        assert_eq!(
            parse_text("2023-04-01T13:30:00+01:00"),
            Some(ymd_hms(2023, 4, 1, 13, 30, 0))
        );
        assert_eq!(parse_text("not a date"), None);
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_datetime(&Value::Empty), Ok(None));
        assert_eq!(parse_datetime(&Value::Text("  ".into())), Ok(None));
        assert_eq!(
            parse_datetime(&Value::Float(45018.0)),
            Ok(Some(ymd_hms(2023, 4, 2, 0, 0, 0)))
        );

        let err = parse_datetime(&Value::Text("yesterday".into())).unwrap_err();
        assert_eq!(err.value, "yesterday");
        assert!(parse_datetime(&Value::Bool(true)).is_err());
    }
}
