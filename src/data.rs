use std::fmt;

use anyhow::{Result, anyhow, ensure};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Boolean(true) => "True".to_string(),
            Value::Boolean(false) => "False".to_string(),
            Value::DateTime(dt) => format_datetime(dt, false),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::DateTime(_) => "datetime",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Shortest round-trip representation that always reads back as a float.
pub fn format_float(value: f64) -> String {
    let rendered = value.to_string();
    if value.is_finite() && !rendered.contains(['.', 'e', 'E']) {
        format!("{rendered}.0")
    } else {
        rendered
    }
}

pub fn format_datetime(value: &NaiveDateTime, date_only: bool) -> String {
    if date_only {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}

pub fn is_midnight(value: &NaiveDateTime) -> bool {
    value.num_seconds_from_midnight() == 0 && value.nanosecond() == 0
}

pub fn parse_currency_amount(value: &str) -> Result<f64> {
    let stripped = value.replace('$', "");
    parse_finite_float(stripped.trim())
}

pub fn parse_float(value: &str) -> Result<f64> {
    parse_finite_float(value.trim())
}

/// Integral text parses exactly; fractional text is truncated toward zero.
pub fn parse_integer_truncating(value: &str) -> Result<i64> {
    let trimmed = value.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Ok(parsed);
    }
    let parsed = parse_finite_float(trimmed)?;
    truncate_to_i64(parsed).ok_or_else(|| anyhow!("{parsed} is out of range for a 64-bit integer"))
}

pub fn truncate_to_i64(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    // i64::MAX is not representable as f64; the bound below is 2^63.
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

fn parse_finite_float(value: &str) -> Result<f64> {
    let parsed: f64 = value.parse()?;
    ensure!(parsed.is_finite(), "not a finite number");
    Ok(parsed)
}

/// Permissive ISO-like date/time parsing. Offsets are dropped after parsing,
/// keeping the wall-clock time in the stated zone.
pub fn parse_order_datetime(value: &str) -> Result<NaiveDateTime> {
    const OFFSET_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
    ];
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(parsed.naive_local());
        }
    }
    let naive = trimmed.strip_suffix(['Z', 'z']).unwrap_or(trimmed);
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok(parsed);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(naive, fmt) {
            return parsed
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| anyhow!("no midnight on {parsed}"));
        }
    }
    Err(anyhow!("no supported date/time format matched"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn format_float_keeps_a_decimal_point() {
        assert_eq!(format_float(1500.0), "1500.0");
        assert_eq!(format_float(4.65), "4.65");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn booleans_render_capitalised() {
        assert_eq!(Value::Boolean(true).as_display(), "True");
        assert_eq!(Value::Boolean(false).as_display(), "False");
    }

    #[test]
    fn parse_currency_amount_strips_every_dollar_sign() {
        assert_eq!(parse_currency_amount("$1234.56").unwrap(), 1234.56);
        assert_eq!(parse_currency_amount("$$10").unwrap(), 10.0);
        assert_eq!(parse_currency_amount(" $ 7.5 ").unwrap(), 7.5);
        assert!(parse_currency_amount("$12abc").is_err());
        assert!(parse_currency_amount("$").is_err());
        assert!(parse_currency_amount("$inf").is_err());
    }

    #[test]
    fn parse_integer_truncating_truncates_toward_zero() {
        assert_eq!(parse_integer_truncating("8").unwrap(), 8);
        assert_eq!(parse_integer_truncating("7.9").unwrap(), 7);
        assert_eq!(parse_integer_truncating("-7.9").unwrap(), -7);
        assert_eq!(parse_integer_truncating(" 12 ").unwrap(), 12);
        assert!(parse_integer_truncating("seven").is_err());
        assert!(parse_integer_truncating("").is_err());
        assert!(parse_integer_truncating("1e30").is_err());
    }

    #[test]
    fn parse_float_rejects_non_numeric() {
        assert_eq!(parse_float("4.8").unwrap(), 4.8);
        assert!(parse_float("great").is_err());
        assert!(parse_float("NaN").is_err());
    }

    #[test]
    fn parse_order_datetime_accepts_iso_variants() {
        let midnight = ymd_hms(2024, 3, 15, 0, 0, 0);
        assert_eq!(parse_order_datetime("2024-03-15").unwrap(), midnight);
        assert_eq!(parse_order_datetime("2024/03/15").unwrap(), midnight);
        assert_eq!(parse_order_datetime("03/15/2024").unwrap(), midnight);

        let afternoon = ymd_hms(2024, 3, 15, 14, 30, 0);
        assert_eq!(parse_order_datetime("2024-03-15T14:30:00").unwrap(), afternoon);
        assert_eq!(parse_order_datetime("2024-03-15 14:30:00").unwrap(), afternoon);
        assert_eq!(parse_order_datetime("2024-03-15 14:30").unwrap(), afternoon);
        assert_eq!(parse_order_datetime("2024-03-15T14:30:00Z").unwrap(), afternoon);
        assert_eq!(parse_order_datetime("2024-03-15T14:30:00+02:00").unwrap(), afternoon);

        let fractional = parse_order_datetime("2024-03-15T14:30:00.250").unwrap();
        assert_eq!(fractional.nanosecond(), 250_000_000);
    }

    #[test]
    fn parse_order_datetime_keeps_local_month_for_offsets() {
        let parsed = parse_order_datetime("2024-03-31T23:30:00-05:00").unwrap();
        assert_eq!(parsed.month(), 3);
    }

    #[test]
    fn parse_order_datetime_rejects_garbage() {
        assert!(parse_order_datetime("not a date").is_err());
        assert!(parse_order_datetime("2024-13-01").is_err());
        assert!(parse_order_datetime("").is_err());
    }

    #[test]
    fn datetime_rendering_switches_on_time_component() {
        let midnight = ymd_hms(2024, 3, 15, 0, 0, 0);
        assert!(is_midnight(&midnight));
        assert_eq!(format_datetime(&midnight, true), "2024-03-15");
        let afternoon = ymd_hms(2024, 3, 15, 14, 30, 5);
        assert!(!is_midnight(&afternoon));
        assert_eq!(format_datetime(&afternoon, false), "2024-03-15 14:30:05");
    }
}
