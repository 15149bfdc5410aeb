use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};

/// Storage kind of a dataset column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Boolean,
    Text,
    /// Milliseconds since the Unix epoch
    Timestamp,
    /// Values are codes into this ordered list of labels
    Categorical(Vec<String>),
}

impl ColumnKind {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Real => "real",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Text => "text",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Categorical(_) => "categorical",
        }
    }
}

/// A single scalar cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Text(String),
    Timestamp(i64),
    Category(u32),
}

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

impl Value {
    /// Numeric view of the value under the script's unary `+` rules.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Integer(i) => *i as f64,
            // Serialized as null, which the browser coerces to 0
            Value::Real(r) if !r.is_finite() => 0.0,
            Value::Real(r) => *r,
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::Timestamp(ms) => *ms as f64,
            Value::Category(code) => f64::from(*code),
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
        }
    }

    /// Result of `value + 1` as the browser evaluates it on a decoded record.
    pub fn plus_one(&self) -> Value {
        match self {
            Value::Null => Value::Integer(1),
            Value::Integer(i) => Value::Integer(i.saturating_add(1)),
            Value::Real(r) if !r.is_finite() => Value::Integer(1),
            Value::Real(r) => Value::Real(r + 1.0),
            Value::Boolean(b) => Value::Integer(i64::from(*b) + 1),
            Value::Timestamp(ms) => Value::Integer(ms.saturating_add(1)),
            Value::Category(code) => Value::Integer(i64::from(*code) + 1),
            Value::Text(s) => Value::Text(format!("{}1", s)),
        }
    }

    /// Short display form for dumps and CSV export
    pub fn display(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) => format_real(*r),
            Value::Boolean(b) => (if *b { "True" } else { "False" }).to_string(),
            Value::Text(s) => s.clone(),
            Value::Timestamp(ms) => format_timestamp(*ms),
            Value::Category(code) => format!("#{}", code),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(i) | Value::Timestamp(i) => serializer.serialize_i64(*i),
            Value::Real(r) if r.is_finite() => serializer.serialize_f64(*r),
            Value::Real(_) => serializer.serialize_none(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Category(code) => serializer.serialize_u32(*code),
        }
    }
}

/// Reals keep a fractional part even when integral, so `2.0` reads back as real
fn format_real(r: f64) -> String {
    if r.is_finite() && r.fract() == 0.0 && r.abs() < 1e15 {
        format!("{:.1}", r)
    } else {
        r.to_string()
    }
}

/// UTC `YYYY-MM-DD HH:MM:SS`, with milliseconds when they are non-zero
pub fn format_timestamp(ms: i64) -> String {
    let format = if ms.rem_euclid(1000) == 0 { "%Y-%m-%d %H:%M:%S" } else { "%Y-%m-%d %H:%M:%S%.3f" };
    match DateTime::<Utc>::from_timestamp_millis(ms) {
        Some(dt) => dt.naive_utc().format(format).to_string(),
        None => ms.to_string(),
    }
}

/// Parse a timestamp cell into epoch milliseconds
pub fn parse_timestamp(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_number_follows_unary_plus() {
        assert_eq!(Value::Text(" 42 ".into()).to_number(), 42.0);
        assert_eq!(Value::Text(String::new()).to_number(), 0.0);
        assert!(Value::Text("abc".into()).to_number().is_nan());
        assert_eq!(Value::Null.to_number(), 0.0);
        assert_eq!(Value::Boolean(true).to_number(), 1.0);
        assert_eq!(Value::Real(f64::NAN).to_number(), 0.0);
        assert_eq!(Value::Real(f64::INFINITY).to_number(), 0.0);
        assert_eq!(Value::Real(f64::NAN).plus_one(), Value::Integer(1));
    }

    #[test]
    fn test_display_keeps_precision() {
        assert_eq!(Value::Real(2.0).display(), "2.0");
        assert_eq!(Value::Real(-0.25).display(), "-0.25");
        assert_eq!(Value::Timestamp(1500).display(), "1970-01-01 00:00:01.500");
        assert_eq!(Value::Timestamp(-500).display(), "1969-12-31 23:59:59.500");
        assert_eq!(Value::Timestamp(2000).display(), "1970-01-01 00:00:02");
    }

    #[test]
    fn test_plus_one() {
        assert_eq!(Value::Integer(3).plus_one(), Value::Integer(4));
        assert_eq!(Value::Text("x".into()).plus_one(), Value::Text("x1".into()));
        assert_eq!(Value::Timestamp(1000).plus_one(), Value::Integer(1001));
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1970-01-01"), Some(0));
        assert_eq!(parse_timestamp("1970-01-01 00:00:01"), Some(1000));
        assert_eq!(parse_timestamp("1970-01-01T00:00:02Z"), Some(2000));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(format_timestamp(1000), "1970-01-01 00:00:01");
    }
}
