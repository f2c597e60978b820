//! Serde adapter for backend timestamps
//!
//! The backend emits ISO-8601 datetimes, sometimes with an offset
//! (`2024-05-01T10:00:00Z`) and sometimes naive (`2024-05-01T10:00:00.123456`).
//! Both are normalized to a naive UTC value.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a backend timestamp string
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Display form used in tables: `2024-05-01 10:00`
pub fn display(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.format(NAIVE_FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_parse_naive_with_fraction() {
        let ts = parse("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(ts.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_parse_rfc3339_normalizes_to_utc() {
        let ts = parse("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_space_separated() {
        assert!(parse("2024-05-01 10:00:00").is_some());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse("yesterday").is_none());
    }

    #[test]
    fn test_display_is_minute_precision() {
        let ts = parse("2024-05-01T10:07:59").unwrap();
        assert_eq!(display(&ts), "2024-05-01 10:07");
    }
}
