//! Timestamp and duration parsing for provider payloads

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

/// Formats without an offset, interpreted as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S UTC",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses the timestamp shapes seen across providers: RFC 3339 with any
/// offset, and a handful of offset-less forms treated as UTC.
pub fn parse_provider_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    debug!("Unrecognized provider timestamp: {}", raw);
    None
}

/// Unix seconds to UTC timestamp
pub fn from_unix_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parses_rfc3339_variants() {
        assert_eq!(
            parse_provider_timestamp("2024-05-01T12:00:00.000Z"),
            Some(utc(2024, 5, 1, 12, 0))
        );
        assert_eq!(
            parse_provider_timestamp("2024-05-01T17:30:00+05:30"),
            Some(utc(2024, 5, 1, 12, 0))
        );
    }

    #[test]
    fn test_parses_naive_variants_as_utc() {
        assert_eq!(
            parse_provider_timestamp("2024-05-01 12:00:00 UTC"),
            Some(utc(2024, 5, 1, 12, 0))
        );
        assert_eq!(
            parse_provider_timestamp("2024-05-01 12:00:00"),
            Some(utc(2024, 5, 1, 12, 0))
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_provider_timestamp(""), None);
        assert_eq!(parse_provider_timestamp("tomorrow"), None);
    }

}
