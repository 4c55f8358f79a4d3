//! Timestamp decoding for persisted records.
//!
//! Records are written as RFC 3339 in UTC. Older history files carry local
//! ISO-8601 timestamps without an offset (`2025-11-02T10:00:00.123456`);
//! those are read as UTC.

use chrono::{DateTime, NaiveDateTime, ParseResult, Utc};
use serde::{de, Deserialize, Deserializer};

pub fn parse(raw: &str) -> ParseResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(stamped) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamped.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
}

/// `deserialize_with` target for `DateTime<Utc>` fields.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(|err| de::Error::custom(format!("invalid timestamp '{raw}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn offsets_are_normalised_to_utc() {
        let parsed = parse("2025-11-02T12:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 11, 2, 10, 0, 0).unwrap());
    }

    #[test]
    fn naive_timestamps_read_as_utc() {
        let parsed = parse("2025-11-02T10:00:00.123456").unwrap();
        assert_eq!(parsed.hour(), 10);
        assert_eq!(parsed.nanosecond(), 123_456_000);

        assert_eq!(
            parse("2025-11-02T10:00:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 11, 2, 10, 0, 0).unwrap()
        );
        assert_eq!(
            parse("2025-11-02 10:00:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 11, 2, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse("yesterday").is_err());
        assert!(parse("").is_err());
    }
}
