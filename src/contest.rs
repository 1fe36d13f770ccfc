// src/contest.rs
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Canonical contest record as served by the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contest {
    pub event: String,
    pub start: String, // provider timestamp, verbatim
    pub end: String,
    pub resource: String, // canonical key once filtered
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>, // e.g. "live"
}

impl Contest {
    pub fn is_live(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("live"))
    }

    pub fn start_at(&self, tz: FixedOffset) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.start, tz)
    }

    pub fn end_at(&self, tz: FixedOffset) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.end, tz)
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an upstream timestamp. Zone-less values are read in `tz`.
pub fn parse_timestamp(raw: &str, tz: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    // "+05:30" without the 'T' separator still shows up from some feeds
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt);
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return tz.from_local_datetime(&naive).single();
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_timestamp("2024-03-03T19:30:00+05:30", utc()).unwrap();
        assert_eq!(dt.naive_utc().to_string(), "2024-03-03 14:00:00");
    }

    #[test]
    fn naive_is_read_in_configured_zone() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let dt = parse_timestamp("2024-03-03T19:30:00", ist).unwrap();
        assert_eq!(dt.naive_utc().to_string(), "2024-03-03 14:00:00");
        let dt = parse_timestamp("2024-03-03 19:30:00", utc()).unwrap();
        assert_eq!(dt.naive_utc().to_string(), "2024-03-03 19:30:00");
    }

    #[test]
    fn bare_date_is_midnight() {
        let dt = parse_timestamp("2024-02-28", utc()).unwrap();
        assert_eq!(dt.naive_utc().to_string(), "2024-02-28 00:00:00");
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_timestamp("", utc()).is_none());
        assert!(parse_timestamp("next tuesday", utc()).is_none());
        assert!(parse_timestamp("2024-13-40", utc()).is_none());
    }

    #[test]
    fn status_is_omitted_when_absent() {
        let c = Contest {
            event: "Weekly 1".into(),
            start: "2024-03-01T00:00:00Z".into(),
            end: "2024-03-01T01:30:00Z".into(),
            resource: "leetcode.com".into(),
            href: String::new(),
            status: None,
        };
        let v = serde_json::to_value(&c).unwrap();
        assert!(v.get("status").is_none());
        assert!(!c.is_live());
    }
}
