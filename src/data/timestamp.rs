//! Timestamp normalization.
//!
//! Heartbeat producers are sloppy about timestamp formats, so everything
//! funnels through [`parse_timestamp`] which anchors every accepted form
//! to UTC. Later arithmetic never touches timezones again.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Layouts with an explicit numeric offset not covered by the RFC 3339
/// parser (minute precision, space separator).
const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Naive date-time layouts interpreted as UTC (order matters: longer
/// layouts first, `T` before space).
const BARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse timestamp text like `2025-08-04T10:00:00Z`,
/// `2025-08-04T10:00:00.250+02:00`, `2025-08-04T10:00` or `2025-08-04`.
///
/// Accepts ISO-8601 with a `Z` marker or explicit numeric offset, and bare
/// date-times (no timezone), which are taken as UTC. Seconds may be
/// omitted (minute precision), fractional seconds are fine in any form,
/// and a date on its own means midnight UTC. Returns `None` for anything
/// else; never panics.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // A trailing UTC marker becomes an explicit zero offset, so every
    // zoned layout below only has to deal with numeric offsets.
    let unzoned = raw.strip_suffix('Z').map(|s| format!("{s}+00:00"));
    let text = unzoned.as_deref().unwrap_or(raw);

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }

    for format in ZONED_FORMATS {
        if let Ok(instant) = DateTime::parse_from_str(text, format) {
            return Some(instant.with_timezone(&Utc));
        }
    }

    for format in BARE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }

    None
}

/// Format an instant in the wire form used for alerts:
/// `YYYY-MM-DDTHH:MM:SSZ`, seconds precision.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
