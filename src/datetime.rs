//! Normalization of the date formats found in real-world RSS `pubDate` tags.
//!
//! Feeds in the wild disagree on timestamp syntax: most use the RFC 822/1123
//! style RSS 2.0 calls for, but ISO 8601 variants (with and without an
//! offset) and bare `YYYY-MM-DD HH:MM:SS` strings are common enough that
//! refusing them would drop a lot of valid items.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Offset-free formats, tried after the RFC parsers. Values are taken as UTC.
const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Parses a feed timestamp string, trying each supported format in order.
///
/// Formats are ordered most-common-in-the-wild first: RFC 2822 (the RSS
/// standard, with timezone name or numeric offset), RFC 3339, ISO 8601 local
/// date-time with a `T` separator, then the space-separated variant. The
/// first successful parse wins and the rest are skipped.
///
/// Returns `None` when nothing matches. An unrecognized date is not an
/// error: the caller logs the string and keeps the item with an absent
/// timestamp. Pure function, safe to call from concurrent workers.
pub(crate) fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in LOCAL_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }

    None
}
