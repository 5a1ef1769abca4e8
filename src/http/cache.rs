//! Conditional request handling.
//!
//! Evaluates `If-Modified-Since` against file modification times at second
//! granularity, the granularity of the header format itself. The server
//! still answers 304 even though it forbids caching: `no-cache` requires
//! revalidation, it does not forbid a correct revalidation answer.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an RFC 7231 HTTP-date, e.g.
/// `Tue, 15 Nov 1994 08:12:31 GMT`.
pub fn format_http_date(t: SystemTime) -> String {
    let dt: DateTime<Utc> = t.into();
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP-date header value.
///
/// Only the RFC 1123 form is accepted; the obsolete RFC 850 and asctime
/// forms are rare enough in the wild to treat as unparseable.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whether a cached copy dated by `if_modified_since` is still current for
/// a file modified at `mtime`.
///
/// Sub-second precision is dropped before comparing. A missing or
/// malformed header means the full response must be sent.
pub fn not_modified(mtime: SystemTime, if_modified_since: Option<&str>) -> bool {
    let Some(value) = if_modified_since else {
        return false;
    };
    let Some(since) = parse_http_date(value) else {
        return false;
    };
    let modified: DateTime<Utc> = mtime.into();
    modified.timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_format_epoch() {
        assert_eq!(
            format_http_date(UNIX_EPOCH),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_parse_rfc1123() {
        let parsed = parse_http_date("Tue, 15 Nov 1994 08:12:31 GMT").unwrap();
        assert_eq!(parsed.timestamp(), 784_887_151);
    }

    #[test]
    fn test_format_parse_round_trip() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let formatted = format_http_date(t);
        let parsed = parse_http_date(&formatted).unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_http_date("yesterday").is_none());
        assert!(parse_http_date("").is_none());
    }

    #[test]
    fn test_not_modified_same_second() {
        let mtime = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let header = format_http_date(mtime);
        assert!(not_modified(mtime, Some(&header)));
    }

    #[test]
    fn test_modified_after_header_date() {
        let mtime = UNIX_EPOCH + Duration::from_secs(1_700_000_100);
        let header = format_http_date(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        assert!(!not_modified(mtime, Some(&header)));
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let mtime = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert!(!not_modified(mtime, None));
        assert!(!not_modified(mtime, Some("not a date")));
    }
}
