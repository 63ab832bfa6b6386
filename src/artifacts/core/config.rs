//! Environment-driven configuration
//!
//! twig has no configuration file. The few knobs it exposes are read from the
//! environment:
//!
//! - `TWIG_COMMIT_DATE`: fixes the timestamp recorded by new commits
//!   (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`); local time is used otherwise
//! - `TWIG_LOG`: a `tracing` filter directive for diagnostics on stderr

use chrono::{DateTime, FixedOffset};

pub const COMMIT_DATE_ENV: &str = "TWIG_COMMIT_DATE";

pub const LOG_FILTER_ENV: &str = "TWIG_LOG";

pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Format of commit timestamps, e.g. `Thu Oct 15 12:00:00 2026 +0000`
pub const TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Timestamp of the root commit every repository starts from
pub const EPOCH_TIMESTAMP: &str = "Wed Dec 31 16:00:00 1969 -0800";

/// Timestamp for a new commit, honouring `TWIG_COMMIT_DATE` when set and valid
pub fn commit_timestamp() -> String {
    let timestamp = std::env::var(COMMIT_DATE_ENV)
        .ok()
        .and_then(|date_str| parse_commit_date(&date_str));

    match timestamp {
        Some(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
        None => chrono::Local::now()
            .fixed_offset()
            .format(TIMESTAMP_FORMAT)
            .to_string(),
    }
}

fn parse_commit_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(date_str)
        .or_else(|_| DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S %z"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_both_supported_date_formats() {
        let plain = parse_commit_date("2023-01-01 12:00:00 +0000").unwrap();
        let rfc = parse_commit_date("Sun, 01 Jan 2023 12:00:00 +0000").unwrap();

        assert_eq!(plain, rfc);
        assert_eq!(
            plain.format(TIMESTAMP_FORMAT).to_string(),
            "Sun Jan 1 12:00:00 2023 +0000"
        );
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_commit_date("yesterday").is_none());
    }

    #[test]
    fn epoch_timestamp_matches_the_format() {
        let epoch = FixedOffset::west_opt(8 * 3600)
            .unwrap()
            .timestamp_opt(0, 0)
            .unwrap();

        assert_eq!(epoch.format(TIMESTAMP_FORMAT).to_string(), EPOCH_TIMESTAMP);
    }
}
