//! Conversions between query literals and epoch-second timestamps.
//!
//! Timestamp domains operate on plain integers; these functions translate
//! the two accepted literal forms into seconds since the Unix epoch and
//! back. Literals arrive with their original surrounding quotes, so every
//! conversion first trims a single layer of `'` or `"`.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Error raised when a literal parses as neither an RFC3339 timestamp nor a
/// calendar date.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("could not parse {0:?} as a timestamp or date")]
pub struct UnparsableTime(String);

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Strip a single layer of surrounding single or double quotes.
pub(crate) fn strip_quotes(s: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(stripped) = s.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return stripped;
        }
    }
    s
}

/// Parse an RFC3339 timestamp literal (e.g. `2013-06-17T14:29:00Z`) into
/// epoch seconds.
pub fn to_timestamp(lexeme: &str) -> Result<i64, UnparsableTime> {
    DateTime::parse_from_rfc3339(strip_quotes(lexeme))
        .map(|dt| dt.timestamp())
        .map_err(|_| UnparsableTime(lexeme.to_owned()))
}

/// Parse a `YYYY-MM-DD` date literal into the epoch seconds of its midnight
/// UTC.
pub fn to_date(lexeme: &str) -> Result<i64, UnparsableTime> {
    NaiveDate::parse_from_str(strip_quotes(lexeme), DATE_FORMAT)
        .map(|date| date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp())
        .map_err(|_| UnparsableTime(lexeme.to_owned()))
}

/// Parse a literal in either accepted form, trying RFC3339 first and
/// falling back to date-only.
pub fn parse_time(lexeme: &str) -> Result<i64, UnparsableTime> {
    to_timestamp(lexeme).or_else(|_| to_date(lexeme))
}

/// Reinterpret epoch seconds as a UTC instant.
///
/// # Panics
///
/// Panics if `secs` falls outside chrono's representable range. The domains
/// in this crate only produce seconds within the signed 32-bit range.
pub fn from_int(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("epoch seconds out of range")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rfc3339_round_trips() {
        let secs = to_timestamp("2013-06-17T14:29:00Z").unwrap();
        assert_eq!(from_int(secs).to_rfc3339(), "2013-06-17T14:29:00+00:00");
    }

    #[test]
    fn date_is_midnight_utc() {
        let secs = to_date("2013-06-17").unwrap();
        let instant = from_int(secs);
        assert_eq!(instant.to_rfc3339(), "2013-06-17T00:00:00+00:00");
    }

    #[test]
    fn quotes_are_trimmed_one_layer() {
        assert_eq!(
            to_date("'2013-06-17'").unwrap(),
            to_date("2013-06-17").unwrap()
        );
        assert_eq!(
            to_timestamp("\"2013-06-17T14:29:00Z\"").unwrap(),
            to_timestamp("2013-06-17T14:29:00Z").unwrap()
        );
        // Only one layer comes off.
        assert!(to_date("''2013-06-17''").is_err());
    }

    #[test]
    fn parse_time_accepts_both_forms() {
        assert_eq!(
            parse_time("2013-06-17T14:29:00Z").unwrap(),
            to_timestamp("2013-06-17T14:29:00Z").unwrap()
        );
        assert_eq!(parse_time("'2013-06-17'").unwrap(), to_date("2013-06-17").unwrap());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_time("not a time").is_err());
        assert!(parse_time("2013-13-45").is_err());
        assert!(parse_time("17/06/2013").is_err());
    }

    #[test]
    fn epoch_is_zero() {
        assert_eq!(to_timestamp("1970-01-01T00:00:00Z").unwrap(), 0);
        assert_eq!(to_date("1970-01-01").unwrap(), 0);
    }
}
