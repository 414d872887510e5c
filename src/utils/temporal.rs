//! RFC3339 date/time recognition for temporal strings.
//!
//! A string is temporal when one of the formats below parses it in full.
//! Forms without a zone are UTC; time-only forms sit on 1900-01-01.

use crate::engine::error::ProcessError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};

/// How a format carries its zone.
#[derive(Clone, Copy)]
enum Zone {
    Utc,
    Offset,
}

const DATE_ONLY: &str = "%Y-%m-%d";
const TIME_ONLY_DATE: &str = "1900-01-01";

const FORMATS: &[(&str, Zone)] = &[
    ("%Y-%m-%dT%H:%M:%SZ", Zone::Utc),
    ("%Y-%m-%dT%H:%M:%S%.fZ", Zone::Utc),
    ("%Y-%m-%dT%H:%M:%S%.f", Zone::Utc),
    ("%Y-%m-%dT%H:%M:%Sz", Zone::Utc),
    ("%Y-%m-%dt%H:%M:%SZ", Zone::Utc),
    ("%Y-%m-%dt%H:%M:%Sz", Zone::Utc),
    ("%Y-%m-%dT%H:%M:%S%z", Zone::Offset),
    ("%Y-%m-%dt%H:%M:%S%z", Zone::Offset),
];

/// Time-only formats, parsed with [`TIME_ONLY_DATE`] in front.
const TIME_FORMATS: &[(&str, Zone)] = &[
    ("%Y-%m-%d %H:%M:%SZ", Zone::Utc),
    ("%Y-%m-%d %H:%M:%S%z", Zone::Offset),
];

/// Parses `text` as an RFC3339 instant.
///
/// Returns `Ok(None)` when the text is not temporal. An hour of `24` is an
/// error unless `allow_24h` is set, in which case it means hour 0 of the next day.
pub fn parse_rfc3339(
    text: &str,
    allow_24h: bool,
) -> Result<Option<DateTime<FixedOffset>>, ProcessError> {
    let shifted = match hour_24_at(text) {
        Some(_) if !allow_24h => {
            return Err(ProcessError::Temporal(format!(
                "'{}': 24 is not allowed as an hour value, hours range from 0 to 23 unless 'allow_24h' is set",
                text
            )))
        }
        Some(at) => Some(format!("{}23{}", &text[..at], &text[at + 2..])),
        None => None,
    };

    let stamp = parse_formats(shifted.as_deref().unwrap_or(text));
    match (stamp, shifted) {
        (Some(stamp), Some(_)) => Ok(stamp.checked_add_signed(TimeDelta::hours(1))),
        (stamp, _) => Ok(stamp),
    }
}

/// Byte position of a `24` hour field, if any.
fn hour_24_at(text: &str) -> Option<usize> {
    let at = match text.as_bytes().get(10) {
        Some(b'T' | b't') => 11,
        _ => 0,
    };
    let clock = text.get(at..at + 8)?.as_bytes();
    let digits = |range: std::ops::Range<usize>| clock[range].iter().all(u8::is_ascii_digit);
    let is_clock = clock[2] == b':' && clock[5] == b':' && digits(3..5) && digits(6..8);
    (clock.starts_with(b"24") && is_clock).then_some(at)
}

fn parse_formats(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_ONLY) {
        return date.and_hms_opt(0, 0, 0).map(in_utc);
    }

    let has_fraction = text.contains('.');
    let dated = FORMATS
        .iter()
        .filter(|(format, _)| !format.contains("%.f") || has_fraction)
        .find_map(|&(format, zone)| parse_with(text, format, zone));
    if dated.is_some() {
        return dated;
    }

    let timed = format!("{} {}", TIME_ONLY_DATE, text);
    TIME_FORMATS
        .iter()
        .find_map(|&(format, zone)| parse_with(&timed, format, zone))
}

fn parse_with(text: &str, format: &str, zone: Zone) -> Option<DateTime<FixedOffset>> {
    match zone {
        Zone::Utc => NaiveDateTime::parse_from_str(text, format).ok().map(in_utc),
        Zone::Offset => DateTime::parse_from_str(text, format).ok(),
    }
}

fn in_utc(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.fix().from_utc_datetime(&naive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn parse(text: &str) -> Option<DateTime<FixedOffset>> {
        parse_rfc3339(text, false).unwrap()
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let d = parse("2018-12-31").unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2018, 12, 31, 0));
        assert_eq!(d.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_zone_forms() {
        let z = parse("2018-01-01T00:00:00Z").unwrap();
        let plus = parse("2018-01-01T01:00:00+01:00").unwrap();
        let compact = parse("2018-01-01t01:00:00+0100").unwrap();
        assert_eq!(z, plus);
        assert_eq!(z, compact);
        assert_eq!(parse("2018-01-01T00:00:00z").unwrap(), z);
    }

    #[test]
    fn test_fraction_without_zone_is_utc() {
        let d = parse("2018-01-01T12:00:00.5").unwrap();
        assert_eq!(d.nanosecond(), 500_000_000);
        assert_eq!(d.offset().local_minus_utc(), 0);
        assert!(parse("2018-01-01T12:00:00.123Z").is_some());
        assert!(parse("2018-01-01T12:00:00.5+01:00").is_none());
    }

    #[test]
    fn test_fraction_needs_upper_case_separator() {
        assert!(parse("2018-01-01t12:00:00.5").is_none());
        assert!(parse("2018-01-01t12:00:00.5Z").is_none());
    }

    #[test]
    fn test_time_only_requires_zone() {
        let t = parse("00:00:00+01:00").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (1900, 1, 1));
        assert!(parse("00:00:00Z").unwrap() > t);
        assert!(parse("00:00:00").is_none());
        assert!(parse("00:00:00.5Z").is_none());
    }

    #[test]
    fn test_not_temporal() {
        assert!(parse("2018-01-01T12:00:00").is_none());
        assert!(parse("Test").is_none());
        assert!(parse("ABC").is_none());
        assert!(parse("2018-13-01").is_none());
    }

    #[test]
    fn test_hour_24() {
        assert!(parse_rfc3339("2018-01-01T24:00:00Z", false).is_err());
        let d = parse_rfc3339("2018-01-01T24:00:00Z", true).unwrap().unwrap();
        assert_eq!((d.day(), d.hour()), (2, 0));
        let t = parse_rfc3339("24:00:00Z", true).unwrap().unwrap();
        assert_eq!((t.day(), t.hour()), (2, 0));
    }
}
