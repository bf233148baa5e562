//! FILETIME conversion and timezone handling for report timestamps.

use crate::error::{Error, Result};
use chrono::{DateTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// FILETIME to Unix epoch offset (100-nanosecond intervals)
const FILETIME_UNIX_EPOCH: i64 = 116_444_736_000_000_000;

const TICKS_PER_SECOND: i64 = 10_000_000;

/// Convert a FILETIME (100ns ticks since 1601-01-01 UTC) to a UTC datetime.
/// Zero means "not set" and yields `None`.
pub fn filetime_to_datetime(filetime: u64) -> Option<DateTime<Utc>> {
    if filetime == 0 {
        return None;
    }
    let ticks = i64::try_from(filetime).ok()? - FILETIME_UNIX_EPOCH;
    let seconds = ticks.div_euclid(TICKS_PER_SECOND);
    let nanos = (ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(seconds, nanos)
}

/// Parse a report timezone.
///
/// Accepts "UTC", whole-hour offsets like "UTC+8" or "UTC-5", and IANA names
/// such as "Europe/Berlin".
pub fn parse_timezone(timezone_str: &str) -> Result<Tz> {
    let invalid = || {
        Error::InvalidInput(format!(
            "Invalid timezone '{}'. Use 'UTC', an offset like 'UTC+8', or an IANA name",
            timezone_str
        ))
    };

    let Some(offset_part) = timezone_str.strip_prefix("UTC") else {
        return timezone_str.parse::<Tz>().map_err(|_| invalid());
    };
    if offset_part.is_empty() {
        return Ok(Tz::UTC);
    }

    let offset_hours: i32 = offset_part.parse().map_err(|_| invalid())?;
    if !(-12..=14).contains(&offset_hours) {
        return Err(invalid());
    }
    if offset_hours == 0 {
        return Ok(Tz::UTC);
    }
    // The Etc/GMT zones use POSIX sign convention: Etc/GMT-8 is UTC+8
    let name = format!("Etc/GMT{:+}", -offset_hours);
    name.parse::<Tz>().map_err(|_| invalid())
}

/// Convert a UTC datetime to the report timezone
pub fn convert_to_timezone(utc_dt: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    utc_dt.with_timezone(&tz)
}

/// Format a timestamp for human-readable output, e.g.
/// "Mon 2024-04-01 16:43:34.364272500 UTC+8"
pub fn format_timestamp_human<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    format!(
        "{}.{:09} {}",
        dt.format("%a %Y-%m-%d %H:%M:%S"),
        dt.nanosecond(),
        format_utc_offset(dt)
    )
}

/// Format the offset of a datetime as "UTC", "UTC+8" or "UTC+5:30"
pub fn format_utc_offset<T: TimeZone>(dt: &DateTime<T>) -> String {
    let offset_seconds = dt.offset().fix().local_minus_utc();
    if offset_seconds == 0 {
        return "UTC".to_string();
    }
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let hours = offset_seconds.abs() / 3600;
    let minutes = (offset_seconds.abs() % 3600) / 60;
    if minutes == 0 {
        format!("UTC{}{}", sign, hours)
    } else {
        format!("UTC{}{}:{:02}", sign, hours, minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filetime_to_datetime() {
        assert_eq!(filetime_to_datetime(0), None);

        let epoch = filetime_to_datetime(116_444_736_000_000_000).unwrap();
        assert_eq!(epoch.timestamp(), 0);

        let dt = filetime_to_datetime(0x01C9_1516_A9F3_0A4A).unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2008-09-12 20:32:24");

        // Before the Unix epoch
        let early = filetime_to_datetime(116_444_736_000_000_000 - 10_000_000).unwrap();
        assert_eq!(early.timestamp(), -1);
    }

    #[test]
    fn test_filetime_keeps_sub_second_ticks() {
        let dt = filetime_to_datetime(116_444_736_000_000_000 + 1_234_567).unwrap();
        assert_eq!(dt.nanosecond(), 123_456_700);
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("UTC").unwrap(), Tz::UTC);
        assert_eq!(parse_timezone("UTC+0").unwrap(), Tz::UTC);
        assert!(parse_timezone("UTC+8").is_ok());
        assert!(parse_timezone("UTC-5").is_ok());
        assert!(parse_timezone("Europe/Berlin").is_ok());
        assert!(parse_timezone("Invalid/Timezone").is_err());
        assert!(parse_timezone("UTC+25").is_err());
        assert!(parse_timezone("UTC+x").is_err());
    }

    #[test]
    fn test_utc_offset_parsing() {
        let hk_tz = parse_timezone("UTC+8").unwrap();
        let base_dt = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc();
        let formatted = format_timestamp_human(&convert_to_timezone(base_dt, hk_tz));
        assert_eq!(formatted, "Mon 2024-01-01 20:00:00.000000000 UTC+8");

        let west = convert_to_timezone(base_dt, parse_timezone("UTC-10").unwrap());
        assert_eq!(format_utc_offset(&west), "UTC-10");
    }

    #[test]
    fn test_format_timestamp_human() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 4, 1)
            .unwrap()
            .and_hms_nano_opt(8, 43, 34, 364272500)
            .unwrap()
            .and_utc();
        assert_eq!(format_timestamp_human(&dt), "Mon 2024-04-01 08:43:34.364272500 UTC");

        let india = convert_to_timezone(dt, Tz::Asia__Kolkata);
        assert!(format_timestamp_human(&india).ends_with("UTC+5:30"));
    }
}
