//! Minute-resolution timestamps as they appear in the reminder file.
//!
//! Stored times carry no seconds and no timezone: `"YYYY-MM-DD HH:MM"`,
//! interpreted in the local wall clock of the host.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{CoreError, Result};

/// `chrono` format string for the persisted `time` field.
pub const DUE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render a due time in the persisted format.
pub fn format_due(at: &NaiveDateTime) -> String {
    at.format(DUE_FORMAT).to_string()
}

/// Parse a persisted `time` field.
pub fn parse_stored(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), DUE_FORMAT)
        .map_err(|e| CoreError::InvalidTime(format!("'{s}': {e}")))
}

/// Check that `s` is a strict 24-hour `HH:MM` clock value with two digits each.
pub fn is_valid_clock(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let (hours, minutes) = (&s[..2], &s[3..]);
    if !hours.bytes().all(|b| b.is_ascii_digit()) || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!((hours.parse::<u32>(), minutes.parse::<u32>()), (Ok(h), Ok(m)) if h <= 23 && m <= 59)
}

/// Combine a `YYYY-MM-DD` date and an `HH:MM` clock value into a due time.
pub fn parse_due(date: &str, time: &str) -> Result<NaiveDateTime> {
    let time = time.trim();
    if !is_valid_clock(time) {
        return Err(CoreError::InvalidTime(format!(
            "'{time}' is not HH:MM (24-hour clock, two digits each)"
        )));
    }
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| CoreError::InvalidTime(format!("'{date}' is not YYYY-MM-DD: {e}")))?;
    let clock = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|e| CoreError::InvalidTime(format!("'{time}': {e}")))?;
    Ok(date.and_time(clock))
}

/// Current local wall-clock time with sub-second precision dropped.
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Serde adapter for `NaiveDateTime` fields stored as `"YYYY-MM-DD HH:MM"`.
pub mod minute_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_due(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_stored(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accepts_two_digit_values() {
        assert!(is_valid_clock("00:00"));
        assert!(is_valid_clock("09:05"));
        assert!(is_valid_clock("23:59"));
    }

    #[test]
    fn clock_rejects_loose_formats() {
        assert!(!is_valid_clock("9:05"));
        assert!(!is_valid_clock("24:00"));
        assert!(!is_valid_clock("12:60"));
        assert!(!is_valid_clock("12-30"));
        assert!(!is_valid_clock("1a:30"));
        assert!(!is_valid_clock("12:300"));
    }

    #[test]
    fn parse_due_combines_date_and_clock() {
        let at = parse_due("2024-01-01", "09:00").unwrap();
        assert_eq!(format_due(&at), "2024-01-01 09:00");
    }

    #[test]
    fn parse_due_rejects_impossible_dates() {
        let err = parse_due("2024-02-30", "09:00").unwrap_err();
        assert_eq!(err.code(), "INVALID_TIME");
    }

    #[test]
    fn stored_times_drop_nothing_on_round_trip() {
        let at = parse_stored("2025-12-31 23:59").unwrap();
        assert_eq!(format_due(&at), "2025-12-31 23:59");
        assert!(parse_stored("2025-12-31T23:59:00").is_err());
    }
}
