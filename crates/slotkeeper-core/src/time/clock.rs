use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day stored as minutes since midnight.
///
/// Parsed values are always in `00:00..=23:59`. The end-of-day instant
/// (`24:00`) exists only as the end of a derived interval and cannot be
/// parsed from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: Self = Self(0);
    pub const END_OF_DAY: Self = Self(MINUTES_PER_DAY);

    /// Parses the fixed `HH:MM` form (two digits each, 24-hour clock).
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidTimeFormat(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }
        let digit = |b: u8| {
            if b.is_ascii_digit() {
                Ok(u32::from(b - b'0'))
            } else {
                Err(invalid())
            }
        };
        let hour = digit(bytes[0])? * 10 + digit(bytes[1])?;
        let minute = digit(bytes[3])? * 10 + digit(bytes[4])?;

        Self::from_hm(hour, minute).map_err(|_| invalid())
    }

    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, DomainError> {
        if hour > 23 || minute > 59 {
            return Err(DomainError::InvalidTimeFormat(format!(
                "{hour:02}:{minute:02}"
            )));
        }
        Ok(Self((hour * 60 + minute) as u16))
    }

    /// Builds a time from minutes since midnight; `1440` is the end of day.
    pub fn from_minutes(minutes: u32) -> Result<Self, DomainError> {
        if minutes > u32::from(MINUTES_PER_DAY) {
            return Err(DomainError::DurationExceedsDay);
        }
        Ok(Self(minutes as u16))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Adds a duration, failing if the result would run past midnight.
    pub fn checked_add_minutes(self, minutes: u32) -> Result<Self, DomainError> {
        let total = u32::from(self.0)
            .checked_add(minutes)
            .ok_or(DomainError::DurationExceedsDay)?;
        Self::from_minutes(total)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "24:00" {
            return Ok(Self::END_OF_DAY);
        }
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        assert_eq!(ClockTime::parse("00:00").unwrap().minutes(), 0);
        assert_eq!(ClockTime::parse("09:30").unwrap().minutes(), 570);
        assert_eq!(ClockTime::parse("23:59").unwrap().minutes(), 1439);
    }

    #[test]
    fn parse_rejects_out_of_range() {
        for s in ["24:00", "25:00", "12:60", "99:99"] {
            assert_eq!(
                ClockTime::parse(s),
                Err(DomainError::InvalidTimeFormat(s.into())),
                "{s} should be rejected"
            );
        }
    }

    #[test]
    fn parse_rejects_malformed_text() {
        for s in ["", "9:00", "09:0", "0900", "09-00", "ab:cd", "09:00 ", "+9:00"] {
            assert!(
                matches!(ClockTime::parse(s), Err(DomainError::InvalidTimeFormat(_))),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        let t = ClockTime::parse("07:05").unwrap();
        assert_eq!(t.to_string(), "07:05");
    }

    #[test]
    fn end_of_day_displays_as_24_00() {
        assert_eq!(ClockTime::END_OF_DAY.to_string(), "24:00");
    }

    #[test]
    fn checked_add_allows_exact_midnight() {
        let t = ClockTime::parse("23:30").unwrap();
        assert_eq!(t.checked_add_minutes(30), Ok(ClockTime::END_OF_DAY));
    }

    #[test]
    fn checked_add_rejects_crossing_midnight() {
        let t = ClockTime::parse("23:45").unwrap();
        assert_eq!(t.checked_add_minutes(30), Err(DomainError::DurationExceedsDay));
    }

    #[test]
    fn checked_add_huge_duration_does_not_overflow() {
        let t = ClockTime::parse("09:00").unwrap();
        assert_eq!(
            t.checked_add_minutes(u32::MAX),
            Err(DomainError::DurationExceedsDay)
        );
    }

    #[test]
    fn serde_uses_hh_mm_text() {
        let t = ClockTime::parse("16:45").unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"16:45\"");

        let back: ClockTime = serde_json::from_str("\"24:00\"").unwrap();
        assert_eq!(back, ClockTime::END_OF_DAY);
        assert!(serde_json::from_str::<ClockTime>("\"7:00\"").is_err());
    }
}
