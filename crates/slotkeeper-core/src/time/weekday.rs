use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Day of the week numbered 0-6 with Sunday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfWeek(Weekday);

impl DayOfWeek {
    pub fn from_index(index: u8) -> Result<Self, DomainError> {
        let weekday = match index {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            other => return Err(DomainError::InvalidWeekday(other)),
        };
        Ok(Self(weekday))
    }

    pub fn of(date: NaiveDate) -> Self {
        Self(date.weekday())
    }

    pub fn index(self) -> u8 {
        self.0.num_days_from_sunday() as u8
    }

    pub fn weekday(self) -> Weekday {
        self.0
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(value: Weekday) -> Self {
        Self(value)
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl From<DayOfWeek> for u8 {
    fn from(value: DayOfWeek) -> Self {
        value.index()
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
