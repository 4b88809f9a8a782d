use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::time::ClockTime;

/// A half-open `[start, end)` span of civil time within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: ClockTime,
    end: ClockTime,
}

#[derive(Deserialize)]
struct RawInterval {
    start: ClockTime,
    end: ClockTime,
}

impl TryFrom<RawInterval> for Interval {
    type Error = DomainError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl Interval {
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidInterval);
        }
        Ok(Self { start, end })
    }

    /// Parses both bounds from `HH:MM` text.
    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(ClockTime::parse(start)?, ClockTime::parse(end)?)
    }

    /// Derives `[start, start + duration)`. Intervals may end exactly at
    /// midnight but never cross it.
    pub fn starting_at(start: ClockTime, duration_minutes: u32) -> Result<Self, DomainError> {
        if duration_minutes == 0 {
            return Err(DomainError::InvalidDuration);
        }
        let end = start.checked_add_minutes(duration_minutes)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn end(&self) -> ClockTime {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end.minutes() - self.start.minutes())
    }

    /// Back-to-back intervals (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
