//! Civil time-of-day arithmetic. All values are wall-clock times in the
//! provider's local time; there is no timezone handling here.

pub mod clock;
pub mod interval;
pub mod weekday;

pub use clock::{ClockTime, MINUTES_PER_DAY};
pub use interval::Interval;
pub use weekday::DayOfWeek;
