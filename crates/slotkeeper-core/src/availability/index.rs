//! Answers "is this civil window open on this weekday?" for one provider.
//!
//! Rules are stored as the provider wrote them, possibly overlapping or
//! split across several entries for the same day. The index merges the
//! active ones into disjoint open regions so that a window spanning two
//! adjacent rules (09:00-12:00 and 12:00-17:00) counts as open.

use chrono::NaiveDate;

use crate::availability::AvailabilityRule;
use crate::ids::ProviderId;
use crate::time::{ClockTime, DayOfWeek, Interval};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityIndex {
    day: DayOfWeek,
    open: Vec<Interval>,
}

impl AvailabilityIndex {
    /// Builds the index from any set of rules, keeping only the active ones
    /// that belong to `provider_id` and fall on `day`.
    pub fn build<'a, I>(provider_id: &ProviderId, day: DayOfWeek, rules: I) -> Self
    where
        I: IntoIterator<Item = &'a AvailabilityRule>,
    {
        let mut windows: Vec<Interval> = rules
            .into_iter()
            .filter(|r| r.applies_to(provider_id, day))
            .map(|r| r.window())
            .collect();

        windows.sort_by_key(|w| (w.start(), w.end()));

        let mut merged: Vec<(ClockTime, ClockTime)> = Vec::with_capacity(windows.len());
        for window in windows {
            if let Some(last) = merged.last_mut() {
                if window.start() <= last.1 {
                    // Overlapping or adjacent: extend the current region.
                    last.1 = last.1.max(window.end());
                    continue;
                }
            }
            merged.push((window.start(), window.end()));
        }

        let open = merged
            .into_iter()
            .filter_map(|(start, end)| Interval::new(start, end).ok())
            .collect();

        Self { day, open }
    }

    pub fn day(&self) -> DayOfWeek {
        self.day
    }

    /// Disjoint open regions, sorted by start.
    pub fn open_regions(&self) -> &[Interval] {
        &self.open
    }

    /// An interval is open iff one merged region fully contains it.
    pub fn is_open(&self, interval: &Interval) -> bool {
        self.open.iter().any(|region| region.contains(interval))
    }

    /// Like [`is_open`](Self::is_open) but also checks that `date` falls on
    /// the weekday this index was built for.
    pub fn is_open_on(&self, date: NaiveDate, interval: &Interval) -> bool {
        DayOfWeek::of(date) == self.day && self.is_open(interval)
    }
}
