//! Double-booking detection for a single provider and civil date.

use chrono::NaiveDate;

use crate::booking::Booking;
use crate::ids::{BookingId, ProviderId};
use crate::time::Interval;

/// Returns the first active booking for `provider_id` on `date` whose slot
/// overlaps `slot`, skipping `exclude` (the booking being moved, if any).
///
/// Cancelled and completed bookings never conflict. Bookings for other
/// providers or dates in `bookings` are ignored, so callers may pass a
/// wider set than strictly needed.
pub fn find_conflict<'a>(
    bookings: &'a [Booking],
    provider_id: &ProviderId,
    date: NaiveDate,
    slot: &Interval,
    exclude: Option<&BookingId>,
) -> Option<&'a Booking> {
    bookings.iter().find(|b| {
        b.status().is_active()
            && b.date() == date
            && b.provider_id() == provider_id
            && exclude.map_or(true, |id| b.id() != id)
            && b.slot().overlaps(slot)
    })
}

pub fn has_conflict(
    bookings: &[Booking],
    provider_id: &ProviderId,
    date: NaiveDate,
    slot: &Interval,
    exclude: Option<&BookingId>,
) -> bool {
    find_conflict(bookings, provider_id, date, slot, exclude).is_some()
}
