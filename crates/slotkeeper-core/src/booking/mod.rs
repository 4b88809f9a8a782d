//! The booking aggregate and its lifecycle.
//!
//! | from                           | event      | to          |
//! |--------------------------------|------------|-------------|
//! | -                              | create     | pending     |
//! | pending, rescheduled           | confirm    | confirmed   |
//! | pending, confirmed, rescheduled| reschedule | rescheduled |
//! | pending, confirmed, rescheduled| cancel     | cancelled   |
//! | pending, confirmed, rescheduled| complete   | completed   |
//!
//! Cancelled and completed bookings reject every transition with
//! [`DomainError::BookingTerminal`]. Create and reschedule take the
//! provider's availability for the target weekday and the bookings already
//! on the target date, and refuse the slot unless it is open and free.

pub mod conflict;
pub mod status;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::AvailabilityIndex;
use crate::error::DomainError;
use crate::events::{
    BookingCancelled, BookingCompleted, BookingConfirmed, BookingCreated, BookingRescheduled,
    DomainEvent,
};
use crate::ids::{BookingId, ClientId, ProviderId, ServiceId};
use crate::service::Service;
use crate::time::{ClockTime, Interval};

pub use conflict::{find_conflict, has_conflict};
pub use status::BookingStatus;

/// Client-supplied part of a new booking.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub client_id: ClientId,
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    client_id: ClientId,
    provider_id: ProviderId,
    service_id: ServiceId,
    date: NaiveDate,
    slot: Interval,
    status: BookingStatus,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn create(
        draft: BookingDraft,
        service: &Service,
        availability: &AvailabilityIndex,
        existing: &[Booking],
        now: DateTime<Utc>,
    ) -> Result<(Self, Vec<DomainEvent>), DomainError> {
        if service.provider_id() != &draft.provider_id {
            return Err(DomainError::ServiceProviderMismatch);
        }
        if !service.is_active() {
            return Err(DomainError::ServiceInactive);
        }

        let slot = service.slot_at(draft.start)?;
        check_slot(
            availability,
            existing,
            &draft.provider_id,
            draft.date,
            &slot,
            None,
        )?;

        let id = BookingId::new();
        let booking = Self {
            id: id.clone(),
            client_id: draft.client_id.clone(),
            provider_id: draft.provider_id.clone(),
            service_id: service.id().clone(),
            date: draft.date,
            slot,
            status: BookingStatus::Pending,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        let events = vec![DomainEvent::BookingCreated(BookingCreated {
            booking_id: id,
            provider_id: draft.provider_id,
            client_id: draft.client_id,
            date: draft.date,
            slot,
            occurred_at: now,
        })];
        Ok((booking, events))
    }

    pub fn confirm(&mut self, now: DateTime<Utc>) -> Result<Vec<DomainEvent>, DomainError> {
        self.ensure_not_terminal()?;
        if self.status == BookingStatus::Confirmed {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: BookingStatus::Confirmed,
            });
        }
        self.status = BookingStatus::Confirmed;
        self.updated_at = now;
        Ok(vec![DomainEvent::BookingConfirmed(BookingConfirmed {
            booking_id: self.id.clone(),
            occurred_at: now,
        })])
    }

    /// Moves the booking to a new date and start time, keeping the duration
    /// it was booked with. The booking's own current slot never blocks the
    /// move, so rescheduling onto the same slot succeeds.
    ///
    /// On error the booking is left untouched.
    pub fn reschedule(
        &mut self,
        date: NaiveDate,
        start: ClockTime,
        availability: &AvailabilityIndex,
        existing: &[Booking],
        now: DateTime<Utc>,
    ) -> Result<Vec<DomainEvent>, DomainError> {
        self.ensure_not_terminal()?;

        let slot = Interval::starting_at(start, self.slot.duration_minutes())?;
        check_slot(
            availability,
            existing,
            &self.provider_id,
            date,
            &slot,
            Some(&self.id),
        )?;

        let previous_date = self.date;
        let previous_slot = self.slot;
        self.date = date;
        self.slot = slot;
        self.status = BookingStatus::Rescheduled;
        self.updated_at = now;

        Ok(vec![DomainEvent::BookingRescheduled(BookingRescheduled {
            booking_id: self.id.clone(),
            provider_id: self.provider_id.clone(),
            previous_date,
            previous_slot,
            date,
            slot,
            occurred_at: now,
        })])
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<Vec<DomainEvent>, DomainError> {
        self.ensure_not_terminal()?;
        let previous_status = self.status;
        self.status = BookingStatus::Cancelled;
        self.updated_at = now;
        Ok(vec![DomainEvent::BookingCancelled(BookingCancelled {
            booking_id: self.id.clone(),
            provider_id: self.provider_id.clone(),
            previous_status,
            occurred_at: now,
        })])
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<Vec<DomainEvent>, DomainError> {
        self.ensure_not_terminal()?;
        self.status = BookingStatus::Completed;
        self.updated_at = now;
        Ok(vec![DomainEvent::BookingCompleted(BookingCompleted {
            booking_id: self.id.clone(),
            occurred_at: now,
        })])
    }

    fn ensure_not_terminal(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::BookingTerminal(self.status));
        }
        Ok(())
    }

    pub fn id(&self) -> &BookingId {
        &self.id
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn slot(&self) -> Interval {
        self.slot
    }

    pub fn start(&self) -> ClockTime {
        self.slot.start()
    }

    pub fn end(&self) -> ClockTime {
        self.slot.end()
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Availability first, then conflicts: a slot outside opening hours is
/// reported as unavailable even if it also overlaps a booking.
fn check_slot(
    availability: &AvailabilityIndex,
    existing: &[Booking],
    provider_id: &ProviderId,
    date: NaiveDate,
    slot: &Interval,
    exclude: Option<&BookingId>,
) -> Result<(), DomainError> {
    if !availability.is_open_on(date, slot) {
        return Err(DomainError::SlotNotAvailable);
    }
    if has_conflict(existing, provider_id, date, slot, exclude) {
        return Err(DomainError::SlotAlreadyBooked);
    }
    Ok(())
}
