use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use slotkeeper_core::availability::AvailabilityIndex;
use slotkeeper_core::booking::{has_conflict, Booking, BookingDraft};
use slotkeeper_core::error::DomainError;
use slotkeeper_core::events::DomainEvent;
use slotkeeper_core::ids::{BookingId, ProviderId, ServiceId};
use slotkeeper_core::service::Service;
use slotkeeper_core::time::{ClockTime, DayOfWeek, Interval};
use slotkeeper_ports::error::PortError;
use slotkeeper_ports::outbound::{
    AvailabilityRepository, BookingRepository, EventPublisher, ServiceRepository, SlotLocker,
};
use slotkeeper_ports::types::{BookingFilter, CreateBookingRequest, SlotGuard};

use crate::error::AppError;

/// Create, cancel and reschedule bookings against injected storage.
///
/// Every operation that checks a slot and then writes runs while holding the
/// `(provider, date)` lock for each date it touches, so two concurrent
/// requests can never both pass the conflict check for the same slot.
pub struct SchedulingService<A, S, B, L, EP>
where
    A: AvailabilityRepository,
    S: ServiceRepository,
    B: BookingRepository,
    L: SlotLocker,
    EP: EventPublisher,
{
    availability: A,
    services: S,
    bookings: B,
    locks: L,
    events: EP,
}

impl<A, S, B, L, EP> SchedulingService<A, S, B, L, EP>
where
    A: AvailabilityRepository,
    S: ServiceRepository,
    B: BookingRepository,
    L: SlotLocker,
    EP: EventPublisher,
{
    pub fn new(availability: A, services: S, bookings: B, locks: L, events: EP) -> Self {
        Self {
            availability,
            services,
            bookings,
            locks,
            events,
        }
    }

    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        let start = ClockTime::parse(&request.start_time)?;
        let service = self.load_service(&request.service_id).await?;

        let guard = self.locks.lock(&request.provider_id, request.date).await?;

        let index = self
            .availability_index(&request.provider_id, request.date)
            .await?;
        let existing = self
            .bookings
            .active_on_date(&request.provider_id, request.date)
            .await?;

        let draft = BookingDraft {
            client_id: request.client_id,
            provider_id: request.provider_id.clone(),
            date: request.date,
            start,
            notes: request.notes,
        };
        let (booking, events) = Booking::create(draft, &service, &index, &existing, now)
            .map_err(|e| {
                warn!(
                    provider_id = %request.provider_id,
                    date = %request.date,
                    start = %start,
                    error = %e,
                    "booking rejected"
                );
                e
            })?;

        self.bookings.create(&booking).await.map_err(write_error)?;
        drop(guard);

        self.publish(events).await;
        info!(
            booking_id = %booking.id(),
            provider_id = %booking.provider_id(),
            date = %booking.date(),
            slot = %booking.slot(),
            "booking created"
        );
        Ok(booking)
    }

    pub async fn cancel_booking(
        &self,
        booking_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        self.transition(booking_id, now, "cancelled", Booking::cancel)
            .await
    }

    pub async fn confirm_booking(
        &self,
        booking_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        self.transition(booking_id, now, "confirmed", Booking::confirm)
            .await
    }

    /// Marks a booking as done. Normally driven by a clock rather than a user.
    pub async fn complete_booking(
        &self,
        booking_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        self.transition(booking_id, now, "completed", Booking::complete)
            .await
    }

    /// Moves a booking to `date` at `start_time`, keeping its duration.
    ///
    /// The previous slot is overwritten; the `booking.rescheduled` event is
    /// the only record of where it used to be.
    pub async fn reschedule_booking(
        &self,
        booking_id: &str,
        date: NaiveDate,
        start_time: &str,
        now: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        let id = BookingId::parse(booking_id)?;
        let start = ClockTime::parse(start_time)?;

        let (mut booking, guards) = self.lock_for_move(&id, date).await?;

        let index = self
            .availability_index(booking.provider_id(), date)
            .await?;
        let existing = self
            .bookings
            .active_on_date(booking.provider_id(), date)
            .await?;

        let events = booking
            .reschedule(date, start, &index, &existing, now)
            .map_err(|e| {
                warn!(
                    booking_id = %id,
                    date = %date,
                    start = %start,
                    error = %e,
                    "reschedule rejected"
                );
                e
            })?;

        self.bookings.save(&booking).await.map_err(write_error)?;
        drop(guards);

        self.publish(events).await;
        info!(
            booking_id = %booking.id(),
            date = %booking.date(),
            slot = %booking.slot(),
            "booking rescheduled"
        );
        Ok(booking)
    }

    pub async fn get_booking(&self, booking_id: &str) -> Result<Booking, AppError> {
        let id = BookingId::parse(booking_id)?;
        self.load_booking(&id).await
    }

    pub async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        Ok(self.bookings.find_by_filter(filter).await?)
    }

    /// Every start time on `date`, stepping by `step_minutes` from the start
    /// of each open region, at which `service` could be booked right now.
    pub async fn open_slots(
        &self,
        provider_id: &ProviderId,
        service_id: &ServiceId,
        date: NaiveDate,
        step_minutes: u32,
    ) -> Result<Vec<Interval>, AppError> {
        if step_minutes == 0 {
            return Err(DomainError::InvalidDuration.into());
        }
        let service = self.load_service(service_id).await?;
        if service.provider_id() != provider_id {
            return Err(DomainError::ServiceProviderMismatch.into());
        }

        let index = self.availability_index(provider_id, date).await?;
        let existing = self.bookings.active_on_date(provider_id, date).await?;

        let mut slots = Vec::new();
        for region in index.open_regions() {
            let mut minute = u32::from(region.start().minutes());
            loop {
                let Ok(start) = ClockTime::from_minutes(minute) else {
                    break;
                };
                let Ok(slot) = service.slot_at(start) else {
                    break;
                };
                if !region.contains(&slot) {
                    break;
                }
                if !has_conflict(&existing, provider_id, date, &slot, None) {
                    slots.push(slot);
                }
                match minute.checked_add(step_minutes) {
                    Some(next) => minute = next,
                    None => break,
                }
            }
        }
        Ok(slots)
    }

    async fn transition<F>(
        &self,
        booking_id: &str,
        now: DateTime<Utc>,
        outcome: &'static str,
        apply: F,
    ) -> Result<Booking, AppError>
    where
        F: FnOnce(&mut Booking, DateTime<Utc>) -> Result<Vec<DomainEvent>, DomainError> + Send,
    {
        let id = BookingId::parse(booking_id)?;
        let (mut booking, guard) = self.lock_booking(&id).await?;

        let events = apply(&mut booking, now).map_err(|e| {
            warn!(booking_id = %id, status = %booking.status(), error = %e, "transition rejected");
            e
        })?;

        self.bookings.save(&booking).await.map_err(write_error)?;
        drop(guard);

        self.publish(events).await;
        info!(booking_id = %id, "booking {}", outcome);
        Ok(booking)
    }

    /// Loads a booking while holding the lock for its current date.
    async fn lock_booking(&self, id: &BookingId) -> Result<(Booking, SlotGuard), AppError> {
        loop {
            let seen = self.load_booking(id).await?;
            let guard = self.locks.lock(seen.provider_id(), seen.date()).await?;
            let booking = self.load_booking(id).await?;
            if booking.date() == seen.date() {
                return Ok((booking, guard));
            }
            debug!(booking_id = %id, "booking moved while waiting for lock, retrying");
        }
    }

    /// Loads a booking while holding the locks for both its current date and
    /// `target`. Locks are taken in date order.
    async fn lock_for_move(
        &self,
        id: &BookingId,
        target: NaiveDate,
    ) -> Result<(Booking, Vec<SlotGuard>), AppError> {
        loop {
            let seen = self.load_booking(id).await?;
            let mut dates = vec![seen.date(), target];
            dates.sort();
            dates.dedup();

            let mut guards = Vec::with_capacity(dates.len());
            for date in dates {
                guards.push(self.locks.lock(seen.provider_id(), date).await?);
            }

            let booking = self.load_booking(id).await?;
            if booking.date() == seen.date() {
                return Ok((booking, guards));
            }
            debug!(booking_id = %id, "booking moved while waiting for lock, retrying");
        }
    }

    /// The transition is already stored, so a failed publish must not turn
    /// into an error the caller would retry.
    async fn publish(&self, events: Vec<DomainEvent>) {
        let count = events.len();
        if let Err(e) = self.events.publish(events).await {
            warn!(error = %e, count, "failed to publish booking events");
        }
    }

    async fn availability_index(
        &self,
        provider_id: &ProviderId,
        date: NaiveDate,
    ) -> Result<AvailabilityIndex, AppError> {
        let day = DayOfWeek::of(date);
        let rules = self.availability.active_rules(provider_id, day).await?;
        Ok(AvailabilityIndex::build(provider_id, day, &rules))
    }

    async fn load_booking(&self, id: &BookingId) -> Result<Booking, AppError> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(id.to_string()))
    }

    async fn load_service(&self, id: &ServiceId) -> Result<Service, AppError> {
        self.services
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ServiceNotFound(id.to_string()))
    }
}

/// A write refused by the store's own overlap check is the same business
/// rejection as one caught by the scan under the lock.
fn write_error(e: PortError) -> AppError {
    match e {
        PortError::SlotTaken => DomainError::SlotAlreadyBooked.into(),
        other => other.into(),
    }
}
