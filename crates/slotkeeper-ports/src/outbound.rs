use async_trait::async_trait;
use chrono::NaiveDate;

use slotkeeper_core::availability::AvailabilityRule;
use slotkeeper_core::booking::Booking;
use slotkeeper_core::events::DomainEvent;
use slotkeeper_core::ids::{BookingId, ProviderId, RuleId, ServiceId};
use slotkeeper_core::service::Service;
use slotkeeper_core::time::DayOfWeek;

use crate::error::PortError;
use crate::types::{BookingFilter, SlotGuard};

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn save(&self, rule: &AvailabilityRule) -> Result<(), PortError>;
    async fn find_by_id(&self, id: &RuleId) -> Result<Option<AvailabilityRule>, PortError>;
    /// Fails with [`PortError::NotFound`] if no such rule exists.
    async fn delete(&self, id: &RuleId) -> Result<(), PortError>;
    async fn list_for_provider(
        &self,
        provider_id: &ProviderId,
    ) -> Result<Vec<AvailabilityRule>, PortError>;
    async fn active_rules(
        &self,
        provider_id: &ProviderId,
        day: DayOfWeek,
    ) -> Result<Vec<AvailabilityRule>, PortError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn save(&self, service: &Service) -> Result<(), PortError>;
    async fn find_by_id(&self, id: &ServiceId) -> Result<Option<Service>, PortError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts a new booking; an existing id is an error.
    ///
    /// Must fail with [`PortError::SlotTaken`] instead of writing when the
    /// booking is active and overlaps another active booking for the same
    /// provider and date, checked atomically with the write. This holds even
    /// against writers in other processes.
    async fn create(&self, booking: &Booking) -> Result<(), PortError>;
    /// Updates a booking in place; fails with [`PortError::NotFound`] if absent
    /// and with [`PortError::SlotTaken`] under the same rule as `create`.
    async fn save(&self, booking: &Booking) -> Result<(), PortError>;
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, PortError>;
    /// Bookings for the provider on `date` whose status is active.
    async fn active_on_date(
        &self,
        provider_id: &ProviderId,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, PortError>;
    async fn find_by_filter(&self, filter: &BookingFilter) -> Result<Vec<Booking>, PortError>;
}

/// Serializes read-check-write sequences per `(provider, date)` among the
/// callers sharing one locker. Repositories still enforce the overlap rule
/// on write, so a locker scoped to one process is enough.
///
/// The returned guard holds the lock until dropped.
#[async_trait]
pub trait SlotLocker: Send + Sync {
    async fn lock(&self, provider_id: &ProviderId, date: NaiveDate)
        -> Result<SlotGuard, PortError>;
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), PortError>;
}
