use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ProviderId, ServiceId};
use crate::time::{ClockTime, Interval, MINUTES_PER_DAY};

/// A bookable offering published by a provider.
///
/// The duration is read once when a booking is created; later edits do not
/// touch the end times already stored on existing bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    id: ServiceId,
    provider_id: ProviderId,
    name: String,
    price_cents: u64,
    duration_minutes: u32,
    active: bool,
}

impl Service {
    pub fn new(
        provider_id: ProviderId,
        name: String,
        price_cents: u64,
        duration_minutes: u32,
    ) -> Result<Self, DomainError> {
        validate_duration(duration_minutes)?;
        Ok(Self {
            id: ServiceId::new(),
            provider_id,
            name,
            price_cents,
            duration_minutes,
            active: true,
        })
    }

    /// The slot a booking starting at `start` would occupy.
    pub fn slot_at(&self, start: ClockTime) -> Result<Interval, DomainError> {
        Interval::starting_at(start, self.duration_minutes)
    }

    pub fn set_duration(&mut self, duration_minutes: u32) -> Result<(), DomainError> {
        validate_duration(duration_minutes)?;
        self.duration_minutes = duration_minutes;
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn id(&self) -> &ServiceId {
        &self.id
    }

    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

fn validate_duration(minutes: u32) -> Result<(), DomainError> {
    if minutes == 0 {
        return Err(DomainError::InvalidDuration);
    }
    if minutes > u32::from(MINUTES_PER_DAY) {
        return Err(DomainError::DurationExceedsDay);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_rejected() {
        let result = Service::new(ProviderId::new(), "Haircut".into(), 2500, 0);
        assert_eq!(result, Err(DomainError::InvalidDuration));
    }

    #[test]
    fn slot_at_uses_duration() {
        let svc = Service::new(ProviderId::new(), "Haircut".into(), 2500, 45).unwrap();
        let slot = svc.slot_at(ClockTime::parse("10:00").unwrap()).unwrap();
        assert_eq!(slot.end().to_string(), "10:45");
    }

    #[test]
    fn slot_at_late_evening_exceeds_day() {
        let svc = Service::new(ProviderId::new(), "Massage".into(), 9000, 90).unwrap();
        let result = svc.slot_at(ClockTime::parse("23:00").unwrap());
        assert_eq!(result, Err(DomainError::DurationExceedsDay));
    }

    #[test]
    fn duration_longer_than_a_day_is_rejected() {
        let result = Service::new(ProviderId::new(), "Retreat".into(), 0, u32::MAX);
        assert_eq!(result, Err(DomainError::DurationExceedsDay));

        let mut svc = Service::new(ProviderId::new(), "Day pass".into(), 0, 1440).unwrap();
        assert_eq!(svc.set_duration(1441), Err(DomainError::DurationExceedsDay));
        assert_eq!(svc.duration_minutes(), 1440);
    }
}
