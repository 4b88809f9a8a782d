use serde::{Deserialize, Serialize};

use crate::ids::{ProviderId, RuleId};
use crate::time::{DayOfWeek, Interval};

/// A recurring weekly window during which a provider accepts bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    id: RuleId,
    provider_id: ProviderId,
    day: DayOfWeek,
    window: Interval,
    active: bool,
}

impl AvailabilityRule {
    pub fn new(provider_id: ProviderId, day: DayOfWeek, window: Interval) -> Self {
        Self {
            id: RuleId::new(),
            provider_id,
            day,
            window,
            active: true,
        }
    }

    pub fn reschedule(&mut self, day: DayOfWeek, window: Interval) {
        self.day = day;
        self.window = window;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn id(&self) -> &RuleId {
        &self.id
    }

    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    pub fn day(&self) -> DayOfWeek {
        self.day
    }

    pub fn window(&self) -> Interval {
        self.window
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn applies_to(&self, provider_id: &ProviderId, day: DayOfWeek) -> bool {
        self.active && self.day == day && &self.provider_id == provider_id
    }
}
