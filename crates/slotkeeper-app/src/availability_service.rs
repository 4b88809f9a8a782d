use chrono::NaiveDate;
use tracing::info;

use slotkeeper_core::availability::{AvailabilityIndex, AvailabilityRule};
use slotkeeper_core::ids::{ProviderId, RuleId};
use slotkeeper_core::time::{ClockTime, DayOfWeek, Interval};
use slotkeeper_ports::error::PortError;
use slotkeeper_ports::outbound::AvailabilityRepository;

use crate::error::AppError;

pub struct AvailabilityService<A>
where
    A: AvailabilityRepository,
{
    rules: A,
}

impl<A> AvailabilityService<A>
where
    A: AvailabilityRepository,
{
    pub fn new(rules: A) -> Self {
        Self { rules }
    }

    /// Publish a new weekly window. Overlapping an existing rule is allowed;
    /// overlaps are merged when availability is evaluated.
    pub async fn add_rule(
        &self,
        provider_id: &ProviderId,
        weekday: u8,
        start: &str,
        end: &str,
    ) -> Result<AvailabilityRule, AppError> {
        let day = DayOfWeek::from_index(weekday)?;
        let window = Interval::parse(start, end)?;

        let rule = AvailabilityRule::new(provider_id.clone(), day, window);
        self.rules.save(&rule).await?;
        info!(rule_id = %rule.id(), provider_id = %provider_id, day = %day, window = %window, "availability rule added");
        Ok(rule)
    }

    pub async fn update_rule(
        &self,
        rule_id: &str,
        weekday: u8,
        start: &str,
        end: &str,
        active: bool,
    ) -> Result<AvailabilityRule, AppError> {
        let id = RuleId::parse(rule_id)?;
        let day = DayOfWeek::from_index(weekday)?;
        let window = Interval::parse(start, end)?;

        let mut rule = self
            .rules
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::RuleNotFound(rule_id.to_string()))?;
        rule.reschedule(day, window);
        rule.set_active(active);

        self.rules.save(&rule).await?;
        info!(rule_id = %id, day = %day, window = %window, active, "availability rule updated");
        Ok(rule)
    }

    pub async fn remove_rule(&self, rule_id: &str) -> Result<(), AppError> {
        let id = RuleId::parse(rule_id)?;
        match self.rules.delete(&id).await {
            Ok(()) => {
                info!(rule_id = %id, "availability rule removed");
                Ok(())
            }
            Err(PortError::NotFound) => Err(AppError::RuleNotFound(rule_id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_rules(
        &self,
        provider_id: &ProviderId,
    ) -> Result<Vec<AvailabilityRule>, AppError> {
        Ok(self.rules.list_for_provider(provider_id).await?)
    }

    /// Whether `interval` lies entirely inside the provider's open hours on
    /// `day`. A weekday without active rules is never open.
    pub async fn is_open(
        &self,
        provider_id: &ProviderId,
        day: DayOfWeek,
        interval: &Interval,
    ) -> Result<bool, AppError> {
        let rules = self.rules.active_rules(provider_id, day).await?;
        Ok(AvailabilityIndex::build(provider_id, day, &rules).is_open(interval))
    }

    pub async fn is_open_at(
        &self,
        provider_id: &ProviderId,
        date: NaiveDate,
        start: &str,
        duration_minutes: u32,
    ) -> Result<bool, AppError> {
        let slot = Interval::starting_at(ClockTime::parse(start)?, duration_minutes)?;
        self.is_open(provider_id, DayOfWeek::of(date), &slot).await
    }
}
