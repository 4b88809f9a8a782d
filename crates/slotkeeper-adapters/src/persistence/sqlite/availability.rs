use async_trait::async_trait;

use slotkeeper_core::availability::AvailabilityRule;
use slotkeeper_core::ids::{ProviderId, RuleId};
use slotkeeper_core::time::DayOfWeek;
use slotkeeper_ports::error::PortError;
use slotkeeper_ports::outbound::AvailabilityRepository;

use super::SqliteDb;

fn decode(rows: Vec<(String,)>) -> Result<Vec<AvailabilityRule>, PortError> {
    rows.into_iter()
        .map(|(data,)| {
            serde_json::from_str(&data).map_err(|e| PortError::Persistence(e.to_string()))
        })
        .collect()
}

#[async_trait]
impl AvailabilityRepository for SqliteDb {
    async fn save(&self, rule: &AvailabilityRule) -> Result<(), PortError> {
        let data =
            serde_json::to_string(rule).map_err(|e| PortError::Persistence(e.to_string()))?;

        sqlx::query(
            "INSERT INTO availability_rules (id, provider_id, weekday, active, data)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                weekday = excluded.weekday,
                active = excluded.active,
                data = excluded.data",
        )
        .bind(rule.id().to_string())
        .bind(rule.provider_id().to_string())
        .bind(i64::from(rule.day().index()))
        .bind(rule.is_active())
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &RuleId) -> Result<Option<AvailabilityRule>, PortError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT data FROM availability_rules WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;

        match row {
            Some((data,)) => {
                let rule: AvailabilityRule = serde_json::from_str(&data)
                    .map_err(|e| PortError::Persistence(e.to_string()))?;
                Ok(Some(rule))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &RuleId) -> Result<(), PortError> {
        let result = sqlx::query("DELETE FROM availability_rules WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound);
        }
        Ok(())
    }

    async fn list_for_provider(
        &self,
        provider_id: &ProviderId,
    ) -> Result<Vec<AvailabilityRule>, PortError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT data FROM availability_rules WHERE provider_id = ? ORDER BY weekday",
        )
        .bind(provider_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        decode(rows)
    }

    async fn active_rules(
        &self,
        provider_id: &ProviderId,
        day: DayOfWeek,
    ) -> Result<Vec<AvailabilityRule>, PortError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT data FROM availability_rules
             WHERE provider_id = ? AND weekday = ? AND active = 1",
        )
        .bind(provider_id.to_string())
        .bind(i64::from(day.index()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        decode(rows)
    }
}
