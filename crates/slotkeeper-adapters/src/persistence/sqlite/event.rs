use async_trait::async_trait;

use slotkeeper_core::events::DomainEvent;
use slotkeeper_ports::error::PortError;
use slotkeeper_ports::outbound::EventPublisher;

use super::SqliteDb;

#[async_trait]
impl EventPublisher for SqliteDb {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), PortError> {
        for event in &events {
            let data =
                serde_json::to_string(event).map_err(|e| PortError::Persistence(e.to_string()))?;

            sqlx::query(
                "INSERT INTO events (event_type, booking_id, data, occurred_at) VALUES (?, ?, ?, ?)",
            )
            .bind(event.event_type())
            .bind(event.booking_id().to_string())
            .bind(&data)
            .bind(event.occurred_at().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;
        }
        Ok(())
    }
}
