use async_trait::async_trait;

use slotkeeper_core::ids::ServiceId;
use slotkeeper_core::service::Service;
use slotkeeper_ports::error::PortError;
use slotkeeper_ports::outbound::ServiceRepository;

use super::SqliteDb;

#[async_trait]
impl ServiceRepository for SqliteDb {
    async fn save(&self, service: &Service) -> Result<(), PortError> {
        let data =
            serde_json::to_string(service).map_err(|e| PortError::Persistence(e.to_string()))?;

        sqlx::query(
            "INSERT INTO services (id, provider_id, data) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data",
        )
        .bind(service.id().to_string())
        .bind(service.provider_id().to_string())
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ServiceId) -> Result<Option<Service>, PortError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT data FROM services WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        row.map(|(data,)| {
            serde_json::from_str(&data).map_err(|e| PortError::Persistence(e.to_string()))
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotkeeper_core::ids::ProviderId;

    #[tokio::test]
    async fn save_and_reload_service() {
        let db = SqliteDb::new("sqlite::memory:").await.unwrap();
        let mut svc = Service::new(ProviderId::new(), "Haircut".into(), 2500, 30).unwrap();
        db.save(&svc).await.unwrap();

        svc.set_duration(45).unwrap();
        db.save(&svc).await.unwrap();

        let found = db.find_by_id(svc.id()).await.unwrap().unwrap();
        assert_eq!(found.duration_minutes(), 45);
        assert_eq!(found.name(), "Haircut");
    }

    #[tokio::test]
    async fn unknown_service_is_none() {
        let db = SqliteDb::new("sqlite::memory:").await.unwrap();
        assert!(db.find_by_id(&ServiceId::new()).await.unwrap().is_none());
    }
}
