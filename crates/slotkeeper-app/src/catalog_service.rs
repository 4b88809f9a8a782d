use tracing::info;

use slotkeeper_core::ids::{ProviderId, ServiceId};
use slotkeeper_core::service::Service;
use slotkeeper_ports::outbound::ServiceRepository;

use crate::error::AppError;

/// Registers and edits the services providers offer.
pub struct CatalogService<S>
where
    S: ServiceRepository,
{
    services: S,
}

impl<S> CatalogService<S>
where
    S: ServiceRepository,
{
    pub fn new(services: S) -> Self {
        Self { services }
    }

    pub async fn add_service(
        &self,
        provider_id: &ProviderId,
        name: &str,
        price_cents: u64,
        duration_minutes: u32,
    ) -> Result<Service, AppError> {
        let service = Service::new(
            provider_id.clone(),
            name.to_string(),
            price_cents,
            duration_minutes,
        )?;
        self.services.save(&service).await?;
        info!(service_id = %service.id(), provider_id = %provider_id, duration_minutes, "service added");
        Ok(service)
    }

    pub async fn get_service(&self, service_id: &str) -> Result<Service, AppError> {
        let id = ServiceId::parse(service_id)?;
        self.services
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::ServiceNotFound(service_id.to_string()))
    }

    /// Changes only affect bookings made afterwards; stored bookings keep
    /// the end time computed when they were placed.
    pub async fn update_service(
        &self,
        service_id: &str,
        duration_minutes: Option<u32>,
        active: Option<bool>,
    ) -> Result<Service, AppError> {
        let mut service = self.get_service(service_id).await?;
        if let Some(minutes) = duration_minutes {
            service.set_duration(minutes)?;
        }
        if let Some(active) = active {
            service.set_active(active);
        }
        self.services.save(&service).await?;
        info!(
            service_id = %service.id(),
            duration_minutes = service.duration_minutes(),
            active = service.is_active(),
            "service updated"
        );
        Ok(service)
    }
}
