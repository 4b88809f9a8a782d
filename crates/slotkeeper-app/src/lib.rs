pub mod availability_service;
pub mod catalog_service;
pub mod error;
pub mod scheduling_service;

pub use availability_service::AvailabilityService;
pub use catalog_service::CatalogService;
pub use error::AppError;
pub use scheduling_service::SchedulingService;
