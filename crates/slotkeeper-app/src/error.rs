use slotkeeper_core::error::DomainError;
use slotkeeper_ports::error::PortError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("storage error: {0}")]
    Port(#[from] PortError),
    #[error("booking not found: {0}")]
    BookingNotFound(String),
    #[error("service not found: {0}")]
    ServiceNotFound(String),
    #[error("availability rule not found: {0}")]
    RuleNotFound(String),
}

impl AppError {
    /// Only storage failures may succeed on a retry with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Port(
                PortError::Persistence(_) | PortError::Connection(_) | PortError::LockUnavailable(_)
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rejections_are_not_retryable() {
        assert!(!AppError::from(DomainError::SlotAlreadyBooked).is_retryable());
        assert!(!AppError::from(DomainError::SlotNotAvailable).is_retryable());
        assert!(!AppError::BookingNotFound("x".into()).is_retryable());
        assert!(!AppError::from(PortError::NotFound).is_retryable());
    }

    #[test]
    fn storage_failures_are_retryable() {
        assert!(AppError::from(PortError::Persistence("disk full".into())).is_retryable());
        assert!(AppError::from(PortError::LockUnavailable("busy".into())).is_retryable());
    }
}
