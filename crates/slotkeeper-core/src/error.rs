use thiserror::Error;

use crate::booking::BookingStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid time format: {0:?} (expected HH:MM)")]
    InvalidTimeFormat(String),
    #[error("interval start must be before its end")]
    InvalidInterval,
    #[error("duration runs past midnight")]
    DurationExceedsDay,
    #[error("duration must be at least one minute")]
    InvalidDuration,
    #[error("invalid weekday: {0} (expected 0-6, Sunday = 0)")]
    InvalidWeekday(u8),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("requested slot is outside the provider's availability")]
    SlotNotAvailable,
    #[error("requested slot overlaps an existing booking")]
    SlotAlreadyBooked,
    #[error("booking is {0} and accepts no further transitions")]
    BookingTerminal(BookingStatus),
    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("service does not belong to this provider")]
    ServiceProviderMismatch,
    #[error("service is not active")]
    ServiceInactive,
}
