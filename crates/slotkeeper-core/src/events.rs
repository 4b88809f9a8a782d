use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::booking::BookingStatus;
use crate::ids::{BookingId, ClientId, ProviderId};
use crate::time::Interval;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DomainEvent {
    BookingCreated(BookingCreated),
    BookingConfirmed(BookingConfirmed),
    BookingRescheduled(BookingRescheduled),
    BookingCancelled(BookingCancelled),
    BookingCompleted(BookingCompleted),
}

impl DomainEvent {
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::BookingCreated(e) => e.occurred_at,
            Self::BookingConfirmed(e) => e.occurred_at,
            Self::BookingRescheduled(e) => e.occurred_at,
            Self::BookingCancelled(e) => e.occurred_at,
            Self::BookingCompleted(e) => e.occurred_at,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BookingCreated(_) => "booking.created",
            Self::BookingConfirmed(_) => "booking.confirmed",
            Self::BookingRescheduled(_) => "booking.rescheduled",
            Self::BookingCancelled(_) => "booking.cancelled",
            Self::BookingCompleted(_) => "booking.completed",
        }
    }

    pub fn booking_id(&self) -> &BookingId {
        match self {
            Self::BookingCreated(e) => &e.booking_id,
            Self::BookingConfirmed(e) => &e.booking_id,
            Self::BookingRescheduled(e) => &e.booking_id,
            Self::BookingCancelled(e) => &e.booking_id,
            Self::BookingCompleted(e) => &e.booking_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingCreated {
    pub booking_id: BookingId,
    pub provider_id: ProviderId,
    pub client_id: ClientId,
    pub date: NaiveDate,
    pub slot: Interval,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingConfirmed {
    pub booking_id: BookingId,
    pub occurred_at: DateTime<Utc>,
}

/// Carries the slot being vacated; the aggregate itself keeps only the new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRescheduled {
    pub booking_id: BookingId,
    pub provider_id: ProviderId,
    pub previous_date: NaiveDate,
    pub previous_slot: Interval,
    pub date: NaiveDate,
    pub slot: Interval,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingCancelled {
    pub booking_id: BookingId,
    pub provider_id: ProviderId,
    pub previous_status: BookingStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingCompleted {
    pub booking_id: BookingId,
    pub occurred_at: DateTime<Utc>,
}
