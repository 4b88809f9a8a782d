use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use slotkeeper_core::booking::BookingStatus;
use slotkeeper_core::ids::{ClientId, ProviderId, ServiceId};

/// Inbound request to reserve a slot. The start time is raw `HH:MM` text
/// as received from the boundary layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub client_id: ClientId,
    pub provider_id: ProviderId,
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub start_time: String,
    pub notes: Option<String>,
}

/// Filter criteria for querying bookings.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub provider_id: Option<ProviderId>,
    pub client_id: Option<ClientId>,
    pub status: Option<BookingStatus>,
    pub page: u32,
    pub per_page: u32,
}

/// Held lock on a `(provider, date)` key. Dropping it releases the lock.
pub struct SlotGuard {
    _inner: Box<dyn Send>,
}

impl SlotGuard {
    pub fn new<G: Send + 'static>(inner: G) -> Self {
        Self {
            _inner: Box::new(inner),
        }
    }
}

impl fmt::Debug for SlotGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotGuard").finish_non_exhaustive()
    }
}
