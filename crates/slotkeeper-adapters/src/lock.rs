//! Process-local implementation of [`SlotLocker`].
//!
//! One async mutex per `(provider, date)` key. Entries that nobody holds
//! or waits on are pruned whenever a new lock is requested, so the map only
//! grows with the number of keys in flight.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use slotkeeper_core::ids::ProviderId;
use slotkeeper_ports::error::PortError;
use slotkeeper_ports::outbound::SlotLocker;
use slotkeeper_ports::types::SlotGuard;

type SlotKey = (ProviderId, NaiveDate);

#[derive(Default)]
pub struct InMemorySlotLocker {
    slots: Mutex<HashMap<SlotKey, Arc<AsyncMutex<()>>>>,
}

impl InMemorySlotLocker {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: SlotKey) -> Result<Arc<AsyncMutex<()>>, PortError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| PortError::LockUnavailable(e.to_string()))?;
        slots.retain(|k, m| *k == key || Arc::strong_count(m) > 1);
        Ok(slots.entry(key).or_default().clone())
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.slots.lock().unwrap().len()
    }
}

#[async_trait]
impl SlotLocker for InMemorySlotLocker {
    async fn lock(
        &self,
        provider_id: &ProviderId,
        date: NaiveDate,
    ) -> Result<SlotGuard, PortError> {
        let mutex = self.entry((provider_id.clone(), date))?;
        let guard = mutex.lock_owned().await;
        debug!(provider_id = %provider_id, %date, "slot lock acquired");
        Ok(SlotGuard::new(guard))
    }
}
