//! In-memory record store
//!
//! Reference implementation of the gateway contract; the default
//! deployment and every test run on it.

use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

use cleanghana_core::{lifecycle, NewRecord, Record, RecordId, RecordStatus};

use super::{RecordFilter, RecordStore, StoreResult, Subscription, SNAPSHOT_CHANNEL_CAPACITY};
use crate::error::PortalError;

pub struct InMemoryRecordStore {
    records: RwLock<Vec<Record>>,
    tx: broadcast::Sender<Arc<Vec<Record>>>,
    last_created_at: Mutex<DateTime<Utc>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            records: RwLock::new(Vec::new()),
            tx,
            last_created_at: Mutex::new(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// Server-assigned creation timestamp, strictly monotonic per store
    /// so the `createdAt` sort key totally orders records
    fn next_created_at(&self) -> DateTime<Utc> {
        let mut last = self.last_created_at.lock().unwrap();
        let mut now = Utc::now();
        if now <= *last {
            now = *last + Duration::microseconds(1);
        }
        *last = now;
        now
    }

    /// Broadcast the full current collection to all subscribers
    fn publish(&self) {
        let snapshot = Arc::new(self.records.read().unwrap().clone());
        // No receivers is fine; nobody is subscribed yet
        let _ = self.tx.send(snapshot);
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create(&self, new_record: NewRecord) -> StoreResult<Record> {
        new_record.validate()?;

        let location = new_record
            .location
            .ok_or(PortalError::Validation("location is required".to_string()))?;

        let record = Record {
            id: RecordId(Uuid::new_v4().to_string()),
            status: lifecycle::initial_status(new_record.details.record_type()),
            details: new_record.details,
            location,
            reporter_id: new_record.reporter_id,
            created_at: self.next_created_at(),
        };

        self.records.write().unwrap().push(record.clone());
        self.publish();
        Ok(record)
    }

    fn get(&self, id: &RecordId) -> StoreResult<Option<Record>> {
        Ok(self
            .records
            .read()
            .unwrap()
            .iter()
            .find(|record| &record.id == id)
            .cloned())
    }

    fn update_status(&self, id: &RecordId, status: RecordStatus) -> StoreResult<Record> {
        let updated = {
            let mut records = self.records.write().unwrap();
            let record = records
                .iter_mut()
                .find(|record| &record.id == id)
                .ok_or(PortalError::RecordNotFound)?;
            record.status = status;
            record.clone()
        };
        self.publish();
        Ok(updated)
    }

    fn list(&self, filter: &RecordFilter) -> StoreResult<Vec<Record>> {
        Ok(filter.apply(&self.records.read().unwrap()))
    }

    fn subscribe(&self, filter: RecordFilter) -> Subscription {
        let rx = self.tx.subscribe();
        let initial = filter.apply(&self.records.read().unwrap());
        Subscription::new(filter, initial, rx)
    }
}
