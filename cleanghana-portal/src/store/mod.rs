//! Record store gateway
//!
//! The sole interface to the shared record collection: create,
//! live-subscribe and partial status update. Two implementations share
//! the contract: [`InMemoryRecordStore`] (reference, default deployment)
//! and [`SqliteRecordStore`] (persistence adapter).
//!
//! Subscriptions deliver the full current result set on every committed
//! change, not a diff stream. Delivery is at-least-once: a slow consumer
//! may skip an intermediate snapshot but always ends up on a newer full
//! one. Dropping the [`Subscription`] handle is cancellation.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;

use std::sync::Arc;

use tokio::sync::broadcast;

use cleanghana_core::{NewRecord, Record, RecordId, RecordStatus, RecordType};

use crate::error::PortalError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, PortalError>;

/// Buffered full-collection snapshots per subscriber; lagging past this
/// skips to a newer snapshot, which the contract allows
pub(crate) const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

/// Query predicate for one-shot reads and subscriptions
///
/// The SQLite store pushes the type filter into its `WHERE` clause for
/// one-shot queries; broadcast snapshots are collection-wide and filtered
/// on the subscriber side, the documented fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub record_type: Option<RecordType>,
}

impl RecordFilter {
    /// Match every record in the collection
    pub fn all() -> Self {
        Self { record_type: None }
    }

    /// Match records of one type
    pub fn of_type(record_type: RecordType) -> Self {
        Self {
            record_type: Some(record_type),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self.record_type {
            Some(record_type) => record.record_type() == record_type,
            None => true,
        }
    }

    /// Filter a full snapshot and order it by `createdAt` descending
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        let mut matched: Vec<Record> = records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }
}

/// Live sequence of filtered snapshots
///
/// The current result set is delivered first; afterwards every committed
/// write produces a fresh full snapshot. `recv` returns `None` once the
/// store is gone, leaving the consumer on its last good snapshot.
pub struct Subscription {
    filter: RecordFilter,
    initial: Option<Vec<Record>>,
    rx: broadcast::Receiver<Arc<Vec<Record>>>,
}

impl Subscription {
    pub(crate) fn new(
        filter: RecordFilter,
        initial: Vec<Record>,
        rx: broadcast::Receiver<Arc<Vec<Record>>>,
    ) -> Self {
        Self {
            filter,
            initial: Some(initial),
            rx,
        }
    }

    /// Next snapshot, or `None` when the store has shut down
    pub async fn recv(&mut self) -> Option<Vec<Record>> {
        if let Some(snapshot) = self.initial.take() {
            return Some(snapshot);
        }
        loop {
            match self.rx.recv().await {
                Ok(records) => return Some(self.filter.apply(&records)),
                // Skipped snapshots are superseded by the one we are
                // about to receive; each message is the full set.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Trait for the shared record collection
pub trait RecordStore: Send + Sync {
    /// Persist a new record, assigning id, creation timestamp and the
    /// type's initial status. Submission constraints are re-checked
    /// before any write, even though callers validate first.
    fn create(&self, new_record: NewRecord) -> StoreResult<Record>;

    /// Fetch a record by id
    fn get(&self, id: &RecordId) -> StoreResult<Option<Record>>;

    /// Partial update of exactly the status field
    fn update_status(&self, id: &RecordId, status: RecordStatus) -> StoreResult<Record>;

    /// One-shot filtered query, `createdAt` descending
    fn list(&self, filter: &RecordFilter) -> StoreResult<Vec<Record>>;

    /// Open a live snapshot subscription
    fn subscribe(&self, filter: RecordFilter) -> Subscription;
}

/// Allow using Box<dyn RecordStore> as a RecordStore
impl RecordStore for Box<dyn RecordStore> {
    fn create(&self, new_record: NewRecord) -> StoreResult<Record> {
        (**self).create(new_record)
    }

    fn get(&self, id: &RecordId) -> StoreResult<Option<Record>> {
        (**self).get(id)
    }

    fn update_status(&self, id: &RecordId, status: RecordStatus) -> StoreResult<Record> {
        (**self).update_status(id, status)
    }

    fn list(&self, filter: &RecordFilter) -> StoreResult<Vec<Record>> {
        (**self).list(filter)
    }

    fn subscribe(&self, filter: RecordFilter) -> Subscription {
        (**self).subscribe(filter)
    }
}
