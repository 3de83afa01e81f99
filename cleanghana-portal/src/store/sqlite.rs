//! SQLite-backed record store
//!
//! Persistence adapter for the gateway contract. Records are namespaced
//! by the configured collection path, so one database file can host
//! several deployments' collections side by side.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::broadcast;
use uuid::Uuid;

use cleanghana_core::{
    lifecycle, Location, MaterialType, NewRecord, Record, RecordDetails, RecordId, RecordStatus,
    RecordType,
};

use super::{RecordFilter, RecordStore, StoreResult, Subscription, SNAPSHOT_CHANNEL_CAPACITY};
use crate::error::PortalError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
    collection: String,
    tx: broadcast::Sender<Arc<Vec<Record>>>,
    last_created_at: Mutex<DateTime<Utc>>,
}

impl SqliteRecordStore {
    /// Open or create a database at the given path, scoped to one
    /// collection
    pub fn open(path: &str, collection: impl Into<String>) -> Result<Self, PortalError> {
        let conn = Connection::open(path).map_err(|e| PortalError::Internal(e.to_string()))?;
        Self::with_connection(conn, collection)
    }

    /// Fully in-memory database (tests)
    pub fn open_in_memory(collection: impl Into<String>) -> Result<Self, PortalError> {
        let conn =
            Connection::open_in_memory().map_err(|e| PortalError::Internal(e.to_string()))?;
        Self::with_connection(conn, collection)
    }

    fn with_connection(conn: Connection, collection: impl Into<String>) -> Result<Self, PortalError> {
        Self::migrate(&conn)?;
        let (tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Ok(Self {
            conn: Mutex::new(conn),
            collection: collection.into(),
            tx,
            last_created_at: Mutex::new(DateTime::<Utc>::MIN_UTC),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), PortalError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(|e| PortalError::Internal(e.to_string()))?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, PortalError> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| PortalError::Internal(e.to_string()))?;

        if !table_exists {
            return Ok(0);
        }

        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })
        .map_err(|e| PortalError::Internal(e.to_string()))
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), PortalError> {
        conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- One row per record; variant-specific columns are NULL for
            -- the other variant
            CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                record_type TEXT NOT NULL,
                status TEXT NOT NULL,
                reporter_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                lat REAL NOT NULL,
                lng REAL NOT NULL,
                display_address TEXT NOT NULL,
                description TEXT,
                waste_category TEXT,
                image_ref TEXT,
                material_type TEXT,
                quantity_estimate TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_records_collection_created
                ON records(collection, created_at DESC);
            "#,
        )
        .map_err(|e| PortalError::Internal(e.to_string()))
    }

    /// Server-assigned creation timestamp, strictly monotonic per store
    fn next_created_at(&self) -> DateTime<Utc> {
        let mut last = self.last_created_at.lock().unwrap();
        let mut now = Utc::now();
        if now <= *last {
            now = *last + Duration::microseconds(1);
        }
        *last = now;
        now
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<RawRow> {
        Ok(RawRow {
            id: row.get("id")?,
            record_type: row.get("record_type")?,
            status: row.get("status")?,
            reporter_id: row.get("reporter_id")?,
            created_at: row.get("created_at")?,
            lat: row.get("lat")?,
            lng: row.get("lng")?,
            display_address: row.get("display_address")?,
            description: row.get("description")?,
            waste_category: row.get("waste_category")?,
            image_ref: row.get("image_ref")?,
            material_type: row.get("material_type")?,
            quantity_estimate: row.get("quantity_estimate")?,
        })
    }

    fn query(&self, filter: &RecordFilter) -> StoreResult<Vec<Record>> {
        let conn = self.conn.lock().unwrap();
        let mut statement = conn
            .prepare(
                "SELECT * FROM records
                 WHERE collection = ?1 AND (?2 IS NULL OR record_type = ?2)
                 ORDER BY created_at DESC",
            )
            .map_err(|e| PortalError::Internal(e.to_string()))?;

        let type_param = filter.record_type.map(|t| t.as_str());
        let rows = statement
            .query_map(params![self.collection, type_param], Self::row_to_record)
            .map_err(|e| PortalError::Internal(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| PortalError::Internal(e.to_string()))?;
            records.push(raw.into_record()?);
        }
        Ok(records)
    }

    /// Broadcast the full current collection to all subscribers
    fn publish(&self) {
        match self.query(&RecordFilter::all()) {
            Ok(records) => {
                let _ = self.tx.send(Arc::new(records));
            }
            Err(err) => {
                tracing::error!("Failed to load snapshot for broadcast: {}", err);
            }
        }
    }
}

/// Flat row shape between SQLite and the record model
struct RawRow {
    id: String,
    record_type: String,
    status: String,
    reporter_id: String,
    created_at: String,
    lat: f64,
    lng: f64,
    display_address: String,
    description: Option<String>,
    waste_category: Option<String>,
    image_ref: Option<String>,
    material_type: Option<String>,
    quantity_estimate: Option<String>,
}

impl RawRow {
    fn into_record(self) -> Result<Record, PortalError> {
        let corrupt = |what: &str| PortalError::Internal(format!("corrupt record row: {what}"));

        let record_type =
            RecordType::from_str(&self.record_type).ok_or_else(|| corrupt("record_type"))?;
        let status = RecordStatus::from_str(&self.status).ok_or_else(|| corrupt("status"))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|_| corrupt("created_at"))?
            .with_timezone(&Utc);

        let details = match record_type {
            RecordType::WasteReport => RecordDetails::WasteReport {
                description: self.description.ok_or_else(|| corrupt("description"))?,
                waste_category: self.waste_category.unwrap_or_default(),
                image_ref: self.image_ref.ok_or_else(|| corrupt("image_ref"))?,
            },
            RecordType::RecyclingRequest => RecordDetails::RecyclingRequest {
                material_type: self
                    .material_type
                    .as_deref()
                    .and_then(MaterialType::from_str)
                    .ok_or_else(|| corrupt("material_type"))?,
                quantity_estimate: self
                    .quantity_estimate
                    .ok_or_else(|| corrupt("quantity_estimate"))?,
            },
        };

        Ok(Record {
            id: RecordId(self.id),
            details,
            location: Location::new(self.lat, self.lng, self.display_address),
            status,
            reporter_id: self.reporter_id,
            created_at,
        })
    }
}

impl RecordStore for SqliteRecordStore {
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

        let (description, waste_category, image_ref, material_type, quantity_estimate) =
            match &record.details {
                RecordDetails::WasteReport {
                    description,
                    waste_category,
                    image_ref,
                } => (
                    Some(description.as_str()),
                    Some(waste_category.as_str()),
                    Some(image_ref.as_str()),
                    None,
                    None,
                ),
                RecordDetails::RecyclingRequest {
                    material_type,
                    quantity_estimate,
                } => (
                    None,
                    None,
                    None,
                    Some(material_type.as_str()),
                    Some(quantity_estimate.as_str()),
                ),
            };

        {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO records (
                     id, collection, record_type, status, reporter_id, created_at,
                     lat, lng, display_address,
                     description, waste_category, image_ref,
                     material_type, quantity_estimate
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    record.id.0,
                    self.collection,
                    record.record_type().as_str(),
                    record.status.as_str(),
                    record.reporter_id,
                    // Fixed-width timestamps keep ORDER BY created_at
                    // chronological
                    record.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                    record.location.latitude,
                    record.location.longitude,
                    record.location.display_address,
                    description,
                    waste_category,
                    image_ref,
                    material_type,
                    quantity_estimate,
                ],
            )
            .map_err(|e| PortalError::Internal(e.to_string()))?;
        }

        self.publish();
        Ok(record)
    }

    fn get(&self, id: &RecordId) -> StoreResult<Option<Record>> {
        let raw = {
            let conn = self.conn.lock().unwrap();
            conn.query_row(
                "SELECT * FROM records WHERE collection = ?1 AND id = ?2",
                params![self.collection, id.0],
                Self::row_to_record,
            )
            .optional()
            .map_err(|e| PortalError::Internal(e.to_string()))?
        };
        raw.map(RawRow::into_record).transpose()
    }

    fn update_status(&self, id: &RecordId, status: RecordStatus) -> StoreResult<Record> {
        let changed = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE records SET status = ?1 WHERE collection = ?2 AND id = ?3",
                params![status.as_str(), self.collection, id.0],
            )
            .map_err(|e| PortalError::Internal(e.to_string()))?
        };

        if changed == 0 {
            return Err(PortalError::RecordNotFound);
        }

        self.publish();
        self.get(id)?.ok_or(PortalError::RecordNotFound)
    }

    fn list(&self, filter: &RecordFilter) -> StoreResult<Vec<Record>> {
        self.query(filter)
    }

    fn subscribe(&self, filter: RecordFilter) -> Subscription {
        let rx = self.tx.subscribe();
        let initial = self.query(&filter).unwrap_or_else(|err| {
            tracing::error!("Failed to load initial snapshot: {}", err);
            Vec::new()
        });
        Subscription::new(filter, initial, rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleanghana_core::PLACEHOLDER_IMAGE_REF;

    const COLLECTION: &str = "artifacts/clean-ghana-app/public/data/reports";

    fn waste_record(description: &str) -> NewRecord {
        NewRecord {
            details: RecordDetails::WasteReport {
                description: description.to_string(),
                waste_category: "General".to_string(),
                image_ref: PLACEHOLDER_IMAGE_REF.to_string(),
            },
            location: Some(Location::new(5.6037, -0.1870, "Legon, Accra")),
            reporter_id: "anon-1".to_string(),
        }
    }

    fn recycling_record() -> NewRecord {
        NewRecord {
            details: RecordDetails::RecyclingRequest {
                material_type: MaterialType::WaterSachets,
                quantity_estimate: "2 large bags".to_string(),
            },
            location: Some(Location::new(5.56, -0.2057, "Accra Central, Accra")),
            reporter_id: "anon-2".to_string(),
        }
    }

    #[test]
    fn test_create_and_get_round_trip() {
        let store = SqliteRecordStore::open_in_memory(COLLECTION).unwrap();

        let created = store.create(recycling_record()).unwrap();
        let fetched = store.get(&created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_list_pushes_type_filter_into_the_query() {
        let store = SqliteRecordStore::open_in_memory(COLLECTION).unwrap();
        store.create(waste_record("first")).unwrap();
        store.create(recycling_record()).unwrap();
        store.create(waste_record("second")).unwrap();

        let reports = store
            .list(&RecordFilter::of_type(RecordType::WasteReport))
            .unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].created_at > reports[1].created_at);

        let all = store.list(&RecordFilter::all()).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_update_status_and_not_found() {
        let store = SqliteRecordStore::open_in_memory(COLLECTION).unwrap();
        let created = store.create(waste_record("Overflowing bin")).unwrap();

        let updated = store
            .update_status(&created.id, RecordStatus::Resolved)
            .unwrap();
        assert_eq!(updated.status, RecordStatus::Resolved);
        assert_eq!(updated.details, created.details);

        let err = store
            .update_status(&RecordId("missing".to_string()), RecordStatus::Resolved)
            .unwrap_err();
        assert!(matches!(err, PortalError::RecordNotFound));
    }

    #[test]
    fn test_collections_are_isolated_within_one_database() {
        let path = std::env::temp_dir().join(format!("cleanghana-test-{}.db", Uuid::new_v4()));
        let path = path.to_str().unwrap().to_string();

        let store = SqliteRecordStore::open(&path, COLLECTION).unwrap();
        store.create(waste_record("Overflowing bin")).unwrap();
        drop(store);

        let other =
            SqliteRecordStore::open(&path, "artifacts/other/public/data/reports").unwrap();
        assert!(other.list(&RecordFilter::all()).unwrap().is_empty());

        let same = SqliteRecordStore::open(&path, COLLECTION).unwrap();
        assert_eq!(same.list(&RecordFilter::all()).unwrap().len(), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_subscription_sees_commits() {
        let store = SqliteRecordStore::open_in_memory(COLLECTION).unwrap();
        let mut subscription = store.subscribe(RecordFilter::of_type(RecordType::WasteReport));
        assert!(subscription.recv().await.unwrap().is_empty());

        store.create(waste_record("Overflowing bin")).unwrap();
        let snapshot = subscription.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].status, RecordStatus::Pending);
    }
}
