//! The record-store seam and an in-memory implementation.

use crate::record::{BoundsQuery, GeoRecord};
use std::future::Future;
use std::sync::RwLock;
use thiserror::Error;

/// Errors originating at the record store, propagated unchanged through
/// the coordinator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the query
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// A row could not be converted into a usable record
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Any other store-side failure
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A store of discoverable records, queryable by rectangular bounds and
/// date range.
///
/// Owned by the surrounding application (in production this is the
/// PostGIS-backed listing table). Implementations answer with true
/// coordinates; obfuscation happens after the store, inside the
/// coordinator, so store implementations never need to know about it.
pub trait RecordStore: Send + Sync + 'static {
    /// Returns the records whose true coordinate lies within the query
    /// bounds and whose date (if filtered) falls in range, up to `limit`.
    fn query(&self, query: BoundsQuery) -> impl Future<Output = StoreResult<Vec<GeoRecord>>> + Send;
}

/// In-memory [`RecordStore`] using a linear bounds predicate.
///
/// Linear scanning is deliberate: at the record counts this subsystem
/// serves, a spatial index buys nothing. Doubles as the test double for
/// the coordinator.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<GeoRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record.
    pub fn insert(&self, record: GeoRecord) {
        self.records.write().unwrap().push(record);
    }

    /// Inserts a store row, parsing its PostGIS location payload.
    ///
    /// # Errors
    /// `MalformedRecord` when the location cannot be parsed; such rows
    /// are not silently dropped so ingestion problems surface early.
    pub fn insert_row(
        &self,
        id: impl Into<String>,
        owner_id: Option<String>,
        location: &serde_json::Value,
        created_at: Option<chrono::DateTime<chrono::Utc>>,
        metadata: serde_json::Value,
    ) -> StoreResult<()> {
        let id = id.into();
        let record = GeoRecord::from_row(&id, owner_id, location, created_at, metadata)
            .ok_or_else(|| {
                StoreError::MalformedRecord(format!("record '{id}' has no usable location"))
            })?;
        self.insert(record);
        Ok(())
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryStore {
    async fn query(&self, query: BoundsQuery) -> StoreResult<Vec<GeoRecord>> {
        let records = self.records.read().unwrap();

        let mut matches: Vec<GeoRecord> = records
            .iter()
            .filter(|record| query.bounds.contains(&record.coordinate))
            .filter(|record| {
                query
                    .date_filter
                    .is_none_or(|filter| filter.matches(record.created_at))
            })
            .cloned()
            .collect();

        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DateFilter;
    use chrono::{TimeZone, Utc};
    use foodshare_geo::{BoundingBox, Coordinate};
    use serde_json::json;

    fn record_at(id: &str, lat: f64, lon: f64) -> GeoRecord {
        GeoRecord {
            id: id.into(),
            owner_id: None,
            coordinate: Coordinate::new(lat, lon),
            address: None,
            created_at: None,
            metadata: json!({}),
        }
    }

    fn calgary_bounds() -> BoundingBox {
        BoundingBox::new(50.8, 51.3, -114.3, -113.8).unwrap()
    }

    #[test]
    fn test_query_filters_by_bounds() {
        let store = MemoryStore::new();
        store.insert(record_at("inside", 51.0447, -114.0719));
        store.insert(record_at("outside", 53.5461, -113.4938));

        let results = tokio_test::block_on(store.query(BoundsQuery {
            bounds: calgary_bounds(),
            date_filter: None,
            limit: None,
        }))
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "inside");
    }

    #[test]
    fn test_query_applies_date_filter() {
        let store = MemoryStore::new();
        let mut dated = record_at("dated", 51.0, -114.0);
        dated.created_at = Some(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap());
        store.insert(dated);
        store.insert(record_at("undated", 51.0, -114.0));

        let filter = DateFilter {
            start: Some(Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap()),
            end: None,
        };
        let results = tokio_test::block_on(store.query(BoundsQuery {
            bounds: calgary_bounds(),
            date_filter: Some(filter),
            limit: None,
        }))
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "dated");
    }

    #[test]
    fn test_query_respects_limit() {
        let store = MemoryStore::new();
        for i in 0..10 {
            store.insert(record_at(&format!("r{i}"), 51.0, -114.0));
        }

        let results = tokio_test::block_on(store.query(BoundsQuery {
            bounds: calgary_bounds(),
            date_filter: None,
            limit: Some(3),
        }))
        .unwrap();

        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_insert_row_parses_location() {
        let store = MemoryStore::new();
        store
            .insert_row(
                "event-9",
                None,
                &json!("POINT(-114.0719 51.0447)"),
                None,
                json!({}),
            )
            .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_row_rejects_bad_location() {
        let store = MemoryStore::new();
        let result = store.insert_row("event-9", None, &json!(null), None, json!({}));
        assert!(matches!(result, Err(StoreError::MalformedRecord(_))));
        assert!(store.is_empty());
    }
}
