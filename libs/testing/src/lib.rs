//! In-memory collections for exercising pagination without a database.
//!
//! [`MemoryStore`] implements [`OrderedFetch`] by filtering and sorting a
//! vector on every fetch, which makes it the reference storage for the
//! pagination contract. It can be mutated between page fetches to simulate
//! concurrent writers.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use nimble_id::ResourceId;
use nimble_pagination::{async_trait, CursorValue, KeysetQuery, KeysetRow, OrderedFetch, SortField};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// A minimal content record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: ResourceId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub level: i64,
}

impl Record {
    /// Creates a record with a random id, created now, at level 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(),
            name: name.into(),
            created_at: Utc::now(),
            level: 0,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: ResourceId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    #[must_use]
    pub fn level(mut self, level: i64) -> Self {
        self.level = level;
        self
    }
}

impl KeysetRow for Record {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn sort_value(&self, field: SortField) -> CursorValue {
        match field {
            SortField::Name => CursorValue::Text(self.name.clone()),
            SortField::CreatedAt => CursorValue::Timestamp(self.created_at),
            SortField::Level => CursorValue::Integer(self.level),
        }
    }
}

/// Fixed epoch for deterministic fixtures.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Builds records with deterministic ids (1, 2, ...) and creation times one
/// second apart, in the given order.
pub fn records(names: &[&str]) -> Vec<Record> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Record::new(*name)
                .with_id(ResourceId::from_u128(i as u128 + 1))
                .created_at(epoch() + Duration::seconds(i as i64))
        })
        .collect()
}

/// Errors from the in-memory store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable")]
    Unavailable,
}

/// An in-memory collection.
pub struct MemoryStore {
    rows: RwLock<Vec<Record>>,
    sort_fields: &'static [SortField],
    fetches: AtomicUsize,
    fail_fetches: bool,
}

impl MemoryStore {
    /// Creates a store supporting name and createdAt sorts.
    pub fn new(rows: Vec<Record>) -> Self {
        Self {
            rows: RwLock::new(rows),
            sort_fields: &[SortField::Name, SortField::CreatedAt],
            fetches: AtomicUsize::new(0),
            fail_fetches: false,
        }
    }

    /// Creates a store that also supports level sorts, like monsters.
    pub fn with_level(rows: Vec<Record>) -> Self {
        Self {
            sort_fields: &[SortField::Name, SortField::CreatedAt, SortField::Level],
            ..Self::new(rows)
        }
    }

    /// Creates a store whose fetches always fail.
    pub fn failing() -> Self {
        Self {
            fail_fetches: true,
            ..Self::new(Vec::new())
        }
    }

    pub async fn insert(&self, record: Record) {
        self.rows.write().await.push(record);
    }

    /// Removes a record, returning whether it existed.
    pub async fn remove(&self, id: ResourceId) -> bool {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id != id);
        rows.len() != before
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderedFetch for MemoryStore {
    type Row = Record;
    type Error = StoreError;

    fn sort_fields(&self) -> &'static [SortField] {
        self.sort_fields
    }

    async fn fetch(&self, query: &KeysetQuery) -> Result<Vec<Record>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetches {
            return Err(StoreError::Unavailable);
        }

        let rows = self.rows.read().await;
        let mut matched: Vec<Record> = rows.iter().filter(|r| query.admits(*r)).cloned().collect();
        matched.sort_by(|a, b| query.compare(a, b));
        matched.truncate(query.fetch_limit);

        debug!(
            sort = %query.sort,
            fetch_limit = query.fetch_limit,
            returned = matched.len(),
            "[MEMORY] Served keyset fetch"
        );

        Ok(matched)
    }
}
