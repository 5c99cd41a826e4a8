//! Keyset pagination engine.
//!
//! Each call is stateless; everything needed to resume lives in the cursor.
//! For a request the engine:
//!
//! 1. Validates the limit, the sort, and the cursor (which must have been
//!    minted for the requested sort).
//! 2. Builds the seek predicate `(col <op> last) OR (col = last AND id > last_id)`.
//! 3. Asks storage for `limit + 1` rows ordered by `(col {ASC|DESC}, id ASC)`.
//! 4. Returns the first `limit` rows, plus a cursor if an extra row came back.
//!
//! Because the predicate seeks past the last key rather than skipping rows,
//! inserts and deletes behind the cursor never duplicate or drop rows on
//! later pages. There is no snapshot across pages.

use std::cmp::Ordering;

use async_trait::async_trait;
use nimble_id::ResourceId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::PaginationConfig;
use crate::cursor::{Cursor, CursorValue};
use crate::error::{PaginationError, RequestError};
use crate::sort::{SortDirection, SortField, SortSpec};

// =============================================================================
// Storage capability
// =============================================================================

/// A row that can be positioned in a keyset ordering.
pub trait KeysetRow {
    /// The row's resource id (tie-breaker).
    fn id(&self) -> ResourceId;

    /// The row's value for a sort column.
    ///
    /// Must return the variant matching the column: `Text` for name,
    /// `Timestamp` for createdAt, `Integer` for level.
    fn sort_value(&self, field: SortField) -> CursorValue;
}

/// Rows strictly after the last row of the previous page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetPredicate {
    pub field: SortField,
    pub direction: SortDirection,
    /// Sort value of the last row returned.
    pub value: CursorValue,
    /// Id of the last row returned.
    pub after_id: ResourceId,
}

impl KeysetPredicate {
    /// Evaluates the predicate against a row's `(sort value, id)`.
    pub fn admits(&self, value: &CursorValue, id: ResourceId) -> bool {
        match (value.cmp(&self.value), self.direction) {
            (Ordering::Greater, SortDirection::Ascending) => true,
            (Ordering::Less, SortDirection::Descending) => true,
            (Ordering::Equal, _) => id > self.after_id,
            _ => false,
        }
    }

    /// Convenience for evaluating against a whole row.
    pub fn admits_row<R: KeysetRow + ?Sized>(&self, row: &R) -> bool {
        self.admits(&row.sort_value(self.field), row.id())
    }
}

impl From<Cursor> for KeysetPredicate {
    fn from(cursor: Cursor) -> Self {
        Self {
            field: cursor.sort.field,
            direction: cursor.sort.direction,
            value: cursor.value,
            after_id: cursor.id,
        }
    }
}

/// A bounded, ordered read handed to storage.
///
/// Storage must return at most `fetch_limit` rows that satisfy its own domain
/// filters and `after` (when present), ordered by `sort` then id ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetQuery {
    pub sort: SortSpec,
    pub after: Option<KeysetPredicate>,
    pub fetch_limit: usize,
}

impl KeysetQuery {
    /// Orders two rows the way storage must order them.
    pub fn compare<R: KeysetRow + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        let field = self.sort.field;
        self.sort
            .compare((&a.sort_value(field), a.id()), (&b.sort_value(field), b.id()))
    }

    /// Returns true if a row satisfies the seek predicate.
    pub fn admits<R: KeysetRow + ?Sized>(&self, row: &R) -> bool {
        self.after.as_ref().is_none_or(|p| p.admits_row(row))
    }
}

/// Ordered fetch over one collection, supplied per entity type.
#[async_trait]
pub trait OrderedFetch: Send + Sync {
    type Row: KeysetRow + Send;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sort fields this collection supports.
    fn sort_fields(&self) -> &'static [SortField] {
        &[SortField::Name, SortField::CreatedAt]
    }

    /// Fetch rows for a keyset query.
    async fn fetch(&self, query: &KeysetQuery) -> Result<Vec<Self::Row>, Self::Error>;
}

// =============================================================================
// Requests and Pages
// =============================================================================

/// A validated-at-use page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub sort: SortSpec,
    pub cursor: Option<String>,
    /// Requested page size; `None` uses the configured default.
    pub limit: Option<i64>,
}

impl PageRequest {
    pub fn new(sort: SortSpec) -> Self {
        Self {
            sort,
            cursor: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Raw list query parameters: `?cursor=...&limit=...&sort=...`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub sort: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Parses the sort parameter, falling back to the endpoint's default.
    ///
    /// Empty parameters count as absent.
    pub fn into_request(self, default_sort: SortSpec) -> Result<PageRequest, RequestError> {
        let sort = match self.sort.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => s.parse()?,
            None => default_sort,
        };

        Ok(PageRequest {
            sort,
            cursor: self.cursor.filter(|c| !c.is_empty()),
            limit: self.limit,
        })
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Cursor for the next page (null if no more results).
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Converts the items, keeping the cursor.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

// =============================================================================
// Paginator
// =============================================================================

/// Runs keyset pagination against any [`OrderedFetch`] collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paginator {
    config: PaginationConfig,
}

impl Paginator {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Builds the storage query for a request without running it.
    pub fn plan(
        &self,
        request: &PageRequest,
        supported: &[SortField],
    ) -> Result<(KeysetQuery, usize), RequestError> {
        let limit = self.config.resolve_limit(request.limit)?;

        if !supported.contains(&request.sort.field) {
            return Err(RequestError::UnsupportedSort(request.sort));
        }

        let cursor = match request.cursor.as_deref() {
            Some(token) => Some(Cursor::decode(token).inspect_err(|e| {
                warn!(error = %e, sort = %request.sort, "Rejected invalid cursor");
            })?),
            None => None,
        };

        if let Some(cursor) = &cursor {
            if cursor.sort != request.sort {
                warn!(
                    cursor_sort = %cursor.sort,
                    requested_sort = %request.sort,
                    "Rejected cursor minted for a different sort"
                );
                return Err(RequestError::SortCursorMismatch {
                    cursor: cursor.sort,
                    requested: request.sort,
                });
            }
        }

        let query = KeysetQuery {
            sort: request.sort,
            after: cursor.map(KeysetPredicate::from),
            fetch_limit: limit + 1,
        };

        Ok((query, limit))
    }

    /// Fetches one page.
    pub async fn paginate<S>(
        &self,
        store: &S,
        request: &PageRequest,
    ) -> Result<Page<S::Row>, PaginationError<S::Error>>
    where
        S: OrderedFetch + ?Sized,
    {
        let (query, limit) = self.plan(request, store.sort_fields())?;

        let mut rows = store
            .fetch(&query)
            .await
            .map_err(PaginationError::Storage)?;

        let has_more = rows.len() > limit;
        rows.truncate(limit);

        let next_cursor = if has_more {
            rows.last().map(|last| {
                Cursor::new(query.sort, last.sort_value(query.sort.field), last.id()).encode()
            })
        } else {
            None
        };

        debug!(
            sort = %query.sort,
            limit,
            count = rows.len(),
            has_cursor = query.after.is_some(),
            has_more,
            "Fetched page"
        );

        Ok(Page {
            items: rows,
            next_cursor,
        })
    }
}

/// Fetches one page with the default limits.
pub async fn paginate<S>(
    store: &S,
    request: &PageRequest,
) -> Result<Page<S::Row>, PaginationError<S::Error>>
where
    S: OrderedFetch + ?Sized,
{
    Paginator::default().paginate(store, request).await
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::encode_cursor;
    use proptest::prelude::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: ResourceId,
        name: String,
    }

    impl KeysetRow for Row {
        fn id(&self) -> ResourceId {
            self.id
        }

        fn sort_value(&self, _field: SortField) -> CursorValue {
            CursorValue::Text(self.name.clone())
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("storage offline")]
    struct Offline;

    /// Sorts on every fetch and records the queries it was given.
    struct VecStore {
        rows: Vec<Row>,
        offline: bool,
        queries: Mutex<Vec<KeysetQuery>>,
    }

    impl VecStore {
        fn new(names: &[&str]) -> Self {
            let rows = names
                .iter()
                .enumerate()
                .map(|(i, name)| Row {
                    id: ResourceId::from_u128(i as u128 + 1),
                    name: name.to_string(),
                })
                .collect();
            Self {
                rows,
                offline: false,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn offline() -> Self {
            Self {
                offline: true,
                ..Self::new(&[])
            }
        }

        fn last_query(&self) -> KeysetQuery {
            self.queries.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl OrderedFetch for VecStore {
        type Row = Row;
        type Error = Offline;

        fn sort_fields(&self) -> &'static [SortField] {
            &[SortField::Name]
        }

        async fn fetch(&self, query: &KeysetQuery) -> Result<Vec<Row>, Offline> {
            self.queries.lock().unwrap().push(query.clone());
            if self.offline {
                return Err(Offline);
            }
            let mut rows: Vec<Row> = self.rows.iter().filter(|r| query.admits(*r)).cloned().collect();
            rows.sort_by(|a, b| query.compare(a, b));
            rows.truncate(query.fetch_limit);
            Ok(rows)
        }
    }

    fn names(page: &Page<Row>) -> Vec<&str> {
        page.items.iter().map(|r| r.name.as_str()).collect()
    }

    fn by_name() -> SortSpec {
        SortSpec::ascending(SortField::Name)
    }

    #[tokio::test]
    async fn test_two_pages() {
        let store = VecStore::new(&["Soldier", "Criminal", "Folk Hero", "City Watch"]);

        let first = paginate(&store, &PageRequest::new(by_name()).with_limit(2))
            .await
            .unwrap();
        assert_eq!(names(&first), ["City Watch", "Criminal"]);
        assert!(first.has_more());
        assert_eq!(store.last_query().fetch_limit, 3);
        assert!(store.last_query().after.is_none());

        let cursor = first.next_cursor.unwrap();
        let second = paginate(&store, &PageRequest::new(by_name()).with_limit(2).with_cursor(cursor))
            .await
            .unwrap();
        assert_eq!(names(&second), ["Folk Hero", "Soldier"]);
        assert_eq!(second.next_cursor, None);
    }

    #[tokio::test]
    async fn test_cursor_carries_last_row() {
        let store = VecStore::new(&["B", "A", "C"]);
        let page = paginate(&store, &PageRequest::new(by_name()).with_limit(1))
            .await
            .unwrap();

        let cursor = Cursor::decode(page.next_cursor.as_deref().unwrap()).unwrap();
        assert_eq!(cursor.sort, by_name());
        assert_eq!(cursor.value, CursorValue::Text("A".into()));
        assert_eq!(cursor.id, ResourceId::from_u128(2));
    }

    #[tokio::test]
    async fn test_exact_fit_has_no_cursor() {
        let store = VecStore::new(&["A", "B"]);
        let page = paginate(&store, &PageRequest::new(by_name()).with_limit(2))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let store = VecStore::new(&[]);
        let page = paginate(&store, &PageRequest::new(by_name())).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, None);
        assert_eq!(store.last_query().fetch_limit, 101);
    }

    #[tokio::test]
    async fn test_sort_cursor_mismatch() {
        let store = VecStore::new(&["A", "B", "C"]);
        let token = encode_cursor(by_name(), "A", ResourceId::from_u128(1));
        let request = PageRequest::new(SortSpec::descending(SortField::Name)).with_cursor(token);

        let err = paginate(&store, &request).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(matches!(
            err.as_request(),
            Some(RequestError::SortCursorMismatch { .. })
        ));
        assert!(store.queries.lock().unwrap().is_empty(), "must not reach storage");
    }

    #[tokio::test]
    async fn test_invalid_cursor_is_rejected_not_reset() {
        let store = VecStore::new(&["A", "B", "C"]);
        let request = PageRequest::new(by_name()).with_cursor("!!!invalid!!!");

        let err = paginate(&store, &request).await.unwrap_err();
        assert!(matches!(err.as_request(), Some(RequestError::InvalidCursor(_))));
    }

    #[tokio::test]
    async fn test_unsupported_sort() {
        let store = VecStore::new(&["A"]);
        let request = PageRequest::new(SortSpec::ascending(SortField::Level));

        let err = paginate(&store, &request).await.unwrap_err();
        assert!(matches!(
            err.as_request(),
            Some(RequestError::UnsupportedSort(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_limit() {
        let store = VecStore::new(&["A"]);
        for limit in [0, 101] {
            let err = paginate(&store, &PageRequest::new(by_name()).with_limit(limit))
                .await
                .unwrap_err();
            assert!(matches!(
                err.as_request(),
                Some(RequestError::InvalidLimit { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_storage_error_passes_through() {
        let store = VecStore::offline();
        let err = paginate(&store, &PageRequest::new(by_name())).await.unwrap_err();
        assert!(!err.is_client_error());
        assert!(matches!(err.into_storage(), Some(Offline)));
    }

    #[tokio::test]
    async fn test_configured_default_limit() {
        let store = VecStore::new(&["A", "B", "C", "D"]);
        let paginator = Paginator::new(PaginationConfig {
            default_limit: 3,
            max_limit: 10,
        });
        assert_eq!(paginator.config().default_limit, 3);
        let page = paginator
            .paginate(&store, &PageRequest::new(by_name()))
            .await
            .unwrap();
        assert_eq!(names(&page), ["A", "B", "C"]);
        assert!(page.has_more());
    }

    #[test]
    fn test_page_query_defaults() {
        let request = PageQuery::default()
            .into_request(SortSpec::descending(SortField::CreatedAt))
            .unwrap();
        assert_eq!(request, PageRequest::new(SortSpec::descending(SortField::CreatedAt)));
    }

    #[test]
    fn test_page_query_treats_empty_as_absent() {
        let query = PageQuery {
            sort: Some(String::new()),
            cursor: Some(String::new()),
            limit: Some(5),
        };
        let request = query.into_request(by_name()).unwrap();
        assert_eq!(request.sort, by_name());
        assert_eq!(request.cursor, None);
        assert_eq!(request.limit, Some(5));
    }

    #[test]
    fn test_page_query_rejects_bad_sort() {
        let query = PageQuery {
            sort: Some("hp".into()),
            ..PageQuery::default()
        };
        assert_eq!(
            query.into_request(by_name()).unwrap_err(),
            RequestError::InvalidSort("hp".into())
        );
    }

    #[test]
    fn test_page_map_keeps_cursor() {
        let page = Page {
            items: vec![1, 2],
            next_cursor: Some("abc".to_string()),
        };
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.next_cursor.as_deref(), Some("abc"));
    }

    fn arb_value() -> impl Strategy<Value = CursorValue> {
        (0i64..5).prop_map(CursorValue::Integer)
    }

    proptest! {
        #[test]
        fn prop_predicate_admits_exactly_rows_after_last(
            value in arb_value(),
            id in 0u128..5,
            last_value in arb_value(),
            last_id in 0u128..5,
            descending in any::<bool>(),
        ) {
            let sort = if descending {
                SortSpec::descending(SortField::Level)
            } else {
                SortSpec::ascending(SortField::Level)
            };
            let predicate = KeysetPredicate::from(Cursor::new(
                sort,
                last_value.clone(),
                ResourceId::from_u128(last_id),
            ));

            let after = sort.compare(
                (&value, ResourceId::from_u128(id)),
                (&last_value, ResourceId::from_u128(last_id)),
            ) == Ordering::Greater;

            prop_assert_eq!(predicate.admits(&value, ResourceId::from_u128(id)), after);
        }
    }
}
