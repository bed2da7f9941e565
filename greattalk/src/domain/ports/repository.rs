//! Generic repository port.
//!
//! The [`Repository`] trait is the contract every persistence adapter binds:
//! CRUD, filtered queries, pagination, push subscriptions, cache
//! invalidation, and concurrent preloading, polymorphic over the entity and
//! key types. Adapters translate backend-native failures into the
//! [`RepositoryError`] taxonomy at this boundary.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::envelope::RawDataEnvelope;
use crate::domain::error::RepositoryError;

/// Entities supporting partial updates.
///
/// The repository's `update` applies a patch and then reads the record back;
/// the patch type describes which fields change.
pub trait Patchable {
    /// Partial update applied by [`Repository::update`].
    type Patch: Send + Sync;

    /// Apply the patch in place.
    fn apply_patch(&mut self, patch: &Self::Patch);
}

/// Closed set of filter operators interpreted by backend adapters.
///
/// Queries are an explicit specification rather than dynamically assembled
/// backend query objects; each adapter interprets the same closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Field equals the value.
    Eq,
    /// Field differs from the value.
    Ne,
    /// Field is greater than the value.
    Gt,
    /// Field is greater than or equal to the value.
    Gte,
    /// Field is less than the value.
    Lt,
    /// Field is less than or equal to the value.
    Lte,
    /// String field contains the value as a substring, or array field
    /// contains the value as an element.
    Contains,
}

/// One field condition; a query is a conjunction of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFilter {
    /// Serialized field name; `.` descends into nested objects.
    pub field: String,
    /// Comparison operator.
    pub op: FilterOp,
    /// Comparison operand.
    pub value: Value,
}

impl FieldFilter {
    /// Build a filter condition.
    #[must_use]
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Ordering clause for paginated queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    /// Serialized field name to order by.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

impl OrderBy {
    /// Ascending order on a field.
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending order on a field.
    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Query specification for [`Repository::find_with_pagination`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageQuery {
    /// Conjunction of field conditions.
    pub filters: Vec<FieldFilter>,
    /// Optional ordering clause.
    pub order_by: Option<OrderBy>,
    /// Maximum page size; zero yields an empty page.
    pub limit: usize,
    /// Records to skip before the page starts.
    pub offset: usize,
}

impl PageQuery {
    /// Query for the first `limit` records.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Add a filter condition.
    #[must_use]
    pub fn filtered(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the ordering clause.
    #[must_use]
    pub fn ordered(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Skip `offset` records before the page starts.
    #[must_use]
    pub fn starting_at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Enveloped records, at most the requested limit.
    pub items: Vec<RawDataEnvelope<T>>,
    /// Heuristic continuation flag: true when the page came back full.
    ///
    /// A page that exactly exhausts the collection still reports `true`;
    /// callers get a false positive on that boundary, never a false
    /// negative.
    pub has_more: bool,
}

/// Tagged event delivered to subscription listeners.
///
/// Failures are visible on the callback channel rather than masquerading as
/// empty data.
#[derive(Debug, Clone)]
pub enum SubscriptionEvent<T> {
    /// A fresh snapshot of the observed data.
    Data(T),
    /// The observation failed; the subscription stays registered.
    Error(RepositoryError),
    /// The backend shut down; no further events will be delivered.
    Closed,
}

/// Listener observing a single record; `None` means missing or deleted.
pub type DocumentListener<T> = Arc<dyn Fn(SubscriptionEvent<Option<T>>) + Send + Sync>;

/// Listener observing the result set of a filtered query.
pub type QueryListener<T> = Arc<dyn Fn(SubscriptionEvent<Vec<T>>) + Send + Sync>;

/// De-registration handle returned by the subscribe operations.
///
/// The caller owns the handle and must invoke [`SubscriptionHandle::cancel`]
/// exactly once to release the listener; an uncancelled handle leaks the
/// listener for the lifetime of the owning backend.
#[must_use = "an uncancelled subscription leaks its listener"]
pub struct SubscriptionHandle {
    cancel: Box<dyn FnOnce() + Send>,
}

impl SubscriptionHandle {
    /// Wrap a de-registration closure.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
        }
    }

    /// Release the listener. Consumes the handle; it cannot be invoked twice.
    pub fn cancel(self) {
        (self.cancel)();
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle").finish_non_exhaustive()
    }
}

/// Generic persistence contract, polymorphic over entity and key types.
///
/// All operations are asynchronous request/response or asynchronous push;
/// none blocks the caller. There is no timeout or retry policy at this
/// layer: adapters fail fast, classify, and return.
#[async_trait]
pub trait Repository<T, K>: Send + Sync
where
    T: Patchable,
{
    /// Fetch a record by key; a missing record is `Ok(None)`, never an error.
    async fn find_by_id(&self, id: &K) -> Result<Option<RawDataEnvelope<T>>, RepositoryError>;

    /// Fetch several records by key, skipping the missing ones.
    async fn find_many(&self, ids: &[K]) -> Result<Vec<RawDataEnvelope<T>>, RepositoryError>;

    /// Insert a new record; an existing key is a validation failure.
    async fn create(&self, id: &K, data: T) -> Result<RawDataEnvelope<T>, RepositoryError>;

    /// Apply a partial update, then read the record back.
    ///
    /// The read-back is contractual: when it finds nothing the operation
    /// fails with a not-found error, so a successful update is always
    /// immediately observable.
    async fn update(
        &self,
        id: &K,
        patch: &T::Patch,
    ) -> Result<RawDataEnvelope<T>, RepositoryError>;

    /// Remove a record; deleting a missing key is a no-op.
    async fn delete(&self, id: &K) -> Result<(), RepositoryError>;

    /// Fetch every record matching the conjunction of filters.
    async fn find_by_filter(
        &self,
        filters: &[FieldFilter],
    ) -> Result<Vec<RawDataEnvelope<T>>, RepositoryError>;

    /// Fetch one page of a filtered, optionally ordered query.
    async fn find_with_pagination(&self, query: &PageQuery) -> Result<Page<T>, RepositoryError>;

    /// Count the records matching the conjunction of filters.
    async fn count(&self, filters: &[FieldFilter]) -> Result<u64, RepositoryError>;

    /// Observe a single record; the listener receives an initial snapshot
    /// and a fresh one after every mutation.
    async fn subscribe(
        &self,
        id: &K,
        listener: DocumentListener<T>,
    ) -> Result<SubscriptionHandle, RepositoryError>;

    /// Observe the result set of a filtered query.
    async fn subscribe_to_query(
        &self,
        filters: &[FieldFilter],
        listener: QueryListener<T>,
    ) -> Result<SubscriptionHandle, RepositoryError>;

    /// Evict one cached record, or the whole read cache when `id` is `None`.
    async fn invalidate_cache(&self, id: Option<&K>);

    /// Warm the read cache with concurrent point reads.
    ///
    /// Reads are issued independently with no ordering guarantee and no
    /// cancellation; individual failures are tolerated and never propagate.
    async fn preload(&self, ids: &[K]);
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn page_query_builder_accumulates_clauses() {
        let query = PageQuery::with_limit(30)
            .filtered(FieldFilter::new("authorUid", FilterOp::Eq, "u1"))
            .ordered(OrderBy::descending("createdAt"))
            .starting_at(60);

        assert_eq!(query.limit, 30);
        assert_eq!(query.offset, 60);
        assert_eq!(query.filters.len(), 1);
        assert_eq!(
            query.order_by,
            Some(OrderBy {
                field: "createdAt".to_owned(),
                direction: SortDirection::Descending,
            })
        );
    }

    #[rstest]
    fn field_filter_serde_uses_snake_case_operators() {
        let filter = FieldFilter::new("followerCount", FilterOp::Gte, json!(100));
        let value = serde_json::to_value(&filter).expect("serialise");
        assert_eq!(value.get("op"), Some(&json!("gte")));
    }

    #[rstest]
    fn subscription_handle_cancels_exactly_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let handle = SubscriptionHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        handle.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        // The handle is consumed; a second cancel does not compile.
    }
}
