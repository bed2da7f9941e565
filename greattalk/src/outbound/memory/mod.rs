//! In-memory repository adapter.
//!
//! Binds the [`Repository`] port to an in-process document store keyed by
//! string. The adapter keeps a read-through envelope cache in front of the
//! store and a registry of push listeners, and translates its own failures
//! (serialization, shutdown) into the repository error taxonomy at this
//! boundary.
//!
//! Locking discipline: one mutex over the whole state, never held across an
//! await; listener callbacks run after the guard is released so they may
//! re-enter the repository.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::envelope::{DataSource, RawDataEnvelope};
use crate::domain::error::RepositoryError;
use crate::domain::ports::{
    DocumentListener, FieldFilter, FilterOp, Page, PageQuery, Patchable, QueryListener,
    Repository, SortDirection, SubscriptionEvent, SubscriptionHandle,
};

struct StoredRecord<T> {
    data: T,
    stored_at: DateTime<Utc>,
}

struct Inner<T> {
    records: BTreeMap<String, StoredRecord<T>>,
    cache: HashMap<String, RawDataEnvelope<T>>,
    document_listeners: HashMap<Uuid, (String, DocumentListener<T>)>,
    query_listeners: HashMap<Uuid, (Vec<FieldFilter>, QueryListener<T>)>,
    closed: bool,
}

impl<T> Default for Inner<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            cache: HashMap::new(),
            document_listeners: HashMap::new(),
            query_listeners: HashMap::new(),
            closed: false,
        }
    }
}

/// In-memory binding of the [`Repository`] port.
///
/// Cheap to clone; clones share the same store. Intended as the concrete
/// backend for tests and local development, and as the reference behaviour
/// for remote bindings.
pub struct MemoryRepository<T> {
    inner: Arc<Mutex<Inner<T>>>,
    source: DataSource,
}

impl<T> Clone for MemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            source: self.source,
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryRepository<T> {
    /// Create an empty store tagged as local storage.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(DataSource::LocalStorage)
    }

    /// Create an empty store tagged with an explicit backend source.
    #[must_use]
    pub fn with_source(source: DataSource) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            source,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn closed_error(&self) -> RepositoryError {
        RepositoryError::network(self.source, "repository is closed").with_code("repo/closed")
    }
}

impl<T> MemoryRepository<T>
where
    T: Patchable + Clone + Serialize + Send + Sync + 'static,
{
    /// Notify every listener that the backend is shutting down and drop the
    /// listener registry. Further subscribe calls fail; further reads and
    /// writes are also rejected.
    pub fn close(&self) {
        let (documents, queries) = {
            let mut guard = self.lock();
            guard.closed = true;
            let documents: Vec<_> = guard
                .document_listeners
                .drain()
                .map(|(_, (_, listener))| listener)
                .collect();
            let queries: Vec<_> = guard
                .query_listeners
                .drain()
                .map(|(_, (_, listener))| listener)
                .collect();
            (documents, queries)
        };

        for listener in documents {
            listener(SubscriptionEvent::Closed);
        }
        for listener in queries {
            listener(SubscriptionEvent::Closed);
        }
        debug!("memory repository closed");
    }

    fn map_serialization_error(&self, error: &serde_json::Error) -> RepositoryError {
        debug!(%error, "record serialization failed");
        RepositoryError::network(self.source, "record serialization failed")
            .with_code("repo/serialization")
    }

    fn record_value(&self, data: &T) -> Result<Value, RepositoryError> {
        serde_json::to_value(data).map_err(|error| self.map_serialization_error(&error))
    }

    fn envelope_of(&self, record: &StoredRecord<T>) -> RawDataEnvelope<T> {
        RawDataEnvelope::at(record.data.clone(), self.source, record.stored_at)
    }

    fn matches_all(&self, data: &T, filters: &[FieldFilter]) -> Result<bool, RepositoryError> {
        if filters.is_empty() {
            return Ok(true);
        }
        let doc = self.record_value(data)?;
        Ok(filters.iter().all(|filter| filter_matches(&doc, filter)))
    }

    fn collect_matches(
        &self,
        guard: &Inner<T>,
        filters: &[FieldFilter],
    ) -> Result<Vec<(String, RawDataEnvelope<T>)>, RepositoryError> {
        let mut matches = Vec::new();
        for (key, record) in &guard.records {
            if self.matches_all(&record.data, filters)? {
                matches.push((key.clone(), self.envelope_of(record)));
            }
        }
        Ok(matches)
    }

    /// Events for listeners observing `id`, capturing the current state.
    fn document_events(
        guard: &Inner<T>,
        id: &str,
    ) -> Vec<(DocumentListener<T>, SubscriptionEvent<Option<T>>)> {
        guard
            .document_listeners
            .values()
            .filter(|(target, _)| target == id)
            .map(|(_, listener)| {
                let snapshot = guard.records.get(id).map(|record| record.data.clone());
                (Arc::clone(listener), SubscriptionEvent::Data(snapshot))
            })
            .collect()
    }

    /// Events for query listeners, re-evaluating each filter set.
    fn query_events(
        &self,
        guard: &Inner<T>,
    ) -> Vec<(QueryListener<T>, SubscriptionEvent<Vec<T>>)> {
        guard
            .query_listeners
            .values()
            .map(|(filters, listener)| {
                let event = match self.collect_matches(guard, filters) {
                    Ok(matches) => SubscriptionEvent::Data(
                        matches.into_iter().map(|(_, env)| env.data).collect(),
                    ),
                    Err(error) => SubscriptionEvent::Error(error),
                };
                (Arc::clone(listener), event)
            })
            .collect()
    }

    /// Collect notifications inside the lock, deliver them outside it.
    fn notify_mutation(&self, guard: MutexGuard<'_, Inner<T>>, id: &str) {
        let documents = Self::document_events(&guard, id);
        let queries = self.query_events(&guard);
        drop(guard);

        for (listener, event) in documents {
            listener(event);
        }
        for (listener, event) in queries {
            listener(event);
        }
    }

    fn unsubscribe_document(inner: &Arc<Mutex<Inner<T>>>, token: Uuid) {
        let mut guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.document_listeners.remove(&token).is_none() {
            warn!(%token, "cancel for unknown document listener");
        }
    }

    fn unsubscribe_query(inner: &Arc<Mutex<Inner<T>>>, token: Uuid) {
        let mut guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.query_listeners.remove(&token).is_none() {
            warn!(%token, "cancel for unknown query listener");
        }
    }
}

#[async_trait]
impl<T> Repository<T, String> for MemoryRepository<T>
where
    T: Patchable + Clone + Serialize + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: &String) -> Result<Option<RawDataEnvelope<T>>, RepositoryError> {
        let mut guard = self.lock();
        if guard.closed {
            return Err(self.closed_error());
        }
        if let Some(cached) = guard.cache.get(id) {
            return Ok(Some(cached.clone().with_source(DataSource::Cache)));
        }

        let found = guard.records.get(id).map(|record| self.envelope_of(record));
        if let Some(envelope) = &found {
            guard.cache.insert(id.clone(), envelope.clone());
        }
        Ok(found)
    }

    async fn find_many(&self, ids: &[String]) -> Result<Vec<RawDataEnvelope<T>>, RepositoryError> {
        let mut found = Vec::new();
        for id in ids {
            if let Some(envelope) = self.find_by_id(id).await? {
                found.push(envelope);
            }
        }
        Ok(found)
    }

    async fn create(&self, id: &String, data: T) -> Result<RawDataEnvelope<T>, RepositoryError> {
        let guard = {
            let mut guard = self.lock();
            if guard.closed {
                return Err(self.closed_error());
            }
            if guard.records.contains_key(id) {
                return Err(RepositoryError::validation(
                    self.source,
                    "document already exists",
                )
                .with_details(json!({ "id": id })));
            }

            guard.records.insert(
                id.clone(),
                StoredRecord {
                    data,
                    stored_at: Utc::now(),
                },
            );
            guard.cache.remove(id);
            guard
        };

        let envelope = guard
            .records
            .get(id)
            .map(|record| self.envelope_of(record))
            .ok_or_else(|| RepositoryError::not_found(self.source, "created record vanished"))?;
        self.notify_mutation(guard, id);
        Ok(envelope)
    }

    async fn update(
        &self,
        id: &String,
        patch: &T::Patch,
    ) -> Result<RawDataEnvelope<T>, RepositoryError> {
        let guard = {
            let mut guard = self.lock();
            if guard.closed {
                return Err(self.closed_error());
            }
            let record = guard.records.get_mut(id).ok_or_else(|| {
                RepositoryError::not_found(self.source, "document does not exist")
                    .with_details(json!({ "id": id }))
            })?;
            record.data.apply_patch(patch);
            record.stored_at = Utc::now();
            guard.cache.remove(id);
            guard
        };

        // Contractual read-back: the update is observable before returning.
        let envelope = guard
            .records
            .get(id)
            .map(|record| self.envelope_of(record))
            .ok_or_else(|| {
                RepositoryError::not_found(self.source, "updated record not found on read-back")
            })?;
        self.notify_mutation(guard, id);
        Ok(envelope)
    }

    async fn delete(&self, id: &String) -> Result<(), RepositoryError> {
        let (removed, guard) = {
            let mut guard = self.lock();
            if guard.closed {
                return Err(self.closed_error());
            }
            let removed = guard.records.remove(id).is_some();
            guard.cache.remove(id);
            (removed, guard)
        };

        if removed {
            self.notify_mutation(guard, id);
        }
        Ok(())
    }

    async fn find_by_filter(
        &self,
        filters: &[FieldFilter],
    ) -> Result<Vec<RawDataEnvelope<T>>, RepositoryError> {
        let guard = self.lock();
        if guard.closed {
            return Err(self.closed_error());
        }
        let matches = self.collect_matches(&guard, filters)?;
        Ok(matches.into_iter().map(|(_, envelope)| envelope).collect())
    }

    async fn find_with_pagination(&self, query: &PageQuery) -> Result<Page<T>, RepositoryError> {
        let guard = self.lock();
        if guard.closed {
            return Err(self.closed_error());
        }
        let mut matches = self.collect_matches(&guard, &query.filters)?;
        drop(guard);

        if let Some(order_by) = &query.order_by {
            let mut keyed = Vec::with_capacity(matches.len());
            for (key, envelope) in matches {
                let field = self
                    .record_value(&envelope.data)?
                    .pointer(&field_pointer(&order_by.field))
                    .cloned();
                keyed.push((key, field, envelope));
            }
            keyed.sort_by(|(key_a, field_a, _), (key_b, field_b, _)| {
                let ordering = order_values(field_a.as_ref(), field_b.as_ref());
                let ordering = match order_by.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                };
                ordering.then_with(|| key_a.cmp(key_b))
            });
            matches = keyed
                .into_iter()
                .map(|(key, _, envelope)| (key, envelope))
                .collect();
        }

        let items: Vec<_> = matches
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|(_, envelope)| envelope)
            .collect();
        // Full page implies more data; exact-boundary pages report a false
        // positive by design.
        let has_more = query.limit > 0 && items.len() == query.limit;

        Ok(Page { items, has_more })
    }

    async fn count(&self, filters: &[FieldFilter]) -> Result<u64, RepositoryError> {
        let guard = self.lock();
        if guard.closed {
            return Err(self.closed_error());
        }
        let matches = self.collect_matches(&guard, filters)?;
        Ok(u64::try_from(matches.len()).unwrap_or(u64::MAX))
    }

    async fn subscribe(
        &self,
        id: &String,
        listener: DocumentListener<T>,
    ) -> Result<SubscriptionHandle, RepositoryError> {
        let token = Uuid::new_v4();
        let initial = {
            let mut guard = self.lock();
            if guard.closed {
                return Err(self.closed_error());
            }
            let snapshot = guard.records.get(id).map(|record| record.data.clone());
            guard
                .document_listeners
                .insert(token, (id.clone(), Arc::clone(&listener)));
            snapshot
        };

        listener(SubscriptionEvent::Data(initial));

        let inner = Arc::clone(&self.inner);
        Ok(SubscriptionHandle::new(move || {
            Self::unsubscribe_document(&inner, token);
        }))
    }

    async fn subscribe_to_query(
        &self,
        filters: &[FieldFilter],
        listener: QueryListener<T>,
    ) -> Result<SubscriptionHandle, RepositoryError> {
        let token = Uuid::new_v4();
        let initial = {
            let mut guard = self.lock();
            if guard.closed {
                return Err(self.closed_error());
            }
            let snapshot = self.collect_matches(&guard, filters);
            guard
                .query_listeners
                .insert(token, (filters.to_vec(), Arc::clone(&listener)));
            snapshot
        };

        match initial {
            Ok(matches) => listener(SubscriptionEvent::Data(
                matches.into_iter().map(|(_, envelope)| envelope.data).collect(),
            )),
            Err(error) => listener(SubscriptionEvent::Error(error)),
        }

        let inner = Arc::clone(&self.inner);
        Ok(SubscriptionHandle::new(move || {
            Self::unsubscribe_query(&inner, token);
        }))
    }

    async fn invalidate_cache(&self, id: Option<&String>) {
        let mut guard = self.lock();
        if let Some(id) = id {
            guard.cache.remove(id);
            debug!(id, "cache entry invalidated");
            return;
        }
        let evicted = guard.cache.len();
        guard.cache.clear();
        debug!(evicted, "cache cleared");
    }

    async fn preload(&self, ids: &[String]) {
        let reads = ids.iter().map(|id| self.find_by_id(id));
        let results = join_all(reads).await;
        let warmed = results
            .iter()
            .filter(|result| matches!(result, Ok(Some(_))))
            .count();
        debug!(requested = ids.len(), warmed, "preload finished");
    }
}

/// Translate a `.`-separated field path to a JSON pointer.
fn field_pointer(field: &str) -> String {
    let mut pointer = String::new();
    for segment in field.split('.') {
        pointer.push('/');
        pointer.push_str(segment);
    }
    pointer
}

fn filter_matches(doc: &Value, filter: &FieldFilter) -> bool {
    let field = doc.pointer(&field_pointer(&filter.field));
    match filter.op {
        FilterOp::Eq => field == Some(&filter.value),
        FilterOp::Ne => field != Some(&filter.value),
        FilterOp::Gt => compare(field, &filter.value).is_some_and(Ordering::is_gt),
        FilterOp::Gte => compare(field, &filter.value).is_some_and(Ordering::is_ge),
        FilterOp::Lt => compare(field, &filter.value).is_some_and(Ordering::is_lt),
        FilterOp::Lte => compare(field, &filter.value).is_some_and(Ordering::is_le),
        FilterOp::Contains => contains(field, &filter.value),
    }
}

fn compare(field: Option<&Value>, operand: &Value) -> Option<Ordering> {
    match (field?, operand) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    }
}

fn contains(field: Option<&Value>, operand: &Value) -> bool {
    match (field, operand) {
        (Some(Value::String(haystack)), Value::String(needle)) => haystack.contains(needle),
        (Some(Value::Array(items)), needle) => items.contains(needle),
        _ => false,
    }
}

/// Order two field values, sorting records missing the field last.
fn order_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare(Some(a), b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
