use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::{ApiFuture, CollectionClient, ReferenceSource, collection_path, item_path};
use crate::resource::Resource;
use crate::{ApiError, RecordId, ReferenceKind, ReferenceOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOperation {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockCalls {
    pub list: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

type Materializer<R> = dyn Fn(RecordId, &<R as Resource>::Payload) -> <R as Resource>::Record
    + Send
    + Sync;

struct MockStore<R: Resource> {
    records: Vec<R::Record>,
    next_id: u64,
    failures: VecDeque<(MockOperation, ApiError)>,
    calls: MockCalls,
}

/// In-memory stand-in for one REST collection.
///
/// Plays the server's part: assigns ids, rebuilds records (joined fields
/// included) through `materialize`, and answers queued failures first.
pub struct MockCollectionClient<R: Resource> {
    store: Arc<Mutex<MockStore<R>>>,
    materialize: Arc<Materializer<R>>,
}

impl<R: Resource> Clone for MockCollectionClient<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            materialize: Arc::clone(&self.materialize),
        }
    }
}

impl<R: Resource> fmt::Debug for MockCollectionClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.lock();
        f.debug_struct("MockCollectionClient")
            .field("resource", &R::PATH)
            .field("records", &store.records.len())
            .field("calls", &store.calls)
            .finish()
    }
}

impl<R: Resource> MockCollectionClient<R> {
    pub fn new(
        materialize: impl Fn(RecordId, &R::Payload) -> R::Record + Send + Sync + 'static,
    ) -> Self {
        Self {
            store: Arc::new(Mutex::new(MockStore {
                records: Vec::new(),
                next_id: 1,
                failures: VecDeque::new(),
                calls: MockCalls::default(),
            })),
            materialize: Arc::new(materialize),
        }
    }

    pub fn with_records(self, records: Vec<R::Record>) -> Self {
        {
            let mut store = self.lock();
            let highest = records
                .iter()
                .map(|record| R::record_id(record).0)
                .max()
                .unwrap_or(0);
            store.next_id = store.next_id.max(highest + 1);
            store.records = records;
        }
        self
    }

    /// Makes the next call of `operation` fail with `error`.
    pub fn push_failure(&self, operation: MockOperation, error: ApiError) {
        self.lock().failures.push_back((operation, error));
    }

    pub fn records(&self) -> Vec<R::Record> {
        self.lock().records.clone()
    }

    pub fn calls(&self) -> MockCalls {
        self.lock().calls
    }

    fn lock(&self) -> MutexGuard<'_, MockStore<R>> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn take_failure(store: &mut MockStore<R>, operation: MockOperation) -> Option<ApiError> {
        let index = store
            .failures
            .iter()
            .position(|(queued, _)| *queued == operation)?;
        store.failures.remove(index).map(|(_, error)| error)
    }

    fn not_found(endpoint: String, id: RecordId) -> ApiError {
        ApiError::NotFound {
            endpoint,
            detail: Some(format!("{} {id} not found", R::LABEL)),
        }
    }
}

impl<R: Resource> CollectionClient<R> for MockCollectionClient<R> {
    fn list(&self) -> ApiFuture<'_, Vec<R::Record>> {
        Box::pin(async move {
            let mut store = self.lock();
            store.calls.list += 1;
            if let Some(error) = Self::take_failure(&mut store, MockOperation::List) {
                return Err(error);
            }
            Ok(store.records.clone())
        })
    }

    fn create(&self, payload: R::Payload) -> ApiFuture<'_, R::Record> {
        Box::pin(async move {
            let mut store = self.lock();
            store.calls.create += 1;
            if let Some(error) = Self::take_failure(&mut store, MockOperation::Create) {
                return Err(error);
            }
            let id = RecordId(store.next_id);
            store.next_id += 1;
            let record = (self.materialize)(id, &payload);
            store.records.push(record.clone());
            Ok(record)
        })
    }

    fn update(&self, id: RecordId, payload: R::Payload) -> ApiFuture<'_, R::Record> {
        Box::pin(async move {
            let mut store = self.lock();
            store.calls.update += 1;
            if let Some(error) = Self::take_failure(&mut store, MockOperation::Update) {
                return Err(error);
            }
            let Some(index) = store
                .records
                .iter()
                .position(|record| R::record_id(record) == id)
            else {
                return Err(Self::not_found(
                    format!("PUT {}", item_path(R::PATH, id)),
                    id,
                ));
            };
            let record = (self.materialize)(id, &payload);
            store.records[index] = record.clone();
            Ok(record)
        })
    }

    fn delete(&self, id: RecordId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let mut store = self.lock();
            store.calls.delete += 1;
            if let Some(error) = Self::take_failure(&mut store, MockOperation::Delete) {
                return Err(error);
            }
            let before = store.records.len();
            store.records.retain(|record| R::record_id(record) != id);
            if store.records.len() == before {
                return Err(Self::not_found(
                    format!("DELETE {}", item_path(R::PATH, id)),
                    id,
                ));
            }
            Ok(())
        })
    }
}

/// Fixed reference lists keyed by kind; kinds without an entry answer with
/// an empty list.
#[derive(Debug, Clone, Default)]
pub struct MockReferenceSource {
    answers: HashMap<ReferenceKind, Result<Vec<ReferenceOption>, ApiError>>,
}

impl MockReferenceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, kind: ReferenceKind, options: Vec<ReferenceOption>) -> Self {
        self.answers.insert(kind, Ok(options));
        self
    }

    pub fn with_failure(mut self, kind: ReferenceKind, error: ApiError) -> Self {
        self.answers.insert(kind, Err(error));
        self
    }
}

impl ReferenceSource for MockReferenceSource {
    fn options(&self, kind: ReferenceKind) -> ApiFuture<'_, Vec<ReferenceOption>> {
        let answer = self.answers.get(&kind).cloned().unwrap_or(Ok(Vec::new()));
        Box::pin(async move { answer })
    }
}

/// Network failure for `GET /api/<resource>`, as the REST client reports it.
pub fn unreachable(resource: &str) -> ApiError {
    ApiError::Network {
        endpoint: format!("GET {}", collection_path(resource)),
        details: "connection refused".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::LocationResource;
    use crate::{Location, LocationPayload};

    fn run_future<T>(future: impl std::future::Future<Output = T>) -> T {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("tokio runtime");
        runtime.block_on(future)
    }

    fn locations() -> MockCollectionClient<LocationResource> {
        MockCollectionClient::new(|id, payload: &LocationPayload| Location {
            id,
            name: payload.name.clone(),
            address: payload.address.clone(),
            items: 0,
            printers: 0,
        })
    }

    #[test]
    fn create_assigns_ids_after_seeded_records() {
        let mock = locations().with_records(vec![Location {
            id: RecordId(7),
            name: "Main School".to_string(),
            address: String::new(),
            items: 0,
            printers: 0,
        }]);

        let created = run_future(CollectionClient::<LocationResource>::create(
            &mock,
            LocationPayload {
                name: "Branch School A".to_string(),
                address: String::new(),
            },
        ))
        .expect("create");

        assert_eq!(created.id, RecordId(8));
        assert_eq!(mock.records().len(), 2);
        assert_eq!(mock.calls().create, 1);
    }

    #[test]
    fn queued_failure_applies_to_matching_operation_only() {
        let mock = locations();
        mock.push_failure(MockOperation::Delete, unreachable("locations"));

        let listed = run_future(CollectionClient::<LocationResource>::list(&mock));
        assert!(listed.is_ok());

        let error = run_future(CollectionClient::<LocationResource>::delete(&mock, RecordId(1)))
            .expect_err("queued failure");
        assert!(error.is_network());
    }

    #[test]
    fn delete_of_missing_record_is_not_found() {
        let mock = locations();
        let error = run_future(CollectionClient::<LocationResource>::delete(&mock, RecordId(3)))
            .expect_err("missing record");
        assert!(error.is_not_found());
    }

    #[test]
    fn reference_source_answers_configured_kinds() {
        let source = MockReferenceSource::new()
            .with_options(
                ReferenceKind::Categories,
                vec![ReferenceOption::new(RecordId(1), "Toner")],
            )
            .with_failure(ReferenceKind::Printers, unreachable("printers"));

        let categories = run_future(source.options(ReferenceKind::Categories)).expect("categories");
        assert_eq!(categories.len(), 1);
        let locations = run_future(source.options(ReferenceKind::Locations)).expect("locations");
        assert!(locations.is_empty());
        assert!(run_future(source.options(ReferenceKind::Printers)).is_err());
    }
}
