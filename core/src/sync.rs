use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::client::{CollectionClient, ReferenceSource};
use crate::form::{Draft, FormController, FormMode, Submission};
use crate::resource::Resource;
use crate::targets;
use crate::{ApiError, RecordId, ReferenceKind, ReferenceOption, ReferenceSet};

/// Owned future handed to the UI runtime; it holds no borrow of the view.
pub type TaskFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Load generations are unique across every view in the process.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Error(ApiError),
}

/// Records currently believed to exist, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<T> {
    pub status: LoadStatus,
    pub records: Vec<T>,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            status: LoadStatus::Loading,
            records: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Replace the collection with a fresh `list()`.
    Refetch,
    /// Drop the record locally by id.
    RemoveLocal,
}

impl Mutation {
    /// One policy for every resource: joined fields only come from the
    /// server, so create and update refetch while delete patches locally.
    pub const fn reconciliation(self) -> Reconciliation {
        match self {
            Mutation::Create | Mutation::Update => Reconciliation::Refetch,
            Mutation::Delete => Reconciliation::RemoveLocal,
        }
    }
}

/// Result of a list request, tagged with the generation that issued it.
#[derive(Debug, Clone)]
pub struct LoadOutcome<R: Resource> {
    pub generation: u64,
    pub records: Result<Vec<R::Record>, ApiError>,
    /// Reference lists that loaded; failed kinds keep what the view had.
    pub references: Vec<(ReferenceKind, Vec<ReferenceOption>)>,
}

#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub id: RecordId,
    pub result: Result<(), ApiError>,
}

/// Collection state, reference lists, form and delete gate for one view.
///
/// Every state change goes through `&mut self`, so the owning UI thread is
/// the only writer. Network work is handed out as owned futures by the
/// `*_task` methods and folded back in by the matching `apply_*` method.
pub struct CollectionView<R: Resource> {
    client: Arc<dyn CollectionClient<R>>,
    references_source: Arc<dyn ReferenceSource>,
    state: CollectionState<R::Record>,
    references: ReferenceSet,
    form: FormController<R::Draft>,
    pending_delete: Option<RecordId>,
    deleting: Option<RecordId>,
    alert: Option<String>,
    generation: u64,
}

impl<R: Resource> CollectionView<R> {
    pub fn new(
        client: Arc<dyn CollectionClient<R>>,
        references_source: Arc<dyn ReferenceSource>,
    ) -> Self {
        Self {
            client,
            references_source,
            state: CollectionState::default(),
            references: ReferenceSet::default(),
            form: FormController::new(),
            pending_delete: None,
            deleting: None,
            alert: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &CollectionState<R::Record> {
        &self.state
    }

    pub fn status(&self) -> &LoadStatus {
        &self.state.status
    }

    pub fn records(&self) -> &[R::Record] {
        &self.state.records
    }

    pub fn record(&self, id: RecordId) -> Option<&R::Record> {
        self.state
            .records
            .iter()
            .find(|record| R::record_id(record) == id)
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    pub fn form(&self) -> &FormController<R::Draft> {
        &self.form
    }

    pub fn pending_delete(&self) -> Option<RecordId> {
        self.pending_delete
    }

    pub fn deleting(&self) -> Option<RecordId> {
        self.deleting
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.status == LoadStatus::Loading
    }

    /// Primary list plus every reference list the resource needs, fetched
    /// concurrently.
    pub fn load_task(&mut self) -> TaskFuture<LoadOutcome<R>> {
        self.generation = next_generation();
        self.state.status = LoadStatus::Loading;
        debug!(
            target: targets::SYNC,
            resource = R::PATH,
            generation = self.generation,
            "Loading collection"
        );

        let generation = self.generation;
        let client = Arc::clone(&self.client);
        let source = Arc::clone(&self.references_source);
        Box::pin(async move {
            let (records, references) =
                tokio::join!(client.list(), fetch_references(source, R::REFERENCES));
            LoadOutcome {
                generation,
                records,
                references,
            }
        })
    }

    /// Primary list only, used to reconcile after a mutation.
    pub fn refetch_task(&mut self) -> TaskFuture<LoadOutcome<R>> {
        self.generation = next_generation();
        debug!(
            target: targets::SYNC,
            resource = R::PATH,
            generation = self.generation,
            "Refetching collection"
        );

        let generation = self.generation;
        let client = Arc::clone(&self.client);
        Box::pin(async move {
            LoadOutcome {
                generation,
                records: client.list().await,
                references: Vec::new(),
            }
        })
    }

    /// Returns `false` when the outcome was superseded by a newer request.
    /// Reference lists are still taken from a superseded outcome.
    pub fn apply_load(&mut self, outcome: LoadOutcome<R>) -> bool {
        for (kind, options) in outcome.references {
            self.references.set(kind, options);
        }

        if outcome.generation != self.generation {
            debug!(
                target: targets::SYNC,
                resource = R::PATH,
                stale = outcome.generation,
                current = self.generation,
                "Dropping stale list result"
            );
            return false;
        }

        match outcome.records {
            Ok(records) => {
                debug!(
                    target: targets::SYNC,
                    resource = R::PATH,
                    count = records.len(),
                    "Collection ready"
                );
                self.state.records = records;
                self.state.status = LoadStatus::Ready;
            }
            Err(error) => {
                warn!(
                    target: targets::SYNC,
                    resource = R::PATH,
                    "Collection load failed: {}",
                    error.technical_detail()
                );
                self.state.records.clear();
                self.state.status = LoadStatus::Error(error);
            }
        }
        true
    }

    /// `false` while a submission is still in flight.
    pub fn open_create(&mut self) -> bool {
        self.form.open_create()
    }

    /// Seeds the form from the listed record; `false` if it is gone or a
    /// submission is still in flight.
    pub fn open_edit(&mut self, id: RecordId) -> bool {
        if self.form.is_submitting() {
            return false;
        }
        let Some(record) = self.record(id).cloned() else {
            self.alert = Some(format!("That {} is no longer listed.", R::LABEL));
            return false;
        };
        self.form.open_edit(id, &record)
    }

    pub fn set_field(&mut self, field: <R::Draft as Draft>::Field, value: String) {
        self.form.set_field(field, value);
    }

    pub fn cancel_form(&mut self) -> bool {
        self.form.cancel()
    }

    /// Validates the draft and starts the create or update call.
    ///
    /// `None` means nothing was sent: the form is closed, already
    /// submitting, or the draft failed local validation.
    pub fn submit_task(&mut self) -> Option<TaskFuture<Result<R::Record, ApiError>>> {
        let submission = self.form.begin_submit()?;
        let client = Arc::clone(&self.client);
        Some(Box::pin(async move {
            match submission {
                Submission::Create(payload) => client.create(payload).await,
                Submission::Update(id, payload) => client.update(id, payload).await,
            }
        }))
    }

    /// Folds a create/update answer into the form. `Some(Refetch)` asks the
    /// caller to run [`Self::refetch_task`].
    pub fn apply_submit(&mut self, result: Result<R::Record, ApiError>) -> Option<Reconciliation> {
        let mutation = match self.form.mode() {
            Some(FormMode::Editing(_)) => Mutation::Update,
            _ => Mutation::Create,
        };

        match result {
            Ok(record) => {
                info!(
                    target: targets::SYNC,
                    resource = R::PATH,
                    id = %R::record_id(&record),
                    ?mutation,
                    "Record saved"
                );
                self.form.finish_submit(Ok(()));
                Some(mutation.reconciliation())
            }
            Err(error) => {
                warn!(
                    target: targets::SYNC,
                    resource = R::PATH,
                    ?mutation,
                    "Save failed: {}",
                    error.technical_detail()
                );
                let message = error.user_message(&format!("Failed to save {}.", R::LABEL));
                self.form.finish_submit(Err(message));
                error.is_not_found().then_some(Reconciliation::Refetch)
            }
        }
    }

    /// First half of the confirmation gate; nothing is sent yet.
    pub fn request_delete(&mut self, id: RecordId) -> bool {
        if self.deleting.is_some() || self.record(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub fn decline_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            debug!(target: targets::SYNC, resource = R::PATH, id = %id, "Delete declined");
        }
    }

    pub fn confirm_delete_task(&mut self) -> Option<TaskFuture<DeleteOutcome>> {
        let id = self.pending_delete.take()?;
        self.deleting = Some(id);
        let client = Arc::clone(&self.client);
        Some(Box::pin(async move {
            DeleteOutcome {
                id,
                result: client.delete(id).await,
            }
        }))
    }

    pub fn apply_delete(&mut self, outcome: DeleteOutcome) -> Option<Reconciliation> {
        self.deleting = None;
        let DeleteOutcome { id, result } = outcome;

        match result {
            Ok(()) => {
                info!(target: targets::SYNC, resource = R::PATH, id = %id, "Record deleted");
                self.state.records.retain(|record| R::record_id(record) != id);
                Some(Mutation::Delete.reconciliation())
            }
            Err(error) => {
                warn!(
                    target: targets::SYNC,
                    resource = R::PATH,
                    id = %id,
                    "Delete failed: {}",
                    error.technical_detail()
                );
                self.alert = Some(error.user_message(&format!("Failed to delete {}.", R::LABEL)));
                error.is_not_found().then_some(Reconciliation::Refetch)
            }
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub async fn load(&mut self) {
        let outcome = self.load_task().await;
        self.apply_load(outcome);
    }

    pub async fn refetch(&mut self) {
        let outcome = self.refetch_task().await;
        self.apply_load(outcome);
    }

    /// Submits the open form and reconciles. Returns `true` once the server
    /// accepted the change.
    pub async fn submit(&mut self) -> bool {
        let Some(task) = self.submit_task() else {
            return false;
        };
        let result = task.await;
        let accepted = result.is_ok();
        if self.apply_submit(result) == Some(Reconciliation::Refetch) {
            self.refetch().await;
        }
        accepted
    }

    /// Runs the whole delete gate; `confirm == false` declines it.
    pub async fn delete(&mut self, id: RecordId, confirm: bool) -> bool {
        if !self.request_delete(id) {
            return false;
        }
        if !confirm {
            self.decline_delete();
            return false;
        }
        let Some(task) = self.confirm_delete_task() else {
            return false;
        };
        let outcome = task.await;
        let removed = outcome.result.is_ok();
        if self.apply_delete(outcome) == Some(Reconciliation::Refetch) {
            self.refetch().await;
        }
        removed
    }
}

async fn fetch_references(
    source: Arc<dyn ReferenceSource>,
    kinds: &'static [ReferenceKind],
) -> Vec<(ReferenceKind, Vec<ReferenceOption>)> {
    let fetch = |kind: ReferenceKind| {
        let source = Arc::clone(&source);
        async move {
            if !kinds.contains(&kind) {
                return None;
            }
            match source.options(kind).await {
                Ok(options) => Some((kind, options)),
                Err(error) => {
                    warn!(
                        target: targets::SYNC,
                        reference = kind.path(),
                        "Reference list unavailable: {}",
                        error.technical_detail()
                    );
                    None
                }
            }
        }
    };

    let (categories, locations, printers) = tokio::join!(
        fetch(ReferenceKind::Categories),
        fetch(ReferenceKind::Locations),
        fetch(ReferenceKind::Printers),
    );
    [categories, locations, printers].into_iter().flatten().collect()
}
