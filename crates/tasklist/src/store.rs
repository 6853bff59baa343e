//! In-memory task store.
//!
//! [`TaskStore`] mirrors the server's tasks locally, reconciles the result of
//! every successful call into that collection, and keeps a display-ready
//! error message for the last failure. Failures are annotated, never
//! swallowed: each operation hands the original [`ServiceError`] back.
//!
//! State sits behind a mutex that is never held across an await, so
//! overlapping operations interleave at the service call and the last one
//! to finish wins, both for `tasks` and for the loading flags.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::error::{ErrorBody, ServiceError};
use crate::events::{StoreEvent, StoreObserver};
use crate::models::{CreateTaskRequest, Task, UpdateTaskRequest};
use crate::service::TaskService;

/// Fallback error for [`TaskStore::load_tasks`].
pub const LOAD_TASKS_FAILED: &str = "Failed to load tasks";
/// Fallback error for [`TaskStore::create_task`].
pub const CREATE_TASK_FAILED: &str = "Failed to create task";
/// Fallback error for [`TaskStore::update_task`].
pub const UPDATE_TASK_FAILED: &str = "Failed to update task";
/// Fallback error for [`TaskStore::delete_task`].
pub const DELETE_TASK_FAILED: &str = "Failed to delete task";

/// Observable store state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Known tasks, unique by id, most recently created/fetched first.
    pub tasks: Vec<Task>,
    pub loading_list: bool,
    pub loading_mutation: bool,
    /// Display message for the last failure.
    pub error: Option<String>,
}

impl StoreState {
    #[must_use]
    pub fn has_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Look up a cached task.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

#[derive(Debug, Clone, Copy)]
enum Flag {
    List,
    Mutation,
}

/// Resets a loading flag when dropped, including when the operation's
/// future is dropped mid-flight.
struct Loading<'a> {
    store: &'a TaskStore,
    flag: Flag,
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.store.set_loading(self.flag, false);
    }
}

/// Client-side cache of server tasks.
pub struct TaskStore {
    service: Arc<dyn TaskService>,
    state: Mutex<StoreState>,
    observers: RwLock<Vec<Arc<dyn StoreObserver>>>,
}

impl TaskStore {
    /// Create an empty store on top of a service.
    #[must_use]
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        Self {
            service,
            state: Mutex::new(StoreState::default()),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer. Observers are called in registration order.
    pub fn subscribe(&self, observer: Arc<dyn StoreObserver>) {
        debug!(observer = observer.name(), "Observer registered");
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    /// Copy of the cached tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    #[must_use]
    pub fn has_tasks(&self) -> bool {
        self.lock().has_tasks()
    }

    #[must_use]
    pub fn loading_list(&self) -> bool {
        self.lock().loading_list
    }

    #[must_use]
    pub fn loading_mutation(&self) -> bool {
        self.lock().loading_mutation
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Fetch every task and replace the local collection with the result.
    ///
    /// # Errors
    /// Returns the service error after recording its message.
    pub async fn load_tasks(&self) -> Result<(), ServiceError> {
        self.clear_error();
        let _loading = self.begin(Flag::List);

        match self.service.get_all().await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "Loaded tasks");
                self.reconcile(|current| {
                    *current = tasks;
                    true
                });
                Ok(())
            }
            Err(err) => Err(self.fail(err, LOAD_TASKS_FAILED)),
        }
    }

    /// Return the cached task with `id`, fetching it on a miss.
    ///
    /// A cache hit makes no network call and leaves the loading flags alone.
    ///
    /// # Errors
    /// Returns the service error after recording its message.
    pub async fn get_task_by_id(&self, id: &str) -> Result<Task, ServiceError> {
        self.clear_error();

        let cached = self.lock().find(id).cloned();
        if let Some(task) = cached {
            trace!(task_id = %id, "Task cache hit");
            return Ok(task);
        }

        let _loading = self.begin(Flag::List);

        match self.service.get_by_id(id).await {
            Ok(task) => {
                debug!(task_id = %task.id, "Fetched task");
                let fetched = task.clone();
                self.reconcile(|tasks| {
                    upsert(tasks, fetched);
                    true
                });
                Ok(task)
            }
            Err(err) => Err(self.fail(err, &format!("Failed to fetch task {id}"))),
        }
    }

    /// Create a task and put it first in the collection.
    ///
    /// # Errors
    /// Returns the service error after recording its message.
    pub async fn create_task(&self, payload: CreateTaskRequest) -> Result<Task, ServiceError> {
        self.clear_error();
        let _loading = self.begin(Flag::Mutation);

        let payload = payload.normalized();
        match self.service.create(&payload).await {
            Ok(created) => {
                info!(task_id = %created.id, title = %created.title, "Task created");
                let task = created.clone();
                self.reconcile(|tasks| {
                    tasks.retain(|t| t.id != task.id);
                    tasks.insert(0, task);
                    true
                });
                Ok(created)
            }
            Err(err) => Err(self.fail(err, CREATE_TASK_FAILED)),
        }
    }

    /// Update a task, replacing the cached entry in place.
    ///
    /// A task the store did not know about is inserted first.
    ///
    /// # Errors
    /// Returns the service error after recording its message.
    pub async fn update_task(
        &self,
        id: &str,
        payload: UpdateTaskRequest,
    ) -> Result<Task, ServiceError> {
        self.clear_error();
        let _loading = self.begin(Flag::Mutation);

        let payload = payload.normalized();
        match self.service.update(id, &payload).await {
            Ok(updated) => {
                info!(task_id = %updated.id, status = %updated.status, "Task updated");
                let task = updated.clone();
                self.reconcile(|tasks| {
                    replace_or_prepend(tasks, id, task);
                    true
                });
                Ok(updated)
            }
            Err(err) => Err(self.fail(err, UPDATE_TASK_FAILED)),
        }
    }

    /// Delete a task and drop it from the collection.
    ///
    /// # Errors
    /// Returns the service error after recording its message.
    pub async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        self.clear_error();
        let _loading = self.begin(Flag::Mutation);

        match self.service.delete(id).await {
            Ok(()) => {
                info!(task_id = %id, "Task deleted");
                self.reconcile(|tasks| {
                    let before = tasks.len();
                    tasks.retain(|t| t.id != id);
                    tasks.len() != before
                });
                Ok(())
            }
            Err(err) => Err(self.fail(err, DELETE_TASK_FAILED)),
        }
    }

    /// Reset the error message.
    pub fn clear_error(&self) {
        let changed = {
            let mut state = self.lock();
            state.error.take().is_some()
        };
        if changed {
            self.emit(StoreEvent::ErrorChanged { error: None });
        }
    }

    /// Record the display message for `err`, or `fallback` when the failure
    /// carries none.
    fn set_error(&self, err: &ServiceError, fallback: &str) {
        let message = extract_error_message(err).unwrap_or_else(|| fallback.to_string());
        warn!(error = %err, message = %message, "Task operation failed");

        self.lock().error = Some(message.clone());
        self.emit(StoreEvent::ErrorChanged {
            error: Some(message),
        });
    }

    fn fail(&self, err: ServiceError, fallback: &str) -> ServiceError {
        self.set_error(&err, fallback);
        err
    }

    fn begin(&self, flag: Flag) -> Loading<'_> {
        self.set_loading(flag, true);
        Loading { store: self, flag }
    }

    fn set_loading(&self, flag: Flag, loading: bool) {
        let changed = {
            let mut state = self.lock();
            let slot = match flag {
                Flag::List => &mut state.loading_list,
                Flag::Mutation => &mut state.loading_mutation,
            };
            std::mem::replace(slot, loading) != loading
        };

        if changed {
            self.emit(match flag {
                Flag::List => StoreEvent::LoadingListChanged { loading },
                Flag::Mutation => StoreEvent::LoadingMutationChanged { loading },
            });
        }
    }

    /// Apply `f` to the collection; `f` reports whether it changed anything.
    fn reconcile(&self, f: impl FnOnce(&mut Vec<Task>) -> bool) {
        let count = {
            let mut state = self.lock();
            f(&mut state.tasks).then_some(state.tasks.len())
        };
        if let Some(count) = count {
            self.emit(StoreEvent::TasksChanged { count });
        }
    }

    fn emit(&self, event: StoreEvent) {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for observer in observers {
            trace!(observer = observer.name(), event = event.kind(), "Dispatching");
            observer.on_event(&event);
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Overwrite the entry with the same id in place, or insert at the front.
fn upsert(tasks: &mut Vec<Task>, task: Task) {
    match tasks.iter().position(|t| t.id == task.id) {
        Some(idx) => tasks[idx] = task,
        None => tasks.insert(0, task),
    }
}

/// Replace the entry cached under `id` in place, or insert `task` at the front.
///
/// Keeps ids unique even when the server answers with a different id.
fn replace_or_prepend(tasks: &mut Vec<Task>, id: &str, task: Task) {
    let Some(idx) = tasks.iter().position(|t| t.id == id) else {
        tasks.retain(|t| t.id != task.id);
        tasks.insert(0, task);
        return;
    };

    let new_id = task.id.clone();
    tasks[idx] = task;

    let mut position = 0;
    tasks.retain(|t| {
        let keep = position == idx || t.id != new_id;
        position += 1;
        keep
    });
}

/// Display message carried by a failed call, if any.
///
/// Plain-text bodies are used verbatim, then a JSON `message`, then the
/// `message` of every entry in a JSON `errors` list joined by newlines.
/// Failures without a usable body return `None`.
#[must_use]
pub fn extract_error_message(err: &ServiceError) -> Option<String> {
    match err.body()? {
        ErrorBody::Empty => None,
        ErrorBody::Text(text) => Some(text.clone()),
        ErrorBody::Json(Value::String(text)) => non_blank(text),
        ErrorBody::Json(Value::Object(body)) => {
            if let Some(message) = body.get("message").and_then(value_text) {
                return Some(message);
            }
            let Some(Value::Array(errors)) = body.get("errors") else {
                return None;
            };
            let joined = errors
                .iter()
                .filter_map(|entry| {
                    entry
                        .get("message")
                        .filter(|m| !m.is_null())
                        .map_or_else(|| value_text(entry), value_text)
                })
                .collect::<Vec<_>>()
                .join("\n");
            non_blank(&joined)
        }
        ErrorBody::Json(_) => None,
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(s),
        Value::Null | Value::Bool(false) => None,
        other => Some(other.to_string()),
    }
}

fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
