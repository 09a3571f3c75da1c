//! The task board as seen by a presentation layer.
//!
//! [`TaskBoard`] is the only writer of board state. Each public operation
//! catches its own errors, hands them to the configured [`ErrorReporter`] and
//! leaves the board usable; none of them return an error to the caller.

use crate::{
    api::{HttpTaskRepository, TaskRepository},
    config::ClientConfig,
    domain::{Board, MoveDescriptor, Task, TaskDraft, TaskId, TaskStatus},
    error::{BoardError, Result},
    prompt::{ConfirmBroker, ConfirmRequest, TaskDialogBroker, TaskDialogRequest},
    report::{ErrorReporter, Operation, TracingReporter},
    storage::BoardCache,
    store::BoardStore,
    sync::{apply_move, AppliedMove, Settlement, SyncState},
};
use std::collections::HashSet;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

/// Where the board's initial contents came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationSource {
    /// A non-empty board restored from the session cache
    Cache,
    /// Tasks fetched from the remote collection
    Remote(usize),
    /// The fetch failed and the board was left empty
    Failed,
    /// Hydration had already run this session
    AlreadyHydrated,
}

/// Board state plus the collaborators needed to keep it in sync
pub struct TaskBoard {
    store: BoardStore,
    repository: Arc<dyn TaskRepository>,
    cache: Option<Arc<dyn BoardCache>>,
    reporter: Arc<dyn ErrorReporter>,
    hydrated: AtomicBool,
    // Held across snapshot and save so the newest board is written last
    persist_lock: Mutex<()>,
}

impl TaskBoard {
    /// Creates an empty board backed by the given repository, without a
    /// session cache
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self {
            store: BoardStore::new(),
            repository,
            cache: None,
            reporter: Arc::new(TracingReporter),
            hydrated: AtomicBool::new(false),
            persist_lock: Mutex::new(()),
        }
    }

    /// Creates a board talking HTTP to the configured collection, cached on
    /// disk under the configured storage key
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let repository = Arc::new(HttpTaskRepository::new(config)?);
        let board = Self::new(repository);

        #[cfg(feature = "file-storage")]
        let board = board.with_cache(Arc::new(crate::storage::FileCache::new(
            &config.cache_dir,
            config.storage_key.clone(),
        )));

        Ok(board)
    }

    pub fn with_cache(mut self, cache: Arc<dyn BoardCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Current board contents
    pub fn board(&self) -> Board {
        self.store.snapshot()
    }

    pub fn column(&self, status: TaskStatus) -> Vec<Task> {
        self.store.read(|board| board.column(status).to_vec())
    }

    /// Receiver notified on every board change
    pub fn subscribe(&self) -> watch::Receiver<Board> {
        self.store.subscribe()
    }

    pub fn has_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::SeqCst)
    }

    /// Loads the initial board, once per session. A non-empty cached board
    /// wins over the remote collection; fetched tasks all land in todo.
    pub async fn hydrate(&self) -> HydrationSource {
        if self.hydrated.swap(true, Ordering::SeqCst) {
            return HydrationSource::AlreadyHydrated;
        }

        if let Some(board) = self.load_cached().await {
            info!(tasks = board.len(), "restored board from cache");
            self.store.replace_all(board);
            return HydrationSource::Cache;
        }

        match self.repository.list().await {
            Ok(records) => {
                // A repeated id keeps its first occurrence
                let mut seen = HashSet::new();
                let tasks: Vec<Task> = records
                    .into_iter()
                    .filter(|record| seen.insert(record.id))
                    .map(|record| record.into_task().with_status(TaskStatus::Todo))
                    .collect();
                let count = tasks.len();
                self.store.replace(TaskStatus::Todo, tasks);
                self.persist().await;
                info!(tasks = count, "fetched board from remote");
                HydrationSource::Remote(count)
            }
            Err(err) => {
                self.report(Operation::Hydrate, &err);
                HydrationSource::Failed
            }
        }
    }

    async fn load_cached(&self) -> Option<Board> {
        let cache = self.cache.as_ref()?;
        match cache.load().await {
            Ok(Some(board)) if !board.is_empty() => Some(board),
            Ok(_) => None,
            Err(err) => {
                self.report(Operation::Hydrate, &err);
                None
            }
        }
    }

    /// Creates a task and puts it at the top of the todo column
    pub async fn add_task(&self, draft: TaskDraft) -> Option<Task> {
        let result = self.try_add_task(draft).await;
        self.settle_result(Operation::AddTask, result).await
    }

    async fn try_add_task(&self, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let task = self.repository.create(&draft).await?.with_status(TaskStatus::Todo);

        let inserted = task.clone();
        self.store.modify(move |board| {
            // The server owns ids; a reused id replaces the stale entry
            board.remove(inserted.id);
            board.insert(0, inserted);
            true
        });
        debug!(id = %task.id, "task added");
        Ok(task)
    }

    /// Saves an edited task and files it under the status the server returns
    pub async fn update_task(&self, task: Task) -> Option<Task> {
        let result = self.try_update_task(task).await;
        self.settle_result(Operation::UpdateTask, result).await
    }

    async fn try_update_task(&self, task: Task) -> Result<Task> {
        task.validate()?;
        let updated = self.repository.update(&task).await?;

        let placed = updated.clone();
        self.store.modify(move |board| {
            let index = match board.remove(placed.id) {
                Some((column, index, _)) if column == placed.status => index,
                _ => 0,
            };
            board.insert(index, placed);
            true
        });
        debug!(id = %updated.id, status = updated.status.as_str(), "task updated");
        Ok(updated)
    }

    /// Deletes a task from the server and then from the board
    pub async fn delete_task(&self, id: TaskId) -> bool {
        let result = self.try_delete_task(id).await;
        self.settle_result(Operation::DeleteTask, result)
            .await
            .is_some()
    }

    async fn try_delete_task(&self, id: TaskId) -> Result<()> {
        self.repository.delete(id).await?;
        let removed = self.store.modify(|board| board.remove(id).is_some());
        debug!(%id, removed, "task deleted");
        Ok(())
    }

    /// Applies a drag gesture locally. Cross-column moves still need
    /// [`TaskBoard::finish_move`]. Returns `None` if the gesture was invalid.
    pub fn begin_move(&self, descriptor: &MoveDescriptor) -> Option<AppliedMove> {
        match apply_move(&self.store, descriptor) {
            Ok(applied) => Some(applied),
            Err(err) => {
                self.report(Operation::MoveTask, &err);
                None
            }
        }
    }

    /// Persists a locally applied gesture and, for cross-column moves,
    /// confirms it remotely or rolls it back
    pub async fn finish_move(&self, applied: AppliedMove) -> SyncState {
        match applied {
            AppliedMove::Unchanged => SyncState::Settled,
            AppliedMove::Reordered => {
                self.persist().await;
                SyncState::Settled
            }
            AppliedMove::Pending(pending) => {
                self.persist().await;
                match pending.settle(&self.store, self.repository.as_ref()).await {
                    Settlement::Committed(_) => SyncState::Settled,
                    Settlement::RolledBack(err) => {
                        self.report(Operation::MoveTask, &err);
                        self.persist().await;
                        SyncState::RolledBack
                    }
                }
            }
        }
    }

    /// Applies and settles a drag gesture. Returns `None` if the gesture
    /// was invalid.
    pub async fn move_task(&self, descriptor: &MoveDescriptor) -> Option<SyncState> {
        let applied = self.begin_move(descriptor)?;
        Some(self.finish_move(applied).await)
    }

    /// Asks for confirmation and deletes the task only if the user agrees
    pub async fn delete_with_confirmation(&self, id: TaskId, prompts: &ConfirmBroker) -> bool {
        match prompts.request(ConfirmRequest::delete_task()).await {
            Some(true) => self.delete_task(id).await,
            _ => false,
        }
    }

    /// Collects a new task from a dialog and adds it
    pub async fn create_via_dialog(&self, prompts: &TaskDialogBroker) -> Option<Task> {
        let draft = prompts.request(TaskDialogRequest::create()).await?;
        self.add_task(draft).await
    }

    /// Opens an edit dialog for a task and saves the result
    pub async fn edit_via_dialog(&self, id: TaskId, prompts: &TaskDialogBroker) -> Option<Task> {
        let Some(task) = self.store.read(|board| board.find(id).cloned()) else {
            self.report(Operation::UpdateTask, &BoardError::TaskNotFound(id));
            return None;
        };
        let draft = prompts.request(TaskDialogRequest::edit(task.clone())).await?;
        self.update_task(draft.apply_to(&task)).await
    }

    async fn settle_result<T>(&self, operation: Operation, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.persist().await;
                Some(value)
            }
            Err(err) => {
                self.report(operation, &err);
                None
            }
        }
    }

    async fn persist(&self) {
        let Some(cache) = &self.cache else {
            return;
        };
        let _guard = self.persist_lock.lock().await;
        let board = self.store.snapshot();
        if let Err(err) = cache.save(&board).await {
            self.report(Operation::PersistBoard, &err);
        }
    }

    fn report(&self, operation: Operation, err: &BoardError) {
        self.reporter.report(operation, err);
    }
}
