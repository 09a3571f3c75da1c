//! Scripted repository for exercising the board without a server.

use crate::{
    api::TaskRepository,
    domain::{Task, TaskDraft, TaskId, TaskRecord},
    error::{BoardError, Result},
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List,
    Create(TaskDraft),
    Update(Task),
    Delete(TaskId),
}

/// Releases a held update: `Ok(())` lets it succeed, an error makes it fail
pub(crate) type Gate = oneshot::Sender<Result<()>>;

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    records: Vec<TaskRecord>,
    next_id: u64,
    failures: VecDeque<BoardError>,
    held_updates: VecDeque<oneshot::Receiver<Result<()>>>,
}

#[derive(Default)]
pub(crate) struct FakeRepository {
    state: Mutex<State>,
}

impl FakeRepository {
    pub(crate) fn new() -> Self {
        let repo = Self::default();
        repo.state.lock().unwrap().next_id = 100;
        repo
    }

    pub(crate) fn with_records(records: Vec<TaskRecord>) -> Self {
        let repo = Self::new();
        repo.state.lock().unwrap().records = records;
        repo
    }

    /// Makes the next call of any kind fail with the given error
    pub(crate) fn fail_next(&self, err: BoardError) {
        self.state.lock().unwrap().failures.push_back(err);
    }

    pub(crate) fn fail_next_with_status(&self, status: u16) {
        self.fail_next(BoardError::Remote {
            status,
            body: String::new(),
        });
    }

    /// Holds the next update open until the returned gate is released
    pub(crate) fn hold_next_update(&self) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.state.lock().unwrap().held_updates.push_back(rx);
        tx
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn begin(&self, call: Call) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TaskRepository for FakeRepository {
    async fn list(&self) -> Result<Vec<TaskRecord>> {
        self.begin(Call::List)?;
        Ok(self.state.lock().unwrap().records.clone())
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Task> {
        self.begin(Call::Create(draft.clone()))?;
        let id = {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            TaskId::new(state.next_id)
        };
        let record = TaskRecord {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status,
            completed: Some(false),
        };
        Ok(record.into_created(draft))
    }

    async fn update(&self, task: &Task) -> Result<Task> {
        self.begin(Call::Update(task.clone()))?;
        let gate = self.state.lock().unwrap().held_updates.pop_front();
        if let Some(gate) = gate {
            gate.await
                .map_err(|_| BoardError::Network("gate dropped".to_string()))??;
        }
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> Result<()> {
        self.begin(Call::Delete(id))
    }
}
