use crate::{
    domain::{Task, TaskDraft, TaskId, TaskRecord},
    error::Result,
};
use async_trait::async_trait;

pub mod http;

#[cfg(test)]
pub(crate) mod fake;

pub use http::HttpTaskRepository;

/// Remote task collection. Every call is one round trip and is never retried.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Fetches every record in the collection
    async fn list(&self) -> Result<Vec<TaskRecord>>;

    /// Creates a task; the returned task carries the server-assigned id
    async fn create(&self, draft: &TaskDraft) -> Result<Task>;

    /// Replaces a task; the server's echo is authoritative
    async fn update(&self, task: &Task) -> Result<Task>;

    /// Deletes a task by ID
    async fn delete(&self, id: TaskId) -> Result<()>;
}
