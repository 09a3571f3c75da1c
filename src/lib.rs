//! # Taskboard Core
//!
//! State and sync logic for a three-column kanban board (To Do, In
//! Progress, Done) backed by a remote task list API.
//!
//! The board is owned by a [`TaskBoard`], which is the only thing that writes
//! to it. Drag gestures are applied locally straight away and confirmed with
//! the server afterwards; a rejected move is rolled back. Presentation code
//! reads the board, subscribes to changes and sends gestures, form
//! submissions and delete requests; it never sees an error directly.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod prompt;
pub mod report;
pub mod service;
pub mod storage;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use api::{HttpTaskRepository, TaskRepository};
pub use config::ClientConfig;
pub use domain::{
    board::Board,
    movement::{DragLocation, MoveDescriptor},
    task::{Task, TaskDraft, TaskId, TaskStatus},
};
pub use error::{BoardError, Result};
pub use report::{ErrorReporter, Operation};
pub use service::{HydrationSource, TaskBoard};
pub use storage::BoardCache;
pub use sync::SyncState;
