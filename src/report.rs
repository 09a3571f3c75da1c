//! Side channel for errors caught at the operation boundary.

use crate::error::BoardError;
use std::fmt;
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Board operation that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Hydrate,
    AddTask,
    UpdateTask,
    DeleteTask,
    MoveTask,
    PersistBoard,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hydrate => "fetching tasks",
            Self::AddTask => "adding task",
            Self::UpdateTask => "updating task",
            Self::DeleteTask => "deleting task",
            Self::MoveTask => "moving task",
            Self::PersistBoard => "saving board",
        };
        f.write_str(name)
    }
}

/// Receives errors that board operations swallowed
pub trait ErrorReporter: Send + Sync {
    fn report(&self, operation: Operation, err: &BoardError);
}

/// Logs each error through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, operation: Operation, err: &BoardError) {
        if err.is_validation() {
            warn!(%operation, error = %err, "rejected");
        } else {
            error!(%operation, error = %err, "Error {}", operation);
        }
    }
}

/// An error ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub operation: Operation,
    pub message: String,
    pub status: Option<u16>,
    pub validation: bool,
}

impl Notice {
    pub fn new(operation: Operation, err: &BoardError) -> Self {
        Self {
            operation,
            message: err.to_string(),
            status: err.status(),
            validation: err.is_validation(),
        }
    }
}

/// Forwards errors to a presentation layer as [`Notice`]s and logs them
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelReporter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ErrorReporter for ChannelReporter {
    fn report(&self, operation: Operation, err: &BoardError) {
        TracingReporter.report(operation, err);
        // A closed receiver means nobody is displaying errors any more
        let _ = self.tx.send(Notice::new(operation, err));
    }
}
