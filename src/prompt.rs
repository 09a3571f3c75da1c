//! Request/response prompts.
//!
//! The core never draws dialogs. When it needs an answer from the user it
//! sends a [`PromptCommand`] to the presentation layer and waits on a
//! [`PromptHandle`]. The presentation layer replies with
//! [`PromptBroker::answer`] or [`PromptBroker::dismiss`]; a dismissed prompt,
//! or one whose broker is dropped, resolves to `None`.

use crate::domain::{Task, TaskDraft};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use uuid::Uuid;

/// Correlates a prompt command with its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromptId(Uuid);

impl PromptId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Asks the presentation layer to show a prompt
#[derive(Debug, Clone, PartialEq)]
pub struct PromptCommand<Q> {
    pub id: PromptId,
    pub request: Q,
}

/// Resolves with the user's answer, or `None` if the prompt was dismissed
#[derive(Debug)]
pub struct PromptHandle<A> {
    id: PromptId,
    rx: oneshot::Receiver<Option<A>>,
}

impl<A> PromptHandle<A> {
    pub fn id(&self) -> PromptId {
        self.id
    }
}

impl<A> Future for PromptHandle<A> {
    type Output = Option<A>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|answer| answer.ok().flatten())
    }
}

/// Issues prompts and routes answers back to whoever is waiting
pub struct PromptBroker<Q, A> {
    commands: mpsc::UnboundedSender<PromptCommand<Q>>,
    pending: Mutex<HashMap<PromptId, oneshot::Sender<Option<A>>>>,
}

impl<Q, A> PromptBroker<Q, A> {
    /// Creates a broker and the receiver the presentation layer reads
    /// commands from
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PromptCommand<Q>>) {
        let (commands, rx) = mpsc::unbounded_channel();
        let broker = Self {
            commands,
            pending: Mutex::new(HashMap::new()),
        };
        (broker, rx)
    }

    /// Shows a prompt. If nobody is listening the handle resolves to `None`.
    pub fn request(&self, request: Q) -> PromptHandle<A> {
        let id = PromptId::new();
        let (tx, rx) = oneshot::channel();

        // Registered before sending so an immediate answer finds its waiter
        self.lock_pending().insert(id, tx);
        if self.commands.send(PromptCommand { id, request }).is_err() {
            self.lock_pending().remove(&id);
        }
        debug!(%id, "prompt requested");
        PromptHandle { id, rx }
    }

    /// Resolves a prompt with a value. Returns false for unknown ids.
    pub fn answer(&self, id: PromptId, answer: A) -> bool {
        self.resolve(id, Some(answer))
    }

    /// Resolves a prompt with no value
    pub fn dismiss(&self, id: PromptId) -> bool {
        self.resolve(id, None)
    }

    /// Number of prompts still waiting for an answer
    pub fn pending_count(&self) -> usize {
        self.lock_pending().len()
    }

    fn resolve(&self, id: PromptId, answer: Option<A>) -> bool {
        match self.lock_pending().remove(&id) {
            Some(tx) => {
                // The waiter may have given up; that is not an error
                let _ = tx.send(answer);
                true
            }
            None => false,
        }
    }

    fn lock_pending(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<PromptId, oneshot::Sender<Option<A>>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A yes/no confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub description: Option<String>,
    pub confirm_text: String,
    pub cancel_text: String,
    pub destructive: bool,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            confirm_text: "Confirm".to_string(),
            cancel_text: "Cancel".to_string(),
            destructive: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    /// The prompt shown before a task is deleted
    pub fn delete_task() -> Self {
        Self::new("Delete Task")
            .with_description(
                "Are you sure you want to delete this task? This action cannot be undone.",
            )
            .with_confirm_text("Delete")
            .destructive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit,
}

/// A request to collect task fields from the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDialogRequest {
    pub mode: DialogMode,
    pub initial: Option<Task>,
}

impl TaskDialogRequest {
    pub fn create() -> Self {
        Self {
            mode: DialogMode::Create,
            initial: None,
        }
    }

    pub fn edit(task: Task) -> Self {
        Self {
            mode: DialogMode::Edit,
            initial: Some(task),
        }
    }
}

pub type ConfirmBroker = PromptBroker<ConfirmRequest, bool>;
pub type TaskDialogBroker = PromptBroker<TaskDialogRequest, TaskDraft>;
