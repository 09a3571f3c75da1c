use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Server-assigned identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl FromStr for TaskId {
    type Err = BoardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| BoardError::InvalidTaskId(s.to_string()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a task, which is also the name of the column holding it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Board columns in display order
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Wire and storage key of the column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inProgress",
            Self::Done => "done",
        }
    }

    /// Column heading shown to users
    pub fn title(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    pub fn is_done(&self) -> bool {
        *self == Self::Done
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for TaskStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BoardError::Validation(format!("unknown column '{}'", s)))
    }
}

/// A task on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates a new task in the todo column
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Todo,
            completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.set_status(status);
        self
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn set_description(&mut self, description: String) {
        self.description = description;
    }

    /// Changes the status, keeping `completed` in step with it
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.completed = status.is_done();
    }

    /// Rejects tasks whose title is empty or whitespace
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)
    }
}

/// Fields submitted from a create or edit form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)
    }

    /// Overlays the draft onto an existing task, as an edit form does
    pub fn apply_to(&self, task: &Task) -> Task {
        let mut merged = task.clone();
        merged.set_title(self.title.clone());
        if let Some(description) = &self.description {
            merged.set_description(description.clone());
        }
        if let Some(status) = self.status {
            merged.set_status(status);
        }
        merged
    }

    /// Body sent to the collection endpoint when creating a task
    pub(crate) fn create_payload(&self) -> CreatePayload<'_> {
        CreatePayload {
            title: &self.title,
            description: self.description.as_deref(),
            completed: false,
            status: self.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePayload<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// A task as returned by the remote collection; every field but the id
/// and title may be missing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TaskRecord {
    /// Maps a fetched record with the backlog defaults: a placeholder
    /// description and the todo status
    pub fn into_task(self) -> Task {
        let description = match self.description {
            Some(description) if !description.is_empty() => description,
            _ => format!("Task {} description", self.id),
        };
        let status = self.status.unwrap_or_default();
        Task {
            id: self.id,
            title: self.title,
            description,
            status,
            completed: status.is_done(),
        }
    }

    /// Maps a create response; fields the server left out come from the draft
    pub fn into_created(self, draft: &TaskDraft) -> Task {
        let status = self.status.or(draft.status).unwrap_or_default();
        Task {
            id: self.id,
            title: self.title,
            description: self
                .description
                .or_else(|| draft.description.clone())
                .unwrap_or_default(),
            status,
            completed: status.is_done(),
        }
    }

    /// Maps an update response; fields the server left out come from the
    /// task that was sent
    pub fn merge_onto(self, sent: &Task) -> Task {
        let status = self.status.unwrap_or(sent.status);
        Task {
            id: self.id,
            title: self.title,
            description: self
                .description
                .unwrap_or_else(|| sent.description.clone()),
            status,
            completed: status.is_done(),
        }
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(BoardError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}
