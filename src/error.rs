use crate::domain::TaskId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote error ({status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Invalid task ID format: {0}")]
    InvalidTaskId(String),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Board integrity violated: {0}")]
    Integrity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BoardError {
    /// True for errors raised before any network call was made
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True when the server answered with a non-success status
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// HTTP status of a remote failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Remote {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}
