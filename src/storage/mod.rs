use crate::{domain::Board, error::Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "file-storage")]
pub mod file_cache;
pub mod memory_cache;

#[cfg(feature = "file-storage")]
pub use file_cache::FileCache;
pub use memory_cache::MemoryCache;

/// Cache that lets a session's board survive a reload
#[async_trait]
pub trait BoardCache: Send + Sync {
    /// Loads the cached board, if one was saved
    async fn load(&self) -> Result<Option<Board>>;

    /// Replaces the cached board
    async fn save(&self, board: &Board) -> Result<()>;

    /// Removes the cached board
    async fn clear(&self) -> Result<()>;
}

/// On-disk layout of a cached session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub state: PersistedState,
    pub version: u32,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub columns: Board,
}

impl PersistedSession {
    pub const VERSION: u32 = 0;

    pub fn new(board: &Board) -> Self {
        Self {
            state: PersistedState {
                columns: board.clone(),
            },
            version: Self::VERSION,
            saved_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a cached session and checks the board it holds
    pub fn from_json(contents: &str) -> Result<Self> {
        let session: Self = serde_json::from_str(contents)?;
        session.state.columns.check_integrity()?;
        Ok(session)
    }

    pub fn into_board(self) -> Board {
        self.state.columns
    }
}
