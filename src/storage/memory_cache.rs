use crate::{
    domain::Board,
    error::Result,
    storage::{BoardCache, PersistedSession},
};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// Board cache held in memory, serialized the same way as on disk
#[derive(Debug, Default)]
pub struct MemoryCache {
    contents: Mutex<Option<String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache that already holds a saved board
    pub fn with_board(board: &Board) -> Result<Self> {
        let json = PersistedSession::new(board).to_json()?;
        Ok(Self {
            contents: Mutex::new(Some(json)),
        })
    }

    /// Raw serialized session, if any
    pub fn raw(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stores raw content as if a previous session had written it
    pub fn set_raw(&self, contents: impl Into<String>) {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(contents.into());
    }
}

#[async_trait]
impl BoardCache for MemoryCache {
    async fn load(&self) -> Result<Option<Board>> {
        self.raw()
            .map(|contents| PersistedSession::from_json(&contents).map(PersistedSession::into_board))
            .transpose()
    }

    async fn save(&self, board: &Board) -> Result<()> {
        let json = PersistedSession::new(board).to_json()?;
        self.set_raw(json);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, TaskId};

    #[tokio::test]
    async fn test_round_trip_through_json() {
        let cache = MemoryCache::new();
        assert!(cache.load().await.unwrap().is_none());

        let board = Board::with_todo(vec![Task::new(TaskId::new(1), "Test Task")]);
        cache.save(&board).await.unwrap();

        let raw: serde_json::Value = serde_json::from_str(&cache.raw().unwrap()).unwrap();
        assert_eq!(raw["state"]["columns"]["todo"][0]["id"], 1);
        assert_eq!(cache.load().await.unwrap(), Some(board));

        cache.clear().await.unwrap();
        assert!(cache.raw().is_none());
    }

    #[tokio::test]
    async fn test_garbage_is_reported() {
        let cache = MemoryCache::new();
        cache.set_raw("garbage");
        assert!(cache.load().await.is_err());
    }
}
