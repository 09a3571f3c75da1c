//! Column state store.
//!
//! [`BoardStore`] owns the board. Every mutation runs under the store's write
//! lock and is published to subscribers as one change, so readers never see
//! a board halfway through an update.

use crate::domain::{Board, Task, TaskStatus};
use tokio::sync::watch;

/// Owner of the current board contents
#[derive(Debug)]
pub struct BoardStore {
    tx: watch::Sender<Board>,
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardStore {
    /// Creates a store with an empty board
    pub fn new() -> Self {
        Self::with_board(Board::new())
    }

    pub fn with_board(board: Board) -> Self {
        let (tx, _rx) = watch::channel(board);
        Self { tx }
    }

    /// Clones the current board
    pub fn snapshot(&self) -> Board {
        self.tx.borrow().clone()
    }

    /// Runs a closure against the current board without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&Board) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver that observes every committed change
    pub fn subscribe(&self) -> watch::Receiver<Board> {
        self.tx.subscribe()
    }

    /// Replaces the contents of one column
    pub fn replace(&self, column: TaskStatus, tasks: Vec<Task>) {
        self.tx.send_modify(|board| board.set_column(column, tasks));
    }

    /// Replaces the whole board
    pub fn replace_all(&self, board: Board) {
        self.tx.send_replace(board);
    }

    /// Applies a mutation atomically. The closure returns whether it changed
    /// anything; subscribers are only notified when it did.
    pub(crate) fn modify(&self, f: impl FnOnce(&mut Board) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;

    fn task(id: u64) -> Task {
        Task::new(TaskId::new(id), format!("Task {}", id))
    }

    #[test]
    fn test_starts_empty() {
        let store = BoardStore::new();
        assert!(store.snapshot().is_empty());
        assert!(store.read(|board| board.column(TaskStatus::Todo).is_empty()));
    }

    #[test]
    fn test_replace_column() {
        let store = BoardStore::new();
        store.replace(TaskStatus::Todo, vec![task(1), task(2)]);

        assert_eq!(store.snapshot().column(TaskStatus::Todo).len(), 2);
        assert!(store.snapshot().column(TaskStatus::Done).is_empty());
    }

    #[test]
    fn test_replace_all_notifies_subscribers() {
        let store = BoardStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.replace_all(Board::with_todo(vec![task(1)]));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[test]
    fn test_unchanged_modify_is_silent() {
        let store = BoardStore::with_board(Board::with_todo(vec![task(1)]));
        let mut rx = store.subscribe();

        assert!(!store.modify(|_| false));
        assert!(!rx.has_changed().unwrap());

        assert!(store.modify(|board| board.remove(TaskId::new(1)).is_some()));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }
}
