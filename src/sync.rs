//! Optimistic application of drag gestures.
//!
//! A gesture goes through these states:
//!
//! ```text
//! Idle -> AppliedLocally -> Settled                      (same-column reorder)
//! Idle -> AppliedLocally -> PendingRemote -> Settled     (remote update succeeded)
//!                                        -> RolledBack   (remote update failed)
//! ```
//!
//! [`apply_move`] performs the local step synchronously. A cross-column move
//! comes back as a [`PendingMove`] holding the snapshot it needs to undo
//! itself; [`PendingMove::settle`] issues the remote update and either keeps
//! the move or rolls it back. Each pending move only ever restores its own
//! snapshot, so moves that resolve out of order do not interfere.

use crate::{
    api::TaskRepository,
    domain::{plan_move, Board, DragLocation, MoveDescriptor, MovePlan, Task, TaskStatus, Transfer},
    error::{BoardError, Result},
    store::BoardStore,
};
use tracing::{debug, warn};

/// Where a drag gesture is once its local step has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    PendingRemote,
    Settled,
    RolledBack,
}

impl SyncState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::RolledBack)
    }
}

/// Column contents before and after an optimistic move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackSnapshot {
    from: DragLocation,
    to: TaskStatus,
    original: Task,
    source_before: Vec<Task>,
    destination_before: Vec<Task>,
    source_after: Vec<Task>,
    destination_after: Vec<Task>,
}

impl RollbackSnapshot {
    fn capture(board: &Board, transfer: &Transfer) -> Self {
        Self {
            from: transfer.from,
            to: transfer.to.column,
            original: transfer.original.clone(),
            source_before: board.column(transfer.from.column).to_vec(),
            destination_before: board.column(transfer.to.column).to_vec(),
            source_after: transfer.source_tasks.clone(),
            destination_after: transfer.destination_tasks.clone(),
        }
    }

    /// Undoes the move. When nothing else touched the two columns since the
    /// move was applied they are restored verbatim; otherwise only the moved
    /// task is put back, leaving other changes in place. Returns whether the
    /// board changed.
    pub(crate) fn restore(&self, board: &mut Board) -> bool {
        let untouched = board.column(self.from.column) == self.source_after.as_slice()
            && board.column(self.to) == self.destination_after.as_slice();
        if untouched {
            board.set_column(self.from.column, self.source_before.clone());
            board.set_column(self.to, self.destination_before.clone());
            return true;
        }

        // Deleted or moved on by a later gesture: no longer ours to undo
        match board.locate(self.original.id) {
            Some((column, _)) if column == self.to => {}
            _ => return false,
        }

        let Some((_, _, mut task)) = board.remove(self.original.id) else {
            return false;
        };
        task.set_status(self.original.status);
        board.insert(self.from.index, task);
        true
    }
}

/// A cross-column move that has been applied locally and still needs the
/// remote update
#[derive(Debug, Clone)]
pub struct PendingMove {
    moved: Task,
    snapshot: RollbackSnapshot,
}

/// How a pending move ended
#[derive(Debug)]
pub enum Settlement {
    /// The server accepted the move; holds the server's copy of the task
    Committed(Task),
    /// The server rejected the move and the board was restored
    RolledBack(BoardError),
}

impl Settlement {
    pub fn state(&self) -> SyncState {
        match self {
            Self::Committed(_) => SyncState::Settled,
            Self::RolledBack(_) => SyncState::RolledBack,
        }
    }
}

impl PendingMove {
    pub fn state(&self) -> SyncState {
        SyncState::PendingRemote
    }

    /// The task as it now appears on the board
    pub fn moved(&self) -> &Task {
        &self.moved
    }

    pub fn snapshot(&self) -> &RollbackSnapshot {
        &self.snapshot
    }

    /// Sends the moved task to the repository, rolling the board back if
    /// the call fails
    pub async fn settle<R>(self, store: &BoardStore, repository: &R) -> Settlement
    where
        R: TaskRepository + ?Sized,
    {
        match repository.update(&self.moved).await {
            Ok(task) => {
                debug!(id = %task.id, status = task.status.as_str(), "move settled");
                Settlement::Committed(task)
            }
            Err(err) => {
                let snapshot = self.snapshot;
                let restored = store.modify(|board| snapshot.restore(board));
                warn!(id = %self.moved.id, restored, error = %err, "move rolled back");
                Settlement::RolledBack(err)
            }
        }
    }
}

/// Result of applying a gesture locally
#[derive(Debug)]
pub enum AppliedMove {
    /// Nothing changed: the drop was cancelled or landed where it started
    Unchanged,
    /// A same-column reorder; already settled
    Reordered,
    /// A cross-column move waiting on the remote update
    Pending(PendingMove),
}

impl AppliedMove {
    pub fn state(&self) -> SyncState {
        match self {
            Self::Unchanged | Self::Reordered => SyncState::Settled,
            Self::Pending(pending) => pending.state(),
        }
    }
}

/// Plans a gesture and commits it to the store in one atomic step
pub fn apply_move(store: &BoardStore, descriptor: &MoveDescriptor) -> Result<AppliedMove> {
    let mut outcome = Ok(AppliedMove::Unchanged);

    store.modify(|board| match plan_move(board, descriptor) {
        Ok(MovePlan::NoOp) => false,
        Ok(plan @ MovePlan::Reorder(_)) => {
            plan.apply_to(board);
            outcome = Ok(AppliedMove::Reordered);
            true
        }
        Ok(MovePlan::Transfer(transfer)) => {
            let snapshot = RollbackSnapshot::capture(board, &transfer);
            board.set_column(transfer.from.column, transfer.source_tasks);
            board.set_column(transfer.to.column, transfer.destination_tasks);
            outcome = Ok(AppliedMove::Pending(PendingMove {
                moved: transfer.moved,
                snapshot,
            }));
            true
        }
        Err(err) => {
            outcome = Err(err);
            false
        }
    });

    if let Ok(applied) = &outcome {
        debug!(task = %descriptor.task_id, state = ?applied.state(), "move applied locally");
    }
    outcome
}
