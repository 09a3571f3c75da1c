//! Drag-and-drop planning.
//!
//! A drop gesture is described by a [`MoveDescriptor`]. [`plan_move`] turns it
//! into the column contents the board should show next, without touching the
//! board itself; committing the plan and persisting it is the caller's job.

use crate::domain::board::Board;
use crate::domain::task::{Task, TaskId, TaskStatus};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};

/// A position on the board: a column and an index within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragLocation {
    pub column: TaskStatus,
    pub index: usize,
}

impl DragLocation {
    pub fn new(column: TaskStatus, index: usize) -> Self {
        Self { column, index }
    }
}

/// The result of a single drag gesture. A missing destination means the
/// task was dropped outside every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDescriptor {
    pub task_id: TaskId,
    pub source: DragLocation,
    #[serde(default)]
    pub destination: Option<DragLocation>,
}

impl MoveDescriptor {
    pub fn new(task_id: TaskId, source: DragLocation, destination: DragLocation) -> Self {
        Self {
            task_id,
            source,
            destination: Some(destination),
        }
    }

    /// A drop that landed outside any column
    pub fn cancelled(task_id: TaskId, source: DragLocation) -> Self {
        Self {
            task_id,
            source,
            destination: None,
        }
    }
}

/// Reordering within one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reorder {
    pub column: TaskStatus,
    pub from: usize,
    pub to: usize,
    pub tasks: Vec<Task>,
}

/// Moving a task between two columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub from: DragLocation,
    pub to: DragLocation,
    /// The task as it was before the move
    pub original: Task,
    /// The task with its status set to the destination column
    pub moved: Task,
    pub source_tasks: Vec<Task>,
    pub destination_tasks: Vec<Task>,
}

/// What a drop gesture does to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovePlan {
    NoOp,
    Reorder(Reorder),
    Transfer(Transfer),
}

impl MovePlan {
    /// Only moves across columns change a task and need persisting remotely
    pub fn requires_remote(&self) -> bool {
        matches!(self, Self::Transfer(_))
    }

    /// Writes the planned columns into a board
    pub fn apply_to(&self, board: &mut Board) {
        match self {
            Self::NoOp => {}
            Self::Reorder(reorder) => board.set_column(reorder.column, reorder.tasks.clone()),
            Self::Transfer(transfer) => {
                board.set_column(transfer.from.column, transfer.source_tasks.clone());
                board.set_column(transfer.to.column, transfer.destination_tasks.clone());
            }
        }
    }
}

/// Computes the next board contents for a drop gesture.
///
/// The task is looked up at `source.index`; when the task there has a
/// different id it is searched for by id within the source column. Indexes
/// past the end of the destination column append.
pub fn plan_move(board: &Board, descriptor: &MoveDescriptor) -> Result<MovePlan> {
    let Some(destination) = descriptor.destination else {
        return Ok(MovePlan::NoOp);
    };

    let source_column = descriptor.source.column;
    let from = resolve_source_index(board.column(source_column), descriptor)?;

    let mut source_tasks = board.column(source_column).to_vec();
    let original = source_tasks.remove(from);

    if destination.column == source_column {
        let to = destination.index.min(source_tasks.len());
        if to == from {
            return Ok(MovePlan::NoOp);
        }
        source_tasks.insert(to, original);
        return Ok(MovePlan::Reorder(Reorder {
            column: source_column,
            from,
            to,
            tasks: source_tasks,
        }));
    }

    let mut moved = original.clone();
    moved.set_status(destination.column);

    let mut destination_tasks = board.column(destination.column).to_vec();
    let to = destination.index.min(destination_tasks.len());
    destination_tasks.insert(to, moved.clone());

    Ok(MovePlan::Transfer(Transfer {
        from: DragLocation::new(source_column, from),
        to: DragLocation::new(destination.column, to),
        original,
        moved,
        source_tasks,
        destination_tasks,
    }))
}

fn resolve_source_index(tasks: &[Task], descriptor: &MoveDescriptor) -> Result<usize> {
    let index = descriptor.source.index;
    if tasks.get(index).map(|task| task.id) == Some(descriptor.task_id) {
        return Ok(index);
    }

    tasks
        .iter()
        .position(|task| task.id == descriptor.task_id)
        .ok_or_else(|| {
            BoardError::InvalidMove(format!(
                "task {} is not in column {}",
                descriptor.task_id,
                descriptor.source.column.as_str()
            ))
        })
}
