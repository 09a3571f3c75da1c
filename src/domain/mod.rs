pub mod board;
pub mod movement;
pub mod task;

pub use board::Board;
pub use movement::{plan_move, DragLocation, MoveDescriptor, MovePlan, Reorder, Transfer};
pub use task::{Task, TaskDraft, TaskId, TaskRecord, TaskStatus};
