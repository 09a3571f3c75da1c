use crate::domain::task::{Task, TaskId, TaskStatus};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Board contents: the three fixed columns, each an ordered list of tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default)]
    todo: Vec<Task>,
    #[serde(default)]
    in_progress: Vec<Task>,
    #[serde(default)]
    done: Vec<Task>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board with the given tasks in the todo column
    pub fn with_todo(tasks: Vec<Task>) -> Self {
        Self {
            todo: tasks,
            ..Self::default()
        }
    }

    /// Builds a board from explicit column contents
    pub fn from_columns(todo: Vec<Task>, in_progress: Vec<Task>, done: Vec<Task>) -> Self {
        Self {
            todo,
            in_progress,
            done,
        }
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    pub(crate) fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Done => &mut self.done,
        }
    }

    pub(crate) fn set_column(&mut self, status: TaskStatus, tasks: Vec<Task>) {
        *self.column_mut(status) = tasks;
    }

    /// Total number of tasks on the board
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the column and position of a task
    pub fn locate(&self, id: TaskId) -> Option<(TaskStatus, usize)> {
        TaskStatus::ALL.into_iter().find_map(|status| {
            self.column(status)
                .iter()
                .position(|task| task.id == id)
                .map(|index| (status, index))
        })
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.locate(id)
            .map(|(status, index)| &self.column(status)[index])
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.locate(id).is_some()
    }

    /// Removes a task from whichever column holds it
    pub(crate) fn remove(&mut self, id: TaskId) -> Option<(TaskStatus, usize, Task)> {
        let (status, index) = self.locate(id)?;
        let task = self.column_mut(status).remove(index);
        Some((status, index, task))
    }

    /// Inserts a task into the column named by its status, clamping the index
    pub(crate) fn insert(&mut self, index: usize, task: Task) {
        let column = self.column_mut(task.status);
        let index = index.min(column.len());
        column.insert(index, task);
    }

    /// Checks that every id appears once and that each task sits in the
    /// column matching its status
    pub fn check_integrity(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for status in TaskStatus::ALL {
            for task in self.column(status) {
                if !seen.insert(task.id) {
                    return Err(BoardError::Integrity(format!(
                        "task {} appears more than once",
                        task.id
                    )));
                }
                if task.status != status {
                    return Err(BoardError::Integrity(format!(
                        "task {} has status {} but sits in {}",
                        task.id, task.status, status
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, status: TaskStatus) -> Task {
        Task::new(TaskId::new(id), format!("Task {}", id)).with_status(status)
    }

    #[test]
    fn test_board_creation() {
        let board = Board::new();
        assert!(board.is_empty());
        for status in TaskStatus::ALL {
            assert!(board.column(status).is_empty());
        }
    }

    #[test]
    fn test_locate_and_find() {
        let board = Board::from_columns(
            vec![task(1, TaskStatus::Todo)],
            vec![task(2, TaskStatus::InProgress), task(3, TaskStatus::InProgress)],
            vec![],
        );

        assert_eq!(board.len(), 3);
        assert_eq!(
            board.locate(TaskId::new(3)),
            Some((TaskStatus::InProgress, 1))
        );
        assert_eq!(board.find(TaskId::new(1)).unwrap().title, "Task 1");
        assert!(!board.contains(TaskId::new(99)));
    }

    #[test]
    fn test_remove_and_insert_clamps_index() {
        let mut board = Board::with_todo(vec![task(1, TaskStatus::Todo), task(2, TaskStatus::Todo)]);

        let (status, index, removed) = board.remove(TaskId::new(1)).unwrap();
        assert_eq!((status, index), (TaskStatus::Todo, 0));

        board.insert(50, removed.with_status(TaskStatus::Done));
        assert_eq!(board.column(TaskStatus::Done).len(), 1);
        assert_eq!(board.column(TaskStatus::Todo)[0].id, TaskId::new(2));
        assert!(board.check_integrity().is_ok());
    }

    #[test]
    fn test_integrity_detects_duplicates_and_misplaced_tasks() {
        let duplicated = Board::from_columns(
            vec![task(1, TaskStatus::Todo)],
            vec![],
            vec![task(1, TaskStatus::Done)],
        );
        assert!(matches!(
            duplicated.check_integrity(),
            Err(BoardError::Integrity(_))
        ));

        let misplaced = Board::from_columns(vec![], vec![task(1, TaskStatus::Done)], vec![]);
        assert!(matches!(
            misplaced.check_integrity(),
            Err(BoardError::Integrity(_))
        ));
    }

    #[test]
    fn test_board_serializes_with_column_keys() {
        let board = Board::from_columns(vec![], vec![task(7, TaskStatus::InProgress)], vec![]);
        let json = serde_json::to_value(&board).unwrap();

        assert!(json.get("todo").unwrap().as_array().unwrap().is_empty());
        assert_eq!(json["inProgress"][0]["status"], "inProgress");
        assert_eq!(json["inProgress"][0]["id"], 7);

        let back: Board = serde_json::from_value(json).unwrap();
        assert_eq!(back, board);
    }
}
