//! LIFO log of reversible actions.
//!
//! Each record carries an owned snapshot of the task as it was when the action
//! ran, so a reversal restores fields exactly instead of re-deriving them.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{FinishedTask, Task};

/// Which kind of mutation a record reverses.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Delete,
    Finish,
    Process,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoRecord {
    /// An active task was deleted.
    Delete(Task),
    /// A task was marked done by the user.
    Finish(FinishedTask),
    /// A task was auto-dispatched by process-next.
    Process(FinishedTask),
}

impl UndoRecord {
    pub fn kind(&self) -> ActionKind {
        match self {
            UndoRecord::Delete(_) => ActionKind::Delete,
            UndoRecord::Finish(_) => ActionKind::Finish,
            UndoRecord::Process(_) => ActionKind::Process,
        }
    }
}

/// What an undo put back.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Reversal {
    pub action: ActionKind,
    /// The task as it now sits in the active list.
    pub task: Task,
}

#[derive(Debug, Default)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: UndoRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Result<UndoRecord> {
        self.records.pop().ok_or(Error::NothingToUndo)
    }

    pub fn peek(&self) -> Option<&UndoRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
