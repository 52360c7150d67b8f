use crate::error::{Error, Result};
use crate::models::{FinishedTask, TaskId};

/// Completed tasks in completion order. Entries only leave through undo.
#[derive(Debug, Default)]
pub struct FinishedStore {
    tasks: Vec<FinishedTask>,
}

impl FinishedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: FinishedTask) {
        self.tasks.push(record);
    }

    pub fn remove_by_id(&mut self, id: TaskId) -> Result<FinishedTask> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::NotFound(id))?;
        Ok(self.tasks.remove(idx))
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn get_all(&self) -> &[FinishedTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
