use crate::error::{Error, Result};
use crate::ids::IdAllocator;
use crate::models::{Priority, SortKey, Task, TaskId, TaskPatch};

/// Ordered collection of active tasks.
///
/// Keeps insertion order until [`TaskStore::sort_by`] is applied. Tasks restored
/// by undo are appended at the end rather than returned to their old slot.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    ids: IdAllocator,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a task with a fresh id and appends it.
    ///
    /// The caller is responsible for enqueueing the matching queue entry.
    pub fn add(
        &mut self,
        name: String,
        description: String,
        priority: Priority,
        date_added: String,
    ) -> Task {
        let task = Task {
            id: self.ids.next_id(),
            name,
            description,
            date_added,
            priority,
            done: false,
        };
        self.tasks.push(task.clone());
        task
    }

    /// Removes the active task with `id` and hands back the record.
    pub fn remove(&mut self, id: TaskId) -> Result<Task> {
        let idx = self.position(id).ok_or(Error::NotFound(id))?;
        Ok(self.tasks.remove(idx))
    }

    /// Applies `patch` to the task in place and returns the updated record.
    pub fn update(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::NotFound(id))?;
        if let Some(n) = &patch.name {
            task.name = n.clone();
        }
        if let Some(d) = &patch.description {
            task.description = d.clone();
        }
        if let Some(p) = patch.priority {
            task.priority = p;
        }
        Ok(task.clone())
    }

    /// Puts a previously removed task back, as active, at the end of the list.
    pub fn reinsert(&mut self, mut task: Task) {
        task.done = false;
        self.tasks.push(task);
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn get_all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Re-orders the whole store. Both orderings are stable.
    ///
    /// Dates that fail to parse never panic: they sort after every valid date
    /// and keep their relative order.
    pub fn sort_by(&mut self, key: SortKey) {
        match key {
            SortKey::Priority => self.tasks.sort_by_key(|t| t.priority.rank()),
            SortKey::DateAdded => self.tasks.sort_by_key(|t| {
                let parsed = t.added_on();
                (parsed.is_none(), parsed)
            }),
        }
    }
}
