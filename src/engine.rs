//! Task-state engine.
//!
//! Owns the task store, the dispatch queue, the finished store, the undo log and
//! the counters. Every public operation either applies all of its sub-steps or,
//! on an expected error, none of them. Observers are notified only after an
//! operation has been fully applied.

use std::collections::BTreeSet;

use chrono::Local;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::finished::FinishedStore;
use crate::models::{
    FinishedTask, Priority, QueueEntry, SortKey, Stats, Task, TaskId, TaskPatch, DATE_FORMAT,
};
use crate::queue::DispatchQueue;
use crate::stats::{self, Counters};
use crate::store::TaskStore;
use crate::undo::{ActionKind, Reversal, UndoLog, UndoRecord};

/// Notification emitted after a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Added(Task),
    Edited(Task),
    Finished(FinishedTask),
    Processed(FinishedTask),
    Deleted(Task),
    Undone(Reversal),
    Sorted(SortKey),
}

/// Presentation hook. Receives read-only copies, never the engine itself.
pub trait EngineObserver {
    fn on_event(&mut self, event: &EngineEvent, stats: Stats);
}

#[derive(Default)]
pub struct Engine {
    store: TaskStore,
    queue: DispatchQueue,
    finished: FinishedStore,
    undo_log: UndoLog,
    counters: Counters,
    observers: Vec<Box<dyn EngineObserver>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn EngineObserver>) {
        self.observers.push(observer);
    }

    /// Adds a task stamped with today's local date. Adds are not undoable.
    pub fn add_task(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Task {
        let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
        self.add_task_on(name, description, priority, today)
    }

    /// Adds a task with a caller-supplied `date_added` string.
    pub fn add_task_on(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        date_added: impl Into<String>,
    ) -> Task {
        let task = self
            .store
            .add(name.into(), description.into(), priority, date_added.into());
        self.queue.enqueue(task.id, task.priority);
        self.counters.started();
        info!(id = task.id, name = %task.name, priority = %task.priority, "task added");
        self.emit(EngineEvent::Added(task.clone()));
        task
    }

    /// Edits an active task in place. A priority change moves its queue entry.
    pub fn edit_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        let before = self.store.get(id).map(|t| t.priority).ok_or_else(|| {
            warn!(id, "edit of unknown task");
            Error::NotFound(id)
        })?;
        let task = self.store.update(id, patch)?;
        if task.priority != before {
            debug!(id, from = %before, to = %task.priority, "re-queueing after priority change");
            self.queue.remove_by_id(id);
            self.queue.enqueue(id, task.priority);
        }
        info!(id, "task edited");
        self.emit(EngineEvent::Edited(task.clone()));
        Ok(task)
    }

    /// Moves an active task to the finished store.
    pub fn mark_done(&mut self, id: TaskId) -> Result<FinishedTask> {
        let task = self.store.remove(id).inspect_err(|_| {
            warn!(id, "mark done on unknown task");
        })?;
        let record = FinishedTask::from(task);
        self.finished.add(record.clone());
        self.queue.remove_by_id(id);
        self.undo_log.push(UndoRecord::Finish(record.clone()));
        self.counters.finished();
        info!(id, name = %record.name, "task marked done");
        self.emit(EngineEvent::Finished(record.clone()));
        Ok(record)
    }

    /// Deletes every listed task, or none if any id is not active.
    ///
    /// Removal runs from the highest list position down, and each task gets its
    /// own undo record, so repeated undo restores them in reverse.
    pub fn delete_tasks(&mut self, ids: impl IntoIterator<Item = TaskId>) -> Result<Vec<Task>> {
        let ids: BTreeSet<TaskId> = ids.into_iter().collect();
        let mut positions = Vec::with_capacity(ids.len());
        for &id in &ids {
            match self.store.position(id) {
                Some(pos) => positions.push((pos, id)),
                None => {
                    warn!(id, "delete of unknown task");
                    return Err(Error::NotFound(id));
                }
            }
        }
        positions.sort_unstable_by(|a, b| b.0.cmp(&a.0));

        let mut removed = Vec::with_capacity(positions.len());
        for (_, id) in positions {
            self.queue.remove_by_id(id);
            let task = self.store.remove(id)?;
            if task.done {
                self.counters.uncounted_finished();
            } else {
                self.counters.dropped();
            }
            debug!(id, "task deleted");
            self.undo_log.push(UndoRecord::Delete(task.clone()));
            removed.push(task);
        }
        info!(count = removed.len(), "tasks deleted");
        for task in &removed {
            self.emit(EngineEvent::Deleted(task.clone()));
        }
        Ok(removed)
    }

    /// Completes the most urgent queued task.
    pub fn process_next(&mut self) -> Result<FinishedTask> {
        let entry = self.queue.pop_min().map_err(|_| {
            warn!("process next with empty queue");
            Error::QueueEmpty
        })?;
        let task = self.store.remove(entry.id).map_err(|_| {
            error!(id = entry.id, "queued task missing from task store");
            Error::InconsistentState(format!(
                "queue entry {} has no active task",
                entry.id
            ))
        })?;
        let record = FinishedTask::from(task);
        self.finished.add(record.clone());
        self.undo_log.push(UndoRecord::Process(record.clone()));
        self.counters.finished();
        info!(id = record.id, name = %record.name, "task processed");
        self.emit(EngineEvent::Processed(record.clone()));
        Ok(record)
    }

    /// Reverses the most recent delete, finish or process.
    pub fn undo(&mut self) -> Result<Reversal> {
        let record = self.undo_log.pop().inspect_err(|_| {
            warn!("undo with empty log");
        })?;
        let action = record.kind();
        let task = match record {
            UndoRecord::Delete(task) => {
                self.store.reinsert(task.clone());
                self.queue.enqueue(task.id, task.priority);
                self.counters.started();
                Task { done: false, ..task }
            }
            UndoRecord::Finish(snapshot) | UndoRecord::Process(snapshot) => {
                self.finished.remove_by_id(snapshot.id).map_err(|_| {
                    error!(id = snapshot.id, "undo target missing from finished store");
                    Error::InconsistentState(format!(
                        "finished task {} missing during undo",
                        snapshot.id
                    ))
                })?;
                let task = snapshot.into_active();
                self.store.reinsert(task.clone());
                self.queue.enqueue(task.id, task.priority);
                self.counters.reopened();
                task
            }
        };
        info!(id = task.id, action = ?action, "action undone");
        let reversal = Reversal { action, task };
        self.emit(EngineEvent::Undone(reversal.clone()));
        Ok(reversal)
    }

    pub fn sort_active(&mut self, by: SortKey) {
        self.store.sort_by(by);
        debug!(?by, "active list sorted");
        self.emit(EngineEvent::Sorted(by));
    }

    pub fn stats(&self) -> Stats {
        self.counters.snapshot(self.store.len())
    }

    pub fn list_active(&self) -> &[Task] {
        self.store.get_all()
    }

    pub fn list_finished(&self) -> &[FinishedTask] {
        self.finished.get_all()
    }

    /// Queue contents in dispatch order.
    pub fn queue(&self) -> Vec<QueueEntry> {
        self.queue.peek_all()
    }

    /// Kind of the action the next undo would reverse.
    pub fn next_undo(&self) -> Option<ActionKind> {
        self.undo_log.peek().map(UndoRecord::kind)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_log.len()
    }

    /// Verifies id uniqueness, queue/store agreement and the counters.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        let active = self.store.get_all().iter().map(|t| t.id);
        let finished = self.finished.get_all().iter().map(|t| t.id);
        for id in active.chain(finished) {
            if !seen.insert(id) {
                return Err(Error::InconsistentState(format!("id {id} used twice")));
            }
        }

        let queued = self.queue.peek_all();
        let mut queued_ids = BTreeSet::new();
        for entry in &queued {
            if !queued_ids.insert(entry.id) {
                return Err(Error::InconsistentState(format!(
                    "id {} queued more than once",
                    entry.id
                )));
            }
            match self.store.get(entry.id) {
                Some(t) if t.priority == entry.priority => {}
                Some(_) => {
                    return Err(Error::InconsistentState(format!(
                        "queue priority for {} is stale",
                        entry.id
                    )))
                }
                None => {
                    return Err(Error::InconsistentState(format!(
                        "queued id {} is not active",
                        entry.id
                    )))
                }
            }
        }
        if let Some(t) = self
            .store
            .get_all()
            .iter()
            .find(|t| !queued_ids.contains(&t.id))
        {
            return Err(Error::InconsistentState(format!(
                "active task {} is not queued",
                t.id
            )));
        }

        let derived = stats::derive(self.store.len(), self.finished.len());
        if derived != self.stats() {
            return Err(Error::InconsistentState(format!(
                "counters {:?} disagree with stores {:?}",
                self.stats(),
                derived
            )));
        }
        Ok(())
    }

    fn emit(&mut self, event: EngineEvent) {
        let stats = self.stats();
        for observer in self.observers.iter_mut() {
            observer.on_event(&event, stats);
        }
    }
}
