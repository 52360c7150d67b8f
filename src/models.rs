use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Format used for `date_added` stamps.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub type TaskId = u64;

/// Task urgency. Declaration order is dispatch order: `High` sorts first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "High", alias = "HIGH")]
    High,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "Low", alias = "LOW")]
    Low,
}

impl Priority {
    /// Numeric ordering key, lower is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "med" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            _ => Err(Error::InvalidPriority(s.to_string())),
        }
    }
}

/// An active task, living in the task store while `done` is false.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier, never changed once assigned.
    pub id: TaskId,
    pub name: String,
    pub description: String,
    /// Calendar date the task was added, formatted with [`DATE_FORMAT`].
    pub date_added: String,
    pub priority: Priority,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Parsed `date_added`, or `None` when the stored string is not a valid date.
    pub fn added_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date_added, DATE_FORMAT).ok()
    }
}

/// A completed task. Always an owned copy of the fields the active record had.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FinishedTask {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub date_added: String,
    pub priority: Priority,
}

impl FinishedTask {
    /// Converts back into an active record with `done` cleared.
    pub fn into_active(self) -> Task {
        Task {
            id: self.id,
            name: self.name,
            description: self.description,
            date_added: self.date_added,
            priority: self.priority,
            done: false,
        }
    }
}

impl From<Task> for FinishedTask {
    fn from(task: Task) -> Self {
        FinishedTask {
            id: task.id,
            name: task.name,
            description: task.description,
            date_added: task.date_added,
            priority: task.priority,
        }
    }
}

/// Projection of an active task held by the dispatch queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: TaskId,
    pub priority: Priority,
}

/// Keys the active list can be re-ordered by.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    DateAdded,
    Priority,
}

/// Field changes applied by an edit. `None` leaves the field untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Counters shown to the user after every operation.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Number of active tasks.
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tasks: {} | Completed: {} | In Progress: {}",
            self.total, self.completed, self.in_progress
        )
    }
}
