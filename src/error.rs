//! Error types for devlist.
//!
//! Expected conditions (`NotFound`, `Empty`, `QueueEmpty`, `NothingToUndo`) are
//! returned as values and never leave the engine half-mutated.
//! `InconsistentState` means an internal invariant broke and is fatal.

use thiserror::Error;

use crate::models::TaskId;

/// Exit codes for the devlist binary.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Task {0} not found")]
    NotFound(TaskId),

    #[error("Structure is empty")]
    Empty,

    #[error("No tasks in queue")]
    QueueEmpty,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Invalid priority '{0}'. Use High, Medium or Low.")]
    InvalidPriority(String),

    #[error("Inconsistent engine state: {0}")]
    InconsistentState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Only a broken invariant is unrecoverable; everything else can be reported and retried.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::InconsistentState(_))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NotFound(_)
            | Error::Empty
            | Error::QueueEmpty
            | Error::NothingToUndo
            | Error::UnknownCategory(_)
            | Error::InvalidPriority(_) => exit_codes::USER_ERROR,

            Error::InconsistentState(_) | Error::Io(_) | Error::Json(_) => {
                exit_codes::OPERATION_FAILED
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
