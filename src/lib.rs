//! # DevList
//!
//! A personal task tracker built around a small task-state engine: active tasks,
//! a priority dispatch queue that picks the next task to complete, a list of
//! finished tasks, and a LIFO undo log that reverses deletes and completions.
//!
//! Everything lives in memory for the life of one process. The [`engine::Engine`]
//! owns all structures; front ends (the TUI, the batch runner) only call its
//! operations and read its views.

pub mod commands;
pub mod engine;
pub mod error;
pub mod finished;
pub mod ids;
pub mod models;
pub mod queue;
pub mod stats;
pub mod store;
pub mod templates;
pub mod tui;
pub mod undo;

pub use engine::{Engine, EngineEvent, EngineObserver};
pub use error::{Error, Result};
