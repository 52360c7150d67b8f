use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde::Deserialize;
use tracing::debug;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::models::{FinishedTask, Priority, QueueEntry, SortKey, Task, TaskId, TaskPatch};
use crate::templates::{load_templates, save_templates_to, templates_path, Catalog};

/// One line of a batch script.
///
/// Lines are JSON objects tagged by `op`, e.g.
/// `{"op": "add", "name": "Write docs", "priority": "high"}`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BatchCommand {
    Add {
        name: String,
        #[serde(default)]
        description: String,
        priority: Priority,
        #[serde(default)]
        date_added: Option<String>,
    },
    AddCategory {
        category: String,
    },
    Edit {
        id: TaskId,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        priority: Option<Priority>,
    },
    Delete {
        ids: Vec<TaskId>,
    },
    Done {
        id: TaskId,
    },
    Next,
    Undo,
    Sort {
        by: SortKey,
    },
    List,
    Finished,
    Stats,
    Queue,
}

/// Outcome counts of a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub executed: usize,
    pub failed: usize,
}

fn priority_color(p: Priority) -> Color {
    match p {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn header(cols: &[&str]) -> Vec<Cell> {
    cols.iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

/// Table of active tasks in their current order.
pub fn active_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["ID", "Task Name", "Description", "Date Added", "Priority", "Status"]));
    for t in tasks {
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.name),
            Cell::new(&t.description),
            Cell::new(&t.date_added),
            Cell::new(t.priority).fg(priority_color(t.priority)),
            Cell::new(if t.done { "Done" } else { "Pending" }).fg(Color::Yellow),
        ]);
    }
    table
}

pub fn finished_table(tasks: &[FinishedTask]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["ID", "Task Name", "Description", "Date Added", "Priority"]));
    for t in tasks {
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.name),
            Cell::new(&t.description),
            Cell::new(&t.date_added),
            Cell::new(t.priority).fg(Color::Grey),
        ]);
    }
    table
}

pub fn queue_table(entries: &[QueueEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(header(&["#", "ID", "Priority"]));
    for (i, e) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(e.id),
            Cell::new(e.priority).fg(priority_color(e.priority)),
        ]);
    }
    table
}

pub fn catalog_table(catalog: &Catalog) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Category", "Task Name", "Description", "Priority"]));
    for cat in &catalog.categories {
        for t in &cat.tasks {
            table.add_row(vec![
                Cell::new(&cat.name),
                Cell::new(&t.name),
                Cell::new(&t.description),
                Cell::new(t.priority).fg(priority_color(t.priority)),
            ]);
        }
    }
    table
}

/// Applies one command, returning the text to show the user.
fn apply(engine: &mut Engine, catalog: &Catalog, cmd: BatchCommand) -> Result<Option<String>> {
    let msg = match cmd {
        BatchCommand::Add { name, description, priority, date_added } => {
            let t = match date_added {
                Some(d) => engine.add_task_on(name, description, priority, d),
                None => engine.add_task(name, description, priority),
            };
            format!("Task added (id = {})", t.id)
        }
        BatchCommand::AddCategory { category } => {
            let added = catalog.add_category(engine, &category)?;
            format!("Added {} tasks from '{}'", added.len(), category)
        }
        BatchCommand::Edit { id, name, description, priority } => {
            let patch = TaskPatch { name, description, priority };
            engine.edit_task(id, &patch)?;
            format!("Task {} updated.", id)
        }
        BatchCommand::Delete { ids } => {
            let removed = engine.delete_tasks(ids)?;
            format!("Deleted {} task(s).", removed.len())
        }
        BatchCommand::Done { id } => {
            let f = engine.mark_done(id)?;
            format!("Task {} marked as complete.", f.id)
        }
        BatchCommand::Next => {
            let f = engine.process_next()?;
            format!("Processed (Priority): {}", f.name)
        }
        BatchCommand::Undo => {
            let r = engine.undo()?;
            format!("Undid {:?} of task {} ({})", r.action, r.task.id, r.task.name)
        }
        BatchCommand::Sort { by } => {
            engine.sort_active(by);
            return Ok(None);
        }
        BatchCommand::List => active_table(engine.list_active()).to_string(),
        BatchCommand::Finished => finished_table(engine.list_finished()).to_string(),
        BatchCommand::Queue => queue_table(&engine.queue()).to_string(),
        BatchCommand::Stats => engine.stats().to_string(),
    };
    Ok(Some(msg))
}

fn is_view(cmd: &BatchCommand) -> bool {
    matches!(
        cmd,
        BatchCommand::List | BatchCommand::Finished | BatchCommand::Stats | BatchCommand::Queue
    )
}

/// Runs a JSON-lines script against `engine`.
///
/// Blank lines and lines starting with `#` are skipped. Expected errors are
/// written to `out` and the run continues; a fatal error stops it.
/// With `quiet`, only views (`list`, `finished`, `stats`, `queue`) and errors are printed.
pub fn run_batch<R: BufRead, W: Write>(
    engine: &mut Engine,
    catalog: &Catalog,
    input: R,
    out: &mut W,
    quiet: bool,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    for (n, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cmd: BatchCommand = match serde_json::from_str(line) {
            Ok(c) => c,
            Err(e) => {
                writeln!(out, "line {}: invalid command: {}", n + 1, e)?;
                summary.failed += 1;
                continue;
            }
        };
        debug!(line = n + 1, ?cmd, "batch command");
        let view = is_view(&cmd);
        match apply(engine, catalog, cmd) {
            Ok(Some(msg)) => {
                if view || !quiet {
                    writeln!(out, "{msg}")?;
                }
                summary.executed += 1;
            }
            Ok(None) => summary.executed += 1,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                writeln!(out, "line {}: {}", n + 1, e)?;
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// Runs a batch script from `file`, or stdin when no file is given.
pub fn cmd_batch(file: Option<PathBuf>, quiet: bool) -> Result<BatchSummary> {
    let catalog = load_templates();
    let mut engine = Engine::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = match file {
        Some(path) => {
            let f = File::open(&path)?;
            run_batch(&mut engine, &catalog, BufReader::new(f), &mut out, quiet)?
        }
        None => {
            let stdin = io::stdin();
            run_batch(&mut engine, &catalog, stdin.lock(), &mut out, quiet)?
        }
    };
    engine.check_invariants()?;
    if !quiet {
        writeln!(out, "{}", engine.stats())?;
    }
    Ok(summary)
}

/// Prints the configured category catalog.
pub fn cmd_templates_list() {
    let catalog = load_templates();
    if catalog.categories.is_empty() {
        println!("No categories found.");
        return;
    }
    println!("{}", catalog_table(&catalog));
}

/// Writes the built-in catalog to `path`, refusing to overwrite unless `force`.
pub fn init_templates(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists (use --force)", path.display()),
        )));
    }
    save_templates_to(path, &Catalog::builtin())
}

pub fn cmd_templates_init(force: bool) -> Result<PathBuf> {
    let path = templates_path();
    init_templates(&path, force)?;
    println!("Catalog written to {}", path.display());
    Ok(path)
}
