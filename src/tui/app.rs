use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ratatui::widgets::TableState;

use crate::engine::{Engine, EngineEvent, EngineObserver};
use crate::error::Error;
use crate::models::{Priority, SortKey, Stats, TaskId};
use crate::templates::Catalog;

const ACTIVITY_LINES: usize = 12;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
    Category,
}

#[derive(PartialEq)]
pub enum ViewMode {
    Active,
    Finished,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub name: String,
    pub description: String,
    pub step: usize, // 0: Name, 1: Description, 2: Priority
}

/// Recent engine events, newest last. Shared with the engine as an observer.
pub type Activity = Rc<RefCell<VecDeque<String>>>;

struct ActivityFeed(Activity);

impl EngineObserver for ActivityFeed {
    fn on_event(&mut self, event: &EngineEvent, stats: Stats) {
        let line = match event {
            EngineEvent::Added(t) => format!("+ {} [{}]", t.name, t.priority),
            EngineEvent::Edited(t) => format!("~ {}", t.name),
            EngineEvent::Finished(t) => format!("✓ {}", t.name),
            EngineEvent::Processed(t) => format!("» {}", t.name),
            EngineEvent::Deleted(t) => format!("- {}", t.name),
            EngineEvent::Undone(r) => format!("↶ {:?} {}", r.action, r.task.name),
            EngineEvent::Sorted(by) => format!("sorted by {:?}", by),
        };
        let mut log = self.0.borrow_mut();
        log.push_back(format!("{line} ({}/{})", stats.completed, stats.total));
        while log.len() > ACTIVITY_LINES {
            log.pop_front();
        }
    }
}

pub struct App {
    pub engine: Engine,
    pub catalog: Catalog,
    pub state: TableState,
    pub finished_state: TableState,
    pub category_index: usize,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    /// Result of the last action, shown under the table.
    pub status: String,
    pub activity: Activity,
}

impl App {
    pub fn new(catalog: Catalog) -> App {
        let activity: Activity = Rc::new(RefCell::new(VecDeque::new()));
        let mut engine = Engine::new();
        engine.subscribe(Box::new(ActivityFeed(Rc::clone(&activity))));

        App {
            engine,
            catalog,
            state: TableState::default(),
            finished_state: TableState::default(),
            category_index: 0,
            view_mode: ViewMode::Active,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            status: String::new(),
            activity,
        }
    }

    fn current_len(&self) -> usize {
        match self.view_mode {
            ViewMode::Active => self.engine.list_active().len(),
            ViewMode::Finished => self.engine.list_finished().len(),
        }
    }

    fn current_state(&mut self) -> &mut TableState {
        match self.view_mode {
            ViewMode::Active => &mut self.state,
            ViewMode::Finished => &mut self.finished_state,
        }
    }

    /// Selects the next row in the current table, wrapping around.
    pub fn next(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        let state = self.current_state();
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    /// Selects the previous row in the current table, wrapping around.
    pub fn previous(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        let state = self.current_state();
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    /// Keeps both selections inside their tables after a mutation.
    pub fn sync_selection(&mut self) {
        fn clamp(state: &mut TableState, len: usize) {
            if len == 0 {
                state.select(None);
            } else {
                match state.selected() {
                    Some(i) if i >= len => state.select(Some(len - 1)),
                    None => state.select(Some(0)),
                    _ => {}
                }
            }
        }
        clamp(&mut self.state, self.engine.list_active().len());
        clamp(&mut self.finished_state, self.engine.list_finished().len());
    }

    fn selected_id(&self) -> Option<TaskId> {
        if self.view_mode != ViewMode::Active {
            return None;
        }
        let i = self.state.selected()?;
        self.engine.list_active().get(i).map(|t| t.id)
    }

    fn report(&mut self, e: Error) {
        self.status = match e {
            Error::QueueEmpty => "No tasks in queue!".to_string(),
            other => other.to_string(),
        };
    }

    /// Marks the selected task as done.
    pub fn complete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        match self.engine.mark_done(id) {
            Ok(f) => self.status = format!("Completed: {}", f.name),
            Err(e) => self.report(e),
        }
        self.sync_selection();
    }

    /// Deletes the selected task.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        match self.engine.delete_tasks([id]) {
            Ok(removed) => self.status = format!("Deleted {} task(s)", removed.len()),
            Err(e) => self.report(e),
        }
        self.sync_selection();
    }

    pub fn process_next(&mut self) {
        match self.engine.process_next() {
            Ok(f) => self.status = format!("Processed (Priority): {}", f.name),
            Err(e) => self.report(e),
        }
        self.sync_selection();
    }

    pub fn undo(&mut self) {
        match self.engine.undo() {
            Ok(r) => self.status = format!("Undid {:?}: {}", r.action, r.task.name),
            Err(e) => self.report(e),
        }
        self.sync_selection();
    }

    pub fn sort(&mut self, by: SortKey) {
        self.engine.sort_active(by);
        self.status = match by {
            SortKey::DateAdded => "Sorted by date added".to_string(),
            SortKey::Priority => "Sorted by priority".to_string(),
        };
    }

    /// Toggles between the active and finished tables.
    pub fn toggle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Active => ViewMode::Finished,
            ViewMode::Finished => ViewMode::Active,
        };
        self.sync_selection();
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Opens the category picker.
    pub fn start_category(&mut self) {
        if self.catalog.categories.is_empty() {
            self.status = "No categories configured".to_string();
            return;
        }
        self.category_index = 0;
        self.input_mode = InputMode::Category;
    }

    pub fn next_category(&mut self) {
        let len = self.catalog.categories.len();
        if len > 0 {
            self.category_index = (self.category_index + 1) % len;
        }
    }

    pub fn previous_category(&mut self) {
        let len = self.catalog.categories.len();
        if len > 0 {
            self.category_index = (self.category_index + len - 1) % len;
        }
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles Enter based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Category => self.handle_category_input(),
            InputMode::Normal => {}
        }
    }

    fn handle_category_input(&mut self) {
        let Some(name) = self
            .catalog
            .categories
            .get(self.category_index)
            .map(|c| c.name.clone())
        else {
            return;
        };
        match self.catalog.add_category(&mut self.engine, &name) {
            Ok(added) => self.status = format!("Added {} tasks from {}", added.len(), name),
            Err(e) => self.report(e),
        }
        self.input_mode = InputMode::Normal;
        self.sync_selection();
    }

    fn handle_adding_input(&mut self) {
        match self.add_state.step {
            0 => {
                // Name
                if !self.input_buffer.trim().is_empty() {
                    self.add_state.name = self.input_buffer.trim().to_string();
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => {
                // Description
                self.add_state.description = self.input_buffer.clone();
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            2 => {
                // Priority, empty defaults to Low
                let priority = if self.input_buffer.trim().is_empty() {
                    Ok(Priority::Low)
                } else {
                    self.input_buffer.parse::<Priority>()
                };
                match priority {
                    Ok(p) => {
                        let t = self.engine.add_task(
                            std::mem::take(&mut self.add_state.name),
                            std::mem::take(&mut self.add_state.description),
                            p,
                        );
                        self.status = format!("Task added (id = {})", t.id);
                        self.input_mode = InputMode::Normal;
                        self.input_buffer.clear();
                        self.sync_selection();
                    }
                    Err(e) => {
                        self.report(e);
                        self.input_buffer.clear();
                    }
                }
            }
            _ => {}
        }
    }
}
