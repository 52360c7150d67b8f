use std::cell::RefCell;
use std::rc::Rc;

use devlist::engine::{Engine, EngineEvent, EngineObserver};
use devlist::error::Error;
use devlist::models::{Priority, SortKey, Stats, TaskId, TaskPatch};
use devlist::undo::ActionKind;

fn assert_consistent(engine: &Engine) {
    let stats = engine.stats();
    assert_eq!(stats.total, engine.list_active().len());
    assert_eq!(stats.completed, engine.list_finished().len());
    engine.check_invariants().unwrap();
}

#[test]
fn test_process_next_then_undo() {
    let mut engine = Engine::new();
    let a = engine.add_task("A", "", Priority::High);
    let b = engine.add_task("B", "", Priority::Low);

    let done = engine.process_next().unwrap();
    assert_eq!(done.id, a.id);
    assert_eq!(engine.stats(), Stats { total: 1, completed: 1, in_progress: 1 });
    assert_consistent(&engine);

    let reversal = engine.undo().unwrap();
    assert_eq!(reversal.action, ActionKind::Process);
    assert_eq!(reversal.task, a);
    assert_eq!(engine.stats(), Stats { total: 2, completed: 0, in_progress: 2 });
    assert!(engine.list_finished().is_empty());

    let active = engine.list_active();
    assert!(active.contains(&a));
    assert!(active.contains(&b));
    assert_consistent(&engine);
}

#[test]
fn test_delete_then_undo_restores_snapshot() {
    let mut engine = Engine::new();
    let b = engine.add_task_on("B", "write the thing", Priority::Medium, "2024-01-05");

    engine.delete_tasks([b.id]).unwrap();
    assert_eq!(engine.stats().total, 0);
    assert!(engine.queue().is_empty());
    assert_consistent(&engine);

    let reversal = engine.undo().unwrap();
    assert_eq!(reversal.action, ActionKind::Delete);
    assert_eq!(engine.stats().total, 1);
    assert_eq!(engine.list_active()[0], b);
    assert_eq!(engine.list_active()[0].date_added, "2024-01-05");
    assert_eq!(engine.queue().len(), 1);
    assert_consistent(&engine);
}

#[test]
fn test_dispatch_order_rank_then_fifo() {
    let mut engine = Engine::new();
    let m = engine.add_task("one", "", Priority::Medium);
    let h1 = engine.add_task("two", "", Priority::High);
    let h2 = engine.add_task("three", "", Priority::High);

    let order: Vec<TaskId> = (0..3).map(|_| engine.process_next().unwrap().id).collect();
    assert_eq!(order, vec![h1.id, h2.id, m.id]);
    assert!(matches!(engine.process_next(), Err(Error::QueueEmpty)));
    assert_consistent(&engine);
}

#[test]
fn test_mark_done_leaves_queue() {
    let mut engine = Engine::new();
    let a = engine.add_task("A", "", Priority::High);
    let b = engine.add_task("B", "", Priority::Low);

    let finished = engine.mark_done(a.id).unwrap();
    assert_eq!(finished.name, "A");
    assert_eq!(engine.stats(), Stats { total: 1, completed: 1, in_progress: 1 });

    assert_eq!(engine.process_next().unwrap().id, b.id);
    assert!(matches!(engine.process_next(), Err(Error::QueueEmpty)));
    assert_consistent(&engine);
}

#[test]
fn test_expected_errors_leave_state_untouched() {
    let mut engine = Engine::new();
    assert!(matches!(engine.undo(), Err(Error::NothingToUndo)));
    assert!(matches!(engine.process_next(), Err(Error::QueueEmpty)));

    let a = engine.add_task("A", "", Priority::High);
    assert!(matches!(engine.mark_done(99), Err(Error::NotFound(99))));
    assert!(matches!(engine.delete_tasks([a.id, 99]), Err(Error::NotFound(99))));

    assert_eq!(engine.list_active(), &[a]);
    assert_eq!(engine.undo_depth(), 0);
    assert_eq!(engine.queue().len(), 1);
    assert_consistent(&engine);
}

#[test]
fn test_sort_by_priority_is_stable() {
    let mut engine = Engine::new();
    engine.add_task("l1", "", Priority::Low);
    engine.add_task("h1", "", Priority::High);
    engine.add_task("m1", "", Priority::Medium);
    engine.add_task("l2", "", Priority::Low);
    engine.add_task("h2", "", Priority::High);

    engine.sort_active(SortKey::Priority);

    let names: Vec<&str> = engine.list_active().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["h1", "h2", "m1", "l1", "l2"]);
    let ranks: Vec<u8> = engine.list_active().iter().map(|t| t.priority.rank()).collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_sort_by_date_tolerates_bad_dates() {
    let mut engine = Engine::new();
    engine.add_task_on("march", "", Priority::Low, "2024-03-01");
    engine.add_task_on("garbage", "", Priority::Low, "not a date");
    engine.add_task_on("january", "", Priority::Low, "2024-01-15");
    engine.add_task_on("february", "", Priority::Low, "2024-02-10");
    engine.add_task_on("blank", "", Priority::Low, "");

    engine.sort_active(SortKey::DateAdded);

    let names: Vec<&str> = engine.list_active().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["january", "february", "march", "garbage", "blank"]);
}

#[test]
fn test_undo_is_lifo_across_actions() {
    let mut engine = Engine::new();
    let a = engine.add_task("A", "", Priority::Low);
    let b = engine.add_task("B", "", Priority::Low);
    let c = engine.add_task("C", "", Priority::Low);

    engine.mark_done(a.id).unwrap();
    engine.delete_tasks([b.id]).unwrap();
    assert_eq!(engine.process_next().unwrap().id, c.id);
    assert_eq!(engine.next_undo(), Some(ActionKind::Process));

    let first = engine.undo().unwrap();
    assert_eq!((first.action, first.task.id), (ActionKind::Process, c.id));
    let second = engine.undo().unwrap();
    assert_eq!((second.action, second.task.id), (ActionKind::Delete, b.id));
    let third = engine.undo().unwrap();
    assert_eq!((third.action, third.task.id), (ActionKind::Finish, a.id));
    assert!(matches!(engine.undo(), Err(Error::NothingToUndo)));

    assert_eq!(engine.stats(), Stats { total: 3, completed: 0, in_progress: 3 });
    assert_consistent(&engine);
}

#[test]
fn test_batch_delete_runs_highest_position_first() {
    let mut engine = Engine::new();
    let a = engine.add_task("A", "", Priority::High);
    let b = engine.add_task("B", "", Priority::Medium);
    let c = engine.add_task("C", "", Priority::Low);

    let removed = engine.delete_tasks([a.id, c.id]).unwrap();
    let removed_ids: Vec<TaskId> = removed.iter().map(|t| t.id).collect();
    assert_eq!(removed_ids, vec![c.id, a.id]);
    assert_eq!(engine.list_active(), &[b.clone()]);

    assert_eq!(engine.undo().unwrap().task.id, a.id);
    assert_eq!(engine.undo().unwrap().task.id, c.id);

    // Restored tasks go to the end of the list.
    let names: Vec<&str> = engine.list_active().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A", "C"]);
    assert_consistent(&engine);
}

#[test]
fn test_undo_puts_task_back_in_queue() {
    let mut engine = Engine::new();
    let a = engine.add_task("A", "", Priority::High);
    engine.process_next().unwrap();
    engine.undo().unwrap();
    assert_eq!(engine.process_next().unwrap().id, a.id);
}

#[test]
fn test_ids_are_never_reused() {
    let mut engine = Engine::new();
    let a = engine.add_task("A", "", Priority::Low);
    engine.delete_tasks([a.id]).unwrap();
    let b = engine.add_task("B", "", Priority::Low);
    assert!(b.id > a.id);

    engine.delete_tasks([b.id]).unwrap();
    engine.undo().unwrap();
    assert_eq!(engine.list_active()[0].id, b.id);
    assert_consistent(&engine);
}

#[test]
fn test_edit_priority_moves_queue_entry() {
    let mut engine = Engine::new();
    let a = engine.add_task("A", "", Priority::Low);
    engine.add_task("B", "", Priority::Medium);

    let patch = TaskPatch {
        name: Some("A2".into()),
        priority: Some(Priority::High),
        ..TaskPatch::default()
    };
    let edited = engine.edit_task(a.id, &patch).unwrap();
    assert_eq!(edited.name, "A2");
    assert_eq!(edited.description, "");
    assert_consistent(&engine);

    assert_eq!(engine.process_next().unwrap().id, a.id);
    assert!(matches!(
        engine.edit_task(99, &TaskPatch::default()),
        Err(Error::NotFound(99))
    ));
    // Edits are not undoable; the last record is the process.
    assert_eq!(engine.next_undo(), Some(ActionKind::Process));
}

#[test]
fn test_counters_track_store_sizes() {
    let mut engine = Engine::new();
    let mut ids = Vec::new();
    for (i, p) in [Priority::Low, Priority::High, Priority::Medium, Priority::High]
        .into_iter()
        .enumerate()
    {
        ids.push(engine.add_task(format!("t{i}"), "", p).id);
        assert_consistent(&engine);
    }

    engine.mark_done(ids[0]).unwrap();
    assert_consistent(&engine);
    engine.process_next().unwrap();
    assert_consistent(&engine);
    engine.delete_tasks([ids[2]]).unwrap();
    assert_consistent(&engine);
    engine.undo().unwrap();
    assert_consistent(&engine);
    engine.undo().unwrap();
    assert_consistent(&engine);
    engine.process_next().unwrap();
    assert_consistent(&engine);
    engine.undo().unwrap();
    engine.undo().unwrap();
    assert_consistent(&engine);

    assert_eq!(engine.stats(), Stats { total: 4, completed: 0, in_progress: 4 });
}

struct Recorder(Rc<RefCell<Vec<(EngineEvent, Stats)>>>);

impl EngineObserver for Recorder {
    fn on_event(&mut self, event: &EngineEvent, stats: Stats) {
        self.0.borrow_mut().push((event.clone(), stats));
    }
}

#[test]
fn test_observers_see_applied_state() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut engine = Engine::new();
    engine.subscribe(Box::new(Recorder(Rc::clone(&events))));

    let a = engine.add_task("A", "", Priority::High);
    engine.process_next().unwrap();
    engine.undo().unwrap();
    engine.sort_active(SortKey::Priority);
    let _ = engine.undo();

    let events = events.borrow();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].0, EngineEvent::Added(a.clone()));
    assert!(matches!(&events[1].0, EngineEvent::Processed(f) if f.id == a.id));
    assert_eq!(events[1].1, Stats { total: 0, completed: 1, in_progress: 0 });
    assert!(matches!(&events[2].0, EngineEvent::Undone(r) if r.task == a));
    assert_eq!(events[2].1, Stats { total: 1, completed: 0, in_progress: 1 });
    assert_eq!(events[3].0, EngineEvent::Sorted(SortKey::Priority));
}
