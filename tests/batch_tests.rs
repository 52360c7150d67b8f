use std::io::Cursor;

use devlist::commands::{run_batch, BatchCommand, BatchSummary};
use devlist::engine::Engine;
use devlist::models::{Priority, SortKey};
use devlist::templates::Catalog;

fn run(script: &str, quiet: bool) -> (Engine, BatchSummary, String) {
    let mut engine = Engine::new();
    let mut out = Vec::new();
    let summary = run_batch(
        &mut engine,
        &Catalog::builtin(),
        Cursor::new(script.to_string()),
        &mut out,
        quiet,
    )
    .unwrap();
    (engine, summary, String::from_utf8(out).unwrap())
}

#[test]
fn test_parse_commands() {
    let cmd: BatchCommand =
        serde_json::from_str(r#"{"op":"add","name":"A","priority":"High"}"#).unwrap();
    assert_eq!(
        cmd,
        BatchCommand::Add {
            name: "A".into(),
            description: String::new(),
            priority: Priority::High,
            date_added: None,
        }
    );

    let cmd: BatchCommand = serde_json::from_str(r#"{"op":"sort","by":"date_added"}"#).unwrap();
    assert_eq!(cmd, BatchCommand::Sort { by: SortKey::DateAdded });

    let cmd: BatchCommand = serde_json::from_str(r#"{"op":"next"}"#).unwrap();
    assert_eq!(cmd, BatchCommand::Next);
}

#[test]
fn test_process_and_undo_script() {
    let script = r#"
# two tasks, dispatch the urgent one, then take it back
{"op":"add","name":"A","priority":"high"}
{"op":"add","name":"B","priority":"low"}
{"op":"next"}
{"op":"stats"}
{"op":"undo"}
{"op":"stats"}
"#;
    let (engine, summary, out) = run(script, false);

    assert_eq!(summary, BatchSummary { executed: 6, failed: 0 });
    assert!(out.contains("Processed (Priority): A"));
    assert!(out.contains("Tasks: 1 | Completed: 1 | In Progress: 1"));
    assert!(out.contains("Tasks: 2 | Completed: 0 | In Progress: 2"));
    assert_eq!(engine.list_active().len(), 2);
    engine.check_invariants().unwrap();
}

#[test]
fn test_expected_errors_do_not_stop_the_run() {
    let script = r#"
{"op":"undo"}
{"op":"next"}
{"op":"done","id":7}
this is not json
{"op":"add","name":"still runs","priority":"medium"}
"#;
    let (engine, summary, out) = run(script, false);

    assert_eq!(summary, BatchSummary { executed: 1, failed: 4 });
    assert!(out.contains("line 2: Nothing to undo"));
    assert!(out.contains("line 3: No tasks in queue"));
    assert!(out.contains("line 4: Task 7 not found"));
    assert!(out.contains("line 5: invalid command"));
    assert_eq!(engine.list_active()[0].name, "still runs");
}

#[test]
fn test_category_and_views() {
    let script = r#"
{"op":"add_category","category":"frontend"}
{"op":"sort","by":"priority"}
{"op":"done","id":2}
{"op":"list"}
{"op":"finished"}
{"op":"queue"}
"#;
    let (engine, summary, out) = run(script, true);

    assert_eq!(summary.failed, 0);
    assert_eq!(engine.list_active().len(), 4);
    assert_eq!(engine.list_finished()[0].name, "Setup CSS Grid");
    // Quiet mode hides confirmations but still prints views.
    assert!(!out.contains("Added 5 tasks"));
    assert!(out.contains("Homepage"));
    assert!(out.contains("Navbar"));
    assert!(out.contains("Grid"));

    let first = &engine.list_active()[0];
    assert_eq!(first.priority, Priority::High);
}

#[test]
fn test_unknown_category_is_reported() {
    let (engine, summary, out) = run(r#"{"op":"add_category","category":"Ops"}"#, false);
    assert_eq!(summary.failed, 1);
    assert!(out.contains("Unknown category 'Ops'"));
    assert!(engine.list_active().is_empty());
}

#[test]
fn test_edit_and_delete_script() {
    let script = r#"
{"op":"add","name":"A","priority":"low","date_added":"2024-05-01"}
{"op":"add","name":"B","priority":"low"}
{"op":"edit","id":2,"priority":"high","description":"now urgent"}
{"op":"delete","ids":[1]}
{"op":"next"}
{"op":"undo"}
{"op":"undo"}
"#;
    let (engine, summary, _) = run(script, true);

    assert_eq!(summary.failed, 0);
    let names: Vec<&str> = engine.list_active().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
    let a = &engine.list_active()[1];
    assert_eq!(a.date_added, "2024-05-01");
    assert_eq!(engine.list_active()[0].description, "now urgent");
    engine.check_invariants().unwrap();
}
