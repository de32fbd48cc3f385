use std::{fs, path::PathBuf};

use serde_json::Value;
use tempfile::tempdir;

use branchline_cli::{Args, Command, Outcome, run};

const VALID_FIXTURES: [&str; 3] = ["story.json", "legacy.json", "nested.json"];

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn args(command: Command) -> Args {
    Args {
        command,
        config: None,
        log_level: "off".to_string(),
    }
}

fn run_json(command: Command) -> (Outcome, Value) {
    let mut out = Vec::new();
    let outcome = run(&args(command), &mut out).expect("Command failed");
    let json = serde_json::from_slice(&out).expect("Output should be JSON");
    (outcome, json)
}

#[test]
fn e2e_smoke_test_layout_valid_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut failed = Vec::new();

    for name in VALID_FIXTURES {
        let output_path = temp_dir.path().join(name);
        let command = Command::Layout {
            input: fixture(name),
            graph: None,
            output: Some(output_path.to_string_lossy().to_string()),
        };

        match run(&args(command), &mut Vec::new()) {
            Ok(outcome) => {
                assert_eq!(outcome, Outcome::Success);
                let plan: Value = serde_json::from_str(
                    &fs::read_to_string(&output_path).expect("Plan should be written"),
                )
                .expect("Plan should be JSON");
                assert!(plan["nodes"].as_array().is_some_and(|nodes| !nodes.is_empty()));
            }
            Err(err) => failed.push((name, err)),
        }
    }

    if !failed.is_empty() {
        for (name, err) in &failed {
            eprintln!("  - {name}: {err}");
        }
        panic!("{} fixture(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_layout_story_positions() {
    let (_, plan) = run_json(Command::Layout {
        input: fixture("story.json"),
        graph: None,
        output: None,
    });

    let node = |id: &str| -> Value {
        plan["nodes"]
            .as_array()
            .and_then(|nodes| nodes.iter().find(|node| node["id"] == id))
            .cloned()
            .unwrap_or_else(|| panic!("{id} should be planned"))
    };

    assert_eq!(plan["root"], "intro");
    assert_eq!(node("trailer")["kind"], "prologue");
    assert_eq!(node("trailer")["y"], -150.0);
    assert_eq!(node("camp")["kind"], "secondary-root");
    assert_eq!(node("bloopers")["kind"], "detached");
    assert_eq!(node("extras")["kind"], "subtree");
    assert_eq!(node("left")["duration"], "1:02:05");
    assert!(
        node("left")["categories"]
            .as_array()
            .is_some_and(|tags| tags.contains(&Value::from("loop-back")))
    );
    assert_eq!(plan["detached_links"].as_array().map(Vec::len), Some(0));
}

#[test]
fn e2e_layout_selects_graph_by_key() {
    let (_, plan) = run_json(Command::Layout {
        input: fixture("nested.json"),
        graph: Some("season2".to_string()),
        output: None,
    });
    assert_eq!(plan["root"], "s2e1");

    let result = run(
        &args(Command::Layout {
            input: fixture("nested.json"),
            graph: Some("season3".to_string()),
            output: None,
        }),
        &mut Vec::new(),
    );
    assert!(result.is_err(), "Unknown graph key should fail");
}

#[test]
fn e2e_list_labels() {
    let (_, list) = run_json(Command::List {
        input: fixture("nested.json"),
    });
    assert_eq!(list[0]["key"], "season1");
    assert_eq!(list[0]["label"], "Season one");
    assert_eq!(list[1]["label"], "season2");

    let (_, list) = run_json(Command::List {
        input: fixture("legacy.json"),
    });
    assert_eq!(list[0]["key"], "default");
    assert_eq!(list[0]["label"], "Main Graph");
}

#[test]
fn e2e_validate_reports_findings() {
    let (outcome, report) = run_json(Command::Validate {
        input: fixture("story.json"),
    });
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(report["graphs_examined"], 1);

    let (outcome, report) = run_json(Command::Validate {
        input: fixture("broken_mirror.json"),
    });
    assert_eq!(outcome, Outcome::ValidationFailed);
    assert_eq!(report["missing_outgoing_targets_count"], 1);
    assert_eq!(report["outgoing_not_in_incoming_count"], 1);
    assert_eq!(report["empty_outgoing_labels_count"], 1);
}

#[test]
fn e2e_highlight_node() {
    let (_, highlight) = run_json(Command::Highlight {
        input: fixture("story.json"),
        node: "dawn".to_string(),
        graph: None,
    });

    assert_eq!(highlight["outgoing"], serde_json::json!(["ending"]));
    assert_eq!(highlight["directIncoming"], serde_json::json!(["camp"]));
    assert_eq!(
        highlight["indirectIncoming"],
        serde_json::json!(["right", "intro"])
    );
}

#[test]
fn e2e_invalid_json_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("bad.json");
    fs::write(&path, "{ \"nodes\": ").expect("Failed to write input");

    let result = run(
        &args(Command::Validate {
            input: path.to_string_lossy().to_string(),
        }),
        &mut Vec::new(),
    );
    assert!(result.is_err());
}
