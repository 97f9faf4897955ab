use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use time::{Date, OffsetDateTime, UtcOffset};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tracker-{nanos}-{file_name}"))
}

fn local_today() -> Date {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}

fn write_store(path: &PathBuf, tasks: serde_json::Value, completions: serde_json::Value) {
    let content = serde_json::json!({
        "schema_version": 1,
        "tasks": tasks,
        "completions": completions
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

#[test]
fn list_shows_active_tasks() {
    let exe = env!("CARGO_BIN_EXE_tracker");
    let store_path = temp_path("cli-list.json");
    write_store(
        &store_path,
        serde_json::json!([
            {
                "id": "task-1",
                "title": "stretch",
                "kind": "daily",
                "created_at": "2020-01-01T00:00:00Z",
                "archived": false
            },
            {
                "id": "task-2",
                "title": "file taxes",
                "kind": "once",
                "created_at": "2020-01-02T00:00:00Z",
                "archived": false
            },
            {
                "id": "task-3",
                "title": "hidden",
                "kind": "daily",
                "created_at": "2020-01-03T00:00:00Z",
                "archived": true
            }
        ]),
        serde_json::json!([]),
    );

    let output = Command::new(exe)
        .args(["list"])
        .env("TRACKER_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("stretch"));
    assert!(stdout.contains("file taxes"));
    assert!(!stdout.contains("hidden"));
}

#[test]
fn list_splits_tasks_into_daily_and_once_sections() {
    let exe = env!("CARGO_BIN_EXE_tracker");
    let store_path = temp_path("cli-list-sections.json");
    write_store(
        &store_path,
        serde_json::json!([
            {
                "id": "task-1",
                "title": "stretch",
                "kind": "daily",
                "created_at": "2020-01-01T00:00:00Z",
                "archived": false
            },
            {
                "id": "task-2",
                "title": "file taxes",
                "kind": "once",
                "created_at": "2020-01-02T00:00:00Z",
                "archived": false
            }
        ]),
        serde_json::json!([]),
    );

    let output = Command::new(exe)
        .args(["list"])
        .env("TRACKER_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    let daily_heading = stdout.find("Daily tasks").expect("daily heading");
    let once_heading = stdout.find("Once tasks").expect("once heading");
    let daily_row = stdout.find("stretch").expect("daily row");
    let once_row = stdout.find("file taxes").expect("once row");

    // Each task lands under its own heading.
    assert!(daily_heading < daily_row);
    assert!(daily_row < once_heading);
    assert!(once_heading < once_row);
}

#[test]
fn list_marks_an_empty_section() {
    let exe = env!("CARGO_BIN_EXE_tracker");
    let store_path = temp_path("cli-list-empty-section.json");
    write_store(
        &store_path,
        serde_json::json!([{
            "id": "task-1",
            "title": "stretch",
            "kind": "daily",
            "created_at": "2020-01-01T00:00:00Z",
            "archived": false
        }]),
        serde_json::json!([]),
    );

    let output = Command::new(exe)
        .args(["list"])
        .env("TRACKER_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Once tasks\n(none)"));
}

#[test]
fn list_with_no_tasks_prints_placeholder() {
    let exe = env!("CARGO_BIN_EXE_tracker");
    let store_path = temp_path("cli-list-empty.json");

    let output = Command::new(exe)
        .args(["list"])
        .env("TRACKER_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No active tasks."));
}

#[test]
fn list_json_marks_once_task_completed_from_any_day() {
    let exe = env!("CARGO_BIN_EXE_tracker");
    let store_path = temp_path("cli-list-once.json");
    write_store(
        &store_path,
        serde_json::json!([{
            "id": "task-1",
            "title": "file taxes",
            "kind": "once",
            "created_at": "2020-01-01T00:00:00Z",
            "archived": false
        }]),
        serde_json::json!([{
            "id": "completion-1",
            "task_id": "task-1",
            "completed_date": "2020-06-01",
            "is_completed": true,
            "failure_note": null,
            "updated_at": "2020-06-01T08:00:00Z"
        }]),
    );

    let output = Command::new(exe)
        .args(["list", "--json"])
        .env("TRACKER_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let tasks: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(tasks[0]["id"], "task-1");
    assert_eq!(tasks[0]["completed"], true);
}

#[test]
fn list_json_marks_daily_task_completed_only_for_today() {
    let exe = env!("CARGO_BIN_EXE_tracker");
    let store_path = temp_path("cli-list-daily.json");
    let today = local_today();
    write_store(
        &store_path,
        serde_json::json!([{
            "id": "task-1",
            "title": "stretch",
            "kind": "daily",
            "created_at": "2020-01-01T00:00:00Z",
            "archived": false
        }]),
        serde_json::json!([
            {
                "id": "completion-1",
                "task_id": "task-1",
                "completed_date": "2020-06-01",
                "is_completed": true,
                "failure_note": null,
                "updated_at": "2020-06-01T08:00:00Z"
            },
            {
                "id": "completion-2",
                "task_id": "task-1",
                "completed_date": today.to_string(),
                "is_completed": true,
                "failure_note": null,
                "updated_at": "2020-06-01T08:00:00Z"
            }
        ]),
    );

    let output = Command::new(exe)
        .args(["list", "--json"])
        .env("TRACKER_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let tasks: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(tasks[0]["completed"], true);
}
