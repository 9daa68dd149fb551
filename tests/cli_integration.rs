/// CLI integration tests for liftlog.
///
/// Each test spawns the compiled binary via the `assert_cmd::cargo_bin_cmd!`
/// macro and sets `LIFTLOG_HOME` to a fresh `TempDir` so tests are fully
/// isolated from the developer's real `~/.liftlog` data.
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

// ── helpers ──────────────────────────────────────────────────────────────────

fn cmd_in(dir: &TempDir) -> assert_cmd::Command {
    let mut c = cargo_bin_cmd!("liftlog");
    c.env("LIFTLOG_HOME", dir.path());
    c.env_remove("LIFTLOG_LOG");
    c
}

fn init_dir(dir: &TempDir) {
    cmd_in(dir).args(["init", "--skip"]).assert().success();
}

fn parse_json(output: &assert_cmd::assert::Assert) -> Value {
    let bytes = output.get_output().stdout.clone();
    serde_json::from_slice(&bytes).expect("stdout is not valid JSON")
}

fn parse_stderr_json(output: &assert_cmd::assert::Assert) -> Value {
    let bytes = output.get_output().stderr.clone();
    serde_json::from_slice(&bytes).expect("stderr is not valid JSON")
}

/// Log the two Push A workouts of January 2024.
fn log_push_a(dir: &TempDir) {
    cmd_in(dir)
        .args(["--date", "2024-01-10", "log", "set", "--session", "Push A"])
        .args(["--exercise", "Bench Press", "50x8", "60x8", "70x8"])
        .assert()
        .success();
    cmd_in(dir)
        .args(["--date", "12/01/2024", "log", "set", "--session", "Push A"])
        .args(["--exercise", "Bench Press", "65x8"])
        .assert()
        .success();
}

// ── init / config ────────────────────────────────────────────────────────────

#[test]
fn test_init_skip_creates_config_and_db() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .args(["init", "--skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config initialized"));
    assert!(dir.path().join("config.toml").exists());
    assert!(dir.path().join("data.db").exists());

    cmd_in(&dir).args(["init", "--skip"]).assert().success();
}

#[test]
fn test_config_set_and_show() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir)
        .args(["config", "set", "weight", "81.5"])
        .assert()
        .success();

    let assert = cmd_in(&dir).args(["config", "show"]).assert().success();
    let json = parse_json(&assert);
    assert_eq!(json["data"]["config"]["profile"]["body_weight_kg"], 81.5);
    assert_eq!(json["data"]["config"]["confirm"]["timeout_secs"], 10);
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let assert = cmd_in(&dir)
        .args(["config", "set", "colour", "red"])
        .assert()
        .failure();
    let json = parse_stderr_json(&assert);
    assert_eq!(json["status"], "error");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("unknown config key")
    );
}

// ── logging and views ────────────────────────────────────────────────────────

#[test]
fn test_log_sets_and_group_sessions() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);

    let assert = cmd_in(&dir).args(["sessions"]).assert().success();
    let json = parse_json(&assert);
    assert_eq!(json["command"], "sessions");
    let months = json["data"]["months"].as_array().unwrap();
    assert_eq!(months.len(), 1);
    assert_eq!(months[0]["key"], "2024-01");
    let items = months[0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["date"], "2024-01-12");
    assert_eq!(items[1]["tonnage"], 1440.0);
    assert_eq!(items[1]["set_count"], 3);
}

#[test]
fn test_progress_reports_trends() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);

    let assert = cmd_in(&dir)
        .args(["progress", "Bench Press"])
        .assert()
        .success();
    let json = parse_json(&assert);
    let history = json["data"]["progression"]["history"].as_array().unwrap();
    assert_eq!(history[0]["trend"], "down");
    assert_eq!(history[1]["trend"], "flat");
    assert_eq!(json["data"]["progression"]["personal_record"]["weight"], 70.0);

    let assert = cmd_in(&dir).args(["progress", "Squat"]).assert().success();
    assert!(parse_json(&assert)["data"]["progression"].is_null());
}

#[test]
fn test_volume_window() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);

    let assert = cmd_in(&dir)
        .args(["--date", "2024-01-12", "volume", "--days", "3"])
        .assert()
        .success();
    let json = parse_json(&assert);
    let points = json["data"]["points"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0]["tonnage"], 1440.0);
    assert_eq!(points[1]["tonnage"], 0.0);
    assert_eq!(points[2]["tonnage"], 520.0);
}

#[test]
fn test_volume_rejects_oversized_window() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);
    for days in ["4000000000", "0"] {
        cmd_in(&dir)
            .args(["volume", "--days", days])
            .assert()
            .code(2);
    }
}

#[test]
fn test_log_cardio_with_seeded_type() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let assert = cmd_in(&dir)
        .args(["--date", "2024-06-01", "log", "cardio", "--type", "Running"])
        .args(["--distance", "5", "--duration", "27.5", "--effort", "6"])
        .assert()
        .success();
    let json = parse_json(&assert);
    assert_eq!(json["data"]["entry"]["mode"], "continuous");

    cmd_in(&dir)
        .args(["log", "cardio", "--type", "Swimming", "--effort", "6"])
        .assert()
        .failure();

    let assert = cmd_in(&dir).args(["cardio"]).assert().success();
    let json = parse_json(&assert);
    assert_eq!(json["data"]["months"][0]["items"][0]["label"], "Running");
}

#[test]
fn test_nutrient_logging_by_name() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir)
        .args(["nutrient", "add", "Protein", "--unit", "g", "--goal", "150"])
        .assert()
        .success();
    cmd_in(&dir)
        .args(["--date", "2024-02-01", "log", "nutrient", "protein", "40"])
        .assert()
        .success();
    cmd_in(&dir)
        .args(["--date", "2024-02-01", "log", "nutrient", "Protein", "35"])
        .assert()
        .success();

    let assert = cmd_in(&dir).args(["nutrition"]).assert().success();
    let json = parse_json(&assert);
    let line = &json["data"]["days"][0]["lines"][0];
    assert_eq!(line["label"], "Protein");
    assert_eq!(line["total"], 75.0);
    assert_eq!(line["goal_ratio"], 0.5);
}

// ── delete ───────────────────────────────────────────────────────────────────

#[test]
fn test_delete_needs_two_presses() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);

    let args = ["delete", "session", "2024-01-10", "Push A"];
    let assert = cmd_in(&dir).args(args).assert().success();
    assert_eq!(parse_json(&assert)["data"]["status"], "armed");

    let assert = cmd_in(&dir).args(["sessions"]).assert().success();
    let items = parse_json(&assert)["data"]["months"][0]["items"].clone();
    assert_eq!(items.as_array().unwrap().len(), 2);

    let assert = cmd_in(&dir).args(args).assert().success();
    assert_eq!(parse_json(&assert)["data"]["status"], "deleted");

    let assert = cmd_in(&dir).args(["sessions"]).assert().success();
    let items = parse_json(&assert)["data"]["months"][0]["items"].clone();
    assert_eq!(items.as_array().unwrap().len(), 1);
}

#[test]
fn test_delete_cancel_disarms() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);

    let args = ["delete", "session", "2024-01-10", "Push A"];
    cmd_in(&dir).args(args).assert().success();
    cmd_in(&dir).args(["delete", "--cancel"]).assert().success();

    let assert = cmd_in(&dir).args(args).assert().success();
    assert_eq!(parse_json(&assert)["data"]["status"], "armed");
}

#[test]
fn test_delete_other_target_rearms() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);

    cmd_in(&dir)
        .args(["delete", "session", "2024-01-10", "Push A"])
        .assert()
        .success();
    let assert = cmd_in(&dir)
        .args(["delete", "session", "2024-01-12", "Push A"])
        .assert()
        .success();
    assert_eq!(parse_json(&assert)["data"]["status"], "armed");

    let assert = cmd_in(&dir)
        .args(["delete", "session", "2024-01-10", "Push A"])
        .assert()
        .success();
    assert_eq!(parse_json(&assert)["data"]["status"], "armed");
}

#[test]
fn test_delete_missing_session_fails() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir)
        .args(["delete", "session", "2024-01-10", "Push A"])
        .assert()
        .failure();
}

// ── export / import ──────────────────────────────────────────────────────────

#[test]
fn test_export_all_to_stdout() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);

    let assert = cmd_in(&dir)
        .args(["export", "strength", "--all", "--stdout"])
        .assert()
        .success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(out.starts_with('\u{FEFF}'));
    let lines: Vec<&str> = out.trim_start_matches('\u{FEFF}').lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("2024-01-12,"));
}

#[test]
fn test_export_writes_file_to_configured_directory() {
    let dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);
    cmd_in(&dir)
        .args(["config", "set", "export.directory"])
        .arg(out_dir.path())
        .assert()
        .success();

    let assert = cmd_in(&dir)
        .args(["--date", "2024-02-01", "export", "strength", "--month", "2024-01"])
        .assert()
        .success();
    let json = parse_json(&assert);
    assert_eq!(json["data"]["selected"], 2);
    assert_eq!(json["data"]["outcome"], "downloaded");

    let file = out_dir.path().join("liftlog_strength_2024-02-01.csv");
    let content = fs::read_to_string(file).unwrap();
    assert_eq!(content.lines().count(), 5);
}

#[test]
fn test_export_search_limits_all() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);
    cmd_in(&dir)
        .args(["--date", "2024-01-12", "log", "set", "--session", "Legs"])
        .args(["--exercise", "Squat", "100x5"])
        .assert()
        .success();

    let assert = cmd_in(&dir)
        .args(["export", "strength", "--all", "--search", "squat", "--stdout"])
        .assert()
        .success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("Legs,Squat"));
    assert!(!out.contains("Bench Press"));
}

#[test]
fn test_export_flags_combine_into_one_selection() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);

    let combos: [&[&str]; 3] = [
        &["--month", "2024-01", "--all"],
        &["--month", "2024-01", "--category", "Push A"],
        &["--id", "2024-01-10|Push A", "--id", "2024-01-12|Push A", "--all"],
    ];
    for flags in combos {
        let assert = cmd_in(&dir)
            .args(["export", "strength", "--stdout"])
            .args(flags)
            .assert()
            .success();
        let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        assert_eq!(out.lines().count(), 5, "flags {:?}", flags);
    }
}

#[test]
fn test_export_id_is_not_undone_by_all() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir)
        .args(["--date", "2024-01-10", "log", "set", "--session", "Push A"])
        .args(["--exercise", "Bench Press", "60x8"])
        .assert()
        .success();

    let assert = cmd_in(&dir)
        .args(["export", "strength", "--id", "2024-01-10|Push A", "--all", "--stdout"])
        .assert()
        .success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(out.lines().count(), 2);
}

#[test]
fn test_export_without_selection_fails() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);
    cmd_in(&dir)
        .args(["export", "strength", "--stdout"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing selected"));
}

#[test]
fn test_import_round_trip() {
    let source = TempDir::new().unwrap();
    init_dir(&source);
    log_push_a(&source);
    let assert = cmd_in(&source)
        .args(["export", "strength", "--all", "--stdout"])
        .assert()
        .success();
    let csv_path = source.path().join("export.csv");
    fs::write(&csv_path, &assert.get_output().stdout).unwrap();

    let target = TempDir::new().unwrap();
    init_dir(&target);
    let assert = cmd_in(&target)
        .arg("import")
        .arg(&csv_path)
        .assert()
        .success();
    assert_eq!(parse_json(&assert)["data"]["imported"], 4);

    let assert = cmd_in(&target).args(["sessions"]).assert().success();
    let json = parse_json(&assert);
    assert_eq!(json["data"]["months"][0]["items"][1]["tonnage"], 1440.0);
}

// ── coach ────────────────────────────────────────────────────────────────────

#[test]
fn test_coach_context_prints_blocks() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    log_push_a(&dir);
    cmd_in(&dir)
        .args(["--date", "2024-01-20", "coach", "context"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STRENGTH HISTORY:"))
        .stdout(predicate::str::contains("Push A | Bench Press | set 3 | 70 kg x 8"))
        .stdout(predicate::str::contains("SLEEP HISTORY:\n- none"));
}

#[test]
fn test_coach_analyze_requires_command() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir)
        .args(["coach", "analyze"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no coach configured"));
}

#[test]
fn test_coach_chat_falls_back_when_unreachable() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir)
        .args(["config", "set", "coach.command", "liftlog-test-no-such-program"])
        .assert()
        .success();

    let assert = cmd_in(&dir)
        .args(["coach", "chat", "How am I doing?"])
        .assert()
        .success();
    let json = parse_json(&assert);
    assert!(
        json["data"]["reply"]
            .as_str()
            .unwrap()
            .starts_with("Sorry, I can't reach the coach")
    );
    assert_eq!(json["data"]["turns"], 0);
}

#[test]
fn test_completions_generate() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("liftlog"));
}
