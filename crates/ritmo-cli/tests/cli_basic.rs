//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway data
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "ritmo-cli", "--"])
        .args(args)
        .env("RITMO_DATA_DIR", data_dir)
        .env("RITMO_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is not JSON")
}

#[test]
fn test_config_list_has_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = run_json(dir.path(), &["config", "list"]);
    assert_eq!(config["timer"]["default_mode"], "pomodoro");
    assert_eq!(config["timer"]["tick_period_ms"], 1000);
    assert_eq!(config["modes"][0]["minutes"], 25);
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "log.level", "debug"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "log.level"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "debug");
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "timer.default_mode", "nap"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_set_refuses_to_overwrite_broken_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let broken = "[log]\nlevel = \"debug\"\n\n[[modes]]\nname = \"deep\"\nminutes = 90\n\n[timer\n";
    std::fs::write(&path, broken).unwrap();

    let (code, stdout, stderr) =
        run_cli(dir.path(), &["config", "set", "notifications.enabled", "false"]);
    assert_eq!(code, 1);
    assert!(!stdout.contains("ok"));
    assert!(stderr.contains("error:"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
}

#[test]
fn test_broken_config_is_reported_in_the_log() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[timer\n").unwrap();

    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "ritmo-cli", "--", "config", "list"])
        .env("RITMO_DATA_DIR", dir.path())
        .env("RITMO_LOG", "warn")
        .output()
        .expect("Failed to execute CLI command");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("using default configuration"));
}

#[test]
fn test_day_show_missing_date_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let day = run_json(dir.path(), &["day", "show", "--date", "2020-01-01"]);
    assert_eq!(day["date"], "2020-01-01");
    assert_eq!(day["totalStudySeconds"], 0);
    assert_eq!(day["productivityScore"], 0);
    assert_eq!(day["entries"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_day_start_is_listed() {
    let dir = tempfile::tempdir().unwrap();
    let day = run_json(dir.path(), &["day", "start"]);
    let date = day["date"].as_str().unwrap().to_string();

    let (code, stdout, _) = run_cli(dir.path(), &["day", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.lines().any(|line| line == date));
}

#[test]
fn test_prefs_toggle_persists() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = run_json(dir.path(), &["prefs", "show"]);
    assert_eq!(prefs["showFloatingTimer"], true);

    let prefs = run_json(dir.path(), &["prefs", "toggle-floating"]);
    assert_eq!(prefs["showFloatingTimer"], false);

    let prefs = run_json(dir.path(), &["prefs", "show"]);
    assert_eq!(prefs["showFloatingTimer"], false);
}

#[test]
fn test_timer_modes_lists_config() {
    let dir = tempfile::tempdir().unwrap();
    let modes = run_json(dir.path(), &["timer", "modes"]);
    let names: Vec<_> = modes
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["pomodoro", "short-break", "long-break"]);
}

#[test]
fn test_timer_zero_minutes_completes_and_records() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["config", "set", "timer.tick_period_ms", "10"]);
    let (code, stdout, stderr) = run_cli(
        dir.path(),
        &["timer", "run", "t1", "--name", "Quick", "--minutes", "0"],
    );
    assert_eq!(code, 0, "timer run failed: {stderr}");

    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events.first().unwrap()["type"], "task_started");
    assert_eq!(events.last().unwrap()["type"], "task_completed");
    assert_eq!(events.last().unwrap()["entry"]["taskName"], "Quick");

    let day = run_json(dir.path(), &["day", "show"]);
    assert_eq!(day["totalTaskCount"], 1);
    assert_eq!(day["completedTaskCount"], 1);
}
