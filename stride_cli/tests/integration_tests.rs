//! Integration tests for the stride binary.
//!
//! These tests verify end-to-end behavior including:
//! - Pace and zone lookups
//! - Compiling single workouts and plans
//! - Validation exit codes
//! - Upload into the outbox with the CSV report

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const INTERVAL_PLAN: &str = r#"[
  {
    "workoutName": "5x800m Intervals",
    "scheduleDate": "2026-01-20",
    "description": "Speed work",
    "steps": [
      {"type": "WorkoutStep", "intensity": "WARMUP", "durationType": "DISTANCE", "durationValue": 2000, "targetType": "NONE"},
      {
        "type": "WorkoutRepeatStep",
        "repeatValue": 5,
        "steps": [
          {"type": "WorkoutStep", "intensity": "INTERVAL", "durationType": "DISTANCE", "durationValue": 800, "targetType": "SPEED", "targetValueOne": 3.9, "targetValueTwo": 4.2},
          {"type": "WorkoutStep", "intensity": "RECOVERY", "durationType": "TIME", "durationValue": 120, "targetType": "NONE"}
        ]
      },
      {"type": "WorkoutStep", "intensity": "COOLDOWN", "durationType": "DISTANCE", "durationValue": 2000, "targetType": "NONE"}
    ]
  },
  {
    "workoutName": "Tempo Run",
    "scheduleDate": "2026-01-22",
    "description": "6km at tempo pace",
    "steps": [
      {"type": "WorkoutStep", "intensity": "WARMUP", "durationType": "DISTANCE", "durationValue": 2000, "targetType": "NONE"},
      {"type": "WorkoutStep", "intensity": "ACTIVE", "durationType": "DISTANCE", "durationValue": 6000, "targetType": "SPEED", "targetValueOne": 3.5, "targetValueTwo": 3.7},
      {"type": "WorkoutStep", "intensity": "COOLDOWN", "durationType": "DISTANCE", "durationValue": 1000, "targetType": "NONE"}
    ]
  }
]"#;

/// Helper to create a test directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI command isolated from the user's real config
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("stride"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env("XDG_DATA_HOME", temp_dir.path().join("data"))
        .env_remove("RUST_LOG");
    cmd
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write test file");
    path
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Compile coaching plans into platform workouts",
        ));
}

#[test]
fn test_pace_window() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["pace", "4:36", "--margin", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3.4965"))
        .stdout(predicate::str::contains("3.7594"));
}

#[test]
fn test_pace_by_zone_name() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["pace", "easy", "--margin", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.9851"))
        .stdout(predicate::str::contains("3.3898"));
}

#[test]
fn test_pace_rejects_degenerate_margin() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["pace", "0:30", "--margin", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DegenerateMargin"));
}

#[test]
fn test_pace_rejects_malformed_pace() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["pace", "fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PaceParse"));
}

#[test]
fn test_zones_lists_defaults() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("zones")
        .assert()
        .success()
        .stdout(predicate::str::contains("MP"))
        .stdout(predicate::str::contains("4:36/km"))
        .stdout(predicate::str::contains("TEMPO"));
}

#[test]
fn test_zones_from_config_file() {
    let temp_dir = setup_test_dir();
    let config = write_file(
        temp_dir.path(),
        "config.toml",
        "[paces]\ndefault_margin_sec = 10\n\n[paces.zones]\nLT = \"4:05\"\n",
    );

    cli(&temp_dir)
        .arg("--config")
        .arg(&config)
        .arg("zones")
        .assert()
        .success()
        .stdout(predicate::str::contains("±10s/km"))
        .stdout(predicate::str::contains("LT"))
        .stdout(predicate::str::contains("MP").not());
}

#[test]
fn test_compile_plan() {
    let temp_dir = setup_test_dir();
    let plan = write_file(temp_dir.path(), "plan.json", INTERVAL_PLAN);

    let output = cli(&temp_dir)
        .arg("compile")
        .arg(&plan)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let docs: serde_json::Value = serde_json::from_slice(&output).expect("stdout is JSON");
    let docs = docs.as_array().expect("plan compiles to an array");
    assert_eq!(docs.len(), 2);

    let steps = docs[0]["workoutSegments"][0]["workoutSteps"].as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[1]["type"], "RepeatGroupDTO");
    assert_eq!(steps[1]["numberOfIterations"], 5);
    assert!(docs[0]["estimatedDurationInSecs"].as_u64().unwrap() >= 1800);

    // Tempo step uses ACTIVE, which shares the interval codes
    let tempo = &docs[1]["workoutSegments"][0]["workoutSteps"][1];
    assert_eq!(tempo["stepType"]["stepTypeKey"], "interval");
    assert_eq!(tempo["targetValueOne"], 3.5);
}

#[test]
fn test_compile_single_workout() {
    let temp_dir = setup_test_dir();
    let workout = write_file(
        temp_dir.path(),
        "workout.json",
        r#"{"workoutName": "Shakeout", "steps": [
            {"type": "WorkoutStep", "intensity": "ACTIVE", "durationType": "TIME", "durationValue": 1200}
        ]}"#,
    );

    cli(&temp_dir)
        .arg("compile")
        .arg(&workout)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(r#"{"workoutName":"Shakeout""#))
        .stdout(predicate::str::contains("preferredEndConditionUnit").not());
}

#[test]
fn test_validate_reports_problems() {
    let temp_dir = setup_test_dir();
    let plan = write_file(
        temp_dir.path(),
        "plan.json",
        r#"[{"workoutName": "Typo", "steps": [
            {"type": "WorkoutStep", "intensity": "SPRINT", "durationType": "DISTANCE", "durationValue": 400}
        ]}]"#,
    );

    cli(&temp_dir)
        .arg("validate")
        .arg(&plan)
        .assert()
        .failure()
        .stdout(predicate::str::contains("unrecognized intensity"));
}

#[test]
fn test_validate_clean_plan() {
    let temp_dir = setup_test_dir();
    let plan = write_file(temp_dir.path(), "plan.json", INTERVAL_PLAN);

    cli(&temp_dir)
        .arg("validate")
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("All 2 workouts are valid"));
}

#[test]
fn test_preview() {
    let temp_dir = setup_test_dir();
    let plan = write_file(temp_dir.path(), "plan.json", INTERVAL_PLAN);

    cli(&temp_dir)
        .arg("preview")
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("**Plan with 2 workouts:**"))
        .stdout(predicate::str::contains("2026-01-22: **Tempo Run**"));
}

#[test]
fn test_preview_rejects_empty_plan() {
    let temp_dir = setup_test_dir();
    let plan = write_file(temp_dir.path(), "plan.json", "[]");

    cli(&temp_dir)
        .arg("preview")
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plan is empty"));
}

#[test]
fn test_upload_writes_outbox_and_report() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("stride-data");
    let plan = write_file(temp_dir.path(), "plan.json", INTERVAL_PLAN);

    cli(&temp_dir)
        .arg("upload")
        .arg(&plan)
        .arg("--yes")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Uploaded 2/2 workouts"))
        .stdout(predicate::str::contains("5x800m Intervals scheduled for 2026-01-20"));

    let outbox = fs::read_to_string(data_dir.join("outbox.jsonl")).expect("outbox written");
    assert_eq!(outbox.lines().count(), 4);
    assert!(outbox.contains("RepeatGroupDTO"));

    let report = fs::read_to_string(data_dir.join("uploads.csv")).expect("report written");
    assert!(report.starts_with("run_id,finished_at,workout_name"));
    assert_eq!(report.lines().filter(|l| l.contains("scheduled")).count(), 2);
}

#[test]
fn test_upload_cancelled_without_confirmation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("stride-data");
    let plan = write_file(temp_dir.path(), "plan.json", INTERVAL_PLAN);

    cli(&temp_dir)
        .arg("upload")
        .arg(&plan)
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));

    assert!(!data_dir.join("outbox.jsonl").exists());
}

#[test]
fn test_strict_upload_skips_invalid_workout() {
    let temp_dir = setup_test_dir();
    let outbox = temp_dir.path().join("outbox.jsonl");
    let report = temp_dir.path().join("report.csv");
    let plan = write_file(
        temp_dir.path(),
        "plan.json",
        r#"[
            {"workoutName": "Good", "steps": [{"type": "WorkoutStep", "durationValue": 5000}]},
            {"workoutName": "Bad", "steps": [{"type": "WorkoutStep", "targetType": "SPEED", "durationValue": 5000}]}
        ]"#,
    );

    cli(&temp_dir)
        .arg("upload")
        .arg(&plan)
        .args(["--yes", "--strict"])
        .arg("--outbox")
        .arg(&outbox)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Uploaded 1/2 workouts"))
        .stdout(predicate::str::contains("✗ Bad"));

    let outbox_contents = fs::read_to_string(&outbox).unwrap();
    assert_eq!(outbox_contents.lines().count(), 1);
    assert!(report.exists());
}
