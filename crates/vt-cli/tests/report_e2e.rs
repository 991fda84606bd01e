//! End-to-end tests for the `vt report` command.
//!
//! Runs the real binary against a database in a temp directory,
//! configured through `VT_*` environment variables.

use std::process::Command;

use chrono::NaiveDate;
use tempfile::TempDir;

use vt_core::UserId;
use vt_db::Database;

fn vt_binary() -> String {
    env!("CARGO_BIN_EXE_vt").to_string()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

#[test]
fn report_on_empty_database() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("vt.db");

    let output = Command::new(vt_binary())
        .env("VT_DATABASE_PATH", &db_path)
        .args(["report", "--day", "2024-03-01"])
        .output()
        .expect("failed to run vt report");

    assert!(
        output.status.success(),
        "vt report should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Voice attendance for 2024-03-01"));
    assert!(stdout.contains("(no attendance recorded)"));
}

#[test]
fn report_lists_recorded_totals() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("vt.db");

    {
        let db = Database::open(&db_path).unwrap();
        db.upsert_daily_total(&UserId::new("100").unwrap(), "mhai", day(), 1.5)
            .unwrap();
        db.upsert_daily_total(&UserId::new("200").unwrap(), "beam", day(), 80.0)
            .unwrap();
    }

    let output = Command::new(vt_binary())
        .env("VT_DATABASE_PATH", &db_path)
        .args(["report", "--day", "2024-03-01"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    // Longest presence first.
    let beam = stdout.find("beam").unwrap();
    let mhai = stdout.find("mhai").unwrap();
    assert!(beam < mhai);
    assert!(stdout.contains("1h 20m 00s"));
    assert!(stdout.contains("0h 01m 30s"));
}

#[test]
fn report_json_output_is_parseable() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("vt.db");

    {
        let db = Database::open(&db_path).unwrap();
        db.upsert_daily_total(&UserId::new("100").unwrap(), "mhai", day(), 1.5)
            .unwrap();
    }

    let output = Command::new(vt_binary())
        .env("VT_DATABASE_PATH", &db_path)
        .args(["report", "--day", "2024-03-01", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let totals: Vec<serde_json::Value> =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0]["username"], "mhai");
    assert_eq!(totals[0]["minutes"], 1);
    assert_eq!(totals[0]["seconds"], 30);
}
