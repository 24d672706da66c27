//! End-to-end runs of the `candela` binary.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_series(dir: &Path) -> std::path::PathBuf {
    let mut csv = String::from("time,open,high,low,close,volume\n");
    for i in 0..40 {
        let close = 100.0 + (i % 5) as f64 - (i % 3) as f64 * 0.5;
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            i * 60,
            close - 0.25,
            close + 1.0,
            close - 1.0,
            close,
            10 + i
        ));
    }
    let path = dir.join("bars.csv");
    fs::write(&path, csv).unwrap();
    path
}

fn candela(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_candela"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn test_indicator_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_series(dir.path());
    let out = candela(&["indicator", "sma", "-i", input.to_str().unwrap(), "--period", "3"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "time,value");
    assert_eq!(lines.len(), 41);
    assert_eq!(lines[1], "0,");
}

#[test]
fn test_profile_to_json_file() {
    let dir = TempDir::new().unwrap();
    let input = write_series(dir.path());
    let output = dir.path().join("profile.json");
    let out = candela(&[
        "profile",
        "-i",
        input.to_str().unwrap(),
        "--rows",
        "6",
        "-o",
        output.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let rows: serde_json::Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 6);
}

#[test]
fn test_replay_runs_to_end() {
    let dir = TempDir::new().unwrap();
    let input = write_series(dir.path());
    let out = candela(&[
        "replay",
        "rsi",
        "-i",
        input.to_str().unwrap(),
        "--interval-ms",
        "1",
        "--quiet",
        "-f",
        "ndjson",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 40);
    assert!(stdout.lines().last().unwrap().starts_with("{\"cursor\":40,"));
}

#[test]
fn test_unknown_indicator_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_series(dir.path());
    let out = candela(&["indicator", "astrology", "-i", input.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unknown indicator"));
}

#[test]
fn test_list() {
    let out = candela(&["list", "transforms"]);
    assert!(out.status.success());
    assert!(String::from_utf8(out.stdout).unwrap().contains("renko"));
}
