#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::{Command, Output};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/acilink-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn acilink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_acilink"))
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .output()
        .expect("acilink should run")
}

#[test]
fn simulate_delivers_commands_and_events() {
    let output = acilink(&["simulate", "-c", "090909", "-e", "8105", "--status", "1"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#""kind":"event","index":0,"status":1,"length":2,"payload":"8105""#));
    assert!(stdout.contains(r#""delivered_commands":["090909"]"#));
    assert!(stdout.contains(r#""commands_sent":1"#));
    assert!(stdout.contains(r#""events_received":1"#));
}

#[test]
fn simulate_edge_driver_preserves_order() {
    let output = acilink(&[
        "simulate", "--driver", "edge", "-c", "01", "-c", "0203", "-e", "aa", "-e", "bb",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.find(r#""payload":"aa""#).expect("first event printed");
    let second = stdout.find(r#""payload":"bb""#).expect("second event printed");
    assert!(first < second);
    assert!(stdout.contains(r#""delivered_commands":["01","0203"]"#));
}

#[test]
fn simulate_bad_hex_returns_usage() {
    let output = acilink(&["simulate", "-c", "abc"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("odd number of digits"));
}

#[test]
fn simulate_oversized_command_returns_data_invalid() {
    let long = "00".repeat(32);
    let output = acilink(&["simulate", "-c", &long]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn simulate_reads_script_file() {
    let dir = unique_temp_dir("script");
    let script = dir.join("session.json");
    std::fs::write(
        &script,
        r#"{
            "commands": ["0a"],
            "events": [{"status": 132, "payload": "0c0001"}],
            "transport": {"overflow_policy": "drop_oldest"}
        }"#,
    )
    .expect("script should be writable");

    let output = acilink(&["simulate", "--script", script.to_str().expect("utf-8 path")]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#""status":132,"length":3,"payload":"0c0001""#));
    assert!(stdout.contains(r#""delivered_commands":["0a"]"#));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn simulate_missing_script_fails() {
    let output = acilink(&["simulate", "--script", "/nonexistent/acilink-script.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed reading"));
}

#[test]
fn version_prints_package_version() {
    let output = acilink(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
