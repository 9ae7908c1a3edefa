use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn sample_path() -> String {
    workspace_root()
        .join("tests/fixtures/snapshot_sample.json")
        .to_string_lossy()
        .to_string()
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_idleon-arcane"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run idleon-arcane CLI")
}

fn run_cli_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_idleon-arcane"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn idleon-arcane CLI");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(stdin.as_bytes())
        .expect("stdin should accept the snapshot");
    child.wait_with_output().expect("CLI should exit")
}

#[test]
fn text_output_lists_ranked_tables() {
    let path = sample_path();
    let output = run_cli(&["--player", "1", &path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Found 3 Arcane wands and 3 Arcane rings for Character 1!"));
    assert!(stdout.contains(" ::: Top Arcane Rings by Unique Stat 2 :::"));
}

#[test]
fn json_output_respects_top_n() {
    let path = sample_path();
    let output = run_cli(&["-p", "2", "--top", "3", "--json", &path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["total_wands"], 7);
    let slots: Vec<u64> = json["top_wands"]
        .as_array()
        .expect("top_wands should be an array")
        .iter()
        .map(|w| w["slot"].as_u64().expect("slot should be a number"))
        .collect();
    assert_eq!(slots, vec![1, 3, 6]);
    assert_eq!(json["top_rings_by_uq1"], Value::Array(Vec::new()));
}

#[test]
fn html_output_contains_tables() {
    let path = sample_path();
    let output = run_cli(&["-p", "1", "--format", "html", &path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<div id=\"ringsStat1Table\"><table>"));
}

#[test]
fn reads_snapshot_from_stdin() {
    let snapshot = concat!(
        r#"{"InventoryOrder_0":["Foo","EquipmentWandsArc0","Bar"],"#,
        r#""IMm_0":"{\"1\":{\"Weapon_Power\":42}}"}"#
    );
    let output = run_cli_with_stdin(&["-p", "1", "--json", "-"], snapshot);
    assert!(output.status.success());

    let json: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["top_wands"][0]["slot"], 1);
    assert_eq!(json["top_wands"][0]["bucket"], 1);
    assert_eq!(json["top_wands"][0]["position"], 2);
    assert_eq!(json["top_wands"][0]["weapon_power"], 42);
}

#[test]
fn no_items_prints_diagnostics_and_fails() {
    let path = sample_path();
    let output = run_cli(&["-p", "3", &path]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No Arcane items found for Character 3."));
    assert!(stderr.contains(
        "Available inventory keys: InventoryOrder_0, InventoryOrder_1, InventoryOrder_2"
    ));
}

#[test]
fn invalid_player_reports_json_error() {
    let path = sample_path();
    let output = run_cli(&["-p", "11", "--json", &path]);
    assert_eq!(output.status.code(), Some(1));

    let json: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["code"], "invalid_player_number");
}

#[test]
fn invalid_json_input_fails() {
    let output = run_cli_with_stdin(&["-p", "1"], "{ not json");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: snapshot is not valid JSON"));
}

#[test]
fn argument_errors_exit_with_usage_code() {
    let path = sample_path();
    assert_eq!(run_cli(&[&path]).status.code(), Some(2));
    assert_eq!(run_cli(&["-p", "1", "--top", "0", &path]).status.code(), Some(2));
    assert_eq!(
        run_cli(&["-p", "1", "--json", "--format", "text", &path])
            .status
            .code(),
        Some(2)
    );
}

#[test]
fn missing_file_fails_with_read_error() {
    let path = workspace_root().join("tests/fixtures/does_not_exist.json");
    let path = path.to_string_lossy().to_string();
    let output = run_cli(&["-p", "1", &path]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error reading"));
}
