//! Integration tests for the fsf CLI
//!
//! These tests invoke the built `fsf` binary and check:
//! - Exit codes (0 = success, 1 = malformed design, 2 = unreadable file)
//! - stdout/stderr output
//! - JSON output format

use std::path::PathBuf;
use std::process::Command;

// ── Helpers ───────────────────────────────────────────────

fn fsf_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_fsf"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(format!("../../tests/fixtures/{}", name))
}

fn run_fsf(args: &[&str]) -> std::process::Output {
    Command::new(fsf_bin())
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("FSF_LOG")
        .output()
        .expect("failed to execute fsf")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("should be valid JSON")
}

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("fsf_cli_{}_{}", std::process::id(), name));
    std::fs::write(&path, contents).expect("write temp");
    path
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_fsf(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fsf"), "should contain 'fsf'");
    assert!(stdout.contains("fsf-core"), "should name the library");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "should contain version"
    );
}

#[test]
fn test_version_flag() {
    let output = run_fsf(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

// ── Parse ─────────────────────────────────────────────────

#[test]
fn test_parse_summary() {
    let path = fixture("one_sess_group.fsf");
    let output = run_fsf(&["parse", path.to_str().unwrap()]);
    assert!(output.status.success(), "parse should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("feat_files"));
    assert!(stdout.contains("24 entries"));
    assert!(stdout.contains("version: 6.00"));
    assert!(stdout.contains("contrasts: 1"));
}

#[test]
fn test_parse_json() {
    let path = fixture("one_sess_group.fsf");
    let output = run_fsf(&["parse", "--json", path.to_str().unwrap()]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["fmri"]["version"], "6.00");
    assert_eq!(json["fmri"]["inmelodic"], false);
    assert_eq!(json["fmri"]["analysis"], 2);
    assert_eq!(json["fmri"]["tr"], 3.0);
    assert_eq!(
        json["feat_files"][21],
        "/home/people/brettmz/replication/feat/1/balloon/sub-26_balloon.feat"
    );
}

#[test]
fn test_parse_nonexistent_file() {
    let output = run_fsf(&["parse", "nonexistent.fsf"]);
    assert_eq!(output.status.code(), Some(2), "missing file should exit 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nonexistent.fsf"));
}

#[test]
fn test_parse_out_of_order_sequence() {
    let path = write_temp("out_of_order.fsf", "set fmri(level) 2\nset feat_files(3) \"x\"\n");
    let output = run_fsf(&["parse", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1), "malformed design should exit 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "should mention error");
    assert!(stderr.contains("line 2"), "should name the line: {}", stderr);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_parse_unknown_container() {
    let path = write_temp("unknown.fsf", "set other(x) 1\n");
    let output = run_fsf(&["parse", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let _ = std::fs::remove_file(&path);
}

// ── Contrasts ─────────────────────────────────────────────

#[test]
fn test_contrasts_real_json() {
    let path = fixture("one_sess_level1.fsf");
    let output = run_fsf(&["contrasts", "--json", path.to_str().unwrap()]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(
        json["Cash-Inflate"],
        serde_json::json!([-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0])
    );
}

#[test]
fn test_contrasts_orig() {
    let path = fixture("one_sess_level1.fsf");
    let output = run_fsf(&["contrasts", "--orig", "--json", path.to_str().unwrap()]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["Cash-Inflate"], serde_json::json!([-1.0, 0.0, 1.0, 0.0]));
}

#[test]
fn test_contrasts_orig_absent() {
    let path = fixture("one_sess_group.fsf");
    let output = run_fsf(&["contrasts", "--orig", path.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no orig contrasts"));
}

#[test]
fn test_contrasts_text() {
    let path = fixture("one_sess_group.fsf");
    let output = run_fsf(&["contrasts", path.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Group mean"));
    assert!(stdout.contains("1 0"));
}

// ── Derived views ─────────────────────────────────────────

#[test]
fn test_evgs_json() {
    let path = fixture("one_sess_group.fsf");
    let output = run_fsf(&["evgs", "--json", path.to_str().unwrap()]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    let rows = json.as_array().expect("rows array");
    assert_eq!(rows.len(), 24);
    assert_eq!(rows[17], serde_json::json!([1.0, -25.96]));
}

#[test]
fn test_events_json() {
    let path = fixture("one_sess_level1.fsf");
    let output = run_fsf(&["events", "--json", path.to_str().unwrap()]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["pump"]["shape"], 3);
    assert_eq!(json["pump"]["deriv"], true);
    assert_eq!(json["pump"]["custom"], "/data/onsets/sub-01_pump.txt");
}

#[test]
fn test_groupmem() {
    let path = fixture("one_sess_group.fsf");
    let output = run_fsf(&["groupmem", "--json", path.to_str().unwrap()]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json, serde_json::json!(vec![1.0; 24]));
}

// ── Mat ───────────────────────────────────────────────────

#[test]
fn test_mat_summary() {
    let path = fixture("one_sess_group.mat");
    let output = run_fsf(&["mat", path.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NumWaves: 2"));
    assert!(stdout.contains("NumPoints: 24"));
    assert!(stdout.contains("PPheights: 1 63"));
}

#[test]
fn test_mat_json() {
    let path = fixture("one_sess_group.mat");
    let output = run_fsf(&["mat", "--json", path.to_str().unwrap()]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["NumWaves"], 2);
    assert_eq!(json["NumPoints"], 24);
    assert_eq!(json["PPheights"], serde_json::json!([1.0, 63.0]));
    let rows = json["Matrix"].as_array().expect("matrix rows");
    assert_eq!(rows.len(), 24);
    assert_eq!(rows[17], serde_json::json!([1.0, -25.96]));
}

#[test]
fn test_mat_bad_shape() {
    let path = write_temp("bad.mat", "/NumWaves 2\n/NumPoints 2\n/PPheights 1 1\n/Matrix\n1 2\n");
    let output = run_fsf(&["mat", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let _ = std::fs::remove_file(&path);
}

// ── Logging ───────────────────────────────────────────────

#[test]
fn test_verbose_logs_to_stderr() {
    let path = fixture("one_sess_level1.fsf");
    let output = run_fsf(&["--verbose", "parse", path.to_str().unwrap()]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parsed design"), "stderr: {}", stderr);
}
