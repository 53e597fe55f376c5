#![allow(unused)]
//! `trailsift` binary integration harness.
//!
//! # What this covers
//!
//! - **Subcommands**: `summary`, `records`, `export`, `key-events` against
//!   fixture files written to a temp dir, and `-` for stdin.
//! - **Global flags**: `--strategy`, `--config`.
//! - **Remote**: the `remote` subcommand against an in-process `axum`
//!   completion service.
//! - **Failures**: missing files, non-UTF-8 input, invalid configuration and
//!   an unreachable remote service exit non-zero with a useful message.
//!
//! # What this does NOT cover
//!
//! - Remote transport failure modes (see `trailsift-remote`'s harness)
//!
//! # Running
//!
//! ```sh
//! cargo test --test cli_harness
//! ```

mod common;
use common::*;

use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Run the binary with an isolated config home.
fn trailsift(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trailsift"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

#[test]
fn summary_prints_totals_and_rankings() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), "trail.csv", CSV_STANDARD);
    let out = trailsift(dir.path(), &["summary", file.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("Entries:    6"));
    assert!(text.contains("Key events: 2"));
    assert!(text.contains("Time range: 2025-01-15 10:30:00 .. 2025-01-18 12:00:00"));
    assert!(text.contains("   1. john.doe (2)"));
}

#[test]
fn summary_json_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), "trail.csv", CSV_STANDARD);
    let out = trailsift(dir.path(), &["summary", "--json", file.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["total_entries"], 6);
    assert_eq!(json["categories"]["file_operation"], 3);
}

#[test]
fn records_json_lists_every_record_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), "trail.csv", CSV_MESSY);
    let out = trailsift(dir.path(), &["records", "--json", file.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let records: Vec<trailsift_core::AuditRecord> = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(records.len(), 3);
    assert_sorted_newest_first!(records);
    assert_undated!(records[2]);
}

#[test]
fn records_table_has_a_heading() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), "trail.txt", SINGLE_COLUMN);
    let out = trailsift(dir.path(), &["records", file.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Timestamp"));
    assert!(lines[1].starts_with("2025-06-04 09:10:30"));
}

#[test]
fn export_writes_csv_to_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), "trail.tsv", TAB_EXPORT);
    let target = dir.path().join("out.csv");
    let out = trailsift(
        dir.path(),
        &["export", file.to_str().unwrap(), "-o", target.to_str().unwrap()],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).is_empty());

    let csv = std::fs::read_to_string(&target).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Timestamp,Category,Action,User,Document,Folder,Details"));
    assert_eq!(
        lines.next(),
        Some("2024-11-03 10:00:00,System Event,Restart,system,,,nightly")
    );
    assert_eq!(csv.lines().count(), 4);
}

#[test]
fn key_events_lists_the_priority_subset() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), "trail.csv", CSV_STANDARD);
    let out = trailsift(dir.path(), &["key-events", "--json", file.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let records: Vec<trailsift_core::AuditRecord> = serde_json::from_str(&stdout(&out)).unwrap();
    let ids: Vec<usize> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![0, 3]);
}

#[test]
fn dash_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_trailsift"))
        .args(["records", "--json", "-"])
        .env("XDG_CONFIG_HOME", dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(HEADERLESS.as_bytes())
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let records: Vec<trailsift_core::AuditRecord> = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(records.len(), 2);
}

// ---------------------------------------------------------------------------
// Global flags
// ---------------------------------------------------------------------------

#[test]
fn strategy_flag_selects_anchored_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(
        dir.path(),
        "trail.txt",
        "Audit\nsite.dwg 6/3/2025 3:54 PM Checked Out by jo.b in /cad\n",
    );
    let out = trailsift(
        dir.path(),
        &["records", "--json", "--strategy", "anchored", file.to_str().unwrap()],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let records: Vec<trailsift_core::AuditRecord> = serde_json::from_str(&stdout(&out)).unwrap();
    assert_fields!(records[0], action: "Checked Out", resource: "site.dwg", actor: "jo.b");
}

#[test]
fn config_file_changes_the_key_event_cap() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path(), "config.toml", "[key_events]\nlimit = 1\n");
    let file = write_fixture(dir.path(), "trail.csv", CSV_STANDARD);
    let out = trailsift(
        dir.path(),
        &["--config", config.to_str().unwrap(), "key-events", "--json", file.to_str().unwrap()],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let records: Vec<serde_json::Value> = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(records.len(), 1);
}

// ---------------------------------------------------------------------------
// Remote
// ---------------------------------------------------------------------------

/// Serve `completion` from `/api/generate` on a background runtime and
/// return the endpoint URL.
fn canned_completion_service(completion: &'static str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            let app = axum::Router::new().route(
                "/api/generate",
                axum::routing::post(move || async move {
                    axum::Json(serde_json::json!({ "response": completion }))
                }),
            );
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{addr}/api/generate")
}

#[test]
fn remote_summary_counts_key_events() {
    let endpoint = canned_completion_service(
        r#"{"entries": [
            {"timestamp": "2025-01-15 10:30:00", "action": "Deleted", "actor": "amy", "resource": "a.pdf"},
            {"timestamp": "2025-01-15 11:00:00", "action": "Viewed", "actor": "bo", "resource": "a.pdf"}
        ]}"#,
    );
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(
        dir.path(),
        "config.toml",
        format!("[remote]\nendpoint = \"{endpoint}\"\ntimeout_secs = 10\n"),
    );
    let file = write_fixture(dir.path(), "trail.csv", CSV_STANDARD);
    let out = trailsift(
        dir.path(),
        &["--config", config.to_str().unwrap(), "remote", file.to_str().unwrap()],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("Entries:    2"));
    assert!(text.contains("Key events: 1"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_file_fails_with_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let out = trailsift(dir.path(), &["summary", "/no/such/trail.csv"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("/no/such/trail.csv"));
}

#[test]
fn binary_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), "trail.bin", [0xffu8, 0xfe, 0x00, 0x41]);
    let out = trailsift(dir.path(), &["records", file.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("not valid UTF-8"));
}

#[test]
fn inverted_year_window_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(
        dir.path(),
        "config.toml",
        "[timestamps]\nmin_year = 2090\nmax_year = 2010\n",
    );
    let file = write_fixture(dir.path(), "trail.csv", CSV_STANDARD);
    let out = trailsift(
        dir.path(),
        &["--config", config.to_str().unwrap(), "summary", file.to_str().unwrap()],
    );
    assert!(!out.status.success());
    assert!(stderr(&out).contains("failed to load configuration"));
}

#[test]
fn unreachable_remote_service_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = write_fixture(
        dir.path(),
        "config.toml",
        format!("[remote]\nendpoint = \"http://127.0.0.1:{port}/api/generate\"\ntimeout_secs = 5\n"),
    );
    let file = write_fixture(dir.path(), "trail.csv", CSV_STANDARD);
    let out = trailsift(
        dir.path(),
        &["--config", config.to_str().unwrap(), "remote", file.to_str().unwrap()],
    );
    assert!(!out.status.success());
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("remote parse failed"));
}
