// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level specs: the CLI and daemon binaries working together.

use assert_cmd::cargo::CommandCargoExt;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Stdio};

/// SHA-256 of "hunter2"
const PASSWORD_DIGEST: &str = "f52fbd32b2b3b86ff88ef6c490628285f482af15ddcb29541f94bcf526a3f6c7";

fn desk(state_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("desk").expect("desk binary");
    cmd.arg("--state-dir").arg(state_dir);
    cmd
}

/// Seed a profile file and start deskd, waiting for its READY line
fn start_daemon(state_dir: &Path) -> Child {
    std::fs::create_dir_all(state_dir).expect("state dir");
    std::fs::write(
        state_dir.join("profiles.toml"),
        format!(
            r#"[[users]]
id = "u-ana"
email = "ana@example.com"
full_name = "Ana Reyes"
role = "admin"
password_sha256 = "{PASSWORD_DIGEST}"
"#
        ),
    )
    .expect("profiles");

    let mut child = std::process::Command::cargo_bin("deskd")
        .expect("deskd binary")
        .arg(state_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn deskd");

    let stdout = child.stdout.take().expect("daemon stdout");
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next() {
            Some(Ok(line)) if line.trim() == "READY" => break,
            Some(Ok(_)) => continue,
            _ => panic!("daemon exited before READY"),
        }
    }
    child
}

fn stop_daemon(state_dir: &Path, mut child: Child) {
    desk(state_dir).args(["daemon", "stop"]).assert().success();
    let _ = child.wait();
}

#[test]
fn help_names_the_surfaces() {
    Command::cargo_bin("desk")
        .expect("desk binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("client"))
        .stdout(predicate::str::contains("task"))
        .stdout(predicate::str::contains("analytics"))
        .stdout(predicate::str::contains("calendar"));
}

#[test]
fn completions_generate() {
    Command::cargo_bin("desk")
        .expect("desk binary")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("desk"));
}

#[test]
fn daemon_status_without_daemon() {
    let dir = tempfile::tempdir().expect("tempdir");
    desk(dir.path())
        .args(["daemon", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not running"));
}

#[test]
fn pipeline_lifecycle_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let daemon = start_daemon(dir.path());

    // Sign in as the seeded admin
    desk(dir.path())
        .args(["login", "--email", "ana@example.com", "--password", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as Ana Reyes"));

    // Create a client and capture its id
    let output = desk(dir.path())
        .args(["client", "create", "Dana Whitfield", "--lender", "Westpac"])
        .output()
        .expect("create output");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let id = stdout
        .trim()
        .rsplit('(')
        .next()
        .and_then(|s| s.strip_suffix(')'))
        .expect("client id in output")
        .to_string();

    // New clients land in Lead
    desk(dir.path())
        .args(["client", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dana Whitfield"))
        .stdout(predicate::str::contains("Lead"));

    // Move through the pipeline
    desk(dir.path())
        .args(["client", "move", &id, "Sent to Banker"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sent to Banker"));

    // A stale optimistic move conflicts
    desk(dir.path())
        .args(["client", "move", &id, "Docs Received", "--from", "Lead"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refresh and try again"));

    // Analytics covers the whole catalog
    desk(dir.path())
        .args(["analytics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sent to Banker"))
        .stdout(predicate::str::contains("SAMPLES"));

    // Tasks flow into the calendar export
    desk(dir.path())
        .args([
            "task", "add", "Chase payslips", "--due", "2030-01-15", "--client", &id,
        ])
        .assert()
        .success();

    desk(dir.path())
        .args(["calendar", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BEGIN:VCALENDAR"))
        .stdout(predicate::str::contains("Chase payslips - Dana Whitfield"));

    stop_daemon(dir.path(), daemon);
}

#[test]
fn login_is_required_for_pipeline_commands() {
    let dir = tempfile::tempdir().expect("tempdir");
    let daemon = start_daemon(dir.path());

    desk(dir.path())
        .args(["client", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("desk login"));

    // Wrong credentials do not reveal whether the email exists
    desk(dir.path())
        .args(["login", "--email", "ghost@example.com", "--password", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid email or password"));

    stop_daemon(dir.path(), daemon);
}

#[test]
fn password_prompt_reads_stdin() {
    let dir = tempfile::tempdir().expect("tempdir");
    let daemon = start_daemon(dir.path());

    let mut cmd = desk(dir.path());
    cmd.args(["login", "--email", "ana@example.com"]);
    cmd.write_stdin("hunter2\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Signed in"));

    stop_daemon(dir.path(), daemon);
}
