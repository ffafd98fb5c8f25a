// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use assert_cmd::Command;
use clap::Parser;
use predicates::prelude::*;

use tagcut::cli::{Cli, Commands};

fn tagcut() -> Command {
    let mut cmd = Command::cargo_bin("tagcut").unwrap();
    cmd.env_remove("TAGCUT_TOKEN")
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

// ─── Argument parsing ────────────────────────────────────────────────────────

#[test]
fn release_takes_tag_and_flags() {
    let cli = Cli::try_parse_from([
        "tagcut", "release", "8.6.10", "--prev-tag", "8.6.9", "--yes", "--token", "abc",
    ])
    .unwrap();

    match &cli.command {
        Commands::Release { target, yes, open } => {
            assert_eq!(target.tag, "8.6.10");
            assert_eq!(target.prev_tag.as_deref(), Some("8.6.9"));
            assert!(*yes);
            assert!(!*open);
        }
        other => panic!("expected release, got {other:?}"),
    }
    assert_eq!(cli.token(), Some("abc"));
}

#[test]
fn notes_dry_run() {
    let cli = Cli::try_parse_from(["tagcut", "notes", "1.3.0", "--dry-run"]).unwrap();
    assert!(matches!(cli.command, Commands::Notes { dry_run: true, .. }));
}

#[test]
fn release_requires_tag() {
    assert!(Cli::try_parse_from(["tagcut", "release"]).is_err());
}

#[test]
fn verbose_is_global() {
    let cli = Cli::try_parse_from(["tagcut", "config", "-v"]).unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.token(), None);
}

// ─── Binary ──────────────────────────────────────────────────────────────────

#[test]
fn help_lists_commands() {
    tagcut()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("release"))
        .stdout(predicate::str::contains("notes"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn completions_are_generated() {
    tagcut()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tagcut"));
}

#[test]
fn missing_tag_is_usage_error() {
    tagcut().arg("release").assert().code(2);
}

#[test]
fn outside_repository_fails_cleanly() {
    let dir = tempfile::TempDir::new().unwrap();
    tagcut()
        .current_dir(dir.path())
        .env("GIT_CEILING_DIRECTORIES", dir.path())
        .args(["notes", "1.0.0", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a git repository"));
}
