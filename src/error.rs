// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Not a git repository")]
    #[diagnostic(
        code(tagcut::git::not_repo),
        help("Run this command inside a git repository")
    )]
    NotAGitRepo,

    #[error("Cannot list commits since '{reference}': {message}")]
    #[diagnostic(
        code(tagcut::git::range),
        help("Check the previous tag exists on this branch: git tag --merged HEAD")
    )]
    RangeQuery { reference: String, message: String },

    #[error("Branch '{branch}' does not exist on remote '{remote}'")]
    #[diagnostic(
        code(tagcut::git::missing_remote_branch),
        help("Push it first: git push {remote} {branch}")
    )]
    MissingRemoteBranch { remote: String, branch: String },

    #[error("No version marker found in {path}")]
    #[diagnostic(
        code(tagcut::version::marker_not_found),
        help("Expected a line like: const VERSION = '1.2.3';")
    )]
    VersionMarkerNotFound { path: String },

    #[error("Invalid release tag '{tag}'")]
    #[diagnostic(
        code(tagcut::version::invalid_tag),
        help("Use MAJOR.MINOR.PATCH with one or two digits each, e.g. 8.6.10")
    )]
    InvalidTag { tag: String },

    #[error("Lookup of issue #{number} failed: {message}")]
    #[diagnostic(code(tagcut::github::issue_lookup))]
    IssueLookup { number: u64, message: String },

    #[error("Push rejected:\n{stderr}")]
    #[diagnostic(
        code(tagcut::git::push_rejected),
        help("Nothing was published. Fix the remote state and re-run the release")
    )]
    PushRejected { stderr: String },

    #[error("Creating the release failed: {message}")]
    #[diagnostic(
        code(tagcut::github::publish),
        help("The release commit is already pushed; create the draft release by hand")
    )]
    Publish { message: String },

    #[error("Command '{command}' timed out after {secs}s")]
    #[diagnostic(code(tagcut::exec::timeout))]
    CommandTimeout { command: String, secs: u64 },

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("Configuration error: {0}")]
    #[diagnostic(code(tagcut::config::error))]
    Config(String),

    #[error("Git error: {0}")]
    #[diagnostic(code(tagcut::git::error))]
    Git(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[cfg(feature = "secure-storage")]
    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(tagcut::keyring::error),
        help("Check your system keychain configuration")
    )]
    Keyring(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
