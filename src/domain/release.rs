// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use chrono::NaiveDate;
use secrecy::SecretString;

use crate::error::{Error, Result};
use crate::services::version;

/// `owner/name` pair identifying the hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name` out of a remote URL.
    ///
    /// Handles `https://host/o/r(.git)`, `git@host:o/r(.git)` and
    /// `ssh://git@host/o/r(.git)`.
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let url = url.trim().trim_end_matches('/');
        let path = if let Some((_, rest)) = url.split_once("://") {
            rest.split_once('/')?.1
        } else {
            url.split_once(':')?.1
        };
        let path = path.strip_suffix(".git").unwrap_or(path);

        let mut parts = path.rsplitn(2, '/');
        let name = parts.next()?;
        let owner = parts.next()?.rsplit('/').next()?;
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything one release run needs to know, fixed at construction.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    pub new_tag: String,
    pub previous_tag: String,
    pub branch: String,
    pub token: SecretString,
    pub date: NaiveDate,
}

impl ReleaseContext {
    pub fn new(
        new_tag: impl Into<String>,
        previous_tag: impl Into<String>,
        branch: impl Into<String>,
        token: SecretString,
    ) -> Result<Self> {
        let new_tag = new_tag.into();
        if !version::is_release_tag(&new_tag) {
            return Err(Error::InvalidTag { tag: new_tag });
        }
        Ok(Self {
            new_tag,
            previous_tag: previous_tag.into(),
            branch: branch.into(),
            token,
            date: chrono::Local::now().date_naive(),
        })
    }

    /// Pin the changelog date (tests, reproducible notes)
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

/// Rendered markdown body of one changelog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument(String);

impl ChangelogDocument {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ChangelogDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Orchestrator states, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReleaseStage {
    BranchVerified,
    PreconditionsChecked,
    WorkingTreeReset,
    VersionBumped,
    ChangelogGenerated,
    ChangelogPersisted,
    Committed,
    Published,
}

impl std::fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::BranchVerified => "verify remote branch",
            Self::PreconditionsChecked => "check preconditions",
            Self::WorkingTreeReset => "reset working tree",
            Self::VersionBumped => "bump version",
            Self::ChangelogGenerated => "generate changelog",
            Self::ChangelogPersisted => "update changelog file",
            Self::Committed => "commit and push",
            Self::Published => "create draft release",
        };
        f.write_str(label)
    }
}
