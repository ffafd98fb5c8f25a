// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use super::executor::{CommandExecutor, CommandOutput};
use crate::domain::CommitRecord;
use crate::error::{Error, Result};

/// Full object id (SHA-1 or SHA-256) followed by the subject
static LOG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9a-f]{64}|[0-9a-f]{40}) (.+)$").unwrap());

/// Parse `<id> <subject>` lines, silently dropping anything else.
pub fn parse_commit_log(output: &str) -> impl Iterator<Item = CommitRecord> + '_ {
    output.lines().filter_map(|line| {
        let caps = LOG_LINE.captures(line.trim_end_matches('\r'))?;
        Some(CommitRecord::new(&caps[1], &caps[2]))
    })
}

pub struct GitService {
    executor: Arc<dyn CommandExecutor>,
    work_dir: PathBuf,
}

impl GitService {
    pub fn discover(executor: Arc<dyn CommandExecutor>) -> Result<Self> {
        let repo = gix::discover(".").map_err(|_| Error::NotAGitRepo)?;

        let work_dir = repo
            .workdir()
            .ok_or_else(|| Error::Git("Bare repository not supported".into()))?
            .to_path_buf();

        Ok(Self::new(executor, work_dir))
    }

    pub fn new(executor: Arc<dyn CommandExecutor>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        self.executor.execute("git", args, &self.work_dir).await
    }

    /// Run and fail with the command's stderr on non-zero exit
    async fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args).await?;
        if !output.success() {
            return Err(Error::Git(format!(
                "git {}: {}",
                args.first().unwrap_or(&""),
                output.stderr.trim()
            )));
        }
        Ok(output.stdout)
    }

    pub async fn current_branch(&self) -> Result<String> {
        let branch = self
            .run_checked(&["rev-parse", "--abbrev-ref", "HEAD"])
            .await?
            .trim()
            .to_string();

        if branch == "HEAD" {
            return Err(Error::Git("Detached HEAD; check out a branch first".into()));
        }
        Ok(branch)
    }

    /// Most recently created tag reachable from `branch`
    pub async fn last_tag_on(&self, branch: &str) -> Result<String> {
        let output = self
            .run(&["tag", "--merged", branch, "--sort=-creatordate"])
            .await?;

        if !output.success() {
            return Err(Error::RangeQuery {
                reference: branch.to_string(),
                message: output.stderr.trim().to_string(),
            });
        }

        output
            .stdout
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::RangeQuery {
                reference: branch.to_string(),
                message: "no tags reachable from this branch".into(),
            })
    }

    /// Commits reachable from `tip` but not from `previous_tag`, newest first.
    pub async fn commit_range(&self, previous_tag: &str, tip: &str) -> Result<Vec<CommitRecord>> {
        let peeled = format!("{previous_tag}^{{commit}}");
        let resolved = self
            .run(&["rev-parse", "--verify", "--quiet", &peeled])
            .await?;
        if !resolved.success() {
            return Err(Error::RangeQuery {
                reference: previous_tag.to_string(),
                message: "reference does not resolve to a commit".into(),
            });
        }

        let range = format!("{previous_tag}..{tip}");
        let output = self.run(&["log", "--format=%H %s", &range]).await?;
        if !output.success() {
            return Err(Error::RangeQuery {
                reference: previous_tag.to_string(),
                message: output.stderr.trim().to_string(),
            });
        }

        let commits: Vec<CommitRecord> = parse_commit_log(&output.stdout).collect();
        debug!(range = %range, count = commits.len(), "commit range read");
        Ok(commits)
    }

    pub async fn remote_branch_exists(&self, remote: &str, branch: &str) -> Result<bool> {
        let output = self
            .run(&["ls-remote", "--exit-code", "--heads", remote, branch])
            .await?;

        match output.status {
            Some(0) => Ok(true),
            // --exit-code: 2 means no matching refs
            Some(2) => Ok(false),
            _ => Err(Error::Git(format!(
                "git ls-remote {remote}: {}",
                output.stderr.trim()
            ))),
        }
    }

    pub async fn remote_url(&self, remote: &str) -> Result<String> {
        Ok(self
            .run_checked(&["remote", "get-url", remote])
            .await?
            .trim()
            .to_string())
    }

    pub async fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.run_checked(&["fetch", remote, branch]).await?;
        Ok(())
    }

    /// File content at an arbitrary revision
    pub async fn show_file(&self, rev: &str, path: &Path) -> Result<Option<String>> {
        let spec = format!("{rev}:{}", path.to_string_lossy().replace('\\', "/"));
        let output = self.run(&["show", &spec]).await?;
        Ok(output.success().then_some(output.stdout))
    }

    /// Discard local work and move to the remote tip. Destructive.
    pub async fn reset_to_remote(&self, remote: &str, branch: &str) -> Result<()> {
        self.run_checked(&["clean", "-fd"]).await?;
        self.run_checked(&["reset", "--hard", &format!("{remote}/{branch}")])
            .await?;
        Ok(())
    }

    pub async fn stage_files(&self, files: &[&Path]) -> Result<()> {
        let paths: Vec<String> = files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run_checked(&args).await?;
        Ok(())
    }

    pub async fn commit(&self, message: &str) -> Result<()> {
        self.run_checked(&["commit", "--no-verify", "-m", message])
            .await?;
        Ok(())
    }

    pub async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        let output = self.run(&["push", remote, branch]).await?;
        if !output.success() {
            return Err(Error::PushRejected {
                stderr: output.stderr,
            });
        }
        Ok(())
    }
}
