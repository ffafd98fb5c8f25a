// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Release state machine.
//!
//! Every check that can fail without side effects (remote branch, previous
//! tag, commit range, version marker at the remote tip) runs before the
//! confirmation gate. After confirmation the stages mutate the work tree and
//! the remote in order; a failure stops the run where it is, without cleanup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::changelog::{ChangelogFile, ChangelogWriter, release_header};
use super::classifier::{DegradedLookup, LabelClassifier};
use super::git::GitService;
use super::github::{NewRelease, ReleasePublisher};
use super::renderer::ChangelogRenderer;
use super::version::{self, VersionFile};
use crate::domain::{ChangelogDocument, CommitRecord, ReleaseContext, ReleaseStage};
use crate::error::{Error, Result};

/// Files touched by a release, relative to the work tree.
#[derive(Debug, Clone)]
pub struct ReleaseFiles {
    pub changelog: PathBuf,
    pub version_file: PathBuf,
}

/// What is about to happen, shown before the destructive part starts.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub new_tag: String,
    pub previous_tag: String,
    pub branch: String,
    pub remote: String,
    pub current_version: String,
    pub commit_count: usize,
}

/// Positive signal required before the working tree is reset.
pub trait Confirmation {
    fn confirm(&self, plan: &ReleasePlan) -> Result<bool>;
}

/// Always answers the same way (`--yes`, tests).
pub struct Preconfirmed(pub bool);

impl Confirmation for Preconfirmed {
    fn confirm(&self, _plan: &ReleasePlan) -> Result<bool> {
        Ok(self.0)
    }
}

pub trait ReleaseObserver {
    fn stage_entered(&self, _stage: ReleaseStage) {}
}

impl ReleaseObserver for () {}

/// Rendered notes for a range plus the lookups that degraded.
#[derive(Debug)]
pub struct Notes {
    pub document: ChangelogDocument,
    pub degraded: Vec<DegradedLookup>,
    pub commit_count: usize,
}

#[derive(Debug)]
pub struct ReleaseOutcome {
    pub url: String,
    pub notes: Notes,
}

pub fn commit_message(changelog: &Path, tag: &str) -> String {
    let name = changelog
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| changelog.display().to_string());
    format!("Updating {name} for {tag}.")
}

pub struct ReleasePipeline {
    git: GitService,
    classifier: LabelClassifier,
    renderer: ChangelogRenderer,
    publisher: Arc<dyn ReleasePublisher>,
    changelog: Box<dyn ChangelogWriter>,
    remote: String,
    files: ReleaseFiles,
    cancel: CancellationToken,
    stage: Option<ReleaseStage>,
    verified_branch: Option<String>,
}

impl ReleasePipeline {
    pub fn new(
        git: GitService,
        classifier: LabelClassifier,
        renderer: ChangelogRenderer,
        publisher: Arc<dyn ReleasePublisher>,
        remote: impl Into<String>,
        files: ReleaseFiles,
    ) -> Self {
        let changelog = Box::new(ChangelogFile::new(git.work_dir().join(&files.changelog)));
        Self {
            git,
            classifier,
            renderer,
            publisher,
            changelog,
            remote: remote.into(),
            files,
            cancel: CancellationToken::new(),
            stage: None,
            verified_branch: None,
        }
    }

    pub fn with_changelog_writer(mut self, writer: Box<dyn ChangelogWriter>) -> Self {
        self.changelog = writer;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Last stage entered; on failure, the stage that failed
    pub fn stage(&self) -> Option<ReleaseStage> {
        self.stage
    }

    fn version_file(&self) -> VersionFile {
        VersionFile::new(self.git.work_dir().join(&self.files.version_file))
    }

    fn enter(&mut self, stage: ReleaseStage, observer: &dyn ReleaseObserver) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        debug!(%stage, "entering release stage");
        self.stage = Some(stage);
        observer.stage_entered(stage);
        Ok(())
    }

    async fn classify_and_render(
        &self,
        commits: Vec<CommitRecord>,
        context: &ReleaseContext,
    ) -> Notes {
        let commit_count = commits.len();
        let classification = self.classifier.classify(commits).await;
        let document = self.renderer.render(&classification.changes, context);
        Notes {
            document,
            degraded: classification.degraded,
            commit_count,
        }
    }

    /// First gate of a release: `branch` must exist on the remote.
    ///
    /// Runs once per branch; `run` skips the check when it already passed,
    /// so callers can verify before resolving the previous tag.
    pub async fn verify_branch(
        &mut self,
        branch: &str,
        observer: &dyn ReleaseObserver,
    ) -> Result<()> {
        if self.verified_branch.as_deref() == Some(branch) {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            return Ok(());
        }

        self.enter(ReleaseStage::BranchVerified, observer)?;
        if !self.git.remote_branch_exists(&self.remote, branch).await? {
            return Err(Error::MissingRemoteBranch {
                remote: self.remote.clone(),
                branch: branch.to_string(),
            });
        }
        self.verified_branch = Some(branch.to_string());
        Ok(())
    }

    /// `explicit` when given, else the newest tag reachable from `branch`
    pub async fn previous_tag(&self, branch: &str, explicit: Option<&str>) -> Result<String> {
        match explicit {
            Some(tag) => Ok(tag.to_string()),
            None => self.git.last_tag_on(branch).await,
        }
    }

    /// Notes for `previous_tag..HEAD` without touching anything.
    pub async fn generate_notes(&self, context: &ReleaseContext) -> Result<Notes> {
        let commits = self.git.commit_range(&context.previous_tag, "HEAD").await?;
        Ok(self.classify_and_render(commits, context).await)
    }

    pub fn write_notes(&self, context: &ReleaseContext, document: &ChangelogDocument) -> Result<()> {
        let header = release_header(&context.new_tag, context.date);
        self.changelog.prepend(&header, document.as_str())
    }

    /// Run the whole release. See the module docs for ordering.
    pub async fn run(
        &mut self,
        context: &ReleaseContext,
        confirmation: &dyn Confirmation,
        observer: &dyn ReleaseObserver,
    ) -> Result<ReleaseOutcome> {
        let remote = self.remote.clone();
        let branch = context.branch.as_str();
        let tip = format!("{remote}/{branch}");

        self.verify_branch(branch, observer).await?;

        self.enter(ReleaseStage::PreconditionsChecked, observer)?;
        self.git.fetch(&remote, branch).await?;
        let commits = self.git.commit_range(&context.previous_tag, &tip).await?;

        let version_file = self.version_file();
        let remote_source = self
            .git
            .show_file(&tip, &self.files.version_file)
            .await?
            .unwrap_or_default();
        version_file.check(&remote_source)?;
        let current_version = version::find_version(&remote_source)
            .unwrap_or_default()
            .to_string();

        let plan = ReleasePlan {
            new_tag: context.new_tag.clone(),
            previous_tag: context.previous_tag.clone(),
            branch: branch.to_string(),
            remote: remote.clone(),
            current_version,
            commit_count: commits.len(),
        };
        if !confirmation.confirm(&plan)? {
            return Err(Error::Cancelled);
        }

        self.enter(ReleaseStage::WorkingTreeReset, observer)?;
        self.git.reset_to_remote(&remote, branch).await?;

        self.enter(ReleaseStage::VersionBumped, observer)?;
        version_file.bump(&context.new_tag)?;

        self.enter(ReleaseStage::ChangelogGenerated, observer)?;
        let notes = self.classify_and_render(commits, context).await;

        self.enter(ReleaseStage::ChangelogPersisted, observer)?;
        self.write_notes(context, &notes.document)?;

        self.enter(ReleaseStage::Committed, observer)?;
        self.git
            .stage_files(&[
                self.files.changelog.as_path(),
                self.files.version_file.as_path(),
            ])
            .await?;
        self.git
            .commit(&commit_message(&self.files.changelog, &context.new_tag))
            .await?;
        self.git.push(&remote, branch).await?;

        self.enter(ReleaseStage::Published, observer)?;
        let release = NewRelease {
            tag_name: context.new_tag.clone(),
            target_commitish: branch.to_string(),
            name: context.new_tag.clone(),
            body: notes.document.to_string(),
            draft: true,
        };
        let published = self.publisher.create_release(&release).await?;

        info!(tag = %context.new_tag, url = %published.html_url, "release published");
        Ok(ReleaseOutcome {
            url: published.html_url,
            notes,
        })
    }
}
