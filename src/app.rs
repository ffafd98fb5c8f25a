// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use console::style;
use dialoguer::Confirm;
use secrecy::SecretString;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cli::{Cli, Commands, ReleaseTarget};
use crate::config::Config;
use crate::domain::{ReleaseContext, ReleaseStage};
use crate::error::{Error, Result};
use crate::services::{
    classifier::{DegradedLookup, LabelClassifier},
    executor::{CommandExecutor, SystemExecutor},
    git::GitService,
    github::GitHubClient,
    release::{Confirmation, Preconfirmed, ReleaseFiles, ReleaseObserver, ReleasePipeline, ReleasePlan},
    renderer::ChangelogRenderer,
};

pub struct App {
    cli: Cli,
    config: Config,
    cancel_token: CancellationToken,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            remote = %config.remote,
            api_url = %config.api_url,
            changelog = %config.changelog.display(),
            "config loaded"
        );
        let cancel_token = CancellationToken::new();
        Ok(Self {
            cli,
            config,
            cancel_token,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup Ctrl+C handler with CancellationToken
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            signal::ctrl_c().await.ok();
            cancel.cancel();
        });

        match &self.cli.command {
            Commands::Release { target, yes, open } => self.release(target, *yes, *open).await,
            Commands::Notes { target, dry_run } => self.notes(target, *dry_run).await,
            Commands::Init => {
                let path = Config::create_default()?;
                println!("Created config: {}", path.display());
                Ok(())
            }
            Commands::Config => self.show_config(),
            Commands::Completions { shell } => {
                let mut cmd = <Cli as clap::CommandFactory>::command();
                clap_complete::generate(*shell, &mut cmd, "tagcut", &mut std::io::stdout());
                Ok(())
            }
            #[cfg(feature = "secure-storage")]
            Commands::SetToken => self.set_token(),
            #[cfg(feature = "secure-storage")]
            Commands::GetToken => self.get_token(),
        }
    }

    // ─── Release ───

    async fn release(&self, target: &ReleaseTarget, yes: bool, open: bool) -> Result<()> {
        let executor = self.executor();
        let (mut pipeline, context) = self
            .prepare(target, Arc::clone(&executor), Some(&StageReporter))
            .await?;

        let confirmation: Box<dyn Confirmation> = if yes {
            Box::new(Preconfirmed(true))
        } else if std::io::stdout().is_terminal() && std::io::stdin().is_terminal() {
            Box::new(DialogConfirmation)
        } else {
            self.print_warning("Not a terminal. Use --yes to confirm the release in scripts.");
            return Err(Error::Cancelled);
        };

        self.print_warning("Please run all release tests before executing this command!");

        let result = pipeline
            .run(&context, confirmation.as_ref(), &StageReporter)
            .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                if let Some(stage) = pipeline.stage() {
                    if stage >= ReleaseStage::WorkingTreeReset && !matches!(e, Error::Cancelled) {
                        self.print_warning(&format!(
                            "Release stopped at '{stage}'; the working tree and {} may need manual cleanup",
                            self.config.remote
                        ));
                    }
                }
                return Err(e);
            }
        };

        self.report_degraded(&outcome.notes.degraded);
        eprintln!(
            "{} Draft release {} created from {} commits",
            style("✓").green().bold(),
            context.new_tag,
            outcome.notes.commit_count
        );
        println!("{}", outcome.url);

        if open {
            self.open_in_browser(executor.as_ref(), &outcome.url).await;
        }
        Ok(())
    }

    // ─── Notes ───

    async fn notes(&self, target: &ReleaseTarget, dry_run: bool) -> Result<()> {
        let (pipeline, context) = self.prepare(target, self.executor(), None).await?;

        self.print_status(&format!(
            "Collecting changes {}..{}",
            context.previous_tag, context.branch
        ));
        let notes = pipeline.generate_notes(&context).await?;

        if self.cancel_token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        self.print_info(&format!("{} commits since {}", notes.commit_count, context.previous_tag));
        self.report_degraded(&notes.degraded);

        if dry_run {
            println!("{}", notes.document);
            return Ok(());
        }

        pipeline.write_notes(&context, &notes.document)?;
        eprintln!(
            "{} Updated {} for {}",
            style("✓").green().bold(),
            self.config.changelog.display(),
            context.new_tag
        );
        Ok(())
    }

    // ─── Wiring ───

    fn executor(&self) -> Arc<dyn CommandExecutor> {
        Arc::new(SystemExecutor::new(Duration::from_secs(
            self.config.command_timeout_secs,
        )))
    }

    /// Wire the pipeline and build the release context.
    ///
    /// With `verify_remote`, the remote branch is checked before the previous
    /// tag is looked up, so a branch that was never pushed is reported as
    /// such rather than as a missing tag.
    async fn prepare(
        &self,
        target: &ReleaseTarget,
        executor: Arc<dyn CommandExecutor>,
        verify_remote: Option<&dyn ReleaseObserver>,
    ) -> Result<(ReleasePipeline, ReleaseContext)> {
        let git = GitService::discover(executor)?;
        let branch = git.current_branch().await?;

        let token = self.config.token.clone().ok_or_else(|| {
            Error::Config(
                "A GitHub token is required: pass --token, set GITHUB_TOKEN, or run `tagcut set-token`"
                    .into(),
            )
        })?;
        let token = SecretString::from(token);

        let remote_url = git.remote_url(&self.config.remote).await.ok();
        let repo = self.config.repository(remote_url.as_deref())?;

        let client = Arc::new(GitHubClient::new(
            &self.config.api_url,
            repo.clone(),
            token.clone(),
            Duration::from_secs(self.config.timeout_secs),
        ));
        let classifier = LabelClassifier::new(
            client.clone(),
            self.config.labels.clone(),
            self.config.lookup_concurrency,
        );
        let renderer = ChangelogRenderer::new(&self.config.web_url, &repo);
        let files = ReleaseFiles {
            changelog: self.config.changelog.clone(),
            version_file: self.config.version_file.clone(),
        };

        let mut pipeline = ReleasePipeline::new(
            git,
            classifier,
            renderer,
            client,
            self.config.remote.clone(),
            files,
        )
        .with_cancel_token(self.cancel_token.clone());

        if let Some(observer) = verify_remote {
            pipeline.verify_branch(&branch, observer).await?;
        }
        let previous_tag = pipeline
            .previous_tag(&branch, target.prev_tag.as_deref())
            .await?;
        debug!(%branch, %previous_tag, "release range");

        let context = ReleaseContext::new(&target.tag, previous_tag, branch, token)?;
        Ok((pipeline, context))
    }

    async fn open_in_browser(&self, executor: &dyn CommandExecutor, url: &str) {
        let (program, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
            ("open", vec![url])
        } else if cfg!(target_os = "windows") {
            ("cmd", vec!["/C", "start", "", url])
        } else {
            ("xdg-open", vec![url])
        };

        let cwd = std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir());
        match executor.execute(program, &args, &cwd).await {
            Ok(output) if output.success() => {}
            Ok(output) => warn!(program, stderr = %output.stderr.trim(), "could not open browser"),
            Err(e) => warn!(program, error = %e, "could not open browser"),
        }
    }

    fn report_degraded(&self, degraded: &[DegradedLookup]) {
        if degraded.is_empty() {
            return;
        }
        let commits: usize = degraded.iter().map(|d| d.commits).sum();
        self.print_warning(&format!(
            "{commits} commits classified as Miscellaneous because {} issue lookups failed:",
            degraded.len()
        ));
        for lookup in degraded {
            eprintln!(
                "  #{} ({} commits): {}",
                lookup.issue, lookup.commits, lookup.reason
            );
        }
    }

    fn show_config(&self) -> Result<()> {
        let rendered = toml::to_string_pretty(&self.config)
            .map_err(|e| Error::Config(format!("Cannot render config: {e}")))?;
        print!("{rendered}");
        println!();
        println!(
            "# token: {}",
            if self.config.token.is_some() { "set" } else { "unset" }
        );
        if let Some(path) = Config::config_path() {
            println!("# user config: {}", path.display());
        }
        Ok(())
    }

    // ─── Keyring Commands ───

    #[cfg(feature = "secure-storage")]
    fn set_token(&self) -> Result<()> {
        eprintln!("Enter a GitHub access token (input will be hidden):");

        let token = dialoguer::Password::new()
            .with_prompt("Token")
            .interact()
            .map_err(|e| Error::Dialog(e.to_string()))?;

        if token.trim().is_empty() {
            return Err(Error::Config("Token cannot be empty".into()));
        }

        let entry =
            keyring::Entry::new("tagcut", "github").map_err(|e| Error::Keyring(e.to_string()))?;
        entry
            .set_password(token.trim())
            .map_err(|e| Error::Keyring(e.to_string()))?;

        eprintln!("{} Token stored in keychain", style("✓").green().bold());
        Ok(())
    }

    #[cfg(feature = "secure-storage")]
    fn get_token(&self) -> Result<()> {
        let entry =
            keyring::Entry::new("tagcut", "github").map_err(|e| Error::Keyring(e.to_string()))?;

        match entry.get_password() {
            Ok(_) => {
                eprintln!(
                    "{} GitHub token is stored in keychain",
                    style("✓").green().bold()
                );
            }
            Err(keyring::Error::NoEntry) => {
                eprintln!("{} No GitHub token in keychain", style("✗").red().bold());
                eprintln!("  Store one with: {}", style("tagcut set-token").yellow());
            }
            Err(e) => {
                return Err(Error::Keyring(e.to_string()));
            }
        }

        Ok(())
    }

    // ─── Output Helpers ───

    fn print_status(&self, msg: &str) {
        eprintln!("{} {}", style("→").cyan(), msg);
    }

    fn print_info(&self, msg: &str) {
        eprintln!("{} {}", style("info:").cyan(), msg);
    }

    fn print_warning(&self, msg: &str) {
        eprintln!("{} {}", style("warning:").yellow().bold(), msg);
    }
}

/// Lists the plan and asks before anything destructive happens.
struct DialogConfirmation;

impl Confirmation for DialogConfirmation {
    fn confirm(&self, plan: &ReleasePlan) -> Result<bool> {
        eprintln!();
        eprintln!(
            "{} {} commits since {}; version {} → {}",
            style("info:").cyan(),
            plan.commit_count,
            plan.previous_tag,
            plan.current_version,
            plan.new_tag
        );
        eprintln!("Continuing will do the following:");
        eprintln!(
            "  - {}",
            style("Destroy any uncommitted work on the current branch").yellow()
        );
        eprintln!("  - Hard reset to {}/{}", plan.remote, plan.branch);
        eprintln!("  - Update and commit the version file and changelog");
        eprintln!("  - Push {} to {}", plan.branch, plan.remote);
        eprintln!("  - Create a draft {} release with the release notes", plan.new_tag);
        eprintln!();

        Ok(Confirm::new()
            .with_prompt("Continue?")
            .default(false)
            .interact()?)
    }
}

struct StageReporter;

impl ReleaseObserver for StageReporter {
    fn stage_entered(&self, stage: ReleaseStage) {
        eprintln!("{} {}", style("→").cyan(), capitalize(&stage.to_string()));
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
