// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use tagcut::domain::{CommitRecord, ReleaseContext};
use tagcut::error::{Error, Result};
use tagcut::services::classifier::IssueTracker;
use tagcut::services::executor::{CommandExecutor, CommandOutput};
use tagcut::services::github::{NewRelease, PublishedRelease, ReleasePublisher};

/// 40-hex commit id derived from a small seed
#[allow(dead_code)]
pub fn commit_id(seed: u32) -> String {
    format!("{seed:040x}")
}

#[allow(dead_code)]
pub fn make_commit(seed: u32, subject: &str) -> CommitRecord {
    CommitRecord::new(commit_id(seed), subject)
}

#[allow(dead_code)]
pub fn make_context(new_tag: &str, previous_tag: &str) -> ReleaseContext {
    ReleaseContext::new(
        new_tag,
        previous_tag,
        "main",
        SecretString::from("test-token".to_string()),
    )
    .unwrap()
    .with_date(chrono::NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
}

#[allow(dead_code)]
pub fn ok_output(stdout: &str) -> CommandOutput {
    CommandOutput {
        status: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

#[allow(dead_code)]
pub fn failed_output(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        status: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Executor answering by argument prefix; unmatched commands succeed with
/// empty output. Every invocation is recorded.
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedExecutor {
    rules: Vec<(Vec<String>, CommandOutput)>,
    calls: Mutex<Vec<Vec<String>>>,
}

#[allow(dead_code)]
impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// First registered rule whose prefix matches wins
    pub fn respond(mut self, prefix: &[&str], output: CommandOutput) -> Self {
        self.rules
            .push((prefix.iter().map(|s| s.to_string()).collect(), output));
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Invocations whose first argument is `subcommand`
    pub fn calls_to(&self, subcommand: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|c| c.first().map(String::as_str) == Some(subcommand))
            .collect()
    }

    pub fn was_called(&self, subcommand: &str) -> bool {
        !self.calls_to(subcommand).is_empty()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(&self, _program: &str, args: &[&str], _cwd: &Path) -> Result<CommandOutput> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        self.calls.lock().unwrap().push(args.clone());

        let output = self
            .rules
            .iter()
            .find(|(prefix, _)| args.starts_with(prefix))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| ok_output(""));
        Ok(output)
    }
}

/// In-memory issue tracker. Unknown issues fail like a 404.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeTracker {
    issues: HashMap<u64, std::result::Result<Vec<String>, String>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[allow(dead_code)]
impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, number: u64, labels: &[&str]) -> Self {
        self.issues
            .insert(number, Ok(labels.iter().map(|s| s.to_string()).collect()));
        self
    }

    pub fn failing(mut self, number: u64, reason: &str) -> Self {
        self.issues.insert(number, Err(reason.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn issue_labels(&self, number: u64) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.issues.get(&number) {
            Some(Ok(labels)) => Ok(labels.clone()),
            Some(Err(reason)) => Err(Error::IssueLookup {
                number,
                message: reason.clone(),
            }),
            None => Err(Error::IssueLookup {
                number,
                message: "HTTP 404 Not Found".into(),
            }),
        }
    }
}

/// Publisher that records requests and answers with a fixed result.
#[allow(dead_code)]
pub struct RecordingPublisher {
    fail_with: Option<String>,
    requests: Mutex<Vec<NewRelease>>,
}

#[allow(dead_code)]
impl RecordingPublisher {
    pub fn succeeding() -> Self {
        Self {
            fail_with: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<NewRelease> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReleasePublisher for RecordingPublisher {
    async fn create_release(&self, release: &NewRelease) -> Result<PublishedRelease> {
        self.requests.lock().unwrap().push(release.clone());
        match &self.fail_with {
            Some(message) => Err(Error::Publish {
                message: message.clone(),
            }),
            None => Ok(PublishedRelease {
                html_url: format!(
                    "https://github.com/acme/widget/releases/tag/untagged-{}",
                    release.tag_name
                ),
            }),
        }
    }
}
