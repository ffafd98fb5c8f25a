// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::issue_ref::extract_issue;
use crate::domain::{Category, ClassifiedChangeSet, CommitRecord};
use crate::error::Result;

/// Source of issue labels for a fixed repository.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Label names in the order the tracker returns them
    async fn issue_labels(&self, number: u64) -> Result<Vec<String>>;
}

/// Label names that select a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelRules {
    #[serde(default = "default_enhancement_labels")]
    pub enhancement: Vec<String>,

    #[serde(default = "default_bug_labels")]
    pub bug: Vec<String>,
}

fn default_enhancement_labels() -> Vec<String> {
    vec!["enhancement".into()]
}

fn default_bug_labels() -> Vec<String> {
    vec!["bug".into()]
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            enhancement: default_enhancement_labels(),
            bug: default_bug_labels(),
        }
    }
}

impl LabelRules {
    /// First label (in tracker order) naming a known category wins.
    pub fn categorize<S: AsRef<str>>(&self, labels: &[S]) -> Category {
        labels
            .iter()
            .map(AsRef::as_ref)
            .find_map(|label| {
                if self.enhancement.iter().any(|l| l == label) {
                    Some(Category::Enhancement)
                } else if self.bug.iter().any(|l| l == label) {
                    Some(Category::Bug)
                } else {
                    None
                }
            })
            .unwrap_or_default()
    }
}

/// An issue whose labels could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedLookup {
    pub issue: u64,
    pub reason: String,
    /// Commits referencing the issue, all placed in Miscellaneous
    pub commits: usize,
}

#[derive(Debug, Default)]
pub struct Classification {
    pub changes: ClassifiedChangeSet,
    /// One entry per failed issue, ascending by issue number
    pub degraded: Vec<DegradedLookup>,
}

pub struct LabelClassifier {
    tracker: Arc<dyn IssueTracker>,
    rules: LabelRules,
    concurrency: usize,
}

impl LabelClassifier {
    pub fn new(tracker: Arc<dyn IssueTracker>, rules: LabelRules, concurrency: usize) -> Self {
        Self {
            tracker,
            rules,
            concurrency: concurrency.max(1),
        }
    }

    /// Category for a single (optional) issue. Never fails: lookup errors
    /// fall back to Miscellaneous.
    pub async fn category_for(&self, issue: Option<u64>) -> Category {
        let Some(number) = issue else {
            return Category::Miscellaneous;
        };

        match self.tracker.issue_labels(number).await {
            Ok(labels) => self.rules.categorize(&labels),
            Err(e) => {
                warn!(issue = number, error = %e, "issue lookup failed, using misc");
                Category::Miscellaneous
            }
        }
    }

    /// Partition a commit range by issue label.
    ///
    /// Each distinct issue is looked up once, at most `concurrency` at a
    /// time. Bucket order follows `commits` order.
    pub async fn classify(&self, commits: Vec<CommitRecord>) -> Classification {
        let references: Vec<Option<u64>> =
            commits.iter().map(|c| extract_issue(&c.subject)).collect();
        let issues: BTreeSet<u64> = references.iter().flatten().copied().collect();

        let labels = self.fetch_labels(issues).await;

        let mut changes = ClassifiedChangeSet::new();
        for (commit, issue) in commits.into_iter().zip(references.iter().copied()) {
            let category = match issue.and_then(|n| labels.get(&n)) {
                Some(Ok(names)) => self.rules.categorize(names),
                _ => Category::Miscellaneous,
            };
            changes.push(category, commit);
        }

        let mut degraded: Vec<DegradedLookup> = labels
            .into_iter()
            .filter_map(|(issue, result)| {
                result.err().map(|reason| DegradedLookup {
                    issue,
                    reason,
                    commits: references.iter().filter(|r| **r == Some(issue)).count(),
                })
            })
            .collect();
        degraded.sort_by_key(|d| d.issue);

        if !degraded.is_empty() {
            warn!(
                issues = degraded.len(),
                commits = degraded.iter().map(|d| d.commits).sum::<usize>(),
                "issue lookups failed; those commits are listed under Miscellaneous"
            );
        }

        Classification { changes, degraded }
    }

    async fn fetch_labels(
        &self,
        issues: BTreeSet<u64>,
    ) -> HashMap<u64, std::result::Result<Vec<String>, String>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut task_issues = HashMap::new();

        for number in issues {
            let tracker = Arc::clone(&self.tracker);
            let semaphore = Arc::clone(&semaphore);
            let handle = tasks.spawn(async move {
                // The semaphore is never closed, so acquire cannot fail
                let _permit = semaphore.acquire_owned().await.ok();
                let result = tracker
                    .issue_labels(number)
                    .await
                    .map_err(|e| e.to_string());
                (number, result)
            });
            task_issues.insert(handle.id(), number);
        }

        let mut labels = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((number, result)) => {
                    if let Err(ref reason) = result {
                        warn!(issue = number, %reason, "issue lookup failed");
                    } else {
                        debug!(issue = number, "issue labels fetched");
                    }
                    labels.insert(number, result);
                }
                Err(e) => {
                    warn!(error = %e, "issue lookup task failed");
                    if let Some(number) = task_issues.get(&e.id()) {
                        labels.insert(*number, Err(e.to_string()));
                    }
                }
            }
        }
        labels
    }
}
