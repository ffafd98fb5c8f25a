// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::classifier::IssueTracker;
use crate::domain::RepoSlug;
use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Body of the "create release" call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewRelease {
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PublishedRelease {
    pub html_url: String,
}

#[async_trait]
pub trait ReleasePublisher: Send + Sync {
    async fn create_release(&self, release: &NewRelease) -> Result<PublishedRelease>;
}

#[derive(Deserialize)]
struct IssueResponse {
    #[serde(default)]
    labels: Vec<Label>,
}

#[derive(Deserialize)]
struct Label {
    name: String,
}

/// GitHub's error envelope, e.g. `{"message": "Validation Failed", ...}`
#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Human-readable part of an error response body
fn error_detail(body: String) -> String {
    serde_json::from_str::<ApiError>(&body)
        .map(|e| e.message)
        .unwrap_or(body)
}

pub struct GitHubClient {
    client: Client,
    api_url: String,
    repo: RepoSlug,
    token: SecretString,
}

impl GitHubClient {
    pub fn new(api_url: &str, repo: RepoSlug, token: SecretString, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tagcut/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            // Sanitize: remove trailing slashes to avoid //repos
            api_url: api_url.trim_end_matches('/').to_string(),
            repo,
            token,
        }
    }

    fn repo_url(&self, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{tail}",
            self.api_url, self.repo.owner, self.repo.name
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn issue_labels(&self, number: u64) -> Result<Vec<String>> {
        let url = self.repo_url(&format!("issues/{number}"));
        let lookup_error = |message: String| Error::IssueLookup { number, message };

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    lookup_error("request timed out".into())
                } else {
                    lookup_error(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(lookup_error(format!("HTTP {}", response.status())));
        }

        let issue: IssueResponse = response
            .json()
            .await
            .map_err(|e| lookup_error(e.to_string()))?;

        let labels: Vec<String> = issue.labels.into_iter().map(|l| l.name).collect();
        debug!(issue = number, ?labels, "issue labels");
        Ok(labels)
    }
}

#[async_trait]
impl ReleasePublisher for GitHubClient {
    async fn create_release(&self, release: &NewRelease) -> Result<PublishedRelease> {
        let url = self.repo_url("releases");

        let response = self
            .authorized(self.client.post(&url))
            .json(release)
            .send()
            .await
            .map_err(|e| Error::Publish {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Publish {
                message: format!("HTTP {status}: {}", error_detail(body)),
            });
        }

        let published: PublishedRelease = response.json().await.map_err(|e| Error::Publish {
            message: format!("unexpected response: {e}"),
        })?;

        info!(tag = %release.tag_name, url = %published.html_url, "draft release created");
        Ok(published)
    }
}
