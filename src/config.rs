// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::domain::RepoSlug;
use crate::error::{Error, Result};
use crate::services::classifier::LabelRules;
use crate::services::github::DEFAULT_API_URL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Repository owner; inferred from the remote URL when unset
    #[serde(default)]
    pub owner: Option<String>,

    /// Repository name; inferred from the remote URL when unset
    #[serde(default)]
    pub repo: Option<String>,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Web host for compare links
    #[serde(default = "default_web_url")]
    pub web_url: String,

    #[serde(default = "default_changelog")]
    pub changelog: PathBuf,

    /// File holding `const VERSION = 'x.y.z';`
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    /// HTTP timeout in seconds (default 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout per git invocation in seconds (default 3 hours)
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Concurrent issue lookups (default 8)
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,

    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    #[serde(default)]
    pub labels: LabelRules,
}

fn default_remote() -> String {
    "origin".into()
}
fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_web_url() -> String {
    "https://github.com".into()
}
fn default_changelog() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}
fn default_version_file() -> PathBuf {
    PathBuf::from("src/version.rs")
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_command_timeout_secs() -> u64 {
    10_800
}
fn default_lookup_concurrency() -> usize {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            remote: default_remote(),
            api_url: default_api_url(),
            web_url: default_web_url(),
            changelog: default_changelog(),
            version_file: default_version_file(),
            timeout_secs: default_timeout_secs(),
            command_timeout_secs: default_command_timeout_secs(),
            lookup_concurrency: default_lookup_concurrency(),
            token: None,
            labels: LabelRules::default(),
        }
    }
}

impl Config {
    /// Load with priority: CLI > ENV > user config > project config > defaults
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Project-level config (.tagcut.toml in the current directory)
        if let Ok(cwd) = std::env::current_dir() {
            let project_config = cwd.join(".tagcut.toml");
            if project_config.exists() {
                figment = figment.merge(Toml::file(&project_config));
            }
        }

        // User-level config
        if let Some(path) = Self::config_path() {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        }

        // Environment variables (TAGCUT_REMOTE, TAGCUT_TOKEN, ...)
        // Use __ separator for nested keys (e.g., TAGCUT_LABELS__BUG)
        figment = figment.merge(Env::prefixed("TAGCUT_").split("__"));

        let mut config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        if config.token.is_none() {
            config.token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        }

        // Keyring fallback (if still no token and secure-storage feature is enabled)
        #[cfg(feature = "secure-storage")]
        if config.token.is_none() {
            if let Ok(entry) = keyring::Entry::new("tagcut", "github") {
                if let Ok(token) = entry.get_password() {
                    config.token = Some(token);
                }
            }
        }

        // CLI overrides (highest priority)
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tagcut").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(token) = cli.token() {
            self.token = Some(token.to_string());
        }
    }

    /// Configured owner/repo, falling back to `remote_url`
    pub fn repository(&self, remote_url: Option<&str>) -> Result<RepoSlug> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
                Ok(RepoSlug::new(owner, repo))
            }
            _ => remote_url.and_then(RepoSlug::from_remote_url).ok_or_else(|| {
                Error::Config(format!(
                    "Cannot determine the repository; set owner and repo or point '{}' at a hosted repository",
                    self.remote
                ))
            }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (key, value) in [("api_url", &self.api_url), ("web_url", &self.web_url)] {
            let parsed = url::Url::parse(value)
                .map_err(|e| Error::Config(format!("{key} is not a valid URL ('{value}'): {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::Config(format!(
                    "{key} must start with http:// or https://, got '{value}'"
                )));
            }
        }

        if self.remote.trim().is_empty() {
            return Err(Error::Config("remote cannot be empty".into()));
        }

        if !(1..=600).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "timeout_secs must be 1–600, got {}",
                self.timeout_secs
            )));
        }

        if !(1..=86_400).contains(&self.command_timeout_secs) {
            return Err(Error::Config(format!(
                "command_timeout_secs must be 1–86400, got {}",
                self.command_timeout_secs
            )));
        }

        if !(1..=64).contains(&self.lookup_concurrency) {
            return Err(Error::Config(format!(
                "lookup_concurrency must be 1–64, got {}",
                self.lookup_concurrency
            )));
        }

        if self.labels.enhancement.is_empty() || self.labels.bug.is_empty() {
            return Err(Error::Config(
                "labels.enhancement and labels.bug need at least one label each".into(),
            ));
        }

        Ok(())
    }

    /// Create default config file with secure permissions
    pub fn create_default() -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = r#"# tagcut configuration
# Per-project overrides go in .tagcut.toml at the repository root.

# Repository on the host; inferred from the remote URL when unset
# owner = "acme"
# repo = "widget"

# Remote holding the release branch
remote = "origin"

# REST API base and web host (GitHub Enterprise: https://host/api/v3)
api_url = "https://api.github.com"
web_url = "https://github.com"

# Files updated by a release, relative to the repository root
changelog = "CHANGELOG.md"
version_file = "src/version.rs"

# Timeouts in seconds
timeout_secs = 30
command_timeout_secs = 10800

# Concurrent issue label lookups
lookup_concurrency = 8

# Issue labels that sort commits into sections; first match in label order wins
[labels]
enhancement = ["enhancement"]
bug = ["bug"]
"#;

        fs::write(&path, content)?;

        // Set secure permissions (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}
