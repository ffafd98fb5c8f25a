// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::path::PathBuf;

use tagcut::config::Config;
use tagcut::domain::RepoSlug;
use tagcut::error::Error;

// ─── Default values ──────────────────────────────────────────────────────────

#[test]
fn default_config_values() {
    let config = Config::default();
    assert!(config.owner.is_none());
    assert!(config.repo.is_none());
    assert_eq!(config.remote, "origin");
    assert_eq!(config.api_url, "https://api.github.com");
    assert_eq!(config.web_url, "https://github.com");
    assert_eq!(config.changelog, PathBuf::from("CHANGELOG.md"));
    assert_eq!(config.version_file, PathBuf::from("src/version.rs"));
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.command_timeout_secs, 10_800);
    assert_eq!(config.lookup_concurrency, 8);
    assert!(config.token.is_none());
    assert_eq!(config.labels.enhancement, ["enhancement"]);
    assert_eq!(config.labels.bug, ["bug"]);
    assert!(config.validate().is_ok());
}

// ─── TOML deserialization ────────────────────────────────────────────────────

#[test]
fn load_from_valid_toml() {
    let toml_str = r#"
owner = "acme"
repo = "widget"
remote = "upstream"
changelog = "docs/CHANGES.md"
version_file = "lib/version.php"
lookup_concurrency = 2

[labels]
enhancement = ["feature", "enhancement"]
bug = ["type: bug"]
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.owner.as_deref(), Some("acme"));
    assert_eq!(config.repo.as_deref(), Some("widget"));
    assert_eq!(config.remote, "upstream");
    assert_eq!(config.changelog, PathBuf::from("docs/CHANGES.md"));
    assert_eq!(config.version_file, PathBuf::from("lib/version.php"));
    assert_eq!(config.lookup_concurrency, 2);
    assert_eq!(config.labels.enhancement, ["feature", "enhancement"]);
    assert_eq!(config.labels.bug, ["type: bug"]);
}

#[test]
fn load_partial_toml_uses_defaults() {
    let config: Config = toml::from_str(r#"remote = "fork""#).unwrap();
    assert_eq!(config.remote, "fork");
    // Everything else should be default
    assert_eq!(config.api_url, "https://api.github.com");
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.labels.bug, ["bug"]);
}

#[test]
fn partial_labels_table_keeps_other_default() {
    let config: Config = toml::from_str("[labels]\nbug = [\"defect\"]\n").unwrap();
    assert_eq!(config.labels.bug, ["defect"]);
    assert_eq!(config.labels.enhancement, ["enhancement"]);
}

#[test]
fn invalid_toml_returns_error() {
    assert!(toml::from_str::<Config>("lookup_concurrency = \"many\"").is_err());
}

#[test]
fn token_is_never_serialized() {
    let config = Config {
        token: Some("ghp_secret".into()),
        ..Config::default()
    };
    let rendered = toml::to_string(&config).unwrap();
    assert!(!rendered.contains("ghp_secret"));
}

// ─── Validation ──────────────────────────────────────────────────────────────

fn invalid(config: Config) -> String {
    match config.validate() {
        Err(Error::Config(message)) => message,
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn rejects_non_http_urls() {
    let message = invalid(Config {
        api_url: "ftp://api.example.com".into(),
        ..Config::default()
    });
    assert!(message.contains("api_url"));

    let message = invalid(Config {
        web_url: "not a url".into(),
        ..Config::default()
    });
    assert!(message.contains("web_url"));
}

#[test]
fn rejects_out_of_range_numbers() {
    assert!(invalid(Config { timeout_secs: 0, ..Config::default() }).contains("timeout_secs"));
    assert!(
        invalid(Config { command_timeout_secs: 100_000, ..Config::default() })
            .contains("command_timeout_secs")
    );
    assert!(
        invalid(Config { lookup_concurrency: 0, ..Config::default() })
            .contains("lookup_concurrency")
    );
}

#[test]
fn rejects_empty_remote_and_labels() {
    invalid(Config { remote: " ".into(), ..Config::default() });

    let mut config = Config::default();
    config.labels.bug.clear();
    assert!(invalid(config).contains("labels"));
}

// ─── Repository resolution ───────────────────────────────────────────────────

#[test]
fn configured_repository_wins() {
    let config = Config {
        owner: Some("acme".into()),
        repo: Some("widget".into()),
        ..Config::default()
    };
    assert_eq!(
        config
            .repository(Some("git@github.com:someone/else.git"))
            .unwrap(),
        RepoSlug::new("acme", "widget")
    );
}

#[test]
fn repository_inferred_from_remote() {
    let config = Config::default();
    assert_eq!(
        config
            .repository(Some("https://github.com/acme/widget.git"))
            .unwrap(),
        RepoSlug::new("acme", "widget")
    );
}

#[test]
fn repository_unknown_is_config_error() {
    let err = Config::default().repository(None).unwrap_err();
    assert!(matches!(err, Error::Config(ref m) if m.contains("origin")));
}
