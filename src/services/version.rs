// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{Error, Result};

/// `const VERSION = '1.2.3';` or `const VERSION: &str = "1.2.3";`
static VERSION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(const VERSION\s*(?::\s*&(?:'static\s+)?str\s*)?=\s*)(?:'([0-9]{1,2}\.[0-9]{1,2}\.[0-9]{1,2})';|"([0-9]{1,2}\.[0-9]{1,2}\.[0-9]{1,2})";)"#,
    )
    .unwrap()
});

static RELEASE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,2}\.[0-9]{1,2}\.[0-9]{1,2}$").unwrap());

/// Whether `tag` fits the marker's `MAJOR.MINOR.PATCH` shape (ASCII digits only)
pub fn is_release_tag(tag: &str) -> bool {
    RELEASE_TAG.is_match(tag)
}

/// Version currently recorded by the first marker in `content`
pub fn find_version(content: &str) -> Option<&str> {
    let caps = VERSION_MARKER.captures(content)?;
    caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str())
}

/// Replace the first marker's version, keeping its quote style and every
/// other byte of `content`. `None` when no marker exists.
pub fn rewrite_version(content: &str, new_version: &str) -> Option<String> {
    if !VERSION_MARKER.is_match(content) {
        return None;
    }

    let rewritten = VERSION_MARKER.replacen(content, 1, |caps: &Captures| {
        let quote = if caps.get(2).is_some() { '\'' } else { '"' };
        format!("{}{quote}{new_version}{quote};", &caps[1])
    });
    Some(rewritten.into_owned())
}

/// The source file carrying the version marker.
pub struct VersionFile {
    path: PathBuf,
}

impl VersionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure `content` (e.g. the file at the remote tip) carries a marker
    pub fn check(&self, content: &str) -> Result<()> {
        find_version(content).map(|_| ()).ok_or_else(|| self.not_found())
    }

    /// Rewrite the marker in place; returns the previous version.
    pub fn bump(&self, new_version: &str) -> Result<String> {
        let content = fs::read_to_string(&self.path)?;
        let previous = find_version(&content)
            .ok_or_else(|| self.not_found())?
            .to_string();
        let rewritten = rewrite_version(&content, new_version).ok_or_else(|| self.not_found())?;

        fs::write(&self.path, rewritten)?;
        debug!(path = %self.path.display(), from = %previous, to = new_version, "version bumped");
        Ok(previous)
    }

    fn not_found(&self) -> Error {
        Error::VersionMarkerNotFound {
            path: self.path.display().to_string(),
        }
    }
}
