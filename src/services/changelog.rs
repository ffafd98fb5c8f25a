// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::Result;

/// Persists changelog entries newest-first.
pub trait ChangelogWriter: Send + Sync {
    /// Put `header` + `body` above everything already written.
    fn prepend(&self, header: &str, body: &str) -> Result<()>;
}

/// `#### 8.6.10 (2026-10-17)` followed by a blank line
pub fn release_header(tag: &str, date: NaiveDate) -> String {
    format!("#### {tag} ({})\n\n", date.format("%Y-%m-%d"))
}

pub struct ChangelogFile {
    path: PathBuf,
}

impl ChangelogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChangelogWriter for ChangelogFile {
    fn prepend(&self, header: &str, body: &str) -> Result<()> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let mut content = String::with_capacity(header.len() + body.len() + existing.len() + 1);
        content.push_str(header);
        content.push_str(body);
        if !existing.is_empty() {
            if !body.ends_with('\n') {
                content.push('\n');
            }
            content.push('\n');
            content.push_str(&existing);
        }

        // Write to temp file first, then rename (atomic)
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "CHANGELOG.md".into());
        let temp_path = self.path.with_file_name(format!(".{file_name}.tmp"));
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), "changelog updated");
        Ok(())
    }
}
