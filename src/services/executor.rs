// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `program args...` in `cwd` and capture its output.
    ///
    /// A non-zero exit is not an error here; callers inspect `status`.
    async fn execute(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput>;
}

/// Runs real processes with a hard timeout.
pub struct SystemExecutor {
    timeout: Duration,
}

impl SystemExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandExecutor for SystemExecutor {
    async fn execute(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        debug!(program, ?args, "executing command");

        let child = tokio::process::Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| Error::CommandTimeout {
                command: format!("{} {}", program, args.join(" ")),
                secs: self.timeout.as_secs(),
            })??;

        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(program, status = ?result.status, "command finished");
        Ok(result)
    }
}
