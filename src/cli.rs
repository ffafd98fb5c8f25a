// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser};

#[derive(Parser, Debug)]
#[command(name = "tagcut")]
#[command(version)]
#[command(about = "Cut a tagged release with a label-sorted changelog", long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Token given on the command line (or via TAGCUT_TOKEN), if any
    pub fn token(&self) -> Option<&str> {
        match &self.command {
            Commands::Release { target, .. } | Commands::Notes { target, .. } => {
                target.token.as_deref()
            }
            _ => None,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReleaseTarget {
    /// New release tag, e.g. 8.6.10
    pub tag: String,

    /// Previous release tag (default: newest tag reachable from the branch)
    #[arg(long)]
    pub prev_tag: Option<String>,

    /// GitHub access token
    #[arg(long, env = "TAGCUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Bump the version, update and push the changelog, create a draft release
    Release {
        #[command(flatten)]
        target: ReleaseTarget,

        /// Skip the confirmation prompt (destroys uncommitted work)
        #[arg(short = 'y', long)]
        yes: bool,

        /// Open the draft release in a browser when done
        #[arg(long)]
        open: bool,
    },
    /// Generate release notes and prepend them to the changelog
    Notes {
        #[command(flatten)]
        target: ReleaseTarget,

        /// Print the notes instead of writing the changelog
        #[arg(long)]
        dry_run: bool,
    },
    /// Initialize config file
    Init,
    /// Show current configuration
    Config,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Store the GitHub token in the system keychain
    #[cfg(feature = "secure-storage")]
    SetToken,
    /// Check whether a GitHub token is stored in the system keychain
    #[cfg(feature = "secure-storage")]
    GetToken,
}
