// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tagcut::{App, Cli, Error};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tagcut=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tagcut=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .without_time()
        .init();
}

/// Cancellation is a clean exit; everything else is a miette report.
fn exit_with(error: Error) -> ExitCode {
    if let Error::Cancelled = error {
        eprintln!("Aborted.");
        return ExitCode::SUCCESS;
    }
    eprintln!("{:?}", miette::Report::new(error));
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match App::new(cli) {
        Ok(mut app) => app.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => exit_with(e),
    }
}
