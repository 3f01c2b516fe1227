#![allow(clippy::enum_variant_names)]

use std::process::ExitCode;

use clap::Parser as _;
use tracing::debug;

use crate::{application::Application, cli::Cli};

mod application;
mod cli;
mod ext;
mod session;
mod snapshot;
mod traversal;
mod znode;

/// The invocation itself was wrong: bad flags, missing file or operation.
const EXIT_USAGE: u8 = 1;
/// The dump or load was attempted and failed.
const EXIT_FAILURE: u8 = 2;

#[compio::main]
async fn main() -> ExitCode {
    let cli_args = match Cli::try_parse() {
        Ok(cli_args) => cli_args,
        Err(err) => {
            if let Err(print_err) = err.print() {
                eprintln!("Failed to print usage: {print_err}");
            }
            return ExitCode::from(usage_exit_code(&err));
        }
    };
    setup_tracing(&cli_args);
    debug!("Parsed CLI arguments: {cli_args:?}");

    match Application::run(cli_args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", snafu::Report::from_error(err));
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// `--help` and `--version` also surface as parse errors, but they succeed.
fn usage_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() { EXIT_USAGE } else { 0 }
}

fn setup_tracing(cli_args: &Cli) {
    if let Some(level) = cli_args.log_level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .without_time()
            .compact()
            .init();
    }
}
