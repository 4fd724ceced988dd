//! CLI module
//!
//! Provides the command-line interface:
//! - serve: load configuration, seed, and run the HTTP server
//! - seed: validate a seed directory

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check_seed, run_command, serve};
pub use errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command).await
}
