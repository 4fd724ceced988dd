//! CLI argument definitions using clap
//!
//! Commands:
//! - bootcamp-api serve [--config <env-file>] [--seed <dir>]
//! - bootcamp-api seed --dir <dir>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bootcamp directory REST API
#[derive(Parser, Debug)]
#[command(name = "bootcamp-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Env file loaded before reading configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed directory imported at startup (overrides SEED_DIR)
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Validate a seed directory by importing it into a scratch store
    Seed {
        /// Directory containing bootcamps.json and optionally courses.json
        #[arg(long)]
        dir: PathBuf,

        /// Env file loaded before reading configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
