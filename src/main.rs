//! bootcamp-api entry point
//!
//! Parses arguments and dispatches to the CLI module; prints errors to
//! stderr and exits non-zero on failure.

use bootcamp_api::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
