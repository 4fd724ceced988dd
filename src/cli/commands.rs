//! CLI command implementations

use std::path::{Path, PathBuf};

use tracing::info;

use super::args::Command;
use super::errors::CliResult;
use crate::http_server::{AppConfig, AppState, HttpServer};
use crate::observability::init_logging;
use crate::seed::{self, SeedData, SeedReport};

/// Dispatch a parsed command
pub async fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, seed } => serve(config.as_deref(), seed).await,
        Command::Seed { dir, config } => {
            let report = check_seed(config.as_deref(), &dir).await?;
            println!(
                "Seed data OK: {} bootcamps, {} courses",
                report.bootcamps, report.courses
            );
            Ok(())
        }
    }
}

fn load_config(env_file: Option<&Path>) -> CliResult<AppConfig> {
    let config = match env_file {
        Some(path) => AppConfig::from_env_file(&path.to_string_lossy())?,
        None => {
            // A missing default .env is not an error
            dotenvy::dotenv().ok();
            AppConfig::from_env()?
        }
    };
    init_logging(config.log_format);
    Ok(config)
}

/// Build state, import seed data if any, and serve until shutdown
pub async fn serve(env_file: Option<&Path>, seed_dir: Option<PathBuf>) -> CliResult<()> {
    let mut config = load_config(env_file)?;
    if seed_dir.is_some() {
        config.seed_dir = seed_dir;
    }

    let state = AppState::from_config(&config)?;
    state.init().await?;

    if let Some(dir) = &config.seed_dir {
        let data = SeedData::load(dir).await?;
        seed::import(&state, data).await?;
    }

    info!(environment = %config.environment, "starting server");
    HttpServer::new(config, state).start().await?;
    Ok(())
}

/// Import a seed directory into a scratch store and report counts
pub async fn check_seed(env_file: Option<&Path>, dir: &Path) -> CliResult<SeedReport> {
    let config = load_config(env_file)?;
    let state = AppState::from_config(&config)?;
    state.init().await?;

    let data = SeedData::load(dir).await?;
    Ok(seed::import(&state, data).await?)
}
