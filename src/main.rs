//! setup-odin - Odin toolchain provisioning for CI
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use setup_odin::cli::{Cli, Commands};
use setup_odin::config::ConfigManager;
use setup_odin::error::{SetupError, SetupResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(SetupError::Reported(_)) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> SetupResult<()> {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug; the runner's debug mode implies debug
    let runner_debug = std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
    let filter = match (cli.verbose, runner_debug) {
        (_, true) | (2.., _) => EnvFilter::new("setup_odin=debug"),
        (1, _) => EnvFilter::new("setup_odin=info"),
        _ => EnvFilter::new("setup_odin=warn"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Explicit config, else a local setup-odin.toml, else defaults
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else if cli.no_local {
        debug!("Local config discovery disabled (--no-local)");
        ConfigManager::new()
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| SetupError::io("getting current directory", e))?;
        match ConfigManager::find_local_config(&cwd) {
            Some(path) => {
                debug!("Found local config: {}", path.display());
                ConfigManager::with_path(path)
            }
            None => ConfigManager::new(),
        }
    };

    let config = config_manager.load().await?;
    if let Some(path) = config_manager.path() {
        debug!("Loaded config from {}", path.display());
    }

    match cli.command {
        Commands::Run(args) => setup_odin::cli::commands::run(args, &config).await,
        Commands::Post(args) => setup_odin::cli::commands::post(args, &config).await,
        Commands::Key(args) => setup_odin::cli::commands::key(args, &config).await,
    }
}
