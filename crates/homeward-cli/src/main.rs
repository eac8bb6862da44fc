//! Homeward CLI - Main entry point

use clap::Parser;
use homeward_cli::{Cli, Commands};
use homeward_common::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Load .env before clap resolves env-backed flags
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Environment configures logging; --verbose raises the level to debug
    let mut log_config = LogConfig::from_env().unwrap_or_default();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    // Initialize logging (ignore errors as the CLI should work without it)
    let _ = init_logging(&log_config);

    // Execute command
    if let Err(e) = execute_command(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: Cli) -> homeward_cli::Result<()> {
    match cli.command {
        Commands::Run {
            batch_size,
            max_retries,
            timeout,
            dry_run,
            strict_timestamps,
        } => {
            homeward_cli::commands::run::run(
                cli.base_url,
                batch_size,
                max_retries,
                timeout,
                dry_run,
                strict_timestamps,
            )
            .await
        }

        Commands::Probe => homeward_cli::commands::probe::run(cli.base_url).await,
    }
}
