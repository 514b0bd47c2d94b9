use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rf_cli::commands::{claims, levels, report};
use rf_cli::{Cli, Commands, Config};

/// Load config and check the engine thresholds before any work starts.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    config
        .engine
        .validate()
        .context("invalid engine configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Report {
            input,
            window,
            json,
            all,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            report::run(&mut stdout, &config, input, window, *json, *all)?;
        }
        Some(Commands::Levels { input }) => {
            let config = load_config(cli.config.as_deref())?;
            levels::run(&mut stdout, &config, input)?;
        }
        Some(Commands::Claims { text, window }) => {
            let config = load_config(cli.config.as_deref())?;
            claims::run(&mut stdout, &config, text, window)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
