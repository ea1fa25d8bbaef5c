//! Stackforge CLI entry point.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use stackforge_core::{log, EngineConfig};

mod cli;
mod commands;
mod state;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = cli.engine_config().and_then(|config| {
        init_logging(&config, cli.verbose)?;
        cli.execute(&config)
    });

    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_logging(config: &EngineConfig, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    if !config.logs.is_empty() {
        log::init_from_config(&config.logs)?;
        return Ok(());
    }

    let level = if verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        log::level_filter(config.log_level)
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stackforge={}", level)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    Ok(())
}
