//! Viewo CLI - admin API session client

mod commands;
mod config;
mod console;
mod file_store;
mod logging;
mod scheduler;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use commands::Commands;
use config::CliConfig;
use console::Console;
use std::path::PathBuf;
use tokio::task::LocalSet;
use tracing::{Level, debug, error, info};

#[derive(Parser)]
#[command(name = "viewo")]
#[command(about = "Command-line client for the Viewo admin API")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Config file (toml, yaml or json)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the session file
    #[arg(short = 'd', long, global = true)]
    state_dir: Option<PathBuf>,

    /// Admin API base URL, e.g. https://viewo.example/api/v1
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.clone().into())?;

    // Timers are local tasks
    let local = LocalSet::new();
    if let Err(e) = local.run_until(run(cli)).await {
        error!("Command failed: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.state_dir {
        config.state_dir = Some(dir);
    }
    if let Some(api_base) = cli.api_base {
        config.session.api_base = api_base;
    }
    debug!(api_base = %config.session.api_base, "Loaded configuration");

    let console = Console::open(&config)?;
    console.context.start().await;

    let mut stdout = std::io::stdout().lock();
    cli.command.execute(&console, &mut stdout).await?;
    info!("Command completed successfully");
    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
