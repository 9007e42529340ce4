//! Hive Console - Interactive Multi-Account Bot Console
//!
//! Starts the account directory, registers every command, and hands the
//! terminal to the interactive read loop until shutdown.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use hive_console::adapters::SimEngine;
use hive_console::config::{load_config, Config};
use hive_console::console::{self, commands, CliState, CommandRegistry, EngineFactory, Launcher, LineReader};
use hive_console::domain::AccountDirectory;
use hive_console::ports::BotEngine;

#[derive(Parser)]
#[command(name = "hive", about = "Interactive multi-account bot console")]
struct CliApp {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config/console.toml")]
    config: String,

    /// Log at info level
    #[arg(short, long)]
    verbose: bool,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = CliApp::parse();

    let config = if Path::new(&app.config).exists() {
        load_config(&app.config).context("Failed to load configuration")?
    } else {
        Config::default()
    };

    init_logging(app.verbose, app.debug, &config.logging.level)?;

    let data_dir = config.storage.expanded_data_dir();
    let directory = Arc::new(
        AccountDirectory::open(data_dir.into()).context("Failed to open account directory")?,
    );

    let mut registry = CommandRegistry::new();
    commands::register_all(&mut registry);

    let factory: EngineFactory = Arc::new(|name: &str| Box::new(SimEngine::new(name)) as Box<dyn BotEngine>);
    let mut state = CliState::new(
        Arc::new(registry),
        Arc::clone(&directory),
        Launcher::new(factory),
        config.console.fan_out_delay(),
        config.console.license_delay(),
    );

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let mut reader = LineReader::stdin();
    console::run(&mut state, &mut reader, &mut shutdown_rx).await;

    for account in directory.running() {
        if let Some(session) = account.session() {
            session.stop().await;
        }
        account.detach_session();
    }
    tracing::info!("Hive console stopped");
    Ok(())
}

fn init_logging(verbose: bool, debug: bool, configured: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new(configured)
    };

    fmt().with_env_filter(filter).init();
    Ok(())
}
