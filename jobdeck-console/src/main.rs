//! jobdeck Console
//!
//! An operator console for a single long-running job on a remote server.
//!
//! Architecture:
//! - Configuration: settings from environment, flags, or defaults
//! - Controllers: job lifecycle state machine, schedule synchronizer, output actions
//! - Presenter: projections of controller state drawn to the terminal
//! - Console: the event loop tying polls and operator commands together
//!
//! The console polls the server for the job's status, follows a run until
//! its result is in, and keeps the list of scheduled runs in sync with the
//! server after every change.

mod command;
mod config;
mod console;
mod controller;
mod presenter;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::console::Console;
use crate::presenter::TerminalPresenter;
use jobdeck_client::JobDeckClient;

#[derive(Parser)]
#[command(name = "jobdeck")]
#[command(about = "Operator console for the job server", long_about = None)]
struct Cli {
    /// Job server URL
    #[arg(long, env = "JOBDECK_SERVER_URL")]
    server_url: Option<String>,

    /// Directory for saved output files
    #[arg(long, env = "JOBDECK_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the console view
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobdeck_console=info,jobdeck_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli)?;
    info!(
        "Loaded configuration: server_url={}, status_interval={:?}, result_interval={:?}",
        config.server_url, config.status_interval, config.result_interval
    );

    let client = Arc::new(JobDeckClient::new(config.server_url.clone()));
    let presenter = Arc::new(TerminalPresenter::new(config.toast_visible, config.toast_exit));

    let mut console = Console::new(config, client, presenter);

    info!("Console ready, type `help` for commands");
    if let Err(e) = console.run(BufReader::new(tokio::io::stdin())).await {
        error!("Console error: {:#}", e);
        return Err(e);
    }

    Ok(())
}

/// Loads configuration from the environment with fallback to defaults, then
/// applies command-line overrides
fn load_config(cli: Cli) -> Result<Config> {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(_) => {
            // URL comes from the flag or the default; other variables still apply
            let mut config = Config::default();
            config.apply_env();
            if cli.server_url.is_none() {
                info!("JOBDECK_SERVER_URL not set, using {}", config.server_url);
            }
            config
        }
    };

    if let Some(server_url) = cli.server_url {
        config.server_url = server_url;
    }

    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }

    config.validate()?;
    Ok(config)
}
