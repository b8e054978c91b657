mod api;
mod cli_messages;
mod config;
mod consts;
mod controller;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod models;
mod render;
mod session;
mod ui;
mod view;

use crate::config::{Config, get_config_path};
use crate::environment::Environment;
use crate::session::{
    EmergencyAction, run_emergency, run_headless_mode, run_snapshot, run_tui_mode, setup_session,
};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the live dashboard
    Start {
        /// Base URL of the dashboard API (or "local")
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,

        /// Interval between refreshes, in milliseconds
        #[arg(long, value_name = "MILLIS")]
        interval_ms: Option<u64>,

        /// Log refresh events to the console instead of drawing the dashboard
        #[arg(long, default_value = "false")]
        headless: bool,

        /// Enable background colors in the dashboard
        #[arg(long = "with-background", action = clap::ArgAction::SetTrue)]
        with_background: bool,
    },
    /// Fetch every section once and print the result
    Snapshot {
        /// Base URL of the dashboard API (or "local")
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
    },
    /// Read or change the trading emergency stop
    Emergency {
        /// Base URL of the dashboard API (or "local")
        #[arg(long, value_name = "URL", global = true)]
        api_url: Option<String>,

        #[command(subcommand)]
        action: EmergencyCommand,
    },
    /// Manage the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum EmergencyCommand {
    /// Print whether the emergency stop is on
    Status,
    /// Halt automated trading
    Stop {
        /// Reason recorded with the stop
        #[arg(long)]
        reason: Option<String>,
    },
    /// Release the emergency stop
    Resume,
}

impl From<EmergencyCommand> for EmergencyAction {
    fn from(command: EmergencyCommand) -> Self {
        match command {
            EmergencyCommand::Status => EmergencyAction::Status,
            EmergencyCommand::Stop { reason } => EmergencyAction::Stop { reason },
            EmergencyCommand::Resume => EmergencyAction::Resume,
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Save settings used by future runs
    Set {
        /// Base URL of the dashboard API (or "local")
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,

        /// Interval between refreshes, in milliseconds
        #[arg(long, value_name = "MILLIS")]
        interval_ms: Option<u64>,

        /// Per-request timeout, in seconds
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
    },
    /// Print the effective configuration
    Show,
    /// Delete the saved configuration
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config_path = get_config_path()?;
    let args = Args::parse();
    match args.command {
        Command::Start {
            api_url,
            interval_ms,
            headless,
            with_background,
        } => {
            let config = resolve_config(&config_path, api_url, interval_ms)?;
            let session = setup_session(config).await?;
            if headless {
                run_headless_mode(session).await
            } else {
                run_tui_mode(session, with_background).await
            }
        }
        Command::Snapshot { api_url } => {
            let config = resolve_config(&config_path, api_url, None)?;
            run_snapshot(config).await
        }
        Command::Emergency { api_url, action } => {
            let config = resolve_config(&config_path, api_url, None)?;
            run_emergency(config, action.into()).await
        }
        Command::Config { action } => handle_config_command(&config_path, action),
    }
}

/// Effective configuration: flags over environment over file over defaults.
fn resolve_config(
    config_path: &Path,
    api_url: Option<String>,
    interval_ms: Option<u64>,
) -> Result<Config, Box<dyn Error>> {
    let mut config = match Config::load_or_default(config_path) {
        Ok(config) => config,
        Err(e) => {
            print_cmd_warn!(
                "Ignoring saved configuration",
                "{}: {}",
                config_path.display(),
                e
            );
            Config::default()
        }
    }
    .with_env_overrides();

    if let Some(url) = api_url {
        config.api_url = url.parse::<Environment>()?.api_url();
    }
    if let Some(ms) = interval_ms {
        config.refresh_interval_ms = ms;
    }
    Ok(config)
}

fn handle_config_command(config_path: &Path, action: ConfigCommand) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigCommand::Set {
            api_url,
            interval_ms,
            timeout_secs,
        } => {
            let mut config = Config::load_or_default(config_path)
                .map_err(|e| format!("Failed to load config: {}", e))?;
            if let Some(url) = api_url {
                config.api_url = url.parse::<Environment>()?.api_url();
            }
            if let Some(ms) = interval_ms {
                config.refresh_interval_ms = ms;
            }
            if let Some(secs) = timeout_secs {
                config.request_timeout_secs = secs;
            }
            config
                .save(config_path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            print_cmd_success!("Configuration saved", "{}", config_path.display());
            Ok(())
        }
        ConfigCommand::Show => {
            let config = resolve_config(config_path, None, None)?;
            print_cmd_info!("Configuration", "{}", config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigCommand::Clear => {
            println!("Clearing dashboard configuration file...");
            Config::clear(config_path).map_err(Into::into)
        }
    }
}
