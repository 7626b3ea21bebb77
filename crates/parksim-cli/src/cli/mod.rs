//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use parksim_core::config;
use parksim_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "parksim")]
#[command(version)]
#[command(about = "Parking assistance simulator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// CSV file readings are appended to (overrides config)
    #[arg(long, value_name = "PATH", env = "PARKSIM_LOG_FILE")]
    log_file: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init();

    let Cli { command, log_file } = cli;

    // default to the interactive simulator
    let Some(command) = command else {
        let mut config = config::Config::load().context("load config")?;
        if let Some(path) = log_file {
            config.log_file = path;
        }
        return commands::simulate::run(&config);
    };

    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
