//! Command-line argument parsing

use clap::{Parser, Subcommand};

use super::DEFAULT_CONFIG_PATH;

/// Personal finance tracking service
#[derive(Debug, Parser)]
#[command(name = "fintrack", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long = "config", global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write a sample configuration file
    Generate {
        /// Output path
        #[arg(default_value = "config.example.toml")]
        path: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Resolve the command, defaulting to `serve`
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Serve)
    }
}
