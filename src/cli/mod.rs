//! CLI interface for config-utils.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::setops::SetOperation;

pub mod capture;
pub mod config;
pub mod setops;

pub use capture::CaptureEnvCommand;
pub use config::ConfigCommand;
pub use setops::SetOpCommand;

/// config-utils: Capture environment variables and perform YAML set operations.
#[derive(Parser)]
#[command(name = "config-utils")]
#[command(
    about = "Capture environment variables and perform YAML set operations",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Returns all keys (or key-value pairs) present in either file.
    Union(SetOpCommand),
    /// Returns only keys (or key-value pairs) present in both files.
    Intersect(SetOpCommand),
    /// Returns keys (or key-value pairs) in file1 but not in file2 (A - B).
    Diff(SetOpCommand),
    /// Returns keys (or key-value pairs) in file2 but not in file1 (B - A).
    Rdiff(SetOpCommand),
    /// Returns keys (or key-value pairs) in either file but not in both.
    Symdiff(SetOpCommand),
    /// Captures all environment variables and stores them in YAML format.
    #[command(name = "capture-env")]
    CaptureEnv(CaptureEnvCommand),
    /// Settings information.
    Config(ConfigCommand),
}

impl Commands {
    /// Returns the set operation and its arguments, if this is a set-operation command.
    pub fn set_operation(&self) -> Option<(SetOperation, &SetOpCommand)> {
        match self {
            Commands::Union(cmd) => Some((SetOperation::Union, cmd)),
            Commands::Intersect(cmd) => Some((SetOperation::Intersect, cmd)),
            Commands::Diff(cmd) => Some((SetOperation::Diff, cmd)),
            Commands::Rdiff(cmd) => Some((SetOperation::Rdiff, cmd)),
            Commands::Symdiff(cmd) => Some((SetOperation::Symdiff, cmd)),
            Commands::CaptureEnv(_) | Commands::Config(_) => None,
        }
    }
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        if let Some((operation, cmd)) = self.command.set_operation() {
            return cmd.execute(operation);
        }

        match self.command {
            Commands::CaptureEnv(capture_cmd) => capture_cmd.execute(),
            Commands::Config(config_cmd) => config_cmd.execute(),
            // set operations returned above
            _ => Ok(()),
        }
    }
}
