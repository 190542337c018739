//! Configuration-related CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::data::to_yaml;
use crate::setops::SetOpConfig;
use crate::utils::Settings;

/// Configuration operations.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommands {
    /// Shows the settings file location and the effective set-operation defaults.
    Show(ShowCommand),
}

/// Show command options.
#[derive(Parser, Debug)]
pub struct ShowCommand {}

/// Settings report printed by `config show`.
#[derive(Debug, Serialize)]
pub struct SettingsReport {
    /// Location of the settings file.
    pub settings_path: String,
    /// Whether the settings file exists.
    pub settings_found: bool,
    /// Defaults applied when no flags are given.
    pub set_operations: SetOpConfig,
}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let path = Settings::get_settings_path()?;
        let settings = Settings::load_from_path(&path)?;
        let report = SettingsReport {
            settings_path: path.display().to_string(),
            settings_found: path.exists(),
            set_operations: settings.resolve(None, None),
        };
        print!("{}", to_yaml(&report)?);
        Ok(())
    }
}
