//! Settings and configuration utilities.
//!
//! This module reads optional defaults from `$HOME/.config-utils/settings.json`.
//! The `CONFIG_UTILS_SETTINGS` environment variable points at a different file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::setops::{CompareMode, SetOpConfig};

/// Environment variable that overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "CONFIG_UTILS_SETTINGS";

/// Settings loaded from `$HOME/.config-utils/settings.json`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Defaults for the set-operation commands.
    #[serde(default)]
    pub set_operations: SetOperationDefaults,
}

/// User defaults for `--compare` and `--depth`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOperationDefaults {
    /// Comparison mode used when `--compare` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare: Option<CompareMode>,
    /// Depth used when `--depth` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, return default settings
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the settings path, honouring `CONFIG_UTILS_SETTINGS`.
    pub fn get_settings_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(SETTINGS_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".config-utils").join("settings.json"))
    }

    /// Combines command-line flags with these settings.
    ///
    /// A flag wins over the settings file, which wins over the built-in default.
    pub fn resolve(&self, compare: Option<CompareMode>, depth: Option<usize>) -> SetOpConfig {
        let builtin = SetOpConfig::default();
        SetOpConfig {
            compare: compare
                .or(self.set_operations.compare)
                .unwrap_or(builtin.compare),
            depth: depth.or(self.set_operations.depth).unwrap_or(builtin.depth),
        }
    }
}
