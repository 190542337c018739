//! Set-operation commands: union, intersect, diff, rdiff, symdiff.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::data::{read_mapping_file, to_yaml};
use crate::setops::{perform_set_operation, CompareMode, SetOperation};
use crate::utils::Settings;

/// Set-operation command options.
#[derive(Parser, Debug)]
pub struct SetOpCommand {
    /// First YAML file (A).
    #[arg(value_name = "FILE1")]
    pub file1: PathBuf,

    /// Second YAML file (B).
    #[arg(value_name = "FILE2")]
    pub file2: PathBuf,

    /// Comparison mode: keys or kv (key-values). Default: kv.
    #[arg(long, value_enum, ignore_case = true)]
    pub compare: Option<CompareMode>,

    /// How many levels deep to compare. 1 = root keys only, 0 = unlimited (full depth). Default: 1.
    #[arg(long)]
    pub depth: Option<usize>,
}

impl SetOpCommand {
    /// Executes the set operation and writes the YAML result to stdout.
    pub fn execute(&self, operation: SetOperation) -> Result<()> {
        let settings = self.settings_with(Settings::load)?;
        let output = self.render(operation, &settings)?;

        io::stdout()
            .lock()
            .write_all(output.as_bytes())
            .context("Failed to write result to stdout")?;
        Ok(())
    }

    /// Returns the settings needed to fill in missing flags.
    ///
    /// `load` is only called when `--compare` or `--depth` is missing.
    pub fn settings_with<F>(&self, load: F) -> Result<Settings>
    where
        F: FnOnce() -> Result<Settings>,
    {
        if self.compare.is_some() && self.depth.is_some() {
            return Ok(Settings::default());
        }
        load().context("Failed to load settings (pass both --compare and --depth to skip them)")
    }

    /// Runs the set operation and returns the YAML document.
    pub fn render(&self, operation: SetOperation, settings: &Settings) -> Result<String> {
        let config = settings.resolve(self.compare, self.depth);

        let file1 = read_mapping_file(&self.file1)?;
        let file2 = read_mapping_file(&self.file2)?;
        info!(
            operation = %operation,
            file1 = %self.file1.display(),
            file2 = %self.file2.display(),
            compare = %config.compare,
            depth = config.depth,
            "Running set operation"
        );

        let result = perform_set_operation(&file1, &file2, operation, &config).with_context(|| {
            format!(
                "Failed to compute {} of {} and {}",
                operation,
                self.file1.display(),
                self.file2.display()
            )
        })?;

        to_yaml(&result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::setops::SetOpConfig;
    use crate::utils::SetOperationDefaults;

    fn parse(args: &[&str]) -> SetOpCommand {
        let mut argv = vec!["config-utils", "union", "a.yml", "b.yml"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let (_, cmd) = cli.command.set_operation().unwrap();
        SetOpCommand {
            file1: cmd.file1.clone(),
            file2: cmd.file2.clone(),
            compare: cmd.compare,
            depth: cmd.depth,
        }
    }

    fn unreadable() -> Result<Settings> {
        anyhow::bail!("settings.json: expected value at line 1 column 1")
    }

    #[test]
    fn explicit_flags_skip_settings() {
        let cmd = parse(&["--compare", "keys", "--depth", "0"]);
        let settings = cmd.settings_with(unreadable).unwrap();
        assert_eq!(
            settings.resolve(cmd.compare, cmd.depth),
            SetOpConfig {
                compare: CompareMode::Keys,
                depth: 0
            }
        );
    }

    #[test]
    fn missing_flag_reports_broken_settings() {
        let cmd = parse(&["--compare", "keys"]);
        let err = cmd.settings_with(unreadable).unwrap_err();
        assert!(err.to_string().contains("Failed to load settings"));
        assert!(format!("{err:#}").contains("expected value"));
    }

    #[test]
    fn missing_flag_uses_settings() {
        let cmd = parse(&["--depth", "2"]);
        let settings = cmd
            .settings_with(|| {
                Ok(Settings {
                    set_operations: SetOperationDefaults {
                        compare: Some(CompareMode::Keys),
                        depth: Some(5),
                    },
                })
            })
            .unwrap();
        assert_eq!(
            settings.resolve(cmd.compare, cmd.depth),
            SetOpConfig {
                compare: CompareMode::Keys,
                depth: 2
            }
        );
    }
}
